//! Truth-table enumeration.
//!
//! Rows are numbered `0..2^n`. Row `i` assigns the variables the bits of `i`,
//! with the first variable as the most significant bit, so two variables run
//! `FF, FT, TF, TT`.
//!
//! Tables come either from a parsed expression ([`Evaluator::evaluate_all`])
//! or from a Rust closure over positional variables ([`evaluate_fn`]).

use std::sync::Arc;

use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    error::{Error, Result},
    language::Expr,
    options::OptionStore,
    parser::{self, Parsed},
};

pub const DEFAULT_MAX_VARIABLES: usize = 20;

/// No configuration may raise the ceiling above this.
pub const HARD_MAX_VARIABLES: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Expressions with more distinct variables are rejected before any row
    /// is computed.
    pub max_variables: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_variables: DEFAULT_MAX_VARIABLES,
        }
    }
}

impl EvaluatorConfig {
    /// The configured ceiling, clamped to [`HARD_MAX_VARIABLES`].
    pub fn limit(&self) -> usize {
        self.max_variables.min(HARD_MAX_VARIABLES)
    }
}

/// Values of every variable for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    names: Arc<[String]>,
    bits: usize,
}

impl Assignment {
    pub fn new(names: Arc<[String]>, bits: usize) -> Self {
        Self { names, bits }
    }

    fn value_at(&self, idx: usize) -> bool {
        let shift = self.names.len() - 1 - idx;
        (self.bits >> shift) & 1 == 1
    }

    /// Value of the variable at `idx`, counted in order of appearance.
    ///
    /// ## Panics
    /// When `idx >= self.var_count()`.
    pub fn var_at(&self, idx: usize) -> bool {
        assert!(
            idx < self.var_count(),
            "variable {idx} out of range for {} variables",
            self.var_count()
        );
        self.value_at(idx)
    }

    pub fn var_count(&self) -> usize {
        self.names.len()
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(self.value_at(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), self.value_at(i)))
    }

    /// Row number in the table this assignment came from.
    pub fn index(&self) -> usize {
        self.bits
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRow {
    pub assignment: Assignment,
    pub value: bool,
}

/// Every row of a truth table, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    /// `None` for tables built from a closure.
    pub expression: Option<Expr>,
    pub variables: Arc<[String]>,
    pub rows: Vec<EvaluationRow>,
}

impl EvaluationResult {
    /// Column heading for the result column.
    pub fn title(&self) -> String {
        self.expression
            .as_ref()
            .map_or_else(|| "f".to_string(), ToString::to_string)
    }

    pub fn successes(&self) -> impl Iterator<Item = &EvaluationRow> {
        self.rows.iter().filter(|row| row.value)
    }

    pub fn failures(&self) -> impl Iterator<Item = &EvaluationRow> {
        self.rows.iter().filter(|row| !row.value)
    }

    pub fn is_tautology(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn is_contradiction(&self) -> bool {
        self.successes().next().is_none()
    }

    pub fn is_satisfiable(&self) -> bool {
        !self.is_contradiction()
    }
}

/// Evaluates expressions against a shared [`OptionStore`].
///
/// Each call takes one snapshot of the store's symbols before lexing, so a
/// concurrent `set` is either fully visible or not at all.
#[derive(Debug, Clone)]
pub struct Evaluator {
    store: Arc<OptionStore>,
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(store: Arc<OptionStore>, config: EvaluatorConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<OptionStore> {
        &self.store
    }

    pub fn config(&self) -> EvaluatorConfig {
        self.config
    }

    pub fn parse(&self, input: &str) -> Result<Parsed> {
        parser::parse(input, &self.store.symbols())
    }

    pub fn evaluate_all(&self, input: &str) -> Result<EvaluationResult> {
        let Parsed { expr, variables } = self.parse(input)?;
        debug!("evaluating {expr} over {} variables", variables.len());

        let (variables, rows) = enumerate(variables, self.config, |a| expr.eval(a))?;
        Ok(EvaluationResult {
            expression: Some(expr),
            variables,
            rows,
        })
    }

    pub fn evaluate_successes(&self, input: &str) -> Result<Vec<EvaluationRow>> {
        let result = self.evaluate_all(input)?;
        Ok(result.rows.into_iter().filter(|row| row.value).collect())
    }

    pub fn evaluate_failures(&self, input: &str) -> Result<Vec<EvaluationRow>> {
        let result = self.evaluate_all(input)?;
        Ok(result.rows.into_iter().filter(|row| !row.value).collect())
    }
}

/// Builds the truth table of `f` over `var_count` positional variables named
/// `x0`, `x1`, ... . `f` reads them with [`Assignment::var_at`].
pub fn evaluate_fn<F>(
    var_count: usize,
    config: EvaluatorConfig,
    f: F,
) -> Result<EvaluationResult>
where
    F: Fn(&Assignment) -> bool + Sync,
{
    let variables = (0..var_count).map(|i| format!("x{i}")).collect();
    let (variables, rows) = enumerate(variables, config, |a| Ok(f(a)))?;
    Ok(EvaluationResult {
        expression: None,
        variables,
        rows,
    })
}

fn enumerate<F>(
    variables: Vec<String>,
    config: EvaluatorConfig,
    eval: F,
) -> Result<(Arc<[String]>, Vec<EvaluationRow>)>
where
    F: Fn(&Assignment) -> Result<bool> + Sync,
{
    let limit = config.limit();
    let too_many = || Error::TooManyVariables {
        count: variables.len(),
        limit,
    };
    if variables.len() > limit {
        return Err(too_many());
    }

    let row_count = 1usize << variables.len();
    let mut rows = Vec::new();
    rows.try_reserve_exact(row_count).map_err(|_| too_many())?;

    let variables: Arc<[String]> = variables.into();
    let row = |bits: usize| -> Result<EvaluationRow> {
        let assignment = Assignment::new(variables.clone(), bits);
        let value = eval(&assignment)?;
        Ok(EvaluationRow { assignment, value })
    };

    #[cfg(feature = "parallel")]
    {
        let computed = (0..row_count)
            .into_par_iter()
            .map(row)
            .collect::<Result<Vec<_>>>()?;
        rows.extend(computed);
    }
    #[cfg(not(feature = "parallel"))]
    for bits in 0..row_count {
        rows.push(row(bits)?);
    }

    Ok((variables, rows))
}
