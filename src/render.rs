use crate::{
    error::Result,
    evaluator::{EvaluationResult, EvaluationRow},
};

/// Which rows of a truth table to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Selection {
    #[default]
    All,
    Successes,
    Failures,
}

impl Selection {
    pub fn rows<'a>(
        &self,
        result: &'a EvaluationResult,
    ) -> Box<dyn Iterator<Item = &'a EvaluationRow> + 'a> {
        match self {
            Self::All => Box::new(result.rows.iter()),
            Self::Successes => Box::new(result.successes()),
            Self::Failures => Box::new(result.failures()),
        }
    }
}

/// Presents an evaluated truth table somewhere: a terminal, a DOM node.
pub trait Render {
    fn render(&mut self, result: &EvaluationResult, selection: Selection) -> Result<()>;
}

/// One-line summary printed under a table.
pub fn verdict(result: &EvaluationResult, selection: Selection) -> String {
    match selection {
        Selection::All if result.is_tautology() => "This is a tautology!".to_string(),
        Selection::All if result.is_contradiction() => "This is a contradiction!".to_string(),
        Selection::All => "This is NOT a tautology!".to_string(),
        Selection::Successes => format!(
            "{} of {} rows are true",
            result.successes().count(),
            result.rows.len()
        ),
        Selection::Failures => format!(
            "{} of {} rows are false",
            result.failures().count(),
            result.rows.len()
        ),
    }
}

#[cfg(feature = "cli")]
pub use table::TableRenderer;

#[cfg(feature = "cli")]
mod table {
    use prettytable::{format::Alignment, Cell, Row, Table};

    use super::{verdict, Render, Selection};
    use crate::{error::Result, evaluator::EvaluationResult};

    /// Prints truth tables to stdout.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TableRenderer {
        pub no_table: bool,
    }

    impl TableRenderer {
        pub fn table(result: &EvaluationResult, selection: Selection) -> Table {
            let mut table = Table::new();
            let mut header_row = Row::new(
                result
                    .variables
                    .iter()
                    .map(|x| Cell::new(x))
                    .collect(),
            );
            header_row.add_cell(Cell::new(""));
            header_row.add_cell(Cell::new(&result.title()));
            table.add_row(header_row);
            table.add_empty_row();

            let mut t_cell = Cell::new("T").style_spec("Fg");
            let mut f_cell = Cell::new("F").style_spec("Fr");

            f_cell.align(Alignment::CENTER);
            t_cell.align(Alignment::CENTER);

            let cell = |value: bool| if value { t_cell.clone() } else { f_cell.clone() };

            for entry in selection.rows(result) {
                let mut row = Row::new(entry.assignment.iter().map(|(_, v)| cell(v)).collect());
                row.add_cell(Cell::new(""));
                row.add_cell(cell(entry.value));
                table.add_row(row);
            }

            table
        }
    }

    impl Render for TableRenderer {
        fn render(&mut self, result: &EvaluationResult, selection: Selection) -> Result<()> {
            if !self.no_table {
                Self::table(result, selection).printstd();
            }
            println!("{}", verdict(result, selection));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        evaluator::{Evaluator, EvaluatorConfig},
        options::OptionStore,
    };

    fn evaluate(input: &str) -> EvaluationResult {
        Evaluator::new(Arc::new(OptionStore::new()), EvaluatorConfig::default())
            .evaluate_all(input)
            .unwrap()
    }

    #[test]
    fn selection_filters_rows() {
        let result = evaluate("a or b");
        assert_eq!(Selection::All.rows(&result).count(), 4);
        assert_eq!(Selection::Successes.rows(&result).count(), 3);
        assert_eq!(Selection::Failures.rows(&result).count(), 1);
    }

    #[test]
    fn verdict_lines() {
        assert_eq!(verdict(&evaluate("a -> a"), Selection::All), "This is a tautology!");
        assert_eq!(
            verdict(&evaluate("a xor a"), Selection::All),
            "This is a contradiction!"
        );
        assert_eq!(
            verdict(&evaluate("a and b"), Selection::Failures),
            "3 of 4 rows are false"
        );
    }

    #[test]
    fn closure_tables_get_a_verdict() {
        let excluded_middle = |s: &crate::Assignment| s.var_at(0) || !s.var_at(0);
        let result =
            crate::evaluator::evaluate_fn(2, EvaluatorConfig::default(), excluded_middle).unwrap();
        assert_eq!(verdict(&result, Selection::All), "This is a tautology!");
    }

    #[cfg(feature = "cli")]
    #[test]
    fn table_has_header_spacer_and_selected_rows() {
        let result = evaluate("a and b");
        let table = TableRenderer::table(&result, Selection::Successes);
        assert_eq!(table.len(), 3);
    }
}
