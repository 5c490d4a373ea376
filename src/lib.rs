//! Truth tables for boolean expressions written in a lexicon the user picks.
//!
//! ```
//! use std::sync::Arc;
//! use truthtab::{Evaluator, EvaluatorConfig, OptionKey, OptionStore};
//!
//! let store = Arc::new(OptionStore::new());
//! let evaluator = Evaluator::new(store.clone(), EvaluatorConfig::default());
//!
//! let table = evaluator.evaluate_all("A and B").unwrap();
//! assert_eq!(table.rows.len(), 4);
//! assert_eq!(table.successes().count(), 1);
//!
//! store.set(OptionKey::And, "&");
//! assert!(evaluator.evaluate_all("A & B").is_ok());
//! assert!(evaluator.evaluate_all("A and B").is_err());
//! ```

use lalrpop_util::lalrpop_mod;

pub mod error;
pub mod evaluator;
pub mod language;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod render;
pub mod session;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

lalrpop_mod!(grammar);

pub use error::{Error, Result};
pub use evaluator::{
    evaluate_fn, Assignment, EvaluationResult, EvaluationRow, Evaluator, EvaluatorConfig,
    DEFAULT_MAX_VARIABLES, HARD_MAX_VARIABLES,
};
pub use language::Expr;
pub use options::{Backing, OptionKey, OptionStore, SymbolTable};
pub use render::{Render, Selection};
pub use session::{Session, TruthTester};
