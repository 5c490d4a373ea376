use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The expression could not be parsed. `position` counts characters from
    /// the start of the input.
    #[error("parse error at position {position}: {message}")]
    Parse { position: usize, message: String },
    #[error("unknown option key `{0}`")]
    UnknownKey(String),
    #[error("variable `{0}` has no value in this assignment")]
    UnboundVariable(String),
    #[error("expression uses {count} variables, the limit is {limit}")]
    TooManyVariables { count: usize, limit: usize },
    #[error("storage has not been initialized, call `init_storage` first")]
    NotInitialized,
    #[error("host error: {0}")]
    Host(String),
}
