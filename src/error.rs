//! Fatal errors.
//!
//! Semantic problems found while resolving a statement (unknown or ambiguous
//! columns, missing tables, ...) are never reported here: they are recorded on
//! the statement itself, see `SqlSelectDefinition::invalid_reference_reason`.
//! Everything in this enum is a contract violation between the host and the
//! crate and should be fixed by the integrator.

use thiserror::Error;

use crate::database::DataType;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Provider errors
    #[error("There is no database named {0}")]
    DatabaseNotFound(String),

    #[error("There is no table by the name of {0}")]
    TableNotFound(String),

    #[error("Column {column} does not exist in table {table}")]
    ColumnNotFound { table: String, column: String },

    #[error("Provider error: {0}")]
    Provider(String),

    // Type errors
    #[error("Type mismatch: {left} and {right} have no common type")]
    TypeMismatch { left: DataType, right: DataType },

    #[error("Value {value} cannot be converted to {to}")]
    InvalidCast { value: String, to: DataType },

    #[error("Invalid LIKE pattern {0}")]
    InvalidLikePattern(String),

    // Rewriting errors
    #[error("Unable to find parameter {0} in the supplied parameter values")]
    UnknownParameter(String),

    #[error("More positional parameters were found than the {0} values supplied")]
    NotEnoughParameters(usize),

    #[error("Parameter {0} is not of the kind the supplied values expect")]
    InvalidParameterKind(String),

    #[error("LIMIT/OFFSET value {0} cannot be converted to an integer")]
    UnsupportedLimitValue(String),

    // Execution errors
    #[error("The statement has unresolved references: {0}")]
    InvalidReferences(String),

    #[error("Parameter {0} must be resolved to a literal before execution")]
    UnresolvedParameter(String),

    #[error("Function {0} must be resolved before execution")]
    UnresolvedFunction(String),

    #[error("The aggregate COUNT can be the only column in the SELECT when used.")]
    CountNotAlone,

    #[error("Aggregate {0} is not supported")]
    UnsupportedAggregate(String),

    #[error("Output column {0} is specified more than once")]
    DuplicateColumn(String),

    #[error("Column {0} has no value resolver")]
    MissingValueResolver(String),

    #[error("Column reference {0} is not bound to a table")]
    UnboundColumn(String),

    // Loading errors
    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_host_facing_text() {
        assert_eq!(
            Error::DatabaseNotFound("Sales".into()).to_string(),
            "There is no database named Sales"
        );
        assert_eq!(
            Error::TableNotFound("Orders".into()).to_string(),
            "There is no table by the name of Orders"
        );
        assert_eq!(
            Error::CountNotAlone.to_string(),
            "The aggregate COUNT can be the only column in the SELECT when used."
        );
    }

    #[test]
    fn io_and_json_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(Error::from(io), Error::Io(_)));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(Error::from(json), Error::Json(_)));
    }
}
