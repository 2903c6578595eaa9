use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    #[error("malformed condition: {0}")]
    Syntax(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("unknown condition: {0}")]
    UnknownHandler(String),

    #[error("operator {operator} is not supported by {id}")]
    UnsupportedOperator { id: String, operator: String },

    #[error("invalid value for {id}: {message}")]
    InvalidValue { id: String, message: String },

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<ConditionError>,
    },
}

pub type ConditionResult<T> = Result<T, ConditionError>;
