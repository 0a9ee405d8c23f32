use query_parser::SyntaxError;

#[derive(Debug, thiserror::Error)]
pub enum AdaptorError {
    #[error("query could not be parsed: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("field '{field}' is not valid")]
    UnknownField { field: String },
    #[error("value '{value}' is not valid for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("invalid matcher pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("'{identifier}' is not a valid SQL identifier")]
    InvalidIdentifier { identifier: String },
    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },
}

impl AdaptorError {
    pub fn unknown_field(field: impl Into<String>) -> Self {
        AdaptorError::UnknownField {
            field: field.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        AdaptorError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<AdaptorError> for String {
    fn from(error: AdaptorError) -> Self {
        error.to_string()
    }
}
