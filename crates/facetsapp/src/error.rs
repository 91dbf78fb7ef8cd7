use crate::registry::FieldType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FacetsError {
    #[error("View not found: {0}")]
    ViewNotFound(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Operator '{operator}' is not valid for {field_type} fields")]
    IllegalOperator {
        field_type: FieldType,
        operator: String,
    },

    #[error("Field '{field}' is a {expected} field, rule says {found}")]
    FieldTypeMismatch {
        field: String,
        expected: FieldType,
        found: FieldType,
    },

    #[error("Invalid value for '{operator}': {reason}")]
    InvalidValue { operator: String, reason: String },

    #[error("Rule id '{0}' is reserved for auto-generated filters")]
    ReservedRuleId(String),

    #[error("Field '{0}' cannot be sorted on")]
    NotSortable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl FacetsError {
    pub(crate) fn invalid_value(operator: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            operator: operator.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FacetsError>;
