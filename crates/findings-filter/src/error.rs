//! Error types for the findings-filter crate.
//!
//! Only configuration problems are errors. Data problems found while
//! evaluating (unparseable dates, non-numeric literals, broken regex
//! patterns) make a predicate fail closed and never surface here.

use thiserror::Error;

use crate::op::{Operator, SemanticType};

/// Errors raised while building a filter or loading a field catalog.
#[derive(Debug, Error)]
pub enum FilterError {
    /// No descriptor is registered under this field name or its aliases.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Operator is not in the operator set of the field's semantic type.
    #[error("operator '{operator}' is not valid for {semantic_type} fields")]
    UnsupportedOperator {
        operator: Operator,
        semantic_type: SemanticType,
    },

    /// Operator name could not be parsed.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// Field catalog could not be parsed.
    #[error("invalid field catalog: {0}")]
    Catalog(String),
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::Catalog(err.to_string())
    }
}

impl From<serde_yaml::Error> for FilterError {
    fn from(err: serde_yaml::Error) -> Self {
        FilterError::Catalog(err.to_string())
    }
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
