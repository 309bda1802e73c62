//! Comparison operators and semantic field types.
//!
//! The [`Operator`] enum lists every operator a predicate can use, organized
//! in three families. [`SemanticType`] is the comparison family assigned to a
//! field, independent of how the value is stored on the record. Which
//! operators a type accepts is looked up with [`crate::operators_for`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Comparison operator for a predicate.
///
/// Operators are grouped by family:
/// - **Equality**: `Equals`, `NotEquals`
/// - **Ordering**: `GreaterThan`, `LessThan`, `GreaterEqual`, `LessEqual`
/// - **String**: `Contains`, `NotContains`, `StartsWith`, `EndsWith`, `Regex`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    // Equality family
    /// Equal after coercion.
    Equals,
    /// Not equal after coercion.
    NotEquals,

    // Ordering family
    /// Greater than.
    GreaterThan,
    /// Less than.
    LessThan,
    /// Greater than or equal.
    GreaterEqual,
    /// Less than or equal.
    LessEqual,

    // String family
    /// Case-insensitive substring match.
    Contains,
    /// Negated case-insensitive substring match.
    NotContains,
    /// Case-insensitive prefix match.
    StartsWith,
    /// Case-insensitive suffix match.
    EndsWith,
    /// Case-insensitive regular expression match.
    Regex,
}

impl Operator {
    /// Every operator, in table order.
    pub const ALL: [Operator; 11] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterEqual,
        Operator::LessEqual,
        Operator::Contains,
        Operator::NotContains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Regex,
    ];

    /// Returns `true` for `Equals` and `NotEquals`.
    pub fn is_equality(self) -> bool {
        matches!(self, Operator::Equals | Operator::NotEquals)
    }

    /// Returns `true` if this operator negates another one.
    pub fn is_negated(self) -> bool {
        matches!(self, Operator::NotEquals | Operator::NotContains)
    }

    /// Strips negation.
    ///
    /// - `NotEquals` -> `Equals`
    /// - `NotContains` -> `Contains`
    /// - Others unchanged
    pub fn positive(self) -> Operator {
        match self {
            Operator::NotEquals => Operator::Equals,
            Operator::NotContains => Operator::Contains,
            other => other,
        }
    }

    /// Evaluates an equality or ordering operator given an ordering result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::Equals => ordering == Ordering::Equal,
            Operator::NotEquals => ordering != Ordering::Equal,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterEqual => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessEqual => ordering != Ordering::Greater,
            _ => false, // Not an ordering-based operator
        }
    }

    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::GreaterEqual => "greater_equal",
            Operator::LessEqual => "less_equal",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::Regex => "regex",
        }
    }

    /// Returns the human-readable label shown in filter chips.
    pub fn label(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "does not equal",
            Operator::GreaterThan => "greater than",
            Operator::LessThan => "less than",
            Operator::GreaterEqual => "greater than or equal to",
            Operator::LessEqual => "less than or equal to",
            Operator::Contains => "contains",
            Operator::NotContains => "does not contain",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
            Operator::Regex => "matches regex",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == name)
            .ok_or_else(|| FilterError::UnknownOperator(s.to_string()))
    }
}

/// Comparison family of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Floating point comparison.
    Numeric,
    /// Truthiness comparison.
    Boolean,
    /// Calendar day comparison.
    Date,
    /// Case-insensitive text comparison. The default.
    #[default]
    String,
    /// Array of scalars, matched element by element.
    ScalarArray,
    /// Array of small objects, matched on any property value.
    ObjectArray,
    /// Dotted path into the nested record, compared as text.
    NestedPath,
}

impl SemanticType {
    /// Returns the wire name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::Numeric => "numeric",
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
            SemanticType::String => "string",
            SemanticType::ScalarArray => "scalar_array",
            SemanticType::ObjectArray => "object_array",
            SemanticType::NestedPath => "nested_path",
        }
    }

    /// Widget family a host should render for literals of this type.
    pub fn input_kind(self) -> InputKind {
        match self {
            SemanticType::Numeric => InputKind::Number,
            SemanticType::Boolean => InputKind::Toggle,
            SemanticType::Date => InputKind::Date,
            _ => InputKind::Text,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input widget family for entering a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Numeric entry.
    Number,
    /// True/false toggle.
    Toggle,
    /// Date picker.
    Date,
    /// Free text.
    Text,
    /// Choice among enumerated values.
    Select,
}
