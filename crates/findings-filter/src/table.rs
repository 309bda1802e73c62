//! Static operator table.
//!
//! Maps each [`SemanticType`] to the ordered list of operators it accepts.
//! Adding a field never touches this table; adding a semantic type adds one
//! row.

use crate::op::{Operator, SemanticType};

use Operator::*;

const SCALAR_ORDERED: &[Operator] = &[
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
];

const EQUALITY: &[Operator] = &[Equals, NotEquals];

const TEXT: &[Operator] = &[
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Regex,
];

const SCALAR_ARRAY: &[Operator] = &[Equals, NotEquals, Contains, NotContains];

/// One row per semantic type.
const OPERATOR_TABLE: &[(SemanticType, &[Operator])] = &[
    (SemanticType::Numeric, SCALAR_ORDERED),
    (SemanticType::Boolean, EQUALITY),
    (SemanticType::Date, SCALAR_ORDERED),
    (SemanticType::String, TEXT),
    (SemanticType::ScalarArray, SCALAR_ARRAY),
    (SemanticType::ObjectArray, TEXT),
    (SemanticType::NestedPath, TEXT),
];

/// Returns the operators a semantic type accepts, in display order.
pub fn operators_for(semantic_type: SemanticType) -> &'static [Operator] {
    OPERATOR_TABLE
        .iter()
        .find(|(ty, _)| *ty == semantic_type)
        .map(|(_, ops)| *ops)
        .unwrap_or(TEXT)
}

/// Returns `true` if `operator` is registered for `semantic_type`.
pub fn supports(semantic_type: SemanticType, operator: Operator) -> bool {
    operators_for(semantic_type).contains(&operator)
}
