//! Value coercion.
//!
//! Turns a stored value and a user literal into a typed comparable pair for
//! a semantic type. The evaluator only ever sees [`Coerced`] variants, so
//! every comparison it makes is between values of one known type.

use std::fmt;

use serde_json::Value as JsonValue;

use crate::op::SemanticType;
use crate::record::scalar_text;
use crate::value::{self, Timestamp};

/// Literals that stand for "no value".
const NULL_LITERALS: &[&str] = &["null", "", "undefined"];

/// A stored value and literal coerced to the same comparison family.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<'a> {
    /// Both sides as floats.
    Numeric { raw: f64, literal: f64 },
    /// Both sides as booleans.
    Boolean { raw: bool, literal: bool },
    /// Both sides as the start of their calendar day.
    Date { raw: Timestamp, literal: Timestamp },
    /// Stored text as written, literal lower-cased.
    Text { raw: String, literal: String },
    /// Stored elements as text, literal untouched.
    ScalarArray {
        elements: Vec<String>,
        literal: &'a str,
    },
    /// Property values of each stored object as text, literal lower-cased.
    ObjectArray {
        objects: Vec<Vec<String>>,
        literal: String,
    },
}

/// Why a pair could not be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incomparable {
    /// Stored value is not a number.
    StoredNotNumeric,
    /// Literal is not a number.
    LiteralNotNumeric,
    /// Stored value is not a date.
    StoredNotDate,
    /// Literal is not a date.
    LiteralNotDate,
    /// Stored value of an object-array field is not an array.
    StoredNotArray,
}

impl fmt::Display for Incomparable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Incomparable::StoredNotNumeric => "stored value is not numeric",
            Incomparable::LiteralNotNumeric => "literal is not numeric",
            Incomparable::StoredNotDate => "stored value is not a date",
            Incomparable::LiteralNotDate => "literal is not a date",
            Incomparable::StoredNotArray => "stored value is not an array",
        };
        f.write_str(reason)
    }
}

/// Outcome of coercing a pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion<'a> {
    /// The pair can be compared.
    Comparable(Coerced<'a>),
    /// The pair cannot be compared; the predicate fails closed.
    Incomparable(Incomparable),
    /// The stored value is absent on a scalar field.
    Missing,
}

/// Returns `true` when a stored value counts as absent: no value, JSON null,
/// or the empty string.
pub fn is_missing(raw: Option<&JsonValue>) -> bool {
    match raw {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Returns `true` for the literals `"null"`, `""` and `"undefined"`.
pub fn is_null_literal(literal: &str) -> bool {
    NULL_LITERALS.contains(&literal.trim())
}

/// Coerces a stored value and a literal for the given semantic type.
///
/// Array types treat a missing stored value as an empty array; every other
/// type reports [`Coercion::Missing`].
pub fn coerce<'a>(
    semantic_type: SemanticType,
    raw: Option<&JsonValue>,
    literal: &'a str,
) -> Coercion<'a> {
    let missing = is_missing(raw);
    let raw = raw.filter(|_| !missing);

    match semantic_type {
        SemanticType::ScalarArray => Coercion::Comparable(Coerced::ScalarArray {
            elements: raw.map(scalar_elements).unwrap_or_default(),
            literal,
        }),
        SemanticType::ObjectArray => match raw.map(object_values) {
            None => Coercion::Comparable(Coerced::ObjectArray {
                objects: Vec::new(),
                literal: literal.to_lowercase(),
            }),
            Some(Some(objects)) => Coercion::Comparable(Coerced::ObjectArray {
                objects,
                literal: literal.to_lowercase(),
            }),
            Some(None) => Coercion::Incomparable(Incomparable::StoredNotArray),
        },
        _ => match raw {
            None => Coercion::Missing,
            Some(raw) => coerce_scalar(semantic_type, raw, literal),
        },
    }
}

fn coerce_scalar<'a>(
    semantic_type: SemanticType,
    raw: &JsonValue,
    literal: &str,
) -> Coercion<'a> {
    match semantic_type {
        SemanticType::Numeric => {
            let Some(raw) = value::number_of(raw) else {
                return Coercion::Incomparable(Incomparable::StoredNotNumeric);
            };
            let Some(literal) = value::parse_number(literal) else {
                return Coercion::Incomparable(Incomparable::LiteralNotNumeric);
            };
            Coercion::Comparable(Coerced::Numeric { raw, literal })
        }
        SemanticType::Boolean => Coercion::Comparable(Coerced::Boolean {
            raw: value::truthy(raw),
            literal: value::truthy_text(literal),
        }),
        SemanticType::Date => {
            let Some(raw) = value::date_of(raw) else {
                return Coercion::Incomparable(Incomparable::StoredNotDate);
            };
            let Some(literal) = value::parse_date(literal) else {
                return Coercion::Incomparable(Incomparable::LiteralNotDate);
            };
            Coercion::Comparable(Coerced::Date {
                raw: Timestamp::start_of_day(raw),
                literal: Timestamp::start_of_day(literal),
            })
        }
        _ => Coercion::Comparable(Coerced::Text {
            raw: scalar_text(raw),
            literal: literal.to_lowercase(),
        }),
    }
}

/// Arrays as-is, strings holding a JSON array parsed, anything else wrapped.
fn scalar_elements(raw: &JsonValue) -> Vec<String> {
    match raw {
        JsonValue::Array(items) => items.iter().map(scalar_text).collect(),
        JsonValue::String(text) => match serde_json::from_str::<JsonValue>(text) {
            Ok(JsonValue::Array(items)) => items.iter().map(scalar_text).collect(),
            _ => vec![text.clone()],
        },
        other => vec![scalar_text(other)],
    }
}

/// Own property values of each object in an array; `None` if not an array.
fn object_values(raw: &JsonValue) -> Option<Vec<Vec<String>>> {
    let items = raw.as_array()?;
    let objects = items
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|object| {
            object
                .values()
                .filter(|v| !v.is_null())
                .map(scalar_text)
                .collect()
        })
        .collect();
    Some(objects)
}
