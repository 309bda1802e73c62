//! Predicates and their evaluation.
//!
//! A [`Predicate`] is the user-facing `(field, operator, literal)` triple.
//! A [`Clause`] is a predicate bound to its field descriptor: validated
//! against the operator table and with any regex literal compiled once.
//! Evaluation is total; it never panics and degrades to `false`.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coerce::{self, Coerced, Coercion};
use crate::error::{FilterError, Result};
use crate::op::Operator;
use crate::record::Record;
use crate::registry::{FieldDescriptor, FieldRegistry};
use crate::table;

/// A single filter condition.
///
/// # Example
///
/// ```
/// use findings_filter::{Operator, Predicate};
///
/// let predicate = Predicate::new("risk_score", Operator::GreaterThan, "50");
/// assert_eq!(predicate.literal, "50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    /// The field name to compare.
    pub field: String,
    /// The comparison operator.
    pub operator: Operator,
    /// The literal as entered by the user.
    pub literal: String,
}

impl Predicate {
    /// Creates a new predicate.
    pub fn new(field: impl Into<String>, operator: Operator, literal: impl Into<String>) -> Self {
        Predicate {
            field: field.into(),
            operator,
            literal: literal.into(),
        }
    }
}

/// Regex state of a bound predicate.
#[derive(Debug, Clone)]
enum Pattern {
    /// Operator is not `Regex`.
    Unused,
    Compiled(Regex),
    /// Literal failed to compile; the clause matches nothing.
    Invalid,
}

/// A predicate validated against a field registry.
#[derive(Debug, Clone)]
pub struct Clause {
    predicate: Predicate,
    descriptor: FieldDescriptor,
    pattern: Pattern,
}

impl Clause {
    /// Binds a predicate to its field descriptor.
    ///
    /// Fails with [`FilterError::UnknownField`] when the field is not
    /// registered and with [`FilterError::UnsupportedOperator`] when the
    /// operator is not in the field type's operator set. An invalid regex is
    /// not an error here: it is logged and the clause matches nothing.
    pub fn bind(registry: &FieldRegistry, predicate: Predicate) -> Result<Self> {
        let descriptor = registry.resolve(&predicate.field)?;
        if !table::supports(descriptor.semantic_type, predicate.operator) {
            return Err(FilterError::UnsupportedOperator {
                operator: predicate.operator,
                semantic_type: descriptor.semantic_type,
            });
        }
        Ok(Clause::from_parts(descriptor.clone(), predicate))
    }

    fn from_parts(descriptor: FieldDescriptor, predicate: Predicate) -> Self {
        let pattern = match predicate.operator {
            Operator::Regex => compile(&descriptor.name, &predicate.literal),
            _ => Pattern::Unused,
        };
        Clause {
            predicate,
            descriptor,
            pattern,
        }
    }

    /// The predicate as entered.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// The descriptor of the field this clause reads.
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// The comparison operator.
    pub fn operator(&self) -> Operator {
        self.predicate.operator
    }

    /// `"<Field Label> <Operator Label> <Literal>"`.
    pub fn describe(&self) -> String {
        format!(
            "{} {} {}",
            self.descriptor.label,
            self.predicate.operator.label(),
            self.predicate.literal
        )
    }

    /// Evaluates this clause against a record.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let raw = self.descriptor.read(record);
        let operator = self.operator();
        let literal = self.predicate.literal.as_str();

        // A null literal under equality asks whether the field has a value.
        if operator.is_equality() && coerce::is_null_literal(literal) {
            let present = !coerce::is_missing(raw);
            return present == (operator == Operator::NotEquals);
        }

        match coerce::coerce(self.descriptor.semantic_type, raw, literal) {
            Coercion::Comparable(coerced) => self.compare(coerced),
            Coercion::Missing => false,
            Coercion::Incomparable(reason) => {
                debug!(
                    field = %self.descriptor.name,
                    operator = %operator,
                    literal,
                    %reason,
                    "incomparable value, predicate fails closed"
                );
                false
            }
        }
    }

    fn compare(&self, coerced: Coerced<'_>) -> bool {
        let operator = self.operator();
        match coerced {
            Coerced::Numeric { raw, literal } => raw
                .partial_cmp(&literal)
                .is_some_and(|ordering| operator.eval_ordering(ordering)),
            Coerced::Boolean { raw, literal } => operator.eval_ordering(raw.cmp(&literal)),
            Coerced::Date { raw, literal } => operator.eval_ordering(raw.cmp(&literal)),
            Coerced::Text { raw, literal } => self.text_matches(operator, &raw, &literal),
            Coerced::ScalarArray { elements, literal } => {
                let hit = match operator.positive() {
                    Operator::Equals => elements.iter().any(|element| element == literal),
                    Operator::Contains => {
                        let needle = literal.to_lowercase();
                        elements
                            .iter()
                            .any(|element| element.to_lowercase().contains(&needle))
                    }
                    _ => return false,
                };
                hit != operator.is_negated()
            }
            Coerced::ObjectArray { objects, literal } => {
                let positive = operator.positive();
                let hit = objects
                    .iter()
                    .flatten()
                    .any(|value| self.text_matches(positive, value, &literal));
                hit != operator.is_negated()
            }
        }
    }

    /// String-family test of stored text against a lower-cased literal.
    ///
    /// The regex sees the stored text as written; its case handling comes
    /// from the compiled pattern.
    fn text_matches(&self, operator: Operator, raw: &str, literal: &str) -> bool {
        if operator == Operator::Regex {
            return match &self.pattern {
                Pattern::Compiled(regex) => regex.is_match(raw),
                Pattern::Unused | Pattern::Invalid => false,
            };
        }
        let raw = raw.to_lowercase();
        match operator {
            Operator::Equals => raw == literal,
            Operator::NotEquals => raw != literal,
            Operator::Contains => raw.contains(literal),
            Operator::NotContains => !raw.contains(literal),
            Operator::StartsWith => raw.starts_with(literal),
            Operator::EndsWith => raw.ends_with(literal),
            _ => false,
        }
    }
}

fn compile(field: &str, literal: &str) -> Pattern {
    match RegexBuilder::new(literal).case_insensitive(true).build() {
        Ok(regex) => Pattern::Compiled(regex),
        Err(error) => {
            warn!(field, pattern = literal, %error, "invalid regex, predicate matches nothing");
            Pattern::Invalid
        }
    }
}

/// Evaluates one predicate against one record.
///
/// Total: an unknown field is treated as a missing value, an operator the
/// field's type does not support yields `false`, and data errors fail
/// closed.
pub fn evaluate<R: Record + ?Sized>(
    registry: &FieldRegistry,
    record: &R,
    predicate: &Predicate,
) -> bool {
    match Clause::bind(registry, predicate.clone()) {
        Ok(clause) => clause.matches(record),
        Err(FilterError::UnknownField(field)) => {
            debug!(%field, "unknown field, treated as missing");
            predicate.operator == Operator::Equals && coerce::is_null_literal(&predicate.literal)
        }
        Err(error) => {
            debug!(%error, "predicate rejected during evaluation");
            false
        }
    }
}
