//! Field registry.
//!
//! Every field usable in a predicate has exactly one [`FieldDescriptor`]:
//! its semantic type, a label, and the [`Accessor`] that reads the raw value
//! off a record. Accessors are plain data, so reading a field has no side
//! effects.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::error::{FilterError, Result};
use crate::op::{InputKind, Operator, SemanticType};
use crate::record::Record;
use crate::table;

/// How a field's raw value is read from a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// A direct attribute of the flattened record.
    Attribute(String),
    /// A dotted path walked on the raw nested record.
    Path(Vec<String>),
    /// An array read from the raw nested record.
    RawArray(String),
}

impl Accessor {
    /// Reads the raw value, or `None` when the record has no value.
    ///
    /// A path segment that is missing or lands on a non-object yields `None`.
    pub fn read<'r, R: Record + ?Sized>(&self, record: &'r R) -> Option<&'r JsonValue> {
        match self {
            Accessor::Attribute(name) => record.attribute(name),
            Accessor::Path(segments) => segments
                .iter()
                .try_fold(record.raw(), |current, segment| {
                    current.as_object()?.get(segment)
                }),
            Accessor::RawArray(key) => record.raw().get(key),
        }
    }

    /// Default accessor for a field of the given type.
    pub fn for_field(name: &str, semantic_type: SemanticType) -> Self {
        match semantic_type {
            SemanticType::NestedPath => {
                Accessor::Path(name.split('.').map(str::to_string).collect())
            }
            SemanticType::ObjectArray => Accessor::RawArray(name.to_string()),
            _ => Accessor::Attribute(name.to_string()),
        }
    }
}

/// Declaration of one filterable field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Canonical field name.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Comparison family.
    pub semantic_type: SemanticType,
    /// How the raw value is read.
    pub accessor: Accessor,
    /// Enumerable candidate literals, for rendering a selection widget.
    pub values: Option<Vec<String>>,
}

impl FieldDescriptor {
    /// Creates a descriptor with an accessor and label derived from the name.
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        let name = name.into();
        FieldDescriptor {
            label: label_from_name(&name),
            accessor: Accessor::for_field(&name, semantic_type),
            name,
            semantic_type,
            values: None,
        }
    }

    /// Overrides the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Attaches enumerable candidate values.
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Overrides the accessor.
    pub fn with_accessor(mut self, accessor: Accessor) -> Self {
        self.accessor = accessor;
        self
    }

    /// Operators allowed on this field, in display order.
    pub fn operators(&self) -> &'static [Operator] {
        table::operators_for(self.semantic_type)
    }

    /// Widget family for entering a literal on this field.
    pub fn input_kind(&self) -> InputKind {
        match &self.values {
            Some(values) if !values.is_empty() => InputKind::Select,
            _ => self.semantic_type.input_kind(),
        }
    }

    /// Reads this field's raw value from a record.
    pub fn read<'r, R: Record + ?Sized>(&self, record: &'r R) -> Option<&'r JsonValue> {
        self.accessor.read(record)
    }
}

/// Registry of field descriptors, in registration order.
///
/// # Example
///
/// ```
/// use findings_filter::{FieldRegistry, SemanticType};
///
/// let registry = FieldRegistry::new()
///     .field("risk_score", SemanticType::Numeric)
///     .field("admin_contact.country", SemanticType::NestedPath);
///
/// assert!(registry.resolve("risk-score").is_ok());
/// assert!(registry.resolve("nope").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    descriptors: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        FieldRegistry::default()
    }

    /// Registers a field with derived accessor and label.
    pub fn field(self, name: &str, semantic_type: SemanticType) -> Self {
        self.with(FieldDescriptor::new(name, semantic_type))
    }

    /// Registers a descriptor, builder style.
    pub fn with(mut self, descriptor: FieldDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    /// Registers a descriptor, replacing any previous one of the same name.
    pub fn insert(&mut self, descriptor: FieldDescriptor) {
        match self.index.get(&descriptor.name) {
            Some(&slot) => self.descriptors[slot] = descriptor,
            None => {
                self.index
                    .insert(descriptor.name.clone(), self.descriptors.len());
                self.descriptors.push(descriptor);
            }
        }
    }

    /// Resolves a field name to its descriptor.
    ///
    /// Tries the exact name first, then the name with every `_` replaced by
    /// `-`, then with every `-` replaced by `_`.
    pub fn resolve(&self, name: &str) -> Result<&FieldDescriptor> {
        let exact = std::iter::once(name.to_string());
        let aliases = [name.replace('_', "-"), name.replace('-', "_")];
        exact
            .chain(aliases)
            .find_map(|candidate| self.index.get(&candidate))
            .map(|&slot| &self.descriptors[slot])
            .ok_or_else(|| FilterError::UnknownField(name.to_string()))
    }

    /// Returns `true` if the name or one of its aliases is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// All descriptors, in registration order.
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if no field is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// `risk_score` -> `Risk Score`, `admin_contact.country` -> `Admin Contact Country`.
fn label_from_name(name: &str) -> String {
    name.split(['_', '-', '.'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
