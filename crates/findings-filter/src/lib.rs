//! Findings filter - type-aware predicate engine for in-memory records.
//!
//! The engine lets a host compose a conjunction of field-level conditions
//! over a collection of heterogeneous records (security findings) and
//! computes which records remain visible. It supports:
//!
//! - Seven semantic field types: numeric, boolean, date, string,
//!   scalar arrays, object arrays and nested paths
//! - A static operator table per type, with human-readable labels
//! - Value coercion with explicit rules for missing and malformed data
//! - Flat, dotted-path and raw-array field access with `_`/`-` aliasing
//! - A filter set that partitions records into visible and hidden
//!
//! # Quick Start
//!
//! ```rust
//! use findings_filter::{FieldRegistry, FilterSet, Operator, Predicate, SemanticType};
//! use serde_json::json;
//!
//! let registry = FieldRegistry::new()
//!     .field("risk_score", SemanticType::Numeric)
//!     .field("status", SemanticType::String)
//!     .field("name_servers_data", SemanticType::ObjectArray);
//!
//! let records = vec![
//!     json!({"id": 1, "risk_score": 85, "status": "pending",
//!            "name_servers_data": [{"host": "ns1.example.net"}]}),
//!     json!({"id": 2, "risk_score": 40, "status": "approved"}),
//! ];
//!
//! let mut filters = FilterSet::new(registry);
//! filters.add(Predicate::new("risk_score", Operator::GreaterThan, "50")).unwrap();
//! filters.add(Predicate::new("name_servers_data", Operator::Contains, "example.net")).unwrap();
//!
//! let partition = filters.apply(&records);
//! assert_eq!(partition.visible, vec![0]);
//! assert!(partition.is_hidden("2"));
//! ```
//!
//! # Evaluation Semantics
//!
//! ```text
//! visible = every predicate matches      (empty set => everything visible)
//! ```
//!
//! - **Configuration errors** (unknown field, operator outside the field
//!   type's set) are rejected when a predicate is added.
//! - **Data errors** (unparseable numbers or dates, invalid regex) make the
//!   predicate fail closed for that record and are logged through `tracing`.
//! - **Missing values** (absent, null, empty string) satisfy `equals` with a
//!   literal of `null`, `undefined` or the empty string, and fail every other
//!   operator. Array fields treat a missing value as an empty array.
//!
//! # Field Types and Operators
//!
//! | Type | Operators |
//! |------|-----------|
//! | Numeric, Date | `equals`, `not_equals`, `greater_than`, `less_than`, `greater_equal`, `less_equal` |
//! | Boolean | `equals`, `not_equals` |
//! | String, ObjectArray, NestedPath | `equals`, `not_equals`, `contains`, `not_contains`, `starts_with`, `ends_with`, `regex` |
//! | ScalarArray | `equals`, `not_equals`, `contains`, `not_contains` |

mod catalog;
mod clause;
mod coerce;
mod error;
mod filter_set;
mod op;
mod present;
mod record;
mod registry;
mod table;
mod value;

// Re-export public API
pub use catalog::{CatalogEntry, FieldCatalog};
pub use clause::{evaluate, Clause, Predicate};
pub use coerce::{coerce, is_missing, is_null_literal, Coerced, Coercion, Incomparable};
pub use error::{FilterError, Result};
pub use filter_set::{apply, FilterSet, Partition};
pub use op::{InputKind, Operator, SemanticType};
pub use present::{FilterChip, FilterManager, PresentationAdapter};
pub use record::{Finding, Record, RecordId, RecordKey};
pub use registry::{Accessor, FieldDescriptor, FieldRegistry};
pub use table::{operators_for, supports};
pub use value::{parse_date, parse_number, Timestamp};
