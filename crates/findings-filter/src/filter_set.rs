//! Filter set and visibility partition.
//!
//! The [`FilterSet`] holds the active predicates as a conjunction: a record
//! is visible iff it satisfies every predicate, and an empty set shows
//! everything. Every [`FilterSet::apply`] is a full re-scan of the records;
//! nothing is cached between calls.

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use crate::clause::{self, Clause, Predicate};
use crate::error::Result;
use crate::present::FilterChip;
use crate::record::{Record, RecordKey};
use crate::registry::FieldRegistry;

/// Split of a record collection into visible and hidden records.
///
/// Every record lands on exactly one side, and every record has exactly one
/// [`RecordKey`], so the two key sets are disjoint and sized like the index
/// lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Indices of visible records, in input order.
    pub visible: Vec<usize>,
    /// Indices of hidden records, in input order.
    pub hidden: Vec<usize>,
    /// Keys of visible records.
    pub visible_ids: BTreeSet<RecordKey>,
    /// Keys of hidden records.
    pub hidden_ids: BTreeSet<RecordKey>,
}

impl Partition {
    fn push<R: Record + ?Sized>(&mut self, index: usize, record: &R, visible: bool) {
        let key = self.key_for(index, record);
        if visible {
            self.visible.push(index);
            self.visible_ids.insert(key);
        } else {
            self.hidden.push(index);
            self.hidden_ids.insert(key);
        }
    }

    fn key_for<R: Record + ?Sized>(&self, index: usize, record: &R) -> RecordKey {
        let Some(id) = record.record_id() else {
            return RecordKey::Row(index);
        };
        let key = RecordKey::Id(id);
        if self.visible_ids.contains(&key) || self.hidden_ids.contains(&key) {
            debug!(id = %key, index, "duplicate record id, keyed by row");
            return RecordKey::Row(index);
        }
        key
    }

    /// Number of visible records.
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Number of hidden records.
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    /// Number of records partitioned.
    pub fn total(&self) -> usize {
        self.visible.len() + self.hidden.len()
    }

    /// Returns `true` if the record with this identifier is visible.
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible_ids.contains(&RecordKey::Id(id.to_owned()))
    }

    /// Returns `true` if the record with this identifier is hidden.
    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden_ids.contains(&RecordKey::Id(id.to_owned()))
    }
}

/// Evaluates an ad hoc predicate list against records.
///
/// Places no restriction on the list: the same field may appear several
/// times. Predicates that fail to bind are logged and evaluated with the
/// total [`clause::evaluate`] rules.
pub fn apply<R: Record>(
    registry: &FieldRegistry,
    records: &[R],
    predicates: &[Predicate],
) -> Partition {
    let bound: Vec<std::result::Result<Clause, &Predicate>> = predicates
        .iter()
        .map(|predicate| {
            Clause::bind(registry, predicate.clone()).map_err(|error| {
                warn!(field = %predicate.field, %error, "predicate does not bind");
                predicate
            })
        })
        .collect();

    partition(records, |record| {
        bound.iter().all(|entry| match entry {
            Ok(bound) => bound.matches(record),
            Err(predicate) => clause::evaluate(registry, record, predicate),
        })
    })
}

fn partition<R, F>(records: &[R], mut visible: F) -> Partition
where
    R: Record,
    F: FnMut(&R) -> bool,
{
    let mut result = Partition::default();
    for (index, record) in records.iter().enumerate() {
        result.push(index, record, visible(record));
    }
    trace!(
        records = result.total(),
        visible = result.visible_count(),
        "filter applied"
    );
    result
}

/// The active conjunction of predicates.
///
/// # Example
///
/// ```
/// use findings_filter::{FieldRegistry, FilterSet, Operator, Predicate, SemanticType};
/// use serde_json::json;
///
/// let registry = FieldRegistry::new()
///     .field("risk_score", SemanticType::Numeric)
///     .field("status", SemanticType::String);
///
/// let mut filters = FilterSet::new(registry);
/// filters.add(Predicate::new("risk_score", Operator::GreaterThan, "50")).unwrap();
/// filters.add(Predicate::new("status", Operator::Equals, "pending")).unwrap();
///
/// let records = vec![
///     json!({"id": 1, "risk_score": 85, "status": "pending"}),
///     json!({"id": 2, "risk_score": 40, "status": "approved"}),
/// ];
/// let partition = filters.apply(&records);
/// assert_eq!(partition.visible_count(), 1);
/// assert!(partition.is_visible("1"));
/// ```
#[derive(Debug, Clone)]
pub struct FilterSet {
    registry: FieldRegistry,
    clauses: Vec<Clause>,
}

impl FilterSet {
    /// Creates an empty filter set over a registry.
    ///
    /// An empty filter set shows every record.
    pub fn new(registry: FieldRegistry) -> Self {
        FilterSet {
            registry,
            clauses: Vec::new(),
        }
    }

    /// Creates a filter set from a stored predicate list.
    ///
    /// Fails on the first predicate that does not bind.
    pub fn from_predicates<I>(registry: FieldRegistry, predicates: I) -> Result<Self>
    where
        I: IntoIterator<Item = Predicate>,
    {
        let mut set = FilterSet::new(registry);
        for predicate in predicates {
            set.add(predicate)?;
        }
        Ok(set)
    }

    /// The registry predicates are bound against.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Validates and adds a predicate.
    ///
    /// A predicate on a field that already has an active predicate replaces
    /// it; otherwise it is appended. Configuration errors leave the set
    /// unchanged.
    pub fn add(&mut self, predicate: Predicate) -> Result<()> {
        let clause = Clause::bind(&self.registry, predicate)?;
        let field = &clause.descriptor().name;
        self.clauses.retain(|active| &active.descriptor().name != field);
        self.clauses.push(clause);
        Ok(())
    }

    /// Removes the predicate at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Option<Predicate> {
        if index >= self.clauses.len() {
            return None;
        }
        Some(self.clauses.remove(index).predicate().clone())
    }

    /// Removes every predicate.
    pub fn clear(&mut self) {
        self.clauses.clear();
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// The bound clauses, in order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// The active predicates, in order.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> + '_ {
        self.clauses.iter().map(Clause::predicate)
    }

    /// Number of active predicates.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns `true` if no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Human-readable description of each active predicate.
    pub fn describe(&self) -> Vec<FilterChip> {
        self.clauses
            .iter()
            .enumerate()
            .map(|(index, clause)| FilterChip {
                index,
                field: clause.descriptor().name.clone(),
                text: clause.describe(),
            })
            .collect()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single record satisfies every active predicate.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    /// Partitions records into visible and hidden.
    pub fn apply<R: Record>(&self, records: &[R]) -> Partition {
        partition(records, |record| self.matches(record))
    }

    /// Returns references to the visible records, in input order.
    pub fn filter<'a, R: Record>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|record| self.matches(*record)).collect()
    }

    /// Counts the visible records.
    pub fn count<R: Record>(&self, records: &[R]) -> usize {
        records.iter().filter(|record| self.matches(*record)).count()
    }
}
