//! Outbound interface to a host UI.
//!
//! The engine never touches presentation state. A host implements
//! [`PresentationAdapter`] to receive the visibility partition and the
//! active-filter chips, and drives the engine through a [`FilterManager`],
//! which recomputes the partition synchronously after every change.

use std::fmt;

use crate::clause::Predicate;
use crate::error::Result;
use crate::filter_set::{FilterSet, Partition};
use crate::record::Record;
use crate::registry::FieldRegistry;

/// Removable description of one active predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    /// Position in the filter set, usable with [`FilterManager::remove`].
    pub index: usize,
    /// Canonical field name.
    pub field: String,
    /// `"<Field Label> <Operator Label> <Literal>"`.
    pub text: String,
}

impl fmt::Display for FilterChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Receiver of recomputed partitions.
///
/// Closures taking `(&Partition, &[FilterChip])` implement this trait, and
/// `()` ignores every update.
pub trait PresentationAdapter {
    /// Called after every recomputation.
    fn present(&mut self, partition: &Partition, chips: &[FilterChip]);
}

impl PresentationAdapter for () {
    fn present(&mut self, _partition: &Partition, _chips: &[FilterChip]) {}
}

impl<F> PresentationAdapter for F
where
    F: FnMut(&Partition, &[FilterChip]),
{
    fn present(&mut self, partition: &Partition, chips: &[FilterChip]) {
        self(partition, chips)
    }
}

/// Owns a record collection, a filter set and a presenter.
///
/// Every mutation re-applies the whole filter set and pushes the result to
/// the presenter before returning. Rejected predicates leave both the set
/// and the published partition unchanged.
///
/// # Example
///
/// ```
/// use findings_filter::{
///     FieldRegistry, FilterChip, FilterManager, Operator, Partition, Predicate, SemanticType,
/// };
/// use serde_json::json;
///
/// let registry = FieldRegistry::new().field("status", SemanticType::String);
/// let records = vec![json!({"id": "a", "status": "pending"}), json!({"id": "b"})];
///
/// let mut counts = Vec::new();
/// let presenter = |partition: &Partition, _: &[FilterChip]| counts.push(partition.visible_count());
/// let mut manager = FilterManager::with_presenter(registry, records, presenter);
/// manager.add(Predicate::new("status", Operator::Equals, "pending")).unwrap();
/// drop(manager);
/// assert_eq!(counts, vec![2, 1]);
/// ```
#[derive(Debug)]
pub struct FilterManager<R, P = ()> {
    filters: FilterSet,
    records: Vec<R>,
    partition: Partition,
    presenter: P,
}

impl<R: Record> FilterManager<R> {
    /// Creates a manager without a presenter.
    pub fn new(registry: FieldRegistry, records: Vec<R>) -> Self {
        FilterManager::with_presenter(registry, records, ())
    }
}

impl<R: Record, P: PresentationAdapter> FilterManager<R, P> {
    /// Creates a manager and publishes the initial, unfiltered partition.
    pub fn with_presenter(registry: FieldRegistry, records: Vec<R>, presenter: P) -> Self {
        let mut manager = FilterManager {
            filters: FilterSet::new(registry),
            records,
            partition: Partition::default(),
            presenter,
        };
        manager.refresh();
        manager
    }

    /// Adds a predicate and republishes.
    pub fn add(&mut self, predicate: Predicate) -> Result<&Partition> {
        self.filters.add(predicate)?;
        self.refresh();
        Ok(&self.partition)
    }

    /// Removes the predicate at `index` and republishes.
    ///
    /// Out-of-range indices change nothing and publish nothing.
    pub fn remove(&mut self, index: usize) -> Option<Predicate> {
        let removed = self.filters.remove(index)?;
        self.refresh();
        Some(removed)
    }

    /// Removes every predicate and republishes.
    pub fn clear(&mut self) -> &Partition {
        self.filters.clear();
        self.refresh();
        &self.partition
    }

    /// Replaces the record collection and republishes.
    pub fn set_records(&mut self, records: Vec<R>) -> &Partition {
        self.records = records;
        self.refresh();
        &self.partition
    }

    /// The last published partition.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// The active filter set.
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// The record collection.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Visible records, in input order.
    pub fn visible_records(&self) -> impl Iterator<Item = &R> + '_ {
        self.partition
            .visible
            .iter()
            .filter_map(|&index| self.records.get(index))
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn refresh(&mut self) {
        self.partition = self.filters.apply(&self.records);
        let chips = self.filters.describe();
        self.presenter.present(&self.partition, &chips);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::{Operator, SemanticType};
    use crate::record::RecordKey;
    use serde_json::{json, Value};

    #[derive(Default)]
    struct Recorder {
        counts: Vec<usize>,
        chips: Vec<Vec<String>>,
    }

    impl PresentationAdapter for Recorder {
        fn present(&mut self, partition: &Partition, chips: &[FilterChip]) {
            self.counts.push(partition.visible_count());
            self.chips
                .push(chips.iter().map(ToString::to_string).collect());
        }
    }

    fn registry() -> FieldRegistry {
        FieldRegistry::new()
            .field("risk_score", SemanticType::Numeric)
            .field("status", SemanticType::String)
    }

    fn records() -> Vec<Value> {
        vec![
            json!({"id": 1, "risk_score": 85, "status": "pending"}),
            json!({"id": 2, "risk_score": 40, "status": "approved"}),
        ]
    }

    #[test]
    fn every_mutation_publishes() {
        let mut manager = FilterManager::with_presenter(registry(), records(), Recorder::default());
        manager
            .add(Predicate::new("risk_score", Operator::GreaterThan, "50"))
            .unwrap();
        manager
            .add(Predicate::new("status", Operator::Equals, "approved"))
            .unwrap();
        manager.remove(1);
        manager.clear();

        let recorder = manager.presenter();
        assert_eq!(recorder.counts, vec![2, 1, 0, 1, 2]);
        assert_eq!(
            recorder.chips[2],
            vec![
                "Risk Score greater than 50".to_string(),
                "Status equals approved".to_string()
            ]
        );
        assert!(recorder.chips[4].is_empty());
    }

    #[test]
    fn rejected_predicate_publishes_nothing() {
        let mut manager = FilterManager::with_presenter(registry(), records(), Recorder::default());
        assert!(manager
            .add(Predicate::new("status", Operator::GreaterThan, "a"))
            .is_err());
        assert_eq!(manager.remove(3), None);
        assert_eq!(manager.presenter().counts, vec![2]);
        assert!(manager.filters().is_empty());
    }

    #[test]
    fn set_records_recomputes() {
        let mut manager = FilterManager::new(registry(), records());
        manager
            .add(Predicate::new("status", Operator::Equals, "pending"))
            .unwrap();
        assert_eq!(manager.partition().visible_count(), 1);

        let partition = manager.set_records(vec![
            json!({"id": 7, "status": "pending"}),
            json!({"id": 8, "status": "pending"}),
            json!({"id": 9, "status": "closed"}),
        ]);
        assert_eq!(partition.visible, vec![0, 1]);
        let ids: Vec<_> = manager
            .visible_records()
            .map(|record| record["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(7), json!(8)]);
        assert_eq!(manager.records().len(), 3);
    }

    #[test]
    fn closure_presenter() {
        let mut seen = Vec::new();
        {
            let mut manager =
                FilterManager::with_presenter(registry(), records(), |partition: &Partition, _: &[FilterChip]| {
                    seen.push(partition.visible_ids.clone());
                });
            manager
                .add(Predicate::new("risk_score", Operator::LessThan, "50"))
                .unwrap();
        }
        assert_eq!(seen.len(), 2);
        assert!(seen[1].contains(&RecordKey::Id("2".into())));
        assert!(!seen[1].contains(&RecordKey::Id("1".into())));
    }

    #[test]
    fn chip_display() {
        let chip = FilterChip {
            index: 0,
            field: "status".into(),
            text: "Status equals pending".into(),
        };
        assert_eq!(chip.to_string(), "Status equals pending");
    }
}
