//! End-to-end filtering scenarios over findings built from raw JSON.

use findings_filter::{
    FieldCatalog, FieldRegistry, FilterError, FilterManager, FilterSet, Finding, Operator,
    Partition, Predicate,
};
use serde_json::json;

fn registry() -> FieldRegistry {
    FieldCatalog::findings().unwrap().to_registry()
}

fn findings() -> Vec<Finding> {
    vec![
        json!({
            "id": 1,
            "domain": "login-example.net",
            "risk_score": 85,
            "status": "pending",
            "registrar": "GoDaddy.com, LLC",
            "first_seen": "2024-03-01T23:59:00Z",
            "is_active": true,
            "tags": ["phishing", "brand"],
            "name_servers_data": [{"host": "ns1.example.com"}, {"host": "ns2.example.net"}],
            "mail_servers_data": [{"host": "mx.example.net", "priority": 10}],
            "admin_contact": {"country": "US", "email": "admin@example.net"},
        }),
        json!({
            "id": 2,
            "domain": "shop-example.org",
            "risk_score": 40,
            "status": "approved",
            "registrar": null,
            "first_seen": "2024-02-27",
            "is_active": "0",
            "tags": [],
            "name_servers_data": [{"host": "ns1.parking.org"}],
            "admin_contact": {"country": "NL"},
        }),
        json!({
            "id": 3,
            "domain": "example-secure.com",
            "risk_score": "not scored",
            "status": "pending",
            "registrar": "",
            "first_seen": "unknown",
            "tags": ["typosquat"],
        }),
    ]
    .into_iter()
    .map(Finding::from_json)
    .collect()
}

fn visible_ids(set: &FilterSet) -> Vec<String> {
    set.apply(&findings())
        .visible_ids
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn single(field: &str, operator: Operator, literal: &str) -> FilterSet {
    let mut set = FilterSet::new(registry());
    set.add(Predicate::new(field, operator, literal)).unwrap();
    set
}

// ============================================================================
// Testable properties
// ============================================================================

#[test]
fn end_to_end_risk_and_status() {
    let records = vec![
        Finding::from_json(json!({"id": 1, "risk_score": 85, "status": "pending"})),
        Finding::from_json(json!({"id": 2, "risk_score": 40, "status": "approved"})),
    ];
    let set = FilterSet::from_predicates(
        registry(),
        vec![
            Predicate::new("risk_score", Operator::GreaterThan, "50"),
            Predicate::new("status", Operator::Equals, "pending"),
        ],
    )
    .unwrap();

    let partition = set.apply(&records);
    assert!(partition.is_visible("1"));
    assert!(partition.is_hidden("2"));
    assert_eq!(partition.hidden_count(), 1);
    assert_eq!(partition.visible_count(), 1);
}

#[test]
fn empty_filter_set_shows_everything() {
    let partition = FilterSet::new(registry()).apply(&findings());
    assert_eq!(partition.visible_count(), 3);
}

#[test]
fn reapplying_is_idempotent() {
    let set = single("registrar", Operator::Contains, "daddy");
    let records = findings();
    assert_eq!(set.apply(&records), set.apply(&records));
}

#[test]
fn numeric_literal_abc_matches_nothing() {
    for op in findings_filter::operators_for(findings_filter::SemanticType::Numeric) {
        assert!(visible_ids(&single("risk_score", *op, "abc")).is_empty(), "{op}");
    }
}

#[test]
fn null_literal_matches_missing_registrar() {
    assert_eq!(
        visible_ids(&single("registrar", Operator::Equals, "null")),
        vec!["2", "3"]
    );
    assert_eq!(
        visible_ids(&single("registrar", Operator::NotEquals, "null")),
        vec!["1"]
    );
}

#[test]
fn invalid_regex_matches_nothing() {
    let set = single("domain", Operator::Regex, "(");
    assert!(visible_ids(&set).is_empty());
    assert_eq!(set.describe()[0].text, "Domain matches regex (");
}

#[test]
fn date_equality_ignores_time_of_day() {
    assert_eq!(
        visible_ids(&single("first_seen", Operator::Equals, "2024-03-01")),
        vec!["1"]
    );
    assert_eq!(
        visible_ids(&single("first_seen", Operator::LessThan, "2024-03-01")),
        vec!["2"]
    );
}

#[test]
fn object_array_any_match() {
    assert_eq!(
        visible_ids(&single("name_servers_data", Operator::Contains, "example.net")),
        vec!["1"]
    );
    // record 3 has no name servers at all, so nothing contains the literal
    assert_eq!(
        visible_ids(&single("name_servers_data", Operator::NotContains, "example.net")),
        vec!["2", "3"]
    );
}

// ============================================================================
// Field addressing
// ============================================================================

#[test]
fn nested_path_on_raw_record() {
    assert_eq!(
        visible_ids(&single("admin_contact.country", Operator::Equals, "nl")),
        vec!["2"]
    );
    assert_eq!(
        visible_ids(&single("admin_contact.email", Operator::Equals, "null")),
        vec!["2", "3"]
    );
}

#[test]
fn scalar_array_stored_as_json_text() {
    // Finding keeps arrays as JSON text in its flattened attributes.
    assert_eq!(
        visible_ids(&single("tags", Operator::Equals, "typosquat")),
        vec!["3"]
    );
    assert_eq!(
        visible_ids(&single("tags", Operator::Contains, "PHISH")),
        vec!["1"]
    );
}

#[test]
fn hyphenated_field_names_resolve() {
    assert_eq!(
        visible_ids(&single("risk-score", Operator::GreaterEqual, "40")),
        vec!["1", "2"]
    );
}

#[test]
fn boolean_truthiness() {
    assert_eq!(
        visible_ids(&single("is_active", Operator::Equals, "true")),
        vec!["1"]
    );
    assert_eq!(
        visible_ids(&single("is_active", Operator::Equals, "false")),
        vec!["2"]
    );
}

#[test]
fn boolean_normalization_is_exact() {
    let records: Vec<Finding> = [json!("TRUE"), json!(" 1 "), json!(1.0), json!(1), json!("1")]
        .into_iter()
        .enumerate()
        .map(|(id, active)| Finding::from_json(json!({"id": id, "is_active": active})))
        .collect();
    let partition = single("is_active", Operator::Equals, "true").apply(&records);
    assert_eq!(partition.visible, vec![3, 4]);
    assert_eq!(partition.hidden, vec![0, 1, 2]);
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn configuration_errors_are_rejected_on_add() {
    let mut set = FilterSet::new(registry());
    assert!(matches!(
        set.add(Predicate::new("is_active", Operator::Contains, "t")),
        Err(FilterError::UnsupportedOperator { .. })
    ));
    assert!(matches!(
        set.add(Predicate::new("severity", Operator::Equals, "high")),
        Err(FilterError::UnknownField(_))
    ));
    assert!(set.is_empty());
}

#[test]
fn stored_predicates_round_trip_through_json() {
    let stored = r#"[
        {"field": "risk_score", "operator": "greater_than", "literal": "50"},
        {"field": "mail_servers_data", "operator": "ends_with", "literal": "example.net"}
    ]"#;
    let predicates: Vec<Predicate> = serde_json::from_str(stored).unwrap();
    let set = FilterSet::from_predicates(registry(), predicates).unwrap();
    assert_eq!(visible_ids(&set), vec!["1"]);

    let chips: Vec<String> = set.describe().into_iter().map(|chip| chip.text).collect();
    assert_eq!(
        chips,
        vec![
            "Risk Score greater than 50",
            "Mail Servers ends with example.net"
        ]
    );
}

// ============================================================================
// Manager
// ============================================================================

#[test]
fn manager_publishes_partitions() {
    let mut published: Vec<Vec<String>> = Vec::new();
    {
        let presenter = |partition: &Partition, _: &[findings_filter::FilterChip]| {
            published.push(partition.visible_ids.iter().map(ToString::to_string).collect());
        };
        let mut manager = FilterManager::with_presenter(registry(), findings(), presenter);
        manager
            .add(Predicate::new("status", Operator::Equals, "pending"))
            .unwrap();
        manager
            .add(Predicate::new("domain", Operator::StartsWith, "login"))
            .unwrap();
        manager.remove(0);
    }
    assert_eq!(
        published,
        vec![
            vec!["1", "2", "3"],
            vec!["1", "3"],
            vec!["1"],
            vec!["1"],
        ]
    );
}
