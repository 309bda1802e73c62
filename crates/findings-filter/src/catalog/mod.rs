//! Field catalogs.
//!
//! A catalog is the serialized form of a [`FieldRegistry`]: a list of field
//! names with their semantic type and optional presentation metadata. It
//! can be loaded from JSON or YAML:
//!
//! ```yaml
//! fields:
//!   - name: risk_score
//!     type: numeric
//!   - name: status
//!     type: string
//!     values: [pending, approved]
//!   - name: country
//!     type: nested_path
//!     path: admin_contact.country
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::op::SemanticType;
use crate::registry::{Accessor, FieldDescriptor, FieldRegistry};

const FINDINGS_CATALOG: &str = include_str!("findings.yaml");

/// One field of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Field name used in predicates.
    pub name: String,
    /// Semantic type; `string` when omitted.
    #[serde(rename = "type", default)]
    pub semantic_type: SemanticType,
    /// Display label; derived from the name when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Enumerable candidate literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    /// Dotted path on the raw record, when it differs from the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl CatalogEntry {
    /// Builds the descriptor this entry declares.
    pub fn descriptor(&self) -> FieldDescriptor {
        let mut descriptor = FieldDescriptor::new(&self.name, self.semantic_type);
        if let Some(label) = &self.label {
            descriptor = descriptor.with_label(label);
        }
        if let Some(values) = &self.values {
            descriptor = descriptor.with_values(values.iter().cloned());
        }
        if let Some(path) = &self.path {
            descriptor = descriptor.with_accessor(Accessor::Path(
                path.split('.').map(str::to_string).collect(),
            ));
        }
        descriptor
    }
}

/// A list of field declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldCatalog {
    /// Entries in display order.
    pub fields: Vec<CatalogEntry>,
}

impl FieldCatalog {
    /// Parses a catalog from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a catalog from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The built-in catalog of security finding fields.
    pub fn findings() -> Result<Self> {
        FieldCatalog::from_yaml_str(FINDINGS_CATALOG)
    }

    /// Builds a registry from this catalog.
    ///
    /// A later entry with the same name replaces an earlier one.
    pub fn to_registry(&self) -> FieldRegistry {
        self.fields
            .iter()
            .fold(FieldRegistry::new(), |registry, entry| {
                registry.with(entry.descriptor())
            })
    }
}

impl From<&FieldCatalog> for FieldRegistry {
    fn from(catalog: &FieldCatalog) -> Self {
        catalog.to_registry()
    }
}

impl From<FieldCatalog> for FieldRegistry {
    fn from(catalog: FieldCatalog) -> Self {
        catalog.to_registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::op::InputKind;
    use serde_json::json;

    #[test]
    fn builtin_findings_catalog_parses() {
        let catalog = FieldCatalog::findings().unwrap();
        let registry = catalog.to_registry();
        assert_eq!(registry.len(), catalog.fields.len());

        let ns = registry.resolve("name_servers_data").unwrap();
        assert_eq!(ns.semantic_type, SemanticType::ObjectArray);
        assert_eq!(ns.label, "Name Servers");

        let status = registry.resolve("status").unwrap();
        assert_eq!(status.input_kind(), InputKind::Select);

        let country = registry.resolve("admin_contact.country").unwrap();
        assert_eq!(country.semantic_type, SemanticType::NestedPath);
    }

    #[test]
    fn yaml_catalog_with_path_override() {
        let yaml = r#"
fields:
  - name: country
    type: nested_path
    path: admin_contact.country
  - name: notes
"#;
        let registry = FieldRegistry::from(FieldCatalog::from_yaml_str(yaml).unwrap());
        let country = registry.resolve("country").unwrap();
        assert_eq!(
            country.read(&json!({"admin_contact": {"country": "FR"}})),
            Some(&json!("FR"))
        );
        assert_eq!(
            registry.resolve("notes").unwrap().semantic_type,
            SemanticType::String
        );
    }

    #[test]
    fn json_catalog() {
        let json = r#"{"fields": [
            {"name": "risk_score", "type": "numeric", "label": "Risk"},
            {"name": "tags", "type": "scalar_array"}
        ]}"#;
        let catalog = FieldCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.fields[0].label.as_deref(), Some("Risk"));
        let registry = FieldRegistry::from(&catalog);
        assert_eq!(registry.resolve("risk_score").unwrap().label, "Risk");
        assert_eq!(registry.resolve("tags").unwrap().label, "Tags");
    }

    #[test]
    fn unknown_type_is_a_catalog_error() {
        let err = FieldCatalog::from_json_str(r#"{"fields": [{"name": "x", "type": "money"}]}"#)
            .unwrap_err();
        assert!(matches!(err, FilterError::Catalog(_)));

        let err = FieldCatalog::from_yaml_str("fields: 3").unwrap_err();
        assert!(matches!(err, FilterError::Catalog(_)));
    }

    #[test]
    fn entries_serialize_without_empty_options() {
        let entry = CatalogEntry {
            name: "risk_score".into(),
            semantic_type: SemanticType::Numeric,
            label: None,
            values: None,
            path: None,
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"name": "risk_score", "type": "numeric"})
        );
    }
}
