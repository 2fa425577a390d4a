//! Schema item definitions and the call-scoped dedup index.
//!
//! A schema item is one user-configurable parameter surfaced to the
//! deployment form. Items are unique per `(service_name, param_type, name)`;
//! the first insertion wins and later duplicates are reported as warnings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;

/// Service name used for document-wide variable references.
pub const GLOBAL_SERVICE: &str = "Global";

/// Default form category for extracted items.
pub const DEFAULT_CATEGORY: &str = "basic";

const SENSITIVE_MARKERS: [&str; 5] = ["password", "passwd", "secret", "token", "key"];

/// Where a parameter came from in the compose file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Env,
    Port,
    Path,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Env => "env",
            ParamType::Port => "port",
            ParamType::Path => "path",
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Form input type for a parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    /// Rendered as a masked input
    Password,
    Port,
    Path,
}

impl FieldType {
    /// Classify a parameter by its origin and name.
    pub fn classify(param_type: ParamType, name: &str) -> Self {
        match param_type {
            ParamType::Env if is_sensitive_key(name) => FieldType::Password,
            ParamType::Env => FieldType::String,
            ParamType::Port => FieldType::Port,
            ParamType::Path => FieldType::Path,
        }
    }
}

/// Whether an environment key names a credential.
pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.trim().to_lowercase();
    SENSITIVE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// One configurable parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaItem {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub default: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_service")]
    pub service_name: String,
    pub param_type: ParamType,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_service() -> String {
    GLOBAL_SERVICE.to_string()
}

impl SchemaItem {
    /// Build an item. Name and service are trimmed; an empty service becomes `Global`.
    pub fn new(
        name: &str,
        service_name: &str,
        param_type: ParamType,
        default: impl Into<String>,
    ) -> Self {
        let name = name.trim().to_string();
        Self {
            label: name.clone(),
            description: String::new(),
            field_type: FieldType::classify(param_type, &name),
            default: default.into(),
            category: default_category(),
            service_name: normalize_service_name(service_name),
            param_type,
            name,
        }
    }

    /// Whether the item belongs to the document-wide group. Blank counts as global.
    pub fn is_global(&self) -> bool {
        normalize_service_name(&self.service_name).eq_ignore_ascii_case(GLOBAL_SERVICE)
    }

    fn dedup_key(&self) -> (String, ParamType, String) {
        (self.service_name.clone(), self.param_type, self.name.clone())
    }
}

/// Trim a service name, falling back to `Global` when empty.
pub fn normalize_service_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        GLOBAL_SERVICE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Ordered schema with first-insertion-wins deduplication.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    items: Vec<SchemaItem>,
    index: HashSet<(String, ParamType, String)>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item unless its key is already present.
    ///
    /// Returns `false` and records a warning when the item is a duplicate.
    pub fn insert(&mut self, item: SchemaItem, diag: &mut Diagnostics) -> bool {
        if !self.index.insert(item.dedup_key()) {
            diag.add_warning(format!(
                "Duplicate schema item dropped: {}/{}/{}",
                item.service_name, item.param_type, item.name
            ));
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<SchemaItem> {
        self.items
    }
}

/// Stable sort by service, parameter type and name for display.
pub fn sort_for_display(items: &mut [SchemaItem]) {
    items.sort_by(|a, b| {
        a.service_name
            .cmp(&b.service_name)
            .then_with(|| a.param_type.as_str().cmp(b.param_type.as_str()))
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_classification() {
        assert_eq!(FieldType::classify(ParamType::Env, "DB_PASSWORD"), FieldType::Password);
        assert_eq!(FieldType::classify(ParamType::Env, "api_Token"), FieldType::Password);
        assert_eq!(FieldType::classify(ParamType::Env, "SSH_KEY_FILE"), FieldType::Password);
        assert_eq!(FieldType::classify(ParamType::Env, "APP_ENV"), FieldType::String);
        assert_eq!(FieldType::classify(ParamType::Port, "SECRET"), FieldType::Port);
    }

    #[test]
    fn test_new_item_defaults() {
        let item = SchemaItem::new(" 8080 ", "", ParamType::Port, "80");
        assert_eq!(item.name, "8080");
        assert_eq!(item.label, "8080");
        assert_eq!(item.description, "");
        assert_eq!(item.category, "basic");
        assert_eq!(item.service_name, GLOBAL_SERVICE);
        assert_eq!(item.field_type, FieldType::Port);
    }

    #[test]
    fn test_builder_first_wins() {
        let mut diag = Diagnostics::default();
        let mut builder = SchemaBuilder::new();
        assert!(builder.insert(SchemaItem::new("A", "web", ParamType::Env, "1"), &mut diag));
        assert!(!builder.insert(SchemaItem::new("A", "web", ParamType::Env, "2"), &mut diag));
        assert!(builder.insert(SchemaItem::new("A", "db", ParamType::Env, "3"), &mut diag));

        let items = builder.into_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].default, "1");
        assert_eq!(diag.warnings.len(), 1);
        assert!(diag.warnings[0].contains("web/env/A"));
    }

    #[test]
    fn test_wire_format() {
        let item = SchemaItem::new("DB_PASSWORD", "db", ParamType::Env, "x");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "password");
        assert_eq!(json["serviceName"], "db");
        assert_eq!(json["paramType"], "env");
    }

    #[test]
    fn test_sort_for_display() {
        let mut items = vec![
            SchemaItem::new("B", "web", ParamType::Env, ""),
            SchemaItem::new("8080", "web", ParamType::Port, ""),
            SchemaItem::new("A", "web", ParamType::Env, ""),
            SchemaItem::new("X", "Global", ParamType::Env, ""),
        ];
        sort_for_display(&mut items);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["X", "A", "B", "8080"]);
    }
}
