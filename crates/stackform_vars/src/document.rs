//! Compose document normalization.
//!
//! Parses compose text into a generic YAML tree and exposes the `services`
//! map in document order. Syntax failures are recorded as errors, never
//! propagated.

use serde_yaml::Value;
use tracing::{debug, warn};

use crate::diagnostics::Diagnostics;
use crate::error::VarsError;
use crate::schema::normalize_service_name;

/// A parsed compose document.
#[derive(Debug, Clone)]
pub struct ComposeDocument {
    root: Value,
}

/// One service as found in the document. Only lives for the duration of a walk.
#[derive(Debug, Clone)]
pub struct ServiceEntry<'a> {
    pub name: String,
    pub ports: Option<&'a Value>,
    pub volumes: Option<&'a Value>,
    pub environment: Option<&'a Value>,
}

impl ComposeDocument {
    /// Parse compose text. Returns `None` and records one error if the YAML is invalid.
    pub fn parse(text: &str, diag: &mut Diagnostics) -> Option<Self> {
        let mut root: Value = match serde_yaml::from_str(text) {
            Ok(root) => root,
            Err(e) => {
                let err = VarsError::from(e);
                warn!("Compose template rejected: {}", err);
                diag.add_error(err);
                return None;
            }
        };

        if let Err(e) = root.apply_merge() {
            diag.add_warning(format!(
                "YAML merge keys not applied: {}",
                diag.clamp(&e.to_string())
            ));
        }

        Some(Self { root })
    }

    /// Services in document order. Empty when the root or `services` is not a mapping.
    pub fn services(&self) -> Vec<ServiceEntry<'_>> {
        let Some(services) = untag(&self.root)
            .as_mapping()
            .and_then(|root| root.get("services"))
            .and_then(|services| untag(services).as_mapping())
        else {
            debug!("Compose document has no services mapping");
            return Vec::new();
        };

        services
            .iter()
            .filter_map(|(key, service)| {
                let name = normalize_service_name(&stringify_value(key));
                let Some(fields) = untag(service).as_mapping() else {
                    debug!("Skipping service {}: not a mapping", name);
                    return None;
                };
                Some(ServiceEntry {
                    name,
                    ports: fields.get("ports"),
                    volumes: fields.get("volumes"),
                    environment: fields.get("environment"),
                })
            })
            .collect()
    }
}

/// Strip any YAML tags (`!reset`, `!override`, ...) from a value.
pub fn untag(mut value: &Value) -> &Value {
    while let Value::Tagged(tagged) = value {
        value = &tagged.value;
    }
    value
}

/// Render a scalar or structure as text.
///
/// Null becomes empty, scalars use their plain form and nested structures
/// become compact JSON.
pub fn stringify_value(value: &Value) -> String {
    match untag(value) {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{:?}", other)),
    }
}
