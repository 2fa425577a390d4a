//! Bind-mount extraction.
//!
//! Only volumes whose host side is a filesystem path are configurable.
//! Named and anonymous volumes are left out without a warning.

use serde_yaml::Value;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::document::{stringify_value, untag};

const BIND_PREFIXES: [&str; 3] = ["./", "../", "/"];

/// A host path mounted into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMapping {
    pub host_path: String,
    pub container_path: String,
}

/// The two ways compose writes a volume entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeSpec {
    /// `"host:container[:mode]"`
    Short(String),
    /// `{source, target, ...}`
    Long { source: String, target: String },
}

impl VolumeSpec {
    pub fn classify(entry: &Value) -> Option<Self> {
        match untag(entry) {
            Value::String(s) => Some(VolumeSpec::Short(s.clone())),
            Value::Mapping(m) => Some(VolumeSpec::Long {
                source: field_text(m.get("source")),
                target: field_text(m.get("target")),
            }),
            _ => None,
        }
    }

    /// Resolve to a bind mount. Unparsable short entries are warned about;
    /// incomplete long entries and non-path hosts are skipped quietly.
    pub fn resolve(&self, service: &str, diag: &mut Diagnostics) -> Option<VolumeMapping> {
        let mapping = match self {
            VolumeSpec::Short(raw) => {
                let parsed = parse_volume_string(raw);
                if parsed.is_none() {
                    diag.add_warning(format!(
                        "Unparsable volume mapping: {}/{}",
                        service,
                        diag.clamp(raw.trim())
                    ));
                }
                parsed?
            }
            VolumeSpec::Long { source, target } => {
                if source.is_empty() || target.is_empty() {
                    return None;
                }
                VolumeMapping {
                    host_path: source.clone(),
                    container_path: target.clone(),
                }
            }
        };

        if !is_bind_path(&mapping.host_path) {
            debug!("Skipping named volume {} in {}", mapping.host_path, service);
            return None;
        }
        Some(mapping)
    }
}

fn field_text(value: Option<&Value>) -> String {
    value.map(stringify_value).unwrap_or_default().trim().to_string()
}

/// Whether a host segment is a filesystem path rather than a volume name.
pub fn is_bind_path(host: &str) -> bool {
    BIND_PREFIXES.iter().any(|prefix| host.starts_with(prefix))
}

/// Split `host:container[:mode]` into its first two segments.
pub fn parse_volume_string(raw: &str) -> Option<VolumeMapping> {
    let mut parts = raw.trim().split(':');
    let host = parts.next().unwrap_or_default().trim();
    let container = parts.next().unwrap_or_default().trim();
    if host.is_empty() || container.is_empty() {
        return None;
    }
    Some(VolumeMapping {
        host_path: host.to_string(),
        container_path: container.to_string(),
    })
}

/// Extract every bind mount of a service's `volumes` field.
pub fn extract_volumes(
    service: &str,
    volumes: Option<&Value>,
    diag: &mut Diagnostics,
) -> Vec<VolumeMapping> {
    let Some(Value::Sequence(entries)) = volumes.map(untag) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| VolumeSpec::classify(entry)?.resolve(service, diag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_volume_string() {
        let parsed = parse_volume_string("./data:/var/lib/data:ro").unwrap();
        assert_eq!(parsed.host_path, "./data");
        assert_eq!(parsed.container_path, "/var/lib/data");
        assert!(parse_volume_string("/only-container").is_none());
        assert!(parse_volume_string(":/data").is_none());
    }

    #[test]
    fn test_bind_prefixes() {
        assert!(is_bind_path("./conf"));
        assert!(is_bind_path("../shared"));
        assert!(is_bind_path("/srv/app"));
        assert!(!is_bind_path("mydata"));
        assert!(!is_bind_path("~/data"));
    }

    #[test]
    fn test_named_volume_excluded_silently() {
        let volumes: Value = serde_yaml::from_str(r#"["mydata:/var/lib/mysql"]"#).unwrap();
        let mut diag = Diagnostics::default();
        assert!(extract_volumes("db", Some(&volumes), &mut diag).is_empty());
        assert!(diag.warnings.is_empty());
    }

    #[test]
    fn test_extract_mixed_forms() {
        let volumes: Value = serde_yaml::from_str(
            r#"
- ./html:/usr/share/nginx/html
- /etc/localtime
- type: bind
  source: ../conf
  target: /etc/nginx/conf.d
- type: volume
  source: cache
  target: /cache
- type: tmpfs
  target: /tmp
"#,
        )
        .unwrap();
        let mut diag = Diagnostics::default();
        let found = extract_volumes("web", Some(&volumes), &mut diag);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].host_path, "./html");
        assert_eq!(found[1].host_path, "../conf");
        assert_eq!(found[1].container_path, "/etc/nginx/conf.d");
        assert_eq!(diag.warnings.len(), 1);
        assert!(diag.warnings[0].contains("web//etc/localtime"));
    }
}
