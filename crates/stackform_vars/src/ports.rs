//! Published port extraction.

use serde_yaml::Value;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::document::{stringify_value, untag};

/// A host-to-container port binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub host_port: String,
    pub container_port: String,
}

/// The two ways compose writes a port entry.
#[derive(Debug, Clone, PartialEq)]
pub enum PortSpec<'a> {
    /// `"[ip:]host:container[/proto]"`
    Short(String),
    /// `{published, target, ...}`
    Long {
        published: String,
        target: String,
        raw: &'a Value,
    },
}

impl<'a> PortSpec<'a> {
    /// Decide which form an entry uses. Integers count as the short form.
    pub fn classify(entry: &'a Value) -> Option<Self> {
        match untag(entry) {
            Value::String(s) => Some(PortSpec::Short(s.clone())),
            Value::Number(n) => Some(PortSpec::Short(n.to_string())),
            Value::Mapping(m) => Some(PortSpec::Long {
                published: field_text(m.get("published")),
                target: field_text(m.get("target")),
                raw: entry,
            }),
            _ => None,
        }
    }

    /// Resolve to a mapping, recording a warning when the entry is incomplete.
    pub fn resolve(&self, service: &str, diag: &mut Diagnostics) -> Option<PortMapping> {
        match self {
            PortSpec::Short(raw) => {
                let mapping = parse_port_string(raw);
                if mapping.is_none() {
                    diag.add_warning(format!(
                        "Unparsable port mapping: {}/{}",
                        service,
                        diag.clamp(raw.trim())
                    ));
                }
                mapping
            }
            PortSpec::Long {
                published,
                target,
                raw,
            } => {
                if published.is_empty() || target.is_empty() {
                    diag.add_warning(format!(
                        "Unparsable port object: {}/{}",
                        service,
                        diag.clamp(&stringify_value(raw))
                    ));
                    return None;
                }
                Some(PortMapping {
                    host_port: published.clone(),
                    container_port: target.clone(),
                })
            }
        }
    }
}

fn field_text(value: Option<&Value>) -> String {
    value.map(stringify_value).unwrap_or_default().trim().to_string()
}

/// Parse the short port syntax.
///
/// The protocol suffix and a bracketed IPv6 host are removed, then the last
/// two `:` segments are taken as host and container port. This covers the
/// `host:container` and `ip:host:container` forms alike.
pub fn parse_port_string(raw: &str) -> Option<PortMapping> {
    let s = raw.trim();
    let without_proto = s.split('/').next().unwrap_or(s);

    let mut rest = without_proto;
    if rest.starts_with('[') {
        if let Some(close) = rest.find(']') {
            if rest[close + 1..].starts_with(':') {
                rest = &rest[close + 2..];
            }
        }
    }

    let parts: Vec<&str> = rest
        .split(':')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 2 {
        return None;
    }

    Some(PortMapping {
        host_port: parts[parts.len() - 2].to_string(),
        container_port: parts[parts.len() - 1].to_string(),
    })
}

/// Extract every resolvable port mapping of a service's `ports` field.
pub fn extract_ports(service: &str, ports: Option<&Value>, diag: &mut Diagnostics) -> Vec<PortMapping> {
    let Some(Value::Sequence(entries)) = ports.map(untag) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let Some(spec) = PortSpec::classify(entry) else {
                debug!("Ignoring unsupported port entry in {}", service);
                return None;
            };
            spec.resolve(service, diag)
        })
        .collect()
}
