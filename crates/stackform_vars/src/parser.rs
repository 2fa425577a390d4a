//! Schema assembly for compose templates.
//!
//! Services are walked in document order (ports, then volumes, then
//! environment), after which document-wide variable references are appended
//! under the `Global` service. Every candidate passes through one dedup index
//! owned by the call.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ParseOptions;
use crate::diagnostics::Diagnostics;
use crate::document::{ComposeDocument, ServiceEntry};
use crate::environment::{extract_environment, is_reserved_key};
use crate::error::VarsError;
use crate::ports::extract_ports;
use crate::refs::{ReferenceScanner, VariableReference};
use crate::schema::{ParamType, SchemaBuilder, SchemaItem, GLOBAL_SERVICE};
use crate::volumes::extract_volumes;

/// Outcome of analyzing a compose template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// Configurable parameters in discovery order
    pub schema: Vec<SchemaItem>,
    pub warnings: Vec<String>,
    /// Structural failures. Non-empty means the schema may be incomplete.
    pub errors: Vec<String>,
    pub refs: Vec<VariableReference>,
}

/// Compose template analyzer.
pub struct ComposeParser {
    options: ParseOptions,
    scanner: ReferenceScanner,
}

impl Default for ComposeParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl ComposeParser {
    pub fn new(options: ParseOptions) -> Self {
        let scanner = ReferenceScanner::new().with_max_refs(options.max_refs);
        Self { options, scanner }
    }

    /// Analyze compose text. Never fails; problems are reported in the result.
    pub fn parse(&self, compose: &str) -> ParseResult {
        let content = compose.replace("\r\n", "\n");
        if content.trim().is_empty() {
            return ParseResult::default();
        }

        let mut diag = Diagnostics::new(self.options.message_limit);
        if content.len() > self.options.max_input_len {
            diag.add_error(VarsError::InputTooLarge {
                len: content.len(),
                max: self.options.max_input_len,
            });
            let (warnings, errors) = diag.into_parts();
            return ParseResult {
                warnings,
                errors,
                ..ParseResult::default()
            };
        }

        let mut schema = SchemaBuilder::new();
        if let Some(doc) = ComposeDocument::parse(&content, &mut diag) {
            for service in doc.services() {
                collect_service(&service, &mut schema, &mut diag);
            }
        }

        let refs = self.scanner.scan(&content);
        for reference in &refs {
            collect_reference(reference, &mut schema, &mut diag);
        }

        let (warnings, errors) = diag.into_parts();
        info!(
            "Parsed compose template: {} items, {} references, {} warnings, {} errors",
            schema.len(),
            refs.len(),
            warnings.len(),
            errors.len()
        );

        ParseResult {
            schema: schema.into_items(),
            warnings,
            errors,
            refs,
        }
    }
}

fn collect_service(service: &ServiceEntry<'_>, schema: &mut SchemaBuilder, diag: &mut Diagnostics) {
    let name = service.name.as_str();
    debug!("Collecting parameters for service {}", name);

    for port in extract_ports(name, service.ports, diag) {
        let item = SchemaItem::new(&port.host_port, name, ParamType::Port, port.container_port);
        schema.insert(item, diag);
    }

    for volume in extract_volumes(name, service.volumes, diag) {
        let item = SchemaItem::new(&volume.host_path, name, ParamType::Path, volume.container_path);
        schema.insert(item, diag);
    }

    for entry in extract_environment(name, service.environment, diag) {
        if is_reserved_key(&entry.key) {
            continue;
        }
        let item = SchemaItem::new(&entry.key, name, ParamType::Env, entry.value);
        schema.insert(item, diag);
    }
}

fn collect_reference(
    reference: &VariableReference,
    schema: &mut SchemaBuilder,
    diag: &mut Diagnostics,
) {
    if is_reserved_key(&reference.name) {
        return;
    }
    let item = SchemaItem::new(
        &reference.name,
        GLOBAL_SERVICE,
        ParamType::Env,
        reference.default_value.clone(),
    );
    if schema.insert(item, diag) && !reference.has_default {
        diag.add_warning(format!(
            "Unassigned variable reference: {}",
            diag.clamp(&reference.raw_token)
        ));
    }
}

/// Analyze a compose template with default options.
pub fn parse_compose_template_variables(compose: &str) -> ParseResult {
    ComposeParser::default().parse(compose)
}
