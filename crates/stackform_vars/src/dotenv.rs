//! Dotenv parsing and rendering.
//!
//! The parser is line oriented and tolerant: malformed lines produce
//! warnings and are skipped or kept raw, never rejected outright. Line
//! numbers in messages are 1-indexed.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::schema::{ParamType, SchemaItem};

/// Characters that force a rendered value into double quotes.
const QUOTE_TRIGGERS: [char; 5] = [' ', '\t', '#', '"', '\''];

/// Parsed dotenv content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DotenvResult {
    /// Key to value, in order of first appearance
    pub dotenv: IndexMap<String, String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Parse `KEY=VALUE` text.
pub fn parse_dotenv_text(text: &str) -> DotenvResult {
    let mut dotenv = IndexMap::new();
    let mut diag = Diagnostics::default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("export ") {
            line = rest.trim();
        }

        let (key, value) = match line.find('=') {
            None => (line, String::new()),
            Some(0) => {
                diag.add_warning(format!(
                    ".env line {}: cannot parse (empty key): {}",
                    line_no,
                    diag.clamp(raw_line.trim())
                ));
                continue;
            }
            Some(eq) => {
                let raw_value = line[eq + 1..].trim();
                (line[..eq].trim(), unquote(raw_value, line_no, raw_line, &mut diag))
            }
        };
        if key.is_empty() {
            continue;
        }

        if dotenv.contains_key(key) {
            diag.add_warning(format!(
                ".env line {}: duplicate key {} (later value overrides earlier)",
                line_no, key
            ));
        }
        if value.is_empty() {
            diag.add_warning(format!(
                ".env line {}: unassigned {} (treated as empty)",
                line_no, key
            ));
        }
        dotenv.insert(key.to_string(), value);
    }

    debug!("Parsed dotenv with {} keys", dotenv.len());
    let (warnings, errors) = diag.into_parts();
    DotenvResult {
        dotenv,
        warnings,
        errors,
    }
}

/// Strip one matching pair of surrounding quotes. No escape processing.
fn unquote(raw: &str, line_no: usize, raw_line: &str, diag: &mut Diagnostics) -> String {
    let Some(first) = raw.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return raw.to_string();
    };
    if raw.len() >= 2 && raw.ends_with(first) {
        return raw[1..raw.len() - 1].to_string();
    }
    diag.add_warning(format!(
        ".env line {}: unclosed quote (raw value kept): {}",
        line_no,
        diag.clamp(raw_line.trim())
    ));
    raw.to_string()
}

/// Quote a value when it holds whitespace, `#` or quotes.
pub fn quote_value_if_needed(value: &str) -> String {
    if value.contains(QUOTE_TRIGGERS) {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// Render a mapping as dotenv text with keys sorted for stable output.
pub fn render_dotenv(map: &IndexMap<String, String>) -> String {
    let mut pairs: Vec<(&str, &str)> = map
        .iter()
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .collect();
    if pairs.is_empty() {
        return String::new();
    }
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = String::new();
    for (key, value) in pairs {
        out.push_str(key);
        out.push('=');
        out.push_str(&quote_value_if_needed(value));
        out.push('\n');
    }
    out
}

/// Append a `NAME=DEFAULT` line for every global env schema item the dotenv
/// text does not define yet. Existing lines are kept as written.
pub fn normalize_dotenv_by_schema(text: &str, schema: &[SchemaItem]) -> String {
    let mut known: HashSet<String> = parse_dotenv_text(text)
        .dotenv
        .into_keys()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    let mut additions = Vec::new();
    for item in schema {
        if !item.is_global() || item.param_type != ParamType::Env {
            continue;
        }
        let key = item.name.trim();
        if key.is_empty() || !known.insert(key.to_string()) {
            continue;
        }
        additions.push(format!("{}={}", key, quote_value_if_needed(item.default.trim())));
    }

    if additions.is_empty() {
        return text.to_string();
    }
    debug!("Appending {} schema defaults to dotenv", additions.len());

    let base = text.replace("\r\n", "\n");
    let base = base.trim_end_matches('\n');
    if base.is_empty() {
        format!("{}\n", additions.join("\n"))
    } else {
        format!("{}\n{}\n", base, additions.join("\n"))
    }
}
