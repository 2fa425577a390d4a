//! Service environment extraction.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_yaml::{Mapping, Sequence, Value};

use crate::diagnostics::Diagnostics;
use crate::document::{stringify_value, untag};

/// One environment variable with its value normalized to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
}

/// The two ways compose writes an `environment` block.
#[derive(Debug, Clone, Copy)]
pub enum EnvBlock<'a> {
    /// `- KEY=VALUE` / `- KEY`
    List(&'a Sequence),
    /// `KEY: VALUE`
    Map(&'a Mapping),
}

impl<'a> EnvBlock<'a> {
    pub fn classify(value: &'a Value) -> Option<Self> {
        match untag(value) {
            Value::Sequence(seq) => Some(EnvBlock::List(seq)),
            Value::Mapping(map) => Some(EnvBlock::Map(map)),
            _ => None,
        }
    }
}

/// `PATH` is never offered for configuration.
pub fn is_reserved_key(key: &str) -> bool {
    key.eq_ignore_ascii_case("PATH")
}

/// Collects a service's variables with compose override semantics.
struct EnvCollector<'d> {
    service: &'d str,
    entries: IndexMap<String, String>,
    duplicates: IndexSet<String>,
    diag: &'d mut Diagnostics,
}

impl EnvCollector<'_> {
    fn put(&mut self, key: &str, value: String) {
        let key = key.trim();
        if key.is_empty() {
            return;
        }
        if value.is_empty() {
            self.diag.add_warning(format!(
                "Unassigned environment variable: {}/{}",
                self.service, key
            ));
        }
        if self.entries.insert(key.to_string(), value).is_some() {
            self.duplicates.insert(key.to_string());
        }
    }

    fn put_assignment(&mut self, item: &str) {
        match item.split_once('=') {
            Some((key, value)) => self.put(key, value.to_string()),
            None => self.put(item, String::new()),
        }
    }

    fn put_mapping(&mut self, map: &Mapping) {
        for (key, value) in map {
            self.put(&stringify_value(key), stringify_value(value));
        }
    }

    fn finish(self) -> Vec<EnvEntry> {
        for key in &self.duplicates {
            self.diag.add_warning(format!(
                "Duplicate environment variable key: {}/{}",
                self.service, key
            ));
        }
        self.entries
            .into_iter()
            .map(|(key, value)| EnvEntry { key, value })
            .collect()
    }
}

/// Extract a service's environment in first-appearance order.
///
/// A repeated key keeps the last value and is reported once.
pub fn extract_environment(
    service: &str,
    environment: Option<&Value>,
    diag: &mut Diagnostics,
) -> Vec<EnvEntry> {
    let Some(block) = environment.and_then(EnvBlock::classify) else {
        return Vec::new();
    };

    let mut collector = EnvCollector {
        service,
        entries: IndexMap::new(),
        duplicates: IndexSet::new(),
        diag,
    };

    match block {
        EnvBlock::List(items) => {
            for item in items {
                match untag(item) {
                    Value::String(s) => collector.put_assignment(s),
                    Value::Mapping(m) => collector.put_mapping(m),
                    _ => {}
                }
            }
        }
        EnvBlock::Map(map) => collector.put_mapping(map),
    }

    collector.finish()
}
