//! Parse limits.

use serde::{Deserialize, Serialize};

use crate::diagnostics::DEFAULT_MESSAGE_LIMIT;
use crate::error::VarsResult;

/// Largest compose text accepted, in bytes.
pub const DEFAULT_MAX_INPUT_LEN: usize = 2_000_000;

/// Largest number of distinct variable references collected per template.
pub const DEFAULT_MAX_REFS: usize = 500;

/// Options controlling a parse call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Compose text longer than this is rejected with an error
    pub max_input_len: usize,
    /// Reference scanning stops after this many distinct references
    pub max_refs: usize,
    /// Truncation length for diagnostic snippets
    pub message_limit: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            max_refs: DEFAULT_MAX_REFS,
            message_limit: DEFAULT_MESSAGE_LIMIT,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> VarsResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = len;
        self
    }

    pub fn max_refs(mut self, count: usize) -> Self {
        self.max_refs = count;
        self
    }

    pub fn message_limit(mut self, limit: usize) -> Self {
        self.message_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::new();
        assert_eq!(options.max_input_len, 2_000_000);
        assert_eq!(options.max_refs, 500);
        assert_eq!(options.message_limit, 200);
    }

    #[test]
    fn test_from_toml_partial() {
        let options = ParseOptions::from_toml_str("max_refs = 10\n").unwrap();
        assert_eq!(options.max_refs, 10);
        assert_eq!(options.max_input_len, DEFAULT_MAX_INPUT_LEN);
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(ParseOptions::from_toml_str("max_refs = \"many\"").is_err());
    }

    #[test]
    fn test_builder() {
        let options = ParseOptions::new().max_input_len(10).message_limit(5);
        assert_eq!(options.max_input_len, 10);
        assert_eq!(options.message_limit, 5);
    }
}
