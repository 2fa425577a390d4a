//! Warning and error accumulation for a single parse call.

/// Default truncation length for diagnostic snippets.
pub const DEFAULT_MESSAGE_LIMIT: usize = 200;

/// Truncate `text` to at most `limit` characters, appending `...` when cut.
pub fn clamp_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Ordered, append-only diagnostics collected during one call.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    message_limit: usize,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_LIMIT)
    }
}

impl Diagnostics {
    pub fn new(message_limit: usize) -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
            message_limit,
        }
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Record a structural failure. The detail is truncated to the message limit.
    pub fn add_error(&mut self, error: impl std::fmt::Display) {
        self.errors.push(self.clamp(&error.to_string()));
    }

    /// Truncate a snippet of user text for inclusion in a message.
    pub fn clamp(&self, text: &str) -> String {
        clamp_text(text, self.message_limit)
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.warnings, self.errors)
    }
}
