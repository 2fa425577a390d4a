//! Shell-style interpolation scanning over raw template text.
//!
//! Recognized forms are `${NAME}`, `${NAME:-default}`, `${NAME-default}` and
//! bare `$NAME`. `$$` is an escaped dollar sign. The scan is independent of
//! YAML structure, so references in comments or commands are found too.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MAX_REFS;

/// A variable reference found in template text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableReference {
    pub name: String,
    pub has_default: bool,
    pub default_value: String,
    /// The matched token as written, for diagnostics
    pub raw_token: String,
}

/// Scanner for `$` interpolation tokens.
pub struct ReferenceScanner {
    identifier: Regex,
    leading_identifier: Regex,
    max_refs: usize,
}

impl Default for ReferenceScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceScanner {
    pub fn new() -> Self {
        Self {
            identifier: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"),
            leading_identifier: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*")
                .expect("valid identifier pattern"),
            max_refs: DEFAULT_MAX_REFS,
        }
    }

    /// Stop collecting after `max_refs` distinct references.
    pub fn with_max_refs(mut self, max_refs: usize) -> Self {
        self.max_refs = max_refs;
        self
    }

    /// Scan text for references, reporting each distinct
    /// `(name, has_default, default_value)` once in order of appearance.
    pub fn scan(&self, text: &str) -> Vec<VariableReference> {
        let mut found = Found {
            refs: Vec::new(),
            seen: HashSet::new(),
        };
        let bytes = text.as_bytes();
        let mut i = 0;
        // Set once a `${` has no closing brace; no later `${` can close either.
        let mut braces_exhausted = false;

        while i < bytes.len() {
            if bytes[i] != b'$' {
                i += 1;
                continue;
            }
            match bytes.get(i + 1) {
                Some(b'$') => i += 2,
                Some(b'{') if braces_exhausted => i += 2,
                Some(b'{') => {
                    let Some(offset) = text[i + 2..].find('}') else {
                        braces_exhausted = true;
                        i += 2;
                        continue;
                    };
                    let end = i + 2 + offset;
                    let (name, default) = split_default(&text[i + 2..end]);
                    self.push(&mut found, name, default, &text[i..=end]);
                    i = end + 1;
                }
                Some(_) => match self.leading_identifier.find(&text[i + 1..]) {
                    Some(m) => {
                        let name = m.as_str();
                        self.push(&mut found, name, None, &format!("${}", name));
                        i += 1 + name.len();
                    }
                    None => i += 1,
                },
                None => i += 1,
            }
        }

        found.refs
    }

    fn push(&self, found: &mut Found, name: &str, default: Option<&str>, raw: &str) {
        let name = name.trim();
        if !self.identifier.is_match(name) || found.refs.len() >= self.max_refs {
            return;
        }
        let default_value = default.unwrap_or_default().to_string();
        let key = (name.to_string(), default.is_some(), default_value.clone());
        if !found.seen.insert(key) {
            return;
        }
        found.refs.push(VariableReference {
            name: name.to_string(),
            has_default: default.is_some(),
            default_value,
            raw_token: raw.to_string(),
        });
    }
}

struct Found {
    refs: Vec<VariableReference>,
    seen: HashSet<(String, bool, String)>,
}

/// Split brace contents on the first `:-`, or failing that the first `-`.
///
/// Both separators are treated alike; shell's distinction between unset and
/// empty is not modeled.
fn split_default(inner: &str) -> (&str, Option<&str>) {
    if let Some(idx) = inner.find(":-") {
        (&inner[..idx], Some(&inner[idx + 2..]))
    } else if let Some(idx) = inner.find('-') {
        (&inner[..idx], Some(&inner[idx + 1..]))
    } else {
        (inner, None)
    }
}

/// Scan with default limits.
pub fn scan_references(text: &str) -> Vec<VariableReference> {
    ReferenceScanner::new().scan(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(refs: &[VariableReference]) -> Vec<(&str, bool, &str)> {
        refs.iter()
            .map(|r| (r.name.as_str(), r.has_default, r.default_value.as_str()))
            .collect()
    }

    #[test]
    fn test_mixed_forms() {
        let refs = scan_references("${PORT:-8080} and $$ and $HOST");
        assert_eq!(summary(&refs), vec![("PORT", true, "8080"), ("HOST", false, "")]);
        assert_eq!(refs[0].raw_token, "${PORT:-8080}");
        assert_eq!(refs[1].raw_token, "$HOST");
    }

    #[test]
    fn test_escaped_dollar_suppresses_name() {
        let refs = scan_references("echo $A && echo ${B:-2} && echo $$HOME");
        assert_eq!(summary(&refs), vec![("A", false, ""), ("B", true, "2")]);
    }

    #[test]
    fn test_single_hyphen_default() {
        let refs = scan_references("${TAG-latest} ${URL:-http://a-b}");
        assert_eq!(summary(&refs), vec![("TAG", true, "latest"), ("URL", true, "http://a-b")]);
    }

    #[test]
    fn test_default_not_interpolated() {
        let refs = scan_references("${A:-$B}");
        assert_eq!(summary(&refs), vec![("A", true, "$B")]);
    }

    #[test]
    fn test_invalid_names_ignored() {
        let refs = scan_references("${1ABC} ${} ${a.b} $9 ${ OK }");
        assert_eq!(summary(&refs), vec![("OK", false, "")]);
    }

    #[test]
    fn test_unclosed_brace_ignored() {
        let refs = scan_references("${OPEN and $NEXT");
        assert_eq!(summary(&refs), vec![("NEXT", false, "")]);
    }

    #[test]
    fn test_dedup_by_name_and_default() {
        let refs = scan_references("$A ${A} ${A:-1} ${A:-1} ${A:-2}");
        assert_eq!(
            summary(&refs),
            vec![("A", false, ""), ("A", true, "1"), ("A", true, "2")]
        );
    }

    #[test]
    fn test_bare_name_stops_at_non_identifier() {
        let refs = scan_references("http://$HOST_NAME:$PORT/path é$X");
        assert_eq!(
            summary(&refs),
            vec![("HOST_NAME", false, ""), ("PORT", false, ""), ("X", false, "")]
        );
    }

    #[test]
    fn test_unclosed_brace_stops_brace_scanning() {
        let refs = scan_references("${OPEN $X ${Y $Z");
        assert_eq!(summary(&refs), vec![("X", false, ""), ("Z", false, "")]);
    }

    #[test]
    fn test_many_unclosed_braces_scan_linearly() {
        let text = format!("{}$TAIL", "${".repeat(400_000));
        let started = std::time::Instant::now();
        let refs = scan_references(&text);
        assert_eq!(summary(&refs), vec![("TAIL", false, "")]);
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_max_refs() {
        let refs = ReferenceScanner::new().with_max_refs(2).scan("$A $B $C");
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn test_trailing_dollar() {
        assert!(scan_references("cost: 5$").is_empty());
    }
}
