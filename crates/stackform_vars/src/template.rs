//! Combined variable view for a stored template.
//!
//! A template saved by the app store carries its compose text, an optional
//! dotenv file and a previously saved schema. This module merges the saved
//! schema with freshly parsed parameters and fills in dotenv defaults for
//! global variables, producing what the deployment form renders.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::config::ParseOptions;
use crate::diagnostics::Diagnostics;
use crate::dotenv::{normalize_dotenv_by_schema, parse_dotenv_text};
use crate::error::{VarsError, VarsResult};
use crate::parser::ComposeParser;
use crate::refs::VariableReference;
use crate::schema::{sort_for_display, SchemaBuilder, SchemaItem};

/// Everything the deployment form needs for one template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVars {
    /// Saved and parsed items, sorted by service, parameter type and name
    pub schema: Vec<SchemaItem>,
    pub refs: Vec<VariableReference>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    /// Dotenv text with missing global defaults appended
    pub dotenv: String,
    pub dotenv_map: IndexMap<String, String>,
    pub dotenv_warnings: Vec<String>,
    pub dotenv_errors: Vec<String>,
}

/// Decode a saved schema (a JSON array of schema items).
pub fn parse_stored_schema(json: &str) -> VarsResult<Vec<SchemaItem>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Vec<SchemaItem> = serde_json::from_str(json)?;
    if let Some(pos) = items.iter().position(|item| item.name.trim().is_empty()) {
        return Err(VarsError::InvalidSchema(format!("item {} has an empty name", pos)));
    }
    Ok(items)
}

/// Merge saved items with parsed ones. Saved items win on key conflicts.
pub fn merge_schemas(
    stored: &[SchemaItem],
    parsed: &[SchemaItem],
    diag: &mut Diagnostics,
) -> Vec<SchemaItem> {
    let mut builder = SchemaBuilder::new();
    for item in stored.iter().chain(parsed) {
        builder.insert(item.clone(), diag);
    }
    let mut merged = builder.into_items();
    sort_for_display(&mut merged);
    merged
}

/// Build the combined view for a template.
pub fn resolve_template_vars(
    stored_schema: &[SchemaItem],
    compose: &str,
    dotenv: &str,
    options: &ParseOptions,
) -> TemplateVars {
    let dotenv = normalize_dotenv_by_schema(dotenv, stored_schema);
    let parsed_dotenv = parse_dotenv_text(&dotenv);

    let parsed = ComposeParser::new(options.clone()).parse(compose);

    let mut diag = Diagnostics::new(options.message_limit);
    let schema = merge_schemas(stored_schema, &parsed.schema, &mut diag);
    diag.warnings.extend(parsed.warnings);
    debug!(
        "Resolved template vars: {} saved + {} parsed -> {} items",
        stored_schema.len(),
        parsed.schema.len(),
        schema.len()
    );

    TemplateVars {
        schema,
        refs: parsed.refs,
        warnings: diag.warnings,
        errors: parsed.errors,
        dotenv,
        dotenv_map: parsed_dotenv.dotenv,
        dotenv_warnings: parsed_dotenv.warnings,
        dotenv_errors: parsed_dotenv.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ParamType;

    #[test]
    fn test_parse_stored_schema() {
        let items = parse_stored_schema(
            r#"[{"name": "APP_PORT", "type": "port", "default": "80", "serviceName": "web", "paramType": "port"}]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "basic");
        assert_eq!(items[0].param_type, ParamType::Port);
        assert!(parse_stored_schema("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_stored_schema_rejects_bad_input() {
        assert!(matches!(parse_stored_schema("{"), Err(VarsError::Json(_))));
        assert!(matches!(
            parse_stored_schema(r#"[{"name": " ", "paramType": "env"}]"#),
            Err(VarsError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_stored_items_win() {
        let stored = vec![SchemaItem::new("8080", "web", ParamType::Port, "8000")];
        let vars = resolve_template_vars(
            &stored,
            "services:\n  web:\n    ports: ['8080:80', '9090:90']\n",
            "",
            &ParseOptions::default(),
        );
        assert_eq!(vars.schema.len(), 2);
        assert_eq!(vars.schema[0].default, "8000");
        assert_eq!(vars.warnings, vec!["Duplicate schema item dropped: web/port/8080"]);
    }

    #[test]
    fn test_dotenv_filled_from_saved_globals() {
        let stored = vec![
            SchemaItem::new("TAG", "Global", ParamType::Env, "latest"),
            SchemaItem::new("HOST", "Global", ParamType::Env, ""),
        ];
        let vars = resolve_template_vars(&stored, "", "HOST=example.com\n", &ParseOptions::default());
        assert_eq!(vars.dotenv, "HOST=example.com\nTAG=latest\n");
        assert_eq!(vars.dotenv_map["TAG"], "latest");
        assert!(vars.dotenv_warnings.is_empty());
    }

    #[test]
    fn test_parse_warnings_follow_merge_warnings() {
        let stored = vec![SchemaItem::new("A", "Global", ParamType::Env, "1")];
        let vars = resolve_template_vars(
            &stored,
            "x: ${A:-1}\ny: $B\n",
            "",
            &ParseOptions::default(),
        );
        assert_eq!(
            vars.warnings,
            vec![
                "Duplicate schema item dropped: Global/env/A",
                "Unassigned variable reference: $B",
            ]
        );
        let names: Vec<_> = vars.schema.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
