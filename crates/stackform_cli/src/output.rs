//! Human-readable output for CLI commands.

use std::fmt::Write;

use stackform_vars::{FieldType, SchemaItem};

/// Render a schema grouped by service, services in first-appearance order.
pub fn format_schema(schema: &[SchemaItem]) -> String {
    let mut groups: Vec<(&str, Vec<&SchemaItem>)> = Vec::new();
    for item in schema {
        match groups.iter_mut().find(|(name, _)| *name == item.service_name) {
            Some((_, items)) => items.push(item),
            None => groups.push((item.service_name.as_str(), vec![item])),
        }
    }

    let mut out = String::new();
    for (service, items) in groups {
        let _ = writeln!(out, "[{}]", service);
        for item in items {
            let default = if item.field_type == FieldType::Password && !item.default.is_empty() {
                "********"
            } else {
                item.default.as_str()
            };
            let _ = writeln!(out, "  {:<5} {} = {}", item.param_type, item.name, default);
        }
    }
    out
}

/// Render warnings and errors, one per line.
pub fn format_diagnostics(warnings: &[String], errors: &[String]) -> String {
    let mut out = String::new();
    for warning in warnings {
        let _ = writeln!(out, "warning: {}", warning);
    }
    for error in errors {
        let _ = writeln!(out, "error: {}", error);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackform_vars::ParamType;

    #[test]
    fn test_format_schema_groups_services() {
        let schema = vec![
            SchemaItem::new("8080", "web", ParamType::Port, "80"),
            SchemaItem::new("DB_PASSWORD", "db", ParamType::Env, "hunter2"),
            SchemaItem::new("./data", "web", ParamType::Path, "/data"),
        ];
        assert_eq!(
            format_schema(&schema),
            "[web]\n  port  8080 = 80\n  path  ./data = /data\n[db]\n  env   DB_PASSWORD = ********\n"
        );
    }

    #[test]
    fn test_format_diagnostics() {
        let out = format_diagnostics(&["w1".to_string()], &["e1".to_string()]);
        assert_eq!(out, "warning: w1\nerror: e1\n");
        assert_eq!(format_diagnostics(&[], &[]), "");
    }
}
