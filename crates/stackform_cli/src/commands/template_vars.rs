//! Template-vars command - Combined variable view of a stored template.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use stackform_vars::{parse_stored_schema, resolve_template_vars};

use super::{
    ensure_no_errors, load_options, print_json, read_optional, read_text, GlobalArgs,
    OutputFormat,
};
use crate::output::{format_diagnostics, format_schema};

#[derive(Args)]
pub struct TemplateVarsArgs {
    /// Compose file of the template
    compose: PathBuf,

    /// Dotenv file shipped with the template
    #[arg(long)]
    dotenv: Option<PathBuf>,

    /// Previously saved schema (JSON array of schema items)
    #[arg(long)]
    schema: Option<PathBuf>,
}

pub async fn execute(args: TemplateVarsArgs, global: &GlobalArgs) -> Result<()> {
    info!("Resolving template variables for {:?}", args.compose);

    let options = load_options(global).await?;
    let compose = read_text(&args.compose).await?;
    let dotenv = read_optional(args.dotenv.as_deref()).await?;
    let stored = parse_stored_schema(&read_optional(args.schema.as_deref()).await?)
        .context("Failed to load stored schema")?;

    let vars = resolve_template_vars(&stored, &compose, &dotenv, &options);

    match global.format {
        OutputFormat::Json => print_json(&vars)?,
        OutputFormat::Text => {
            print!("{}", format_schema(&vars.schema));
            if !vars.dotenv.is_empty() {
                println!("\n# .env");
                print!("{}", vars.dotenv);
            }
            eprint!("{}", format_diagnostics(&vars.warnings, &vars.errors));
            eprint!("{}", format_diagnostics(&vars.dotenv_warnings, &vars.dotenv_errors));
        }
    }

    ensure_no_errors(&vars.errors)
}
