//! Parse-vars command - Extract configurable parameters from a compose file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use stackform_vars::ComposeParser;

use super::{ensure_no_errors, load_options, print_json, read_text, GlobalArgs, OutputFormat};
use crate::output::{format_diagnostics, format_schema};

#[derive(Args)]
pub struct ParseVarsArgs {
    /// Compose file to analyze
    compose: PathBuf,
}

pub async fn execute(args: ParseVarsArgs, global: &GlobalArgs) -> Result<()> {
    info!("Parsing compose template: {:?}", args.compose);

    let options = load_options(global).await?;
    let compose = read_text(&args.compose).await?;
    let result = ComposeParser::new(options).parse(&compose);

    match global.format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => {
            print!("{}", format_schema(&result.schema));
            for reference in &result.refs {
                println!("ref {}", reference.raw_token);
            }
            eprint!("{}", format_diagnostics(&result.warnings, &result.errors));
        }
    }

    ensure_no_errors(&result.errors)
}
