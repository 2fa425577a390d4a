//! Parse-dotenv command - Parse a dotenv file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use stackform_vars::parse_dotenv_text;

use super::{ensure_no_errors, print_json, read_text, GlobalArgs, OutputFormat};
use crate::output::format_diagnostics;

#[derive(Args)]
pub struct ParseDotenvArgs {
    /// Dotenv file to parse
    file: PathBuf,
}

pub async fn execute(args: ParseDotenvArgs, global: &GlobalArgs) -> Result<()> {
    info!("Parsing dotenv file: {:?}", args.file);

    let text = read_text(&args.file).await?;
    let result = parse_dotenv_text(&text);

    match global.format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => {
            for (key, value) in &result.dotenv {
                println!("{} = {}", key, value);
            }
            eprint!("{}", format_diagnostics(&result.warnings, &result.errors));
        }
    }

    ensure_no_errors(&result.errors)
}
