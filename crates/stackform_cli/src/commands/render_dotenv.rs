//! Render-dotenv command - Re-render a dotenv file in canonical form.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::info;

use stackform_vars::{parse_dotenv_text, render_dotenv, DotenvResult};

use super::{ensure_no_errors, print_json, read_text, GlobalArgs, OutputFormat};
use crate::output::format_diagnostics;

#[derive(Args)]
pub struct RenderDotenvArgs {
    /// Dotenv file to render
    file: PathBuf,
}

/// JSON shape of `render-dotenv` output.
#[derive(Debug, Serialize)]
pub struct RenderedDotenv {
    pub dotenv: String,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl From<DotenvResult> for RenderedDotenv {
    fn from(result: DotenvResult) -> Self {
        Self {
            dotenv: render_dotenv(&result.dotenv),
            warnings: result.warnings,
            errors: result.errors,
        }
    }
}

pub async fn execute(args: RenderDotenvArgs, global: &GlobalArgs) -> Result<()> {
    info!("Rendering dotenv file: {:?}", args.file);

    let text = read_text(&args.file).await?;
    let rendered = RenderedDotenv::from(parse_dotenv_text(&text));

    match global.format {
        OutputFormat::Json => print_json(&rendered)?,
        OutputFormat::Text => {
            print!("{}", rendered.dotenv);
            eprint!("{}", format_diagnostics(&rendered.warnings, &rendered.errors));
        }
    }

    ensure_no_errors(&rendered.errors)
}
