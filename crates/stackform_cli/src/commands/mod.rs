//! CLI command definitions.
//!
//! Each subcommand loads its inputs from disk, hands the text to the
//! `stackform_vars` engine and prints the result.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use stackform_vars::ParseOptions;

pub mod parse_dotenv;
pub mod parse_vars;
pub mod render_dotenv;
pub mod template_vars;

/// Stackform - compose template variable inspector
#[derive(Parser)]
#[command(name = "stackform")]
#[command(version, about = "Stackform - compose template variable inspector")]
#[command(long_about = r#"
Stackform inspects compose templates and reports the parameters a user can
configure before deployment: published ports, bind-mount paths and
environment variables.

COMMANDS:
  parse-vars     → Extract the parameter schema from a compose file
  parse-dotenv   → Parse a .env file
  template-vars  → Merge a saved schema, compose file and .env file
  render-dotenv  → Re-render a .env file in canonical form

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or unreadable input
  3 - Template has blocking errors
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// TOML file with parse limits
    #[arg(long, global = true, env = "STACKFORM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract configurable parameters from a compose file
    #[command(name = "parse-vars")]
    ParseVars(parse_vars::ParseVarsArgs),

    /// Parse a dotenv file
    #[command(name = "parse-dotenv")]
    ParseDotenv(parse_dotenv::ParseDotenvArgs),

    /// Build the combined variable view of a stored template
    #[command(name = "template-vars")]
    TemplateVars(template_vars::TemplateVarsArgs),

    /// Re-render a dotenv file with sorted keys and quoted values
    #[command(name = "render-dotenv")]
    RenderDotenv(render_dotenv::RenderDotenvArgs),
}

/// The analyzed input reported structural errors.
#[derive(Error, Debug)]
#[error("{count} blocking error(s) reported")]
pub struct BlockingErrors {
    pub count: usize,
}

/// Fail with [`BlockingErrors`] when the error list is non-empty.
pub fn ensure_no_errors(errors: &[String]) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(BlockingErrors { count: errors.len() }.into())
    }
}

/// Read a whole input file as text.
pub async fn read_text(path: &Path) -> Result<String> {
    debug!("Reading {:?}", path);
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Read an optional input file, treating absence as empty text.
pub async fn read_optional(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => read_text(path).await,
        None => Ok(String::new()),
    }
}

/// Load parse options from `--config`, or defaults.
pub async fn load_options(global: &GlobalArgs) -> Result<ParseOptions> {
    let Some(path) = &global.config else {
        return Ok(ParseOptions::default());
    };
    let content = read_text(path).await?;
    ParseOptions::from_toml_str(&content)
        .with_context(|| format!("Invalid options in {}", path.display()))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn global(config: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            config,
            format: OutputFormat::Json,
        }
    }

    #[tokio::test]
    async fn test_load_default_options() {
        let options = load_options(&global(None)).await.unwrap();
        assert_eq!(options, ParseOptions::default());
    }

    #[tokio::test]
    async fn test_load_options_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("stackform.toml");
        fs::write(&path, "max_refs = 3\nmessage_limit = 50\n").unwrap();

        let options = load_options(&global(Some(path))).await.unwrap();
        assert_eq!(options.max_refs, 3);
        assert_eq!(options.message_limit, 50);
    }

    #[tokio::test]
    async fn test_load_invalid_options() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("stackform.toml");
        fs::write(&path, "max_refs = [").unwrap();

        let err = load_options(&global(Some(path))).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid options"));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp = tempdir().unwrap();
        let err = read_text(&temp.path().join("missing.yml")).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
        assert_eq!(read_optional(None).await.unwrap(), "");
    }

    #[test]
    fn test_ensure_no_errors() {
        assert!(ensure_no_errors(&[]).is_ok());
        let err = ensure_no_errors(&["boom".to_string()]).unwrap_err();
        assert!(err.downcast_ref::<BlockingErrors>().is_some());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "stackform",
            "--format",
            "text",
            "template-vars",
            "docker-compose.yml",
            "--dotenv",
            ".env",
        ])
        .unwrap();
        assert_eq!(cli.global.format, OutputFormat::Text);
        assert!(matches!(cli.command, Commands::TemplateVars(_)));
    }
}
