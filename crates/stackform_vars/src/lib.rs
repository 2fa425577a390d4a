//! # stackform_vars
//!
//! Extracts the user-configurable parameters of a compose template for the
//! Stackform app store.
//!
//! Given compose text (and optionally a dotenv file) this crate produces an
//! ordered, deduplicated list of ports, bind-mount paths and environment
//! variables suitable for rendering a deployment form, together with
//! non-fatal warnings about ambiguous or risky constructs.
//!
//! - **Normalization**: YAML parsing with syntax failures isolated as errors
//! - **Extraction**: per-service ports, volumes and environment
//! - **Reference scanning**: `${NAME:-default}` / `$NAME` tokens anywhere in the text
//! - **Dotenv**: tolerant `KEY=VALUE` parsing and rendering
//!
//! Everything is synchronous and performs no I/O; callers supply text.
//!
//! ## Example
//!
//! ```rust
//! use stackform_vars::{parse_compose_template_variables, parse_dotenv_text};
//!
//! let result = parse_compose_template_variables(
//!     "services:\n  web:\n    ports:\n      - \"8080:80\"\n",
//! );
//! assert_eq!(result.schema[0].name, "8080");
//! assert_eq!(result.schema[0].default, "80");
//!
//! let env = parse_dotenv_text("FOO=\"bar\"\n");
//! assert_eq!(env.dotenv["FOO"], "bar");
//! ```

pub mod config;
pub mod diagnostics;
pub mod document;
pub mod dotenv;
pub mod environment;
pub mod error;
pub mod parser;
pub mod ports;
pub mod refs;
pub mod schema;
pub mod template;
pub mod volumes;

pub use config::ParseOptions;
pub use diagnostics::{clamp_text, Diagnostics};
pub use document::{ComposeDocument, ServiceEntry};
pub use dotenv::{normalize_dotenv_by_schema, parse_dotenv_text, render_dotenv, DotenvResult};
pub use environment::{EnvBlock, EnvEntry};
pub use error::{VarsError, VarsResult};
pub use parser::{parse_compose_template_variables, ComposeParser, ParseResult};
pub use ports::{PortMapping, PortSpec};
pub use refs::{scan_references, ReferenceScanner, VariableReference};
pub use schema::{FieldType, ParamType, SchemaItem, GLOBAL_SERVICE};
pub use template::{merge_schemas, parse_stored_schema, resolve_template_vars, TemplateVars};
pub use volumes::{VolumeMapping, VolumeSpec};
