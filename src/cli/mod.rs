//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `import [FILE] [--plugin NAME] [--opt OPT]...` | Import prices, optionally through a plugin |
//! | `plugin list` | List registered plugins |
//! | `plugin options NAME` | Show a plugin's usage text |
//! | `prices [--station S]` | Show catalog contents |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Logs go to stderr through `tracing`. `--verbose` enables debug logs;
//! `RUST_LOG` takes precedence when set.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod import_cmd;
mod output;
mod plugin_cmd;
mod prices_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
