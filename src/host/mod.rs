//! # Host
//!
//! The side of the plugin contract that drives plugins: the import
//! environment handed to them through [`PluginContext`](crate::plugin::PluginContext)
//! and the import workflow that calls `run()` and `finish()`.

mod env;
mod import;

pub use env::ImportEnv;
pub use import::{run_import, ImportError, ImportOutcome, Stage};
