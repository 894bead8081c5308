//! tradeplug - plugin-driven price imports
//!
//! Imports `.prices` files into a SQLite price catalog. The `import`
//! command can hand control to a plugin, which may adjust the import,
//! take over parts of it, or do the whole job itself.

pub mod cli;
pub mod host;
pub mod plugin;
pub mod storage;

pub use host::{run_import, ImportEnv, ImportOutcome};
pub use plugin::{PluginContext, PluginError, PluginLoader};
pub use storage::{Config, TradeDb};
