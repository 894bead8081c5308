//! # Plugin System
//!
//! Extensibility layer for the `import` command.
//!
//! ## Overview
//!
//! Plugins are compiled in and registered by name with a [`PluginLoader`].
//! The host loads a plugin class, constructs it with a [`PluginContext`] and
//! raw `--opt` strings, then drives it through a two-step lifecycle:
//!
//! ```text
//! Host                                  Plugin
//!  │                                      │
//!  ├── load("local", ImportPlugin)        │
//!  ├── instantiate(ctx, ["file=x"]) ────► options parsed, instance built
//!  ├── run() ──────────────────────────► ContinueHostWorkflow | PluginHandledEverything
//!  │   (host validates, locates data)     │
//!  ├── finish() ───────────────────────► ContinueHostWorkflow | PluginHandledEverything
//!  └── import into catalog                │
//! ```
//!
//! ## Options
//!
//! Each plugin declares an [`OptionSchema`]. Options are `key` (a flag) or
//! `key=value`, matched case-insensitively. `help` is always accepted and
//! returns [`PluginError::HelpRequested`] with the plugin's usage text.
//!
//! ## Built-in Plugins
//!
//! - `local` - Import a `.prices` file from any path
//! - `stats` - Report catalog contents and stop
//!
//! ## Key Types
//!
//! - [`PluginLoader`] - Registers and loads plugin classes
//! - [`Plugin`] / [`ImportPlugin`] - Lifecycle traits
//! - [`ImportPluginType`] - Construction contract for import plugins
//! - [`PluginError`] - Every failure raised by this layer

pub mod builtin;
mod contract;
mod error;
mod loader;
mod options;
mod usage;

pub use contract::{
    ImportPlugin, ImportPluginType, LifecycleSignal, Plugin, PluginContext, DEFAULT_IMPORT_FILE,
};
pub use error::PluginError;
pub use loader::{Capability, PluginClass, PluginLoader, PluginModule};
pub use options::{parse_options, OptionSchema, OptionValue, ParsedOptions, HELP_OPTION};
pub use usage::{usage, NO_OPTIONS, USAGE_WIDTH};
