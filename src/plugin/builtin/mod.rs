//! Built-in plugins
//!
//! | Name | Class | Purpose |
//! |------|-------|---------|
//! | `local` | `LocalImport` | Import a `.prices` file from any path |
//! | `stats` | `StatsImport` | Report catalog contents and stop |

mod local;
mod stats;

pub use local::LocalImport;
pub use stats::StatsImport;

use super::loader::PluginModule;

/// Modules registered by [`PluginLoader::with_builtins`](super::PluginLoader::with_builtins)
pub fn modules() -> Vec<PluginModule> {
    vec![
        PluginModule::new("local").with_import::<LocalImport>(),
        PluginModule::new("stats").with_import::<StatsImport>(),
    ]
}
