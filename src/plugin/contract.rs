//! Plugin contract
//!
//! A plugin is constructed from a [`PluginContext`] and its parsed options,
//! then driven by the host through `run()` and `finish()`. Both return a
//! [`LifecycleSignal`] telling the host whether to carry on with its own
//! workflow.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use serde::Serialize;

use super::options::{OptionSchema, OptionValue, ParsedOptions};
use crate::host::ImportEnv;
use crate::storage::TradeDb;

/// File an import plugin's output is read from when no import file is set
pub const DEFAULT_IMPORT_FILE: &str = "import.prices";

/// Whether the host should continue after a lifecycle call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleSignal {
    /// The plugin at most adjusted shared configuration; the host carries on
    ContinueHostWorkflow,

    /// The plugin completed the work itself; the host stops here
    PluginHandledEverything,
}

impl LifecycleSignal {
    /// True if the host should keep going
    pub fn should_continue(self) -> bool {
        matches!(self, LifecycleSignal::ContinueHostWorkflow)
    }
}

impl From<bool> for LifecycleSignal {
    fn from(proceed: bool) -> Self {
        if proceed {
            LifecycleSignal::ContinueHostWorkflow
        } else {
            LifecycleSignal::PluginHandledEverything
        }
    }
}

/// Host state shared with a plugin for the length of one command
///
/// Cloning is cheap and every clone refers to the same catalog and
/// environment. Plugins are expected to read freely and only adjust the
/// environment where their contract says so.
#[derive(Clone)]
pub struct PluginContext {
    db: Rc<TradeDb>,
    env: Rc<RefCell<ImportEnv>>,
}

impl PluginContext {
    pub fn new(db: TradeDb, env: ImportEnv) -> Self {
        Self {
            db: Rc::new(db),
            env: Rc::new(RefCell::new(env)),
        }
    }

    /// The price catalog
    pub fn db(&self) -> &TradeDb {
        &self.db
    }

    /// Read access to the import environment
    pub fn env(&self) -> Ref<'_, ImportEnv> {
        self.env.borrow()
    }

    /// Write access to the import environment
    ///
    /// Panics if a borrow from [`env`](Self::env) is still alive.
    pub fn env_mut(&self) -> RefMut<'_, ImportEnv> {
        self.env.borrow_mut()
    }
}

/// Lifecycle every plugin implements
///
/// `run` and `finish` have no default bodies: a plugin that does not
/// provide them does not compile.
pub trait Plugin {
    /// Called before the host validates arguments or does any work.
    fn run(&mut self) -> anyhow::Result<LifecycleSignal>;

    /// Called once the host has prepared everything, right before its
    /// final action.
    fn finish(&mut self) -> anyhow::Result<LifecycleSignal>;

    /// Options this instance was constructed with
    fn options(&self) -> &ParsedOptions;

    /// Case-insensitive option lookup
    fn get_option(&self, key: &str) -> Option<&OptionValue> {
        self.options().get(key)
    }

    fn has_option(&self, key: &str) -> bool {
        self.options().is_set(key)
    }
}

/// A plugin that feeds the `import` command
///
/// `run` returning [`LifecycleSignal::PluginHandledEverything`] ends the
/// import immediately. Otherwise the host checks its arguments, locates the
/// import file and calls `finish`; handling everything there skips the
/// database import.
pub trait ImportPlugin: Plugin {
    /// Filename used when the host looks for this plugin's output
    fn default_import_file(&self) -> &str {
        DEFAULT_IMPORT_FILE
    }
}

/// Construction contract for an import plugin type
///
/// Registered plugin classes are built from these associated items, so the
/// host never needs to know the concrete type.
pub trait ImportPluginType: ImportPlugin + Sized + 'static {
    /// Class name shown in listings
    const NAME: &'static str;

    /// Free-text description used for usage output
    const DOC: &'static str;

    /// Options the plugin accepts; empty means none
    fn option_schema() -> OptionSchema {
        OptionSchema::new()
    }

    /// Builds an instance from already validated options
    fn new(ctx: PluginContext, options: ParsedOptions) -> Self;
}
