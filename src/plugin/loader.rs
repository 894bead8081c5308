//! Plugin registration and loading
//!
//! Plugins are compiled in and registered by name when the loader is built.
//! Each registered module provides one or more capabilities (plugin classes);
//! loading resolves the module by name and then picks the requested class.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::contract::{ImportPlugin, ImportPluginType, PluginContext};
use super::error::PluginError;
use super::options::{parse_options, OptionSchema, ParsedOptions};
use super::usage::usage;

/// Kind of plugin class a module can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Capability {
    ImportPlugin,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ImportPlugin => "ImportPlugin",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

type ImportConstructor = fn(PluginContext, ParsedOptions) -> Box<dyn ImportPlugin>;

fn construct_import<T: ImportPluginType>(
    ctx: PluginContext,
    options: ParsedOptions,
) -> Box<dyn ImportPlugin> {
    Box::new(T::new(ctx, options))
}

/// A loadable plugin class
#[derive(Clone)]
pub struct PluginClass {
    name: &'static str,
    doc: &'static str,
    schema: OptionSchema,
    constructor: ImportConstructor,
}

impl PluginClass {
    /// Describes an import plugin type
    pub fn import<T: ImportPluginType>() -> Self {
        Self {
            name: T::NAME,
            doc: T::DOC,
            schema: T::option_schema(),
            constructor: construct_import::<T>,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn doc(&self) -> &str {
        self.doc
    }

    pub fn schema(&self) -> &OptionSchema {
        &self.schema
    }

    /// Usage text for this class
    pub fn usage(&self) -> String {
        usage(self.doc, &self.schema)
    }

    /// Validates `raw` options and builds an instance
    ///
    /// Option errors (including a `help` request) abort construction before
    /// the plugin sees any of them.
    pub fn instantiate<S: AsRef<str>>(
        &self,
        ctx: PluginContext,
        raw: &[S],
    ) -> Result<Box<dyn ImportPlugin>, PluginError> {
        let options = parse_options(self.doc, &self.schema, raw)?;
        debug!(plugin = self.name, options = options.len(), "Constructing plugin");
        Ok((self.constructor)(ctx, options))
    }
}

impl fmt::Debug for PluginClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginClass")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish()
    }
}

/// A named unit providing plugin classes
#[derive(Debug, Clone)]
pub struct PluginModule {
    name: String,
    classes: BTreeMap<Capability, PluginClass>,
}

impl PluginModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            classes: BTreeMap::new(),
        }
    }

    /// Adds an import plugin class to this module
    pub fn with_import<T: ImportPluginType>(mut self) -> Self {
        self.classes
            .insert(Capability::ImportPlugin, PluginClass::import::<T>());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up the class for a capability
    pub fn class(&self, capability: Capability) -> Option<&PluginClass> {
        self.classes.get(&capability)
    }

    /// Capabilities this module provides
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.classes.keys().copied()
    }
}

/// Registry of plugin modules
pub struct PluginLoader {
    modules: BTreeMap<String, PluginModule>,
}

impl PluginLoader {
    /// Creates an empty loader
    pub fn new() -> Self {
        Self {
            modules: BTreeMap::new(),
        }
    }

    /// Creates a loader with the built-in plugins registered
    pub fn with_builtins() -> Self {
        let mut loader = Self::new();
        for module in super::builtin::modules() {
            loader.register(module);
        }
        loader
    }

    /// Registers a module, replacing any module with the same name
    pub fn register(&mut self, module: PluginModule) {
        debug!(plugin = %module.name, "Registered plugin module");
        self.modules.insert(module.name.clone(), module);
    }

    /// Lists registered modules in name order
    pub fn list(&self) -> Vec<&PluginModule> {
        self.modules.values().collect()
    }

    /// Gets a module by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&PluginModule> {
        self.modules.get(&name.to_lowercase())
    }

    /// Resolves `name` and returns its class for `capability`
    pub fn load(&self, name: &str, capability: Capability) -> Result<&PluginClass, PluginError> {
        let module = self.get(name).ok_or_else(|| PluginError::NotFound {
            name: name.to_string(),
            reason: self.not_found_reason(name),
        })?;

        module
            .class(capability)
            .ok_or_else(|| PluginError::MissingCapability {
                plugin: name.to_string(),
                capability: capability.to_string(),
            })
    }

    fn not_found_reason(&self, name: &str) -> String {
        let known: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        if known.is_empty() {
            format!("no plugin named '{}' (no plugins are registered)", name.to_lowercase())
        } else {
            format!(
                "no plugin named '{}' (available: {})",
                name.to_lowercase(),
                known.join(", ")
            )
        }
    }
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new()
    }
}
