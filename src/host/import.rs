//! The import workflow
//!
//! ```text
//! load plugin ─► construct (options parsed) ─► run()
//!                                               │ handled ─► stop
//!                                               ▼
//!                          locate import file (host validation)
//!                                               ▼
//!                                            finish()
//!                                               │ handled ─► stop
//!                                               ▼
//!                                  import records into the catalog
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::plugin::{Capability, ImportPlugin, PluginContext, PluginLoader, DEFAULT_IMPORT_FILE};
use crate::storage::read_prices_file;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("--opt requires --plugin")]
    OptionsWithoutPlugin,

    #[error("Import file not found: {0}")]
    MissingImportFile(PathBuf),
}

/// Lifecycle call after which a plugin took over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Run,
    Finish,
}

/// How an import ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// The plugin completed the work and the host stopped
    Handled { plugin: String, stage: Stage },

    /// The host imported the file into the catalog
    Imported { file: PathBuf, records: usize },
}

/// Runs an import, optionally driven by the plugin `plugin_name`
///
/// Plugin options come from the context's environment.
pub fn run_import(
    loader: &PluginLoader,
    ctx: &PluginContext,
    plugin_name: Option<&str>,
) -> Result<ImportOutcome> {
    let options = ctx.env().plugin_options.clone();

    let mut plugin: Option<(String, Box<dyn ImportPlugin>)> = match plugin_name {
        Some(name) => {
            let class = loader.load(name, Capability::ImportPlugin)?;
            let instance = class.instantiate(ctx.clone(), &options)?;
            Some((name.to_lowercase(), instance))
        }
        None if !options.is_empty() => return Err(ImportError::OptionsWithoutPlugin.into()),
        None => None,
    };

    if let Some((name, instance)) = plugin.as_mut() {
        debug!(plugin = %name, "Calling run()");
        let signal = instance
            .run()
            .with_context(|| format!("Plugin '{}' failed during run()", name))?;

        if !signal.should_continue() {
            info!(plugin = %name, "Plugin completed the import in run()");
            return Ok(ImportOutcome::Handled {
                plugin: name.clone(),
                stage: Stage::Run,
            });
        }
    }

    let default_file = plugin
        .as_ref()
        .map(|(_, instance)| instance.default_import_file().to_string())
        .unwrap_or_else(|| DEFAULT_IMPORT_FILE.to_string());
    let file = ctx.env().resolve_import_file(&default_file);

    if !file.is_file() {
        return Err(ImportError::MissingImportFile(file).into());
    }
    debug!(file = %file.display(), "Import file located");

    if let Some((name, instance)) = plugin.as_mut() {
        debug!(plugin = %name, "Calling finish()");
        let signal = instance
            .finish()
            .with_context(|| format!("Plugin '{}' failed during finish()", name))?;

        if !signal.should_continue() {
            info!(plugin = %name, "Plugin completed the import in finish()");
            return Ok(ImportOutcome::Handled {
                plugin: name.clone(),
                stage: Stage::Finish,
            });
        }
    }

    let records = read_prices_file(&file)?;
    let imported = ctx.db().import_records(&records)?;
    info!(file = %file.display(), records = imported, "Imported prices");

    Ok(ImportOutcome::Imported {
        file,
        records: imported,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::TempDir;

    use crate::host::ImportEnv;
    use crate::plugin::{
        ImportPluginType, LifecycleSignal, OptionSchema, ParsedOptions, Plugin, PluginError,
        PluginModule,
    };
    use crate::storage::TradeDb;

    const PRICES: &str = "@ A\nGold 10 12\nTea 3 4\n";

    /// Plugin whose signals are picked with `run=stop` / `finish=stop`
    struct Scripted {
        ctx: PluginContext,
        options: ParsedOptions,
    }

    impl Plugin for Scripted {
        fn run(&mut self) -> anyhow::Result<LifecycleSignal> {
            if let Some(file) = self.options.get_str("redirect") {
                self.ctx.env_mut().import_file = Some(PathBuf::from(file));
            }
            if self.options.get_str("run") == Some("fail") {
                anyhow::bail!("scripted failure");
            }
            Ok((self.options.get_str("run") != Some("stop")).into())
        }

        fn finish(&mut self) -> anyhow::Result<LifecycleSignal> {
            Ok((self.options.get_str("finish") != Some("stop")).into())
        }

        fn options(&self) -> &ParsedOptions {
            &self.options
        }
    }

    impl ImportPlugin for Scripted {
        fn default_import_file(&self) -> &str {
            "scripted.prices"
        }
    }

    impl ImportPluginType for Scripted {
        const NAME: &'static str = "ScriptedImport";
        const DOC: &'static str = "Scripted plugin for tests.";

        fn option_schema() -> OptionSchema {
            OptionSchema::new()
                .with("run", "stop or continue after run()")
                .with("finish", "stop or continue after finish()")
                .with("redirect", "import this file instead")
        }

        fn new(ctx: PluginContext, options: ParsedOptions) -> Self {
            Self { ctx, options }
        }
    }

    fn loader() -> PluginLoader {
        let mut loader = PluginLoader::new();
        loader.register(PluginModule::new("scripted").with_import::<Scripted>());
        loader
    }

    fn context(dir: &TempDir, options: &[&str]) -> PluginContext {
        PluginContext::new(
            TradeDb::open_in_memory().unwrap(),
            ImportEnv::new(dir.path()).with_plugin_options(options.iter().copied()),
        )
    }

    #[test]
    fn import_without_plugin() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("import.prices"), PRICES).unwrap();
        let ctx = context(&dir, &[]);

        let outcome = run_import(&loader(), &ctx, None).unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::Imported {
                file: dir.path().join("import.prices"),
                records: 2,
            }
        );
        assert_eq!(ctx.db().price_count().unwrap(), 2);
    }

    #[test]
    fn options_require_plugin() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, &["run=stop"]);

        let err = run_import(&loader(), &ctx, None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ImportError>(),
            Some(&ImportError::OptionsWithoutPlugin)
        );
    }

    #[test]
    fn run_stop_skips_validation() {
        // No import file exists; the host must not look for one.
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, &["run=stop"]);

        let outcome = run_import(&loader(), &ctx, Some("scripted")).unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::Handled {
                plugin: "scripted".to_string(),
                stage: Stage::Run,
            }
        );
    }

    #[test]
    fn finish_stop_skips_import() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("scripted.prices"), PRICES).unwrap();
        let ctx = context(&dir, &["finish=stop"]);

        let outcome = run_import(&loader(), &ctx, Some("scripted")).unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::Handled {
                plugin: "scripted".to_string(),
                stage: Stage::Finish,
            }
        );
        assert_eq!(ctx.db().price_count().unwrap(), 0);
    }

    #[test]
    fn plugin_default_file_is_used() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("scripted.prices"), PRICES).unwrap();
        let ctx = context(&dir, &[]);

        let outcome = run_import(&loader(), &ctx, Some("scripted")).unwrap();

        assert!(matches!(outcome, ImportOutcome::Imported { records: 2, .. }));
    }

    #[test]
    fn run_can_redirect_import_file() {
        let dir = TempDir::new().unwrap();
        let other = dir.path().join("other.prices");
        fs::write(&other, PRICES).unwrap();
        let redirect = format!("redirect={}", other.display());
        let ctx = context(&dir, &[redirect.as_str()]);

        let outcome = run_import(&loader(), &ctx, Some("scripted")).unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::Imported {
                file: other,
                records: 2,
            }
        );
    }

    #[test]
    fn missing_import_file() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, &[]);

        let err = run_import(&loader(), &ctx, Some("scripted")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImportError>(),
            Some(ImportError::MissingImportFile(_))
        ));
    }

    #[test]
    fn option_errors_abort_before_run() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, &["bogus"]);

        let err = run_import(&loader(), &ctx, Some("scripted")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PluginError>(),
            Some(PluginError::UnknownOption { .. })
        ));
    }

    #[test]
    fn help_is_surfaced_as_plugin_error() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, &["help"]);

        let err = run_import(&loader(), &ctx, Some("scripted")).unwrap_err();
        let plugin_err = err.downcast_ref::<PluginError>().unwrap();

        assert!(plugin_err.is_help());
        assert!(plugin_err.usage().unwrap().contains("--opt=redirect"));
    }

    #[test]
    fn unknown_plugin() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, &[]);

        let err = run_import(&loader(), &ctx, Some("missing")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PluginError>(),
            Some(PluginError::NotFound { .. })
        ));
    }

    #[test]
    fn run_failure_has_context() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, &["run=fail"]);

        let err = run_import(&loader(), &ctx, Some("scripted")).unwrap_err();
        let message = format!("{:#}", err);

        assert!(message.contains("Plugin 'scripted' failed during run()"));
        assert!(message.contains("scripted failure"));
    }
}
