//! The `import` command

use std::path::PathBuf;

use anyhow::Result;

use super::output::Output;
use crate::host::{run_import, ImportEnv, ImportOutcome, Stage};
use crate::plugin::{PluginContext, PluginLoader};
use crate::storage::{Config, TradeDb};

/// Arguments of `tradeplug import`
pub struct ImportArgs {
    pub file: Option<PathBuf>,
    pub plugin: Option<String>,
    pub options: Vec<String>,
    pub quiet: bool,
}

/// Configured options for the plugin first, command-line options after,
/// so a command-line value overrides a configured one.
fn plugin_options(config: &Config, args: &ImportArgs) -> Vec<String> {
    let configured = args
        .plugin
        .as_deref()
        .map(|name| config.plugin_options(name))
        .unwrap_or(&[]);

    configured
        .iter()
        .chain(args.options.iter())
        .cloned()
        .collect()
}

pub fn run(output: &Output, config: &Config, data_dir: PathBuf, args: ImportArgs) -> Result<()> {
    let db = TradeDb::open(&config.db_path(&data_dir))?;

    let mut env = ImportEnv::new(data_dir)
        .with_plugin_options(plugin_options(config, &args))
        .quiet(args.quiet || output.is_json());
    if let Some(file) = &args.file {
        env = env.with_import_file(file);
    }

    let ctx = PluginContext::new(db, env);
    let loader = PluginLoader::with_builtins();
    let outcome = run_import(&loader, &ctx, args.plugin.as_deref())?;

    if output.is_json() {
        output.data(&outcome);
        return Ok(());
    }

    match outcome {
        ImportOutcome::Imported { file, records } => {
            output.success(&format!("Imported {} prices from {}", records, file.display()));
        }
        ImportOutcome::Handled { plugin, stage } if !args.quiet => {
            let step = match stage {
                Stage::Run => "run",
                Stage::Finish => "finish",
            };
            output.success(&format!("Import completed by plugin '{}' ({})", plugin, step));
        }
        ImportOutcome::Handled { .. } => {}
    }

    Ok(())
}
