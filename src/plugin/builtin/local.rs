//! `local` import plugin

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::plugin::{
    ImportPlugin, ImportPluginType, LifecycleSignal, OptionSchema, OptionValue, ParsedOptions,
    Plugin, PluginContext,
};
use crate::storage::read_prices_file;

/// Imports a `.prices` file from a local path
pub struct LocalImport {
    ctx: PluginContext,
    options: ParsedOptions,
}

impl LocalImport {
    /// Path given with `file=...`, if any
    fn source_file(&self) -> Result<Option<PathBuf>> {
        match self.options.get("file") {
            None => Ok(None),
            Some(OptionValue::Flag) => bail!("Option 'file' needs a path, e.g. --opt=file=today.prices"),
            Some(OptionValue::Value(path)) if path.is_empty() => {
                bail!("Option 'file' needs a path, e.g. --opt=file=today.prices")
            }
            Some(OptionValue::Value(path)) => Ok(Some(PathBuf::from(path))),
        }
    }

    /// True if both paths name the same existing file, however spelled
    fn same_file(from: &Path, to: &Path) -> Result<bool> {
        if from == to {
            return Ok(true);
        }
        if !to.exists() {
            return Ok(false);
        }

        let from = fs::canonicalize(from)
            .with_context(|| format!("Failed to resolve {}", from.display()))?;
        let to = fs::canonicalize(to)
            .with_context(|| format!("Failed to resolve {}", to.display()))?;
        Ok(from == to)
    }

    fn say(&self, message: &str) {
        if !self.ctx.env().quiet {
            println!("{}", message);
        }
    }
}

impl Plugin for LocalImport {
    fn run(&mut self) -> Result<LifecycleSignal> {
        let source = self.source_file()?;

        if let Some(file) = &source {
            if !file.is_file() {
                bail!("Source file not found: {}", file.display());
            }
        }

        if self.has_option("copy") {
            let from = match source {
                Some(file) => file,
                None => self.ctx.env().resolve_import_file(self.default_import_file()),
            };
            let data_dir = self.ctx.env().data_dir.clone();
            let to = data_dir.join(self.default_import_file());

            if Self::same_file(&from, &to)? {
                debug!(file = %to.display(), "Import file already in data directory");
            } else {
                fs::create_dir_all(&data_dir).with_context(|| {
                    format!("Failed to create data directory: {}", data_dir.display())
                })?;
                fs::copy(&from, &to).with_context(|| {
                    format!("Failed to copy {} to {}", from.display(), to.display())
                })?;
                debug!(from = %from.display(), to = %to.display(), "Copied import file");
            }

            self.ctx.env_mut().import_file = Some(to);
        } else if let Some(file) = source {
            self.ctx.env_mut().import_file = Some(file);
        }

        Ok(LifecycleSignal::ContinueHostWorkflow)
    }

    fn finish(&mut self) -> Result<LifecycleSignal> {
        if !self.has_option("skip") {
            return Ok(LifecycleSignal::ContinueHostWorkflow);
        }

        let file = self.ctx.env().resolve_import_file(self.default_import_file());
        let records = read_prices_file(&file)?;
        info!(file = %file.display(), records = records.len(), "Validated import file, skipping import");
        self.say(&format!(
            "{}: {} price records, import skipped",
            file.display(),
            records.len()
        ));

        Ok(LifecycleSignal::PluginHandledEverything)
    }

    fn options(&self) -> &ParsedOptions {
        &self.options
    }
}

impl ImportPlugin for LocalImport {}

impl ImportPluginType for LocalImport {
    const NAME: &'static str = "LocalImport";
    const DOC: &'static str = "Imports price data from a local .prices file. \
        By default the file named on the command line, or import.prices in the \
        data directory, is imported into the catalog.";

    fn option_schema() -> OptionSchema {
        OptionSchema::new()
            .with("file", "Path of the .prices file to import instead of the default.")
            .with(
                "copy",
                "Copy the source file into the data directory as import.prices before \
                 importing, keeping a copy of the last import.",
            )
            .with("skip", "Check the file parses but do not import anything.")
    }

    fn new(ctx: PluginContext, options: ParsedOptions) -> Self {
        Self { ctx, options }
    }
}
