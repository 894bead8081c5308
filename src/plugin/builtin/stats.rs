//! `stats` import plugin

use anyhow::Result;
use tracing::info;

use crate::plugin::{
    ImportPlugin, ImportPluginType, LifecycleSignal, ParsedOptions, Plugin, PluginContext,
};

/// Reports catalog contents and ends the import
pub struct StatsImport {
    ctx: PluginContext,
    options: ParsedOptions,
}

impl Plugin for StatsImport {
    fn run(&mut self) -> Result<LifecycleSignal> {
        let db = self.ctx.db();
        let prices = db.price_count()?;
        let stations = db.station_count()?;

        info!(prices, stations, "Catalog summary");
        if !self.ctx.env().quiet {
            println!("{} prices across {} stations", prices, stations);
        }

        Ok(LifecycleSignal::PluginHandledEverything)
    }

    // Not reached by the import command since run() always ends it.
    fn finish(&mut self) -> Result<LifecycleSignal> {
        Ok(LifecycleSignal::ContinueHostWorkflow)
    }

    fn options(&self) -> &ParsedOptions {
        &self.options
    }
}

impl ImportPlugin for StatsImport {}

impl ImportPluginType for StatsImport {
    const NAME: &'static str = "StatsImport";
    const DOC: &'static str = "Reports how many prices and stations the catalog holds, \
        then stops without importing anything.";

    fn new(ctx: PluginContext, options: ParsedOptions) -> Self {
        Self { ctx, options }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ImportEnv;
    use crate::plugin::{Capability, PluginError, PluginLoader};
    use crate::storage::{PriceRecord, TradeDb};

    fn context() -> PluginContext {
        let db = TradeDb::open_in_memory().unwrap();
        db.import_records(&[PriceRecord {
            station: "A".to_string(),
            item: "Gold".to_string(),
            sell: 1,
            buy: 2,
        }])
        .unwrap();
        PluginContext::new(db, ImportEnv::new("/data").quiet(true))
    }

    #[test]
    fn run_handles_everything() {
        let loader = PluginLoader::with_builtins();
        let class = loader.load("stats", Capability::ImportPlugin).unwrap();
        let raw: [&str; 0] = [];
        let mut plugin = class.instantiate(context(), &raw).unwrap();

        assert_eq!(
            plugin.run().unwrap(),
            LifecycleSignal::PluginHandledEverything
        );
    }

    #[test]
    fn accepts_no_options() {
        let loader = PluginLoader::with_builtins();
        let class = loader.load("stats", Capability::ImportPlugin).unwrap();
        let err = class.instantiate(context(), &["verbose"]).err().unwrap();

        assert!(matches!(err, PluginError::UnsupportedOption { .. }));
        assert!(class
            .usage()
            .contains("This plugin does not support any options."));
    }
}
