//! Plugin inspection commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::plugin::{Capability, PluginLoader};

#[derive(Subcommand)]
pub enum PluginCommands {
    /// List available plugins
    List,

    /// Show a plugin's description and options
    Options {
        /// Plugin name
        name: String,
    },
}

pub fn run(cmd: PluginCommands, output: &Output) -> Result<()> {
    let loader = PluginLoader::with_builtins();

    match cmd {
        PluginCommands::List => list_plugins(&loader, output),
        PluginCommands::Options { name } => show_options(&loader, output, &name),
    }
}

fn list_plugins(loader: &PluginLoader, output: &Output) -> Result<()> {
    let modules = loader.list();

    if output.is_json() {
        let items: Vec<_> = modules
            .iter()
            .map(|m| {
                serde_json::json!({
                    "name": m.name(),
                    "capabilities": m.capabilities().collect::<Vec<_>>(),
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    if modules.is_empty() {
        println!("No plugins registered.");
        return Ok(());
    }

    println!("Available plugins:");
    println!("{:<16} {:<16} {}", "NAME", "CAPABILITY", "CLASS");
    println!("{}", "-".repeat(50));
    for module in modules {
        for capability in module.capabilities() {
            let class = module.class(capability).map(|c| c.name()).unwrap_or("-");
            println!("{:<16} {:<16} {}", module.name(), capability, class);
        }
    }

    Ok(())
}

fn show_options(loader: &PluginLoader, output: &Output, name: &str) -> Result<()> {
    let class = loader.load(name, Capability::ImportPlugin)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": name.to_lowercase(),
            "class": class.name(),
            "description": class.doc(),
            "options": class.schema(),
            "usage": class.usage(),
        }));
    } else {
        output.text(&class.usage());
    }

    Ok(())
}
