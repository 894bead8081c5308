//! tradeplug - plugin-driven price imports

use std::process::ExitCode;

use tradeplug::PluginError;

fn main() -> ExitCode {
    match tradeplug::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // `--opt=help` ends the command with the plugin's usage, not an error
            if let Some(usage) = e.downcast_ref::<PluginError>().and_then(PluginError::usage) {
                print!("{}", usage);
                return ExitCode::SUCCESS;
            }

            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
