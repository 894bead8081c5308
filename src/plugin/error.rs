//! Plugin error type
//!
//! Every failure raised by the plugin layer is a [`PluginError`], so hosts can
//! catch plugin problems separately from their own failures.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PluginError {
    /// The plugin declares no options but the caller supplied one
    #[error("This plugin does not support any options.")]
    UnsupportedOption { option: String },

    /// The caller supplied an option that is not in the plugin's schema
    #[error(
        "Unknown plugin option: '{option}'.\n\nValid options for this plugin:\n  {valid}.\n\nUse '--opt=help' for details."
    )]
    UnknownOption { option: String, valid: String },

    /// `help` was supplied; carries the usage text to show instead of running
    #[error("{usage}")]
    HelpRequested { usage: String },

    /// The plugin name does not resolve to a registered module
    #[error("Unable to load plugin '{name}': {reason}")]
    NotFound { name: String, reason: String },

    /// The module exists but does not provide the requested capability
    #[error("{plugin} plugin does not provide a {capability}.")]
    MissingCapability { plugin: String, capability: String },
}

impl PluginError {
    /// Returns true for the informational `help` short-circuit
    pub fn is_help(&self) -> bool {
        matches!(self, PluginError::HelpRequested { .. })
    }

    /// Returns the usage text if this is a help request
    pub fn usage(&self) -> Option<&str> {
        match self {
            PluginError::HelpRequested { usage } => Some(usage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_option_message_lists_valid_names() {
        let err = PluginError::UnknownOption {
            option: "Colour=red".to_string(),
            valid: "file, skip".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Unknown plugin option: 'Colour=red'.\n\n\
             Valid options for this plugin:\n  file, skip.\n\n\
             Use '--opt=help' for details."
        );
    }

    #[test]
    fn help_is_distinguishable() {
        let help = PluginError::HelpRequested {
            usage: "usage text".to_string(),
        };
        let real = PluginError::UnsupportedOption {
            option: "x".to_string(),
        };

        assert!(help.is_help());
        assert_eq!(help.usage(), Some("usage text"));
        assert_eq!(help.to_string(), "usage text");
        assert!(!real.is_help());
        assert_eq!(real.usage(), None);
    }

    #[test]
    fn load_failure_messages() {
        let missing = PluginError::NotFound {
            name: "eddb".to_string(),
            reason: "no such plugin".to_string(),
        };
        assert_eq!(
            missing.to_string(),
            "Unable to load plugin 'eddb': no such plugin"
        );

        let no_cap = PluginError::MissingCapability {
            plugin: "stats".to_string(),
            capability: "ImportPlugin".to_string(),
        };
        assert_eq!(
            no_cap.to_string(),
            "stats plugin does not provide a ImportPlugin."
        );
    }
}
