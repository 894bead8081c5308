//! Import environment shared with plugins

use std::path::PathBuf;

/// Settings for one import run
///
/// Plugins may adjust these from `run()`, e.g. to point the host at a
/// different import file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportEnv {
    /// Directory holding the catalog and default import files
    pub data_dir: PathBuf,

    /// Explicit file to import; the plugin's default file is used otherwise
    pub import_file: Option<PathBuf>,

    /// Raw `key[=value]` plugin options, in the order given
    pub plugin_options: Vec<String>,

    /// Suppress informational output from plugins
    pub quiet: bool,
}

impl ImportEnv {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_import_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.import_file = Some(file.into());
        self
    }

    pub fn with_plugin_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plugin_options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// File the host will import: the explicit file, or `default_name`
    /// inside the data directory
    pub fn resolve_import_file(&self, default_name: &str) -> PathBuf {
        self.import_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(default_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_default_file_in_data_dir() {
        let env = ImportEnv::new("/data");

        assert_eq!(
            env.resolve_import_file("custom.prices"),
            PathBuf::from("/data/custom.prices")
        );
    }

    #[test]
    fn explicit_file_wins() {
        let env = ImportEnv::new("/data").with_import_file("/elsewhere/x.prices");

        assert_eq!(
            env.resolve_import_file("custom.prices"),
            PathBuf::from("/elsewhere/x.prices")
        );
    }

    #[test]
    fn builder_collects_options() {
        let env = ImportEnv::new("/data")
            .with_plugin_options(["a=1", "b"])
            .quiet(true);

        assert_eq!(env.plugin_options, vec!["a=1".to_string(), "b".to_string()]);
        assert!(env.quiet);
    }
}
