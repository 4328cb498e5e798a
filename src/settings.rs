//! Runtime settings for discovery and reporting.

use testup_core::{SOURCE_EXTENSION, TEST_FILE_PREFIX, is_test_source};

/// Which files inside a suite root are test sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Required base name prefix
    pub file_prefix: String,
    /// Required extension, without the dot
    pub source_extension: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            file_prefix: TEST_FILE_PREFIX.to_string(),
            source_extension: SOURCE_EXTENSION.to_string(),
        }
    }
}

impl DiscoveryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the required file name prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Set the required source extension (a leading dot is ignored)
    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.source_extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Whether a file name names a test source under this configuration.
    pub fn matches(&self, file_name: &str) -> bool {
        is_test_source(file_name, &self.file_prefix, &self.source_extension)
    }
}

/// Process-wide TestUp settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Run inside the host GUI: console reporters are replaced by the TestUp reporter
    pub run_in_gui: bool,
    /// Print one line per test instead of progress dots (console mode only)
    pub verbose: bool,
    pub discovery: DiscoveryConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run_in_gui(mut self, run_in_gui: bool) -> Self {
        self.run_in_gui = run_in_gui;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.discovery = discovery;
        self
    }
}
