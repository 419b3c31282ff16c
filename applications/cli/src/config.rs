/// CLI configuration
use crate::error::{CliError, Result};
use clipkit_importer::renamer::{DEFAULT_MAX_LENGTH, DEFAULT_PREFIX};
use clipkit_importer::SmartRenamer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "clipkit.toml";

/// Environment variable prefix, e.g. `CLIPKIT__RENAMER__PREFIX=broll`
pub const ENV_PREFIX: &str = "CLIPKIT";

const MIN_FILENAME_LENGTH: usize = 16;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_renamer")]
    pub renamer: RenamerSettings,

    #[serde(default = "default_import")]
    pub import: ImportSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenamerSettings {
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_max_filename_length")]
    pub max_filename_length: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportSettings {
    /// Update `resources.json` even without `--update-manifest`
    #[serde(default)]
    pub update_manifest: bool,

    /// Verify copies by SHA-256 even without `--verify`
    #[serde(default)]
    pub verify_copy: bool,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `clipkit.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings =
                    settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables (prefixed with CLIPKIT__)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.renamer.prefix.trim().is_empty() {
            return Err(CliError::Config(
                "renamer.prefix must not be empty".to_string(),
            ));
        }

        if self.renamer.max_filename_length < MIN_FILENAME_LENGTH {
            return Err(CliError::Config(format!(
                "renamer.max_filename_length must be at least {}",
                MIN_FILENAME_LENGTH
            )));
        }

        Ok(())
    }

    /// Build the renamer described by this configuration
    pub fn renamer(&self) -> SmartRenamer {
        SmartRenamer::new()
            .with_prefix(self.renamer.prefix.clone())
            .with_max_length(self.renamer.max_filename_length)
    }
}

// Default values
fn default_renamer() -> RenamerSettings {
    RenamerSettings {
        prefix: default_prefix(),
        max_filename_length: default_max_filename_length(),
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_max_filename_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_import() -> ImportSettings {
    ImportSettings {
        update_manifest: false,
        verify_copy: false,
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            renamer: default_renamer(),
            import: default_import(),
        }
    }
}
