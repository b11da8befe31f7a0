//! Program settings, read from `settings.toml` in the user's config directory.
use crate::get_retrofit_config_dir;
use crate::input::read_toml;
use crate::log::{DEFAULT_LOG_LEVEL, parse_log_level};
use anyhow::{Context, Result, ensure};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// If this environment variable is set, the settings file is ignored
const USE_DEFAULT_SETTINGS_ENV_VAR: &str = "RETROFIT_USE_DEFAULT_SETTINGS";

/// Where results are written, relative to the working directory, unless configured otherwise
const DEFAULT_RESULTS_ROOT: &str = "retrofit_results";

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    get_retrofit_config_dir().join(SETTINGS_FILE_NAME)
}

/// Program settings from config file
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Log level used unless RETROFIT_LOG_LEVEL is set (off, error, warn, info, debug or trace)
    pub log_level: String,
    /// Whether existing results for a project may be overwritten without passing --overwrite
    pub overwrite: bool,
    /// Directory under which a results folder is created for each project
    pub results_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            overwrite: false,
            results_root: PathBuf::from(DEFAULT_RESULTS_ROOT),
        }
    }
}

impl Settings {
    /// Load the program settings.
    ///
    /// Defaults are used if there is no settings file or if `RETROFIT_USE_DEFAULT_SETTINGS` is
    /// set.
    pub fn load() -> Result<Self> {
        if env::var_os(USE_DEFAULT_SETTINGS_ENV_VAR).is_some() {
            return Ok(Self::default());
        }

        let file_path = get_settings_file_path();
        if !file_path.is_file() {
            return Ok(Self::default());
        }

        Self::from_file(&file_path)
    }

    /// Read settings from a file and check them
    fn from_file(file_path: &Path) -> Result<Self> {
        let settings: Self = read_toml(file_path)?;
        settings
            .check_valid()
            .with_context(|| format!("Invalid settings in {}", file_path.display()))?;

        Ok(settings)
    }

    /// Check that the log level is recognised and that there is somewhere to put results
    fn check_valid(&self) -> Result<()> {
        parse_log_level(&self.log_level)?;
        ensure!(
            !self.results_root.as_os_str().is_empty(),
            "results_root cannot be empty"
        );

        Ok(())
    }

    /// A settings file listing every option with its documentation and default value.
    ///
    /// The options are commented out, so the file behaves like an empty one until edited.
    pub fn default_file_contents() -> Result<String> {
        let raw = toml::to_string(&Self::default()).context("Could not convert settings to TOML")?;
        let table: toml::Table = toml::from_str(&raw)?;

        let mut out = format!(
            "# Settings for retrofit v{}.\n# Uncomment an option to change it from its default.\n",
            env!("CARGO_PKG_VERSION")
        );
        for (field, value) in &table {
            let docs = Self::get_field_docs(field)
                .with_context(|| format!("Missing doc comment for setting {field}"))?;
            writeln!(out)?;
            for line in docs.lines() {
                writeln!(out, "# # {}", line.trim())?;
            }
            writeln!(out, "# {field} = {value}")?;
        }

        Ok(out)
    }
}
