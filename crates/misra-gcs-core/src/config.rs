//! Configuration types for misra-gcs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::MisraVersion;

/// Top-level configuration for a compliance run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Name of the tool adapter (e.g., "PC-Lint", "Cppcheck").
    #[serde(default)]
    pub tool: Option<String>,

    /// MISRA version selector (e.g., "2012", "2004", "1998", "C++").
    #[serde(default)]
    pub misra_version: Option<String>,

    /// Directory holding the per-version reference documents.
    #[serde(default)]
    pub references: Option<PathBuf>,

    /// Project name shown in the compliance report.
    #[serde(default)]
    pub project_name: Option<String>,

    /// Software version shown in the compliance report.
    #[serde(default)]
    pub software_version: Option<String>,

    /// Input and output files.
    #[serde(default)]
    pub inputs: InputsConfig,

    /// Annotation tag pattern overrides.
    #[serde(default)]
    pub tags: TagConfig,

    /// Build pass/fail policy.
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// The selected MISRA version, defaulting to MISRA C:2012.
    #[must_use]
    pub fn version(&self) -> MisraVersion {
        self.misra_version
            .as_deref()
            .map_or_else(MisraVersion::default, MisraVersion::from_token)
    }
}

/// Paths of the run's input and output files, relative to the workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Analyzer output, one warning per line.
    #[serde(default)]
    pub warnings: Option<PathBuf>,

    /// List of source files to scan for suppression comments.
    #[serde(default)]
    pub sources: Option<PathBuf>,

    /// Guideline recategorization plan.
    #[serde(default)]
    pub grp: Option<PathBuf>,

    /// Audit log to write.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Overrides for the annotation tag patterns. Unset entries use the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConfig {
    /// Pattern for `GUIDELINE(<id>)`.
    #[serde(default)]
    pub guideline: Option<String>,

    /// Pattern for `NONMISRA`.
    #[serde(default)]
    pub non_misra: Option<String>,

    /// Pattern for `FALSE_POSITIVE[(<id>)]`.
    #[serde(default)]
    pub false_positive: Option<String>,

    /// Pattern for `DEVIATION(<reference>[, <link>[, <id>]])`.
    #[serde(default)]
    pub deviation: Option<String>,
}

/// When the host build should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Fail when any error was accumulated.
    #[serde(default = "default_true")]
    pub fail_on_error: bool,

    /// Fail when the code is not compliant.
    #[serde(default)]
    pub fail_on_noncompliance: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            fail_on_error: true,
            fail_on_noncompliance: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A tag pattern override is not a valid regex.
    #[error("Invalid {tag} tag pattern: {message}")]
    Pattern {
        /// Tag family name.
        tag: String,
        /// Regex error message.
        message: String,
    },
}
