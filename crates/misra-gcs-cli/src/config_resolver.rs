//! Locates and loads `misra-gcs.toml` for a check run.
//!
//! Lookup order is the `--config` flag, then the workspace (`misra-gcs.toml`
//! before `.misra-gcs.toml`), then `config.toml` in the shared directory
//! (`$MISRA_GCS_CONFIG_DIR`, else `~/.misra-gcs`). Without a file the
//! defaults apply.

use anyhow::{Context, Result};
use misra_gcs_core::Config;
use std::path::{Path, PathBuf};

const WORKSPACE_CONFIG_NAMES: &[&str] = &["misra-gcs.toml", ".misra-gcs.toml"];
const SHARED_CONFIG_NAME: &str = "config.toml";

/// Loads the configuration that applies to `workspace`.
///
/// # Errors
///
/// Returns an error if the selected file cannot be read or parsed. An
/// explicit path that does not exist is an error rather than a fallback.
pub fn load_config(workspace: &Path, explicit: Option<&Path>) -> Result<Config> {
    let shared_dir = shared_config_dir();
    load_from(locate(workspace, explicit, shared_dir.as_deref()))
}

fn shared_config_dir() -> Option<PathBuf> {
    match std::env::var_os("MISRA_GCS_CONFIG_DIR") {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|home| home.join(".misra-gcs")),
    }
}

fn locate(workspace: &Path, explicit: Option<&Path>, shared_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    WORKSPACE_CONFIG_NAMES
        .iter()
        .map(|name| workspace.join(name))
        .chain(shared_dir.map(|dir| dir.join(SHARED_CONFIG_NAME)))
        .find(|candidate| candidate.is_file())
}

fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No misra-gcs.toml found, using defaults");
        return Ok(Config::default());
    };
    tracing::debug!("Using config {}", path.display());
    Config::from_file(&path).with_context(|| format!("Failed to load config: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use misra_gcs_core::MisraVersion;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn flag_path_is_used_even_when_workspace_has_a_config() {
        let workspace = TempDir::new().unwrap();
        fs::write(workspace.path().join("misra-gcs.toml"), "").unwrap();
        let flag = workspace.path().join("ci/misra.toml");

        let found = locate(workspace.path(), Some(&flag), None);
        assert_eq!(found, Some(flag));
    }

    #[test]
    fn plain_name_shadows_hidden_name() {
        let workspace = TempDir::new().unwrap();
        fs::write(workspace.path().join(".misra-gcs.toml"), "").unwrap();
        assert_eq!(
            locate(workspace.path(), None, None),
            Some(workspace.path().join(".misra-gcs.toml"))
        );

        fs::write(workspace.path().join("misra-gcs.toml"), "").unwrap();
        assert_eq!(
            locate(workspace.path(), None, None),
            Some(workspace.path().join("misra-gcs.toml"))
        );
    }

    #[test]
    fn shared_dir_only_consulted_without_workspace_config() {
        let workspace = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        fs::write(shared.path().join("config.toml"), "").unwrap();

        assert_eq!(
            locate(workspace.path(), None, Some(shared.path())),
            Some(shared.path().join("config.toml"))
        );

        fs::write(workspace.path().join(".misra-gcs.toml"), "").unwrap();
        assert_eq!(
            locate(workspace.path(), None, Some(shared.path())),
            Some(workspace.path().join(".misra-gcs.toml"))
        );
    }

    #[test]
    fn empty_shared_dir_means_defaults() {
        let workspace = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        assert_eq!(locate(workspace.path(), None, Some(shared.path())), None);

        let config = load_from(None).unwrap();
        assert_eq!(config.version(), MisraVersion::C2012);
        assert!(config.tool.is_none());
    }

    #[test]
    fn located_file_is_parsed() {
        let workspace = TempDir::new().unwrap();
        fs::write(
            workspace.path().join("misra-gcs.toml"),
            "tool = \"Cppcheck\"\nmisra_version = \"2004\"\n",
        )
        .unwrap();

        let config = load_from(locate(workspace.path(), None, None)).unwrap();
        assert_eq!(config.tool.as_deref(), Some("Cppcheck"));
        assert_eq!(config.version(), MisraVersion::C2004);
    }

    #[test]
    fn missing_flag_path_is_an_error() {
        let workspace = TempDir::new().unwrap();
        let flag = workspace.path().join("absent.toml");

        let err = load_config(workspace.path(), Some(&flag)).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
