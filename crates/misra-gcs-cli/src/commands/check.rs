//! Check command implementation.

use anyhow::{anyhow, Context, Result};
use misra_gcs_adapters::find_adapter;
use misra_gcs_core::{
    ComplianceEngine, Config, DirectoryReferenceProvider, ErrorCode, PolicyConfig, TagPatterns,
    WorkspaceSources,
};
use std::path::{Path, PathBuf};

use super::inputs::{read_lines, source_files, workspace_path};
use crate::OutputFormat;

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Tool adapter name.
    pub tool: Option<String>,
    /// MISRA version selector.
    pub misra_version: Option<String>,
    /// Warnings file.
    pub warnings: Option<PathBuf>,
    /// Source list file.
    pub sources: Option<PathBuf>,
    /// GRP file.
    pub grp: Option<PathBuf>,
    /// Audit log file.
    pub log_file: Option<PathBuf>,
    /// Reference document directory.
    pub references: Option<PathBuf>,
    /// Fail on accumulated errors.
    pub fail_on_error: Option<bool>,
    /// Fail on non-compliance.
    pub fail_on_noncompliance: Option<bool>,
}

impl Overrides {
    /// Applies the set values on top of `config`.
    #[must_use]
    pub fn apply(self, mut config: Config) -> Config {
        config.tool = self.tool.or(config.tool);
        config.misra_version = self.misra_version.or(config.misra_version);
        config.references = self.references.or(config.references);
        config.inputs.warnings = self.warnings.or(config.inputs.warnings);
        config.inputs.sources = self.sources.or(config.inputs.sources);
        config.inputs.grp = self.grp.or(config.inputs.grp);
        config.inputs.log_file = self.log_file.or(config.inputs.log_file);
        if let Some(fail) = self.fail_on_error {
            config.policy.fail_on_error = fail;
        }
        if let Some(fail) = self.fail_on_noncompliance {
            config.policy.fail_on_noncompliance = fail;
        }
        config
    }
}

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    overrides: Overrides,
    config: Config,
) -> Result<()> {
    let config = overrides.apply(config);

    let engine = execute(path, &config)?;

    let report = engine.report(config.project_name.clone(), config.software_version.clone());
    super::output::print(&report, engine.errors(), format)?;

    if should_fail(config.policy, engine.error_code(), engine.is_compliant()) {
        std::process::exit(1);
    }

    Ok(())
}

/// Runs a compliance check of the workspace at `root`.
///
/// # Errors
///
/// Returns an error if the tool is unknown, an input list file cannot be
/// read, or the engine cannot be built. Problems found while checking are
/// accumulated in the returned engine instead.
pub fn execute(root: &Path, config: &Config) -> Result<ComplianceEngine> {
    let tool = config
        .tool
        .as_deref()
        .context("No tool configured. Use --tool or set `tool` in misra-gcs.toml")?;
    let adapter = find_adapter(tool)
        .with_context(|| format!("Unknown tool \"{tool}\". Run `misra-gcs list-tools`"))?;

    let warnings = optional_lines(root, config.inputs.warnings.as_deref())?;
    let grp = optional_lines(root, config.inputs.grp.as_deref())?;
    let sources = optional_lines(root, config.inputs.sources.as_deref())?;
    let files = source_files(root, &sources);

    let patterns = TagPatterns::compile(&config.tags).context("Invalid annotation tag")?;
    let references_dir = config
        .references
        .as_deref()
        .map_or_else(|| root.to_path_buf(), |dir| workspace_path(root, dir));
    let references = DirectoryReferenceProvider::new(references_dir);

    let mut engine = ComplianceEngine::builder()
        .adapter_box(adapter)
        .version(config.version())
        .references(&references)
        .patterns(patterns)
        .build()
        .map_err(|e| anyhow!("{:?}", miette::Report::new(e)))?;

    tracing::info!(
        "Checking {} with {} against {}",
        root.display(),
        engine.tool_name(),
        engine.version()
    );

    engine.apply_grp(grp);
    engine.ingest_warnings(warnings);
    engine.ingest_source_files(files, &WorkspaceSources::new(root));

    if let Some(log_file) = &config.inputs.log_file {
        engine.write_audit_log_to_path(&workspace_path(root, log_file));
    }

    Ok(engine)
}

fn optional_lines(root: &Path, path: Option<&Path>) -> Result<Vec<String>> {
    path.map_or_else(|| Ok(Vec::new()), |p| read_lines(root, p))
}

/// Whether the run should fail the build.
#[must_use]
pub fn should_fail(policy: PolicyConfig, error_code: ErrorCode, compliant: bool) -> bool {
    (policy.fail_on_error && !error_code.is_empty())
        || (policy.fail_on_noncompliance && !compliant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use misra_gcs_core::{ComplianceStatus, Guideline};
    use std::fs;
    use tempfile::TempDir;

    const REFERENCE: &str = "\
/*** Rule 10.4 (req) *******/
-append(9029,[MISRA 2012 Rule 10.4, required])
/*** Rule 15.5 (adv) *******/
-append(904,[MISRA 2012 Rule 15.5, advisory])
/*** Rule 17.7 (req) *******/
-append(534,[MISRA 2012 Rule 17.7, required])
";

    fn workspace() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("lint")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("lint/au-misra3.lnt"), REFERENCE).unwrap();
        fs::write(
            root.join("src/main.c"),
            "int f(int a, unsigned b)\n{\n    return a + b; //lint -e9029 DEVIATION(DEV-1)\n}\n",
        )
        .unwrap();
        fs::write(
            root.join("warnings.txt"),
            format!(
                "{}(7): Note 904: Return statement before end of function [MISRA 2012 Rule 15.5, advisory]\n",
                root.join("src/main.c").display()
            ),
        )
        .unwrap();
        fs::write(root.join("sources.txt"), "src/*.c\n").unwrap();
        tmp
    }

    fn config() -> Config {
        Overrides {
            tool: Some("pclint".into()),
            references: Some("lint".into()),
            warnings: Some("warnings.txt".into()),
            sources: Some("sources.txt".into()),
            log_file: Some("audit.log".into()),
            ..Overrides::default()
        }
        .apply(Config::default())
    }

    fn status(engine: &ComplianceEngine, id: &str) -> Option<ComplianceStatus> {
        engine.catalog().get(id).map(Guideline::status)
    }

    #[test]
    fn overrides_take_precedence() {
        let file = Config::parse(
            "tool = \"Cppcheck\"\nmisra_version = \"2004\"\n[inputs]\ngrp = \"grp.txt\"\n[policy]\nfail_on_error = false\n",
        )
        .unwrap();
        let config = Overrides {
            tool: Some("PC-Lint".into()),
            fail_on_noncompliance: Some(true),
            ..Overrides::default()
        }
        .apply(file);

        assert_eq!(config.tool.as_deref(), Some("PC-Lint"));
        assert_eq!(config.misra_version.as_deref(), Some("2004"));
        assert_eq!(config.inputs.grp.as_deref(), Some(Path::new("grp.txt")));
        assert!(!config.policy.fail_on_error);
        assert!(config.policy.fail_on_noncompliance);
    }

    #[test]
    fn full_check_of_workspace() {
        let tmp = workspace();
        let engine = execute(tmp.path(), &config()).unwrap();

        assert_eq!(engine.tool_name(), "PC-Lint");
        assert_eq!(status(&engine, "Rule 10.4"), Some(ComplianceStatus::Deviations));
        assert_eq!(status(&engine, "Rule 15.5"), Some(ComplianceStatus::Violations));
        assert_eq!(status(&engine, "Rule 17.7"), Some(ComplianceStatus::Compliant));
        assert!(engine.error_code().is_empty());
        assert!(engine.is_compliant());

        let log = fs::read_to_string(tmp.path().join("audit.log")).unwrap();
        assert_eq!(log, "src/main.c:3: info: Deviation of Rule 10.4 (Required)\n");
    }

    #[test]
    fn unknown_tool_is_fatal() {
        let tmp = workspace();
        let config = Overrides {
            tool: Some("splint".into()),
            ..Overrides::default()
        }
        .apply(config());
        let err = execute(tmp.path(), &config).err().unwrap();
        assert!(err.to_string().contains("Unknown tool \"splint\""));
    }

    #[test]
    fn unreadable_input_list_is_fatal() {
        let tmp = workspace();
        let config = Overrides {
            grp: Some("missing-grp.txt".into()),
            ..Overrides::default()
        }
        .apply(config());
        let err = execute(tmp.path(), &config).err().unwrap();
        assert!(err.to_string().contains("missing-grp.txt"));
    }

    #[test]
    fn unsupported_version_is_fatal() {
        let tmp = workspace();
        let config = Overrides {
            tool: Some("cppcheck".into()),
            misra_version: Some("2004".into()),
            ..Overrides::default()
        }
        .apply(config());
        let err = execute(tmp.path(), &config).err().unwrap();
        assert!(err.to_string().contains("Cppcheck does not support MISRA C 2004"));
    }

    #[test]
    fn missing_reference_document_is_fatal() {
        let tmp = workspace();
        let config = Overrides {
            misra_version: Some("C++".into()),
            ..Overrides::default()
        }
        .apply(config());
        assert!(execute(tmp.path(), &config).is_err());
    }

    #[test]
    fn policy_decides_failure() {
        let default = PolicyConfig::default();
        let strict = PolicyConfig {
            fail_on_error: true,
            fail_on_noncompliance: true,
        };
        let lenient = PolicyConfig {
            fail_on_error: false,
            fail_on_noncompliance: false,
        };

        assert!(!should_fail(default, ErrorCode::NONE, false));
        assert!(should_fail(default, ErrorCode::FILE_READ_ERROR, true));
        assert!(should_fail(strict, ErrorCode::NONE, false));
        assert!(!should_fail(strict, ErrorCode::NONE, true));
        assert!(!should_fail(lenient, ErrorCode::GRP_ERROR, false));
    }
}
