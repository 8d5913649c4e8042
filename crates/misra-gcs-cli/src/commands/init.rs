//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# misra-gcs configuration

# Static analysis tool: "PC-Lint" or "Cppcheck"
tool = "PC-Lint"

# MISRA version: "1998", "2004", "2012" or "C++"
misra_version = "2012"

# Directory holding the reference document for the MISRA version
# (au-misra1.lnt, au-misra2.lnt, au-misra3.lnt or au-misra-cpp.lnt)
# references = "lint"

# Shown in the compliance report
# project_name = "My project"
# software_version = "1.0.0"

[inputs]
# Analyzer output, one warning per line
warnings = "lint-output.txt"

# Source files to scan for suppression comments, one path or glob per line
sources = "sources.txt"

# Guideline recategorization plan: "<guideline id>, <category>" per line
# grp = "grp.txt"

# Audit log of every suppression comment
# log_file = "misra-audit.log"

# Annotation tag patterns (regular expressions). Defaults shown.
[tags]
# guideline = '\bGUIDELINE\(([^\)]*)\)'
# non_misra = '\bNON.?MISRA'
# false_positive = '\bFALSE.?POSITIVE(?:\(([^\)]*)\))?'
# deviation = '\bDEVIATION\(\s*([^,\(\)]*?)\s*(?:\)|,\s*([^,\(\)]*?)\s*(?:\)|,\s*([^\(\)]*?)\s*\)))'

[policy]
# Fail when errors occur during processing
fail_on_error = true

# Fail when required or mandatory guidelines have violations
fail_on_noncompliance = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_default(Path::new("misra-gcs.toml"), force)?;

    println!("Created misra-gcs.toml");
    println!("\nNext steps:");
    println!("  1. Edit misra-gcs.toml to point at your analyzer output and sources");
    println!("  2. Run: misra-gcs check");

    Ok(())
}

fn write_default(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use misra_gcs_core::{
        Config, MisraVersion, TagPatterns, DEFAULT_DEVIATION_PATTERN,
        DEFAULT_FALSE_POSITIVE_PATTERN, DEFAULT_GUIDELINE_PATTERN, DEFAULT_NON_MISRA_PATTERN,
    };
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.tool.as_deref(), Some("PC-Lint"));
        assert_eq!(config.version(), MisraVersion::C2012);
        assert!(config.policy.fail_on_error);
        assert!(TagPatterns::compile(&config.tags).is_ok());
    }

    #[test]
    fn documented_tag_patterns_are_the_defaults() {
        let uncommented: String = DEFAULT_CONFIG
            .lines()
            .map(|line| line.strip_prefix("# ").filter(|l| l.contains(" = '")).unwrap_or(line))
            .map(|line| format!("{line}\n"))
            .collect();
        let config = Config::parse(&uncommented).unwrap();

        assert_eq!(config.tags.guideline.as_deref(), Some(DEFAULT_GUIDELINE_PATTERN));
        assert_eq!(config.tags.non_misra.as_deref(), Some(DEFAULT_NON_MISRA_PATTERN));
        assert_eq!(
            config.tags.false_positive.as_deref(),
            Some(DEFAULT_FALSE_POSITIVE_PATTERN)
        );
        assert_eq!(config.tags.deviation.as_deref(), Some(DEFAULT_DEVIATION_PATTERN));
        assert!(TagPatterns::compile(&config.tags).is_ok());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("misra-gcs.toml");
        std::fs::write(&path, "tool = \"Cppcheck\"\n").unwrap();

        assert!(write_default(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "tool = \"Cppcheck\"\n");

        write_default(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
