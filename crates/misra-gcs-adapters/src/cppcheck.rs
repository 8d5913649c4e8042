//! Adapter for Cppcheck with the MISRA addon.
//!
//! # Warning Lines
//!
//! ```text
//! [Drivers/drvMCU.c:36]: (style) misra violation [misra-c2012-15.6]
//! ```
//!
//! # Suppression Comments
//!
//! `// cppcheck-suppress misra-c2012-15.6` or the block form. Cppcheck
//! suppresses at most one guideline per comment.

use std::sync::LazyLock;

use misra_gcs_core::{MisraVersion, ToolAdapter, Violation};
use regex::Regex;

/// Tool name.
pub const NAME: &str = "Cppcheck";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| unreachable!("Cppcheck pattern is valid: {e}"))
}

static WARNING_LINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\[([^:]*):(\d+)\][^\[]*\[misra-c2012-(\d+.\d+)\]"));

static COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?mR)//(\s*cppcheck-suppress\s[^\n]*)$|(?s:/\*(\s*cppcheck-suppress\s.*?)\*/)")
});

static GUIDELINE: LazyLock<Regex> = LazyLock::new(|| compile(r"misra-c2012-(\d+\.\d+)"));

/// Cppcheck adapter. The MISRA addon only checks MISRA C:2012.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cppcheck;

impl Cppcheck {
    /// Creates the adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ToolAdapter for Cppcheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn supported_versions(&self) -> &'static [MisraVersion] {
        &[MisraVersion::C2012]
    }

    fn parse_warning_line(&self, line: &str) -> Vec<Violation> {
        WARNING_LINE
            .captures(line)
            .map(|caps| {
                Violation::new(
                    &caps[1],
                    caps[2].parse().unwrap_or(0),
                    format!("Rule {}", &caps[3]),
                )
            })
            .into_iter()
            .collect()
    }

    fn find_suppression_comments<'t>(&self, text: &'t str) -> Vec<&'t str> {
        COMMENT
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str())
            .collect()
    }

    fn guideline_ids_from_comment(&self, comment: &str) -> Option<Vec<String>> {
        Some(
            GUIDELINE
                .captures(comment)
                .map(|caps| format!("Rule {}", &caps[1]))
                .into_iter()
                .collect(),
        )
    }
}
