//! Adapter for Gimpel PC-Lint / PC-lint Plus.
//!
//! # Warning Lines
//!
//! ```text
//! src/drvCAN.c(75): Note 9029: Mismatched essential type categories [MISRA 2012 Rule 10.4, required]
//! ```
//!
//! One warning may carry several bracketed MISRA references; each one is a
//! separate violation.
//!
//! # Suppression Comments
//!
//! - `//lint -e9029 ...` (to the end of the line)
//! - `/*lint -e9029 ... */`
//!
//! The leading run of `-e<code>`, `!e<code>` and `-esym(<code>, ...)`-style
//! options tells which error codes are suppressed. Codes are mapped to
//! guidelines through the `-append(<code>,[MISRA ...])` options of the
//! reference document.

use std::collections::HashMap;
use std::sync::LazyLock;

use misra_gcs_core::{MisraVersion, ToolAdapter, Violation};
use regex::Regex;
use tracing::debug;

/// Tool name.
pub const NAME: &str = "PC-Lint";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| unreachable!("PC-Lint pattern is valid: {e}"))
}

static APPEND: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"-append\((\d+),\[MISRA (?:2004 |2012 |C\+\+ )?([^,\]]+).*\]\)")
});

static WARNING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(.*?)\((\d+)\): (?:Note|Info|Error|Warning) \d+: [^\[]*\[MISRA (?:2004 |2012 |C\+\+ )?[^,\]]*(?:, advisory|, required|, mandatory)?\]")
});

static MISRA_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\[MISRA (?:2004 |2012 |C\+\+ )?([^,\]]*)(?:, advisory|, required|, mandatory)?\]")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?mR)//lint\s*([^\n]*)$|(?s:/\*lint\s+(.*?)\*/)"));

static SUPPRESSION_OPTION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^[-!]e(?:sym\(|func\(|macro\(|file\(|template\(|string\(|call\(|type\()?(\d+)(?::?,[^)]*\)\s*|\s*)")
});

/// PC-Lint adapter.
///
/// Comments can only be mapped to guidelines after
/// [`ToolAdapter::on_version_selected`] has read the error-code table.
#[derive(Debug, Clone, Default)]
pub struct PcLint {
    error_map: HashMap<u32, Vec<String>>,
}

impl PcLint {
    /// Creates an adapter with an empty error-code table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Guideline ids an error code is mapped to.
    #[must_use]
    pub fn guidelines_for_code(&self, code: u32) -> Option<&[String]> {
        self.error_map.get(&code).map(Vec::as_slice)
    }

    fn read_error_map(reference_text: &str) -> HashMap<u32, Vec<String>> {
        let mut map: HashMap<u32, Vec<String>> = HashMap::new();
        for caps in APPEND.captures_iter(reference_text) {
            let Ok(code) = caps[1].parse::<u32>() else {
                continue;
            };
            map.entry(code).or_default().push(caps[2].to_string());
        }
        map
    }
}

impl ToolAdapter for PcLint {
    fn name(&self) -> &'static str {
        NAME
    }

    fn on_version_selected(&mut self, version: MisraVersion, reference_text: &str) {
        self.error_map = Self::read_error_map(reference_text);
        debug!(
            "Mapped {} PC-Lint error codes to {version} guidelines",
            self.error_map.len()
        );
    }

    fn parse_warning_line(&self, line: &str) -> Vec<Violation> {
        let Some(caps) = WARNING_LINE.captures(line) else {
            return Vec::new();
        };
        let file_name = &caps[1];
        let line_number = caps[2].parse().unwrap_or(0);
        MISRA_REFERENCE
            .captures_iter(line)
            .map(|m| Violation::new(file_name, line_number, &m[1]))
            .collect()
    }

    fn find_suppression_comments<'t>(&self, text: &'t str) -> Vec<&'t str> {
        COMMENT
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str())
            .collect()
    }

    /// Returns `None` if any suppressed error code has no MISRA mapping.
    fn guideline_ids_from_comment(&self, comment: &str) -> Option<Vec<String>> {
        let mut ids: Vec<String> = Vec::new();
        let mut rest = comment;
        while let Some(caps) = SUPPRESSION_OPTION.captures(rest) {
            let code: u32 = caps[1].parse().ok()?;
            for id in self.error_map.get(&code)? {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
            rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
        }
        Some(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "/* This is a C sourefile */\r\n\
        \r\n\
        //This is not a suppression comment\r\n\
        void dostuff(int hello)\r\n\
        {\r\n\
        \x20   doOtherStuff(4);//lint -e493 What's going on\r\n\
        }\r\n\
        \r\n\
        /*lint e589 a multiline comment\r\n\
        is here\r\n\
        */\r\n\
        int b;\r\n";

    const REFERENCE: &str = "\
/*** Rule 0-1-1 (req) ***/
-append(774,[MISRA C++ Rule 0-1-1, required])
-append(774,[MISRA C++ Rule 0-1-2, required])
-append(774,[MISRA C++ Rule 0-1-9, required])
-append(16,[MISRA 2012 Rule 20.13, required])
-append(9015,[MISRA 2012 Rule 20.12, required])
-append(484,[MISRA 2012 Rule 20.10, advisory])
-append(9024,[MISRA 2012 Rule 20.11, required])
-append(9029,[MISRA 2012 Rule 10.4, required])
";

    fn with_reference() -> PcLint {
        let mut tool = PcLint::new();
        tool.on_version_selected(MisraVersion::C2012, REFERENCE);
        tool
    }

    #[test]
    fn test_name_and_versions() {
        let tool = PcLint::new();
        assert_eq!(tool.name(), "PC-Lint");
        assert_eq!(tool.supported_versions(), MisraVersion::ALL);
    }

    #[test]
    fn test_finds_single_line_comment() {
        let comments = PcLint::new().find_suppression_comments(SOURCE);
        assert_eq!(comments[0], "-e493 What's going on");
    }

    #[test]
    fn test_finds_multi_line_comment() {
        let comments = PcLint::new().find_suppression_comments(SOURCE);
        assert_eq!(comments[1], "e589 a multiline comment\r\nis here\r\n");
        assert_eq!(comments.len(), 2);
    }

    #[test]
    fn test_parse_warning_line() {
        let vs = PcLint::new().parse_warning_line(
            "C:\\UST3\\qse30\\Drivers\\drvCAN.c(75): Note 9029: Mismatched essential type categories for binary operator [MISRA 2012 Rule 10.4, required] (Note <a href=\"/userContent/LintMsgRef.html#9029\">9029</a>)",
        );
        assert_eq!(
            vs,
            vec![Violation::new("C:\\UST3\\qse30\\Drivers\\drvCAN.c", 75, "Rule 10.4")]
        );
    }

    #[test]
    fn test_no_misra_reference() {
        let vs = PcLint::new().parse_warning_line(
            "C:\\UST3\\qse30\\Drivers\\drvCAN.c(50): Warning 551: Symbol 'canBaudRate' (line 50, file C:\\UST3\\qse30\\Drivers\\drvCAN.c) not accessed",
        );
        assert!(vs.is_empty());
    }

    #[test]
    fn test_multiple_references_in_one_warning() {
        let vs = PcLint::new().parse_warning_line(
            "C:\\UST3\\qse30\\Drivers\\drvCAN.c(79): Note 931: Both sides have side effects [MISRA 2012 Rule 1.3, required], [MISRA 2012 Rule 13.2, required]",
        );
        let ids: Vec<&str> = vs.iter().map(|v| v.guideline_id.as_str()).collect();
        assert_eq!(ids, vec!["Rule 1.3", "Rule 13.2"]);
        assert!(vs.iter().all(|v| v.line_number == 79));
        assert!(vs
            .iter()
            .all(|v| v.file_name == "C:\\UST3\\qse30\\Drivers\\drvCAN.c"));
    }

    #[test]
    fn test_other_misra_versions() {
        let tool = PcLint::new();
        for (line, id) in [
            ("drvCAN.c(75): Note 9029: blabla [MISRA 2004 Rule 13.2, required]", "Rule 13.2"),
            ("drvCAN.c(75): Note 9029: blabla [MISRA C++ Rule 0-1-4]", "Rule 0-1-4"),
            ("drvCAN.c(75): Note 9029: blabla [MISRA Rule 11.2]", "Rule 11.2"),
        ] {
            assert_eq!(tool.parse_warning_line(line), vec![Violation::new("drvCAN.c", 75, id)]);
        }
    }

    #[test]
    fn test_error_code_maps_to_several_guidelines() {
        let ids = with_reference().guideline_ids_from_comment("-e774").unwrap();
        assert_eq!(ids, vec!["Rule 0-1-1", "Rule 0-1-2", "Rule 0-1-9"]);
    }

    #[test]
    fn test_multiple_suppression_options() {
        let ids = with_reference()
            .guideline_ids_from_comment(
                "-esym(16,rai) !e9015 -emacro(484,hei) -efunc(9024, jau) -efile(9029, hau) Hello -e4444444",
            )
            .unwrap();
        assert_eq!(
            ids,
            vec!["Rule 20.13", "Rule 20.12", "Rule 20.10", "Rule 20.11", "Rule 10.4"]
        );
    }

    #[test]
    fn test_each_guideline_once() {
        let ids = with_reference()
            .guideline_ids_from_comment("-esym(16,rai) -esym(16,hei)")
            .unwrap();
        assert_eq!(ids, vec!["Rule 20.13"]);
    }

    #[test]
    fn test_unmapped_code_is_undetermined() {
        let tool = with_reference();
        assert_eq!(tool.guideline_ids_from_comment("-e9029 -e1"), None);
        assert_eq!(PcLint::new().guideline_ids_from_comment("-e9029"), None);
        assert_eq!(
            tool.guideline_ids_from_comment("GUIDELINE(Rule 1.1)"),
            Some(Vec::new())
        );
    }

    #[test]
    fn test_guidelines_for_code() {
        let tool = with_reference();
        assert_eq!(
            tool.guidelines_for_code(9029),
            Some(&["Rule 10.4".to_string()][..])
        );
        assert_eq!(tool.guidelines_for_code(1), None);
    }
}
