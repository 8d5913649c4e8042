//! Suppression-comment annotation tags.
//!
//! Supports tags like:
//! ```text
//! //lint -e9029 GUIDELINE(Rule 10.4) DEVIATION(DEV-12, https:/wiki/dev12)
//! //lint -e774 FALSE_POSITIVE
//! //lint -e91 NONMISRA
//! ```
//!
//! The parser is tool-agnostic: it only looks at the comment text that a
//! [`crate::ToolAdapter`] extracted from a source file.

use regex::Regex;

use crate::config::TagConfig;
use crate::ConfigError;

/// Default pattern for `GUIDELINE(<id>)`.
pub const DEFAULT_GUIDELINE_PATTERN: &str = r"\bGUIDELINE\(([^\)]*)\)";
/// Default pattern for `NONMISRA` and look-alikes such as `NON-MISRA`.
pub const DEFAULT_NON_MISRA_PATTERN: &str = r"\bNON.?MISRA";
/// Default pattern for `FALSE_POSITIVE` and `FALSE_POSITIVE(<id>)`.
pub const DEFAULT_FALSE_POSITIVE_PATTERN: &str = r"\bFALSE.?POSITIVE(?:\(([^\)]*)\))?";
/// Default pattern for `DEVIATION(<reference>[, <link>[, <id>]])`.
pub const DEFAULT_DEVIATION_PATTERN: &str =
    r"\bDEVIATION\(\s*([^,\(\)]*?)\s*(?:\)|,\s*([^,\(\)]*?)\s*(?:\)|,\s*([^\(\)]*?)\s*\)))";

/// Which guidelines of a comment a tag applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagScope {
    /// Every guideline the comment suppresses.
    AllGuidelines,
    /// One named guideline.
    Guideline(String),
}

/// A parsed `DEVIATION(...)` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviationTag {
    /// Deviation record identifier.
    pub reference: Option<String>,
    /// Link with its protocol marker restored.
    pub link: Option<String>,
    /// Guidelines the deviation applies to.
    pub scope: TagScope,
}

/// All tags found in one suppression comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Ids from `GUIDELINE(...)` tags, deduplicated, in order of appearance.
    pub guideline_ids: Vec<String>,
    /// The comment carries a `NONMISRA` tag.
    pub non_misra: bool,
    /// `FALSE_POSITIVE` tags in order of appearance.
    pub false_positives: Vec<TagScope>,
    /// `DEVIATION` tags in order of appearance.
    pub deviations: Vec<DeviationTag>,
}

/// Compiled patterns for the four tag families.
///
/// Custom patterns must keep the capture-group layout of the defaults:
/// group 1 of the guideline pattern is the id, group 1 of the
/// false-positive pattern is the optional id, and the deviation pattern
/// captures reference, link and id in groups 1 to 3.
#[derive(Debug, Clone)]
pub struct TagPatterns {
    guideline: Regex,
    non_misra: Regex,
    false_positive: Regex,
    deviation: Regex,
}

impl Default for TagPatterns {
    fn default() -> Self {
        Self::compile(&TagConfig::default()).unwrap_or_else(|e| {
            unreachable!("built-in tag patterns are valid: {e}")
        })
    }
}

impl TagPatterns {
    /// Compiles tag patterns, falling back to the defaults for unset entries.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured pattern is not a valid regex.
    pub fn compile(config: &TagConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            guideline: compile_one(
                "guideline",
                config.guideline.as_deref(),
                DEFAULT_GUIDELINE_PATTERN,
            )?,
            non_misra: compile_one(
                "non_misra",
                config.non_misra.as_deref(),
                DEFAULT_NON_MISRA_PATTERN,
            )?,
            false_positive: compile_one(
                "false_positive",
                config.false_positive.as_deref(),
                DEFAULT_FALSE_POSITIVE_PATTERN,
            )?,
            deviation: compile_one(
                "deviation",
                config.deviation.as_deref(),
                DEFAULT_DEVIATION_PATTERN,
            )?,
        })
    }

    /// Source text of the guideline pattern.
    #[must_use]
    pub fn guideline_pattern(&self) -> &str {
        self.guideline.as_str()
    }

    /// Source text of the non-MISRA pattern.
    #[must_use]
    pub fn non_misra_pattern(&self) -> &str {
        self.non_misra.as_str()
    }

    /// Source text of the false-positive pattern.
    #[must_use]
    pub fn false_positive_pattern(&self) -> &str {
        self.false_positive.as_str()
    }

    /// Source text of the deviation pattern.
    #[must_use]
    pub fn deviation_pattern(&self) -> &str {
        self.deviation.as_str()
    }

    /// Extracts every tag from a suppression comment.
    #[must_use]
    pub fn parse(&self, comment: &str) -> Annotation {
        let mut guideline_ids: Vec<String> = Vec::new();
        for caps in self.guideline.captures_iter(comment) {
            if let Some(id) = non_empty(caps.get(1).map(|m| m.as_str())) {
                if !guideline_ids.contains(&id) {
                    guideline_ids.push(id);
                }
            }
        }

        let false_positives = self
            .false_positive
            .captures_iter(comment)
            .map(|caps| scope_from(caps.get(1).map(|m| m.as_str())))
            .collect();

        let deviations = self
            .deviation
            .captures_iter(comment)
            .map(|caps| DeviationTag {
                reference: non_empty(caps.get(1).map(|m| m.as_str())),
                link: non_empty(caps.get(2).map(|m| m.as_str()))
                    .map(|link| restore_protocol_marker(&link)),
                scope: scope_from(caps.get(3).map(|m| m.as_str())),
            })
            .collect();

        Annotation {
            guideline_ids,
            non_misra: self.non_misra.is_match(comment),
            false_positives,
            deviations,
        }
    }
}

fn compile_one(tag: &str, custom: Option<&str>, default: &str) -> Result<Regex, ConfigError> {
    let pattern = custom.unwrap_or(default);
    Regex::new(pattern).map_err(|e| ConfigError::Pattern {
        tag: tag.to_string(),
        message: e.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// A missing parameter means the tag covers the whole comment.
fn scope_from(id: Option<&str>) -> TagScope {
    match id {
        Some(id) => TagScope::Guideline(id.trim().to_string()),
        None => TagScope::AllGuidelines,
    }
}

/// Restores the `://` that suppression comments may not contain.
///
/// Comment text may not hold the line-comment opener `//`, so authors write
/// `http:host` or `http:/host`. The first colon not already followed by
/// `//` gets the missing slashes back.
#[must_use]
pub fn restore_protocol_marker(url: &str) -> String {
    for (i, _) in url.match_indices(':') {
        let rest = &url[i + 1..];
        if let Some(after_slash) = rest.strip_prefix('/') {
            if !after_slash.starts_with('/') {
                return format!("{}://{}", &url[..i], after_slash);
            }
        } else {
            return format!("{}://{}", &url[..i], rest);
        }
    }
    url.to_string()
}
