//! Core types for analyzer findings, suppression comments and audit entries.

use serde::{Deserialize, Serialize};

/// Edition of the MISRA guidelines.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MisraVersion {
    /// MISRA C:1998.
    C1998,
    /// MISRA C:2004.
    C2004,
    /// MISRA C:2012.
    #[default]
    C2012,
    /// MISRA C++:2008.
    Cpp2008,
}

impl MisraVersion {
    /// All versions, oldest C edition first.
    pub const ALL: &'static [Self] = &[Self::C1998, Self::C2004, Self::C2012, Self::Cpp2008];

    /// Parses a version selector such as `"2012"`, `"C++"` or `"MISRA C 2004"`.
    ///
    /// Unrecognized selectors fall back to MISRA C:2012.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        let token = token.to_ascii_uppercase();
        if token.contains("1998") {
            Self::C1998
        } else if token.contains("CPP") || token.contains("C++") {
            Self::Cpp2008
        } else if token.contains("2004") {
            Self::C2004
        } else {
            Self::C2012
        }
    }

    /// File name of the reference document listing this version's guidelines.
    #[must_use]
    pub fn reference_file_name(self) -> &'static str {
        match self {
            Self::C1998 => "au-misra1.lnt",
            Self::C2004 => "au-misra2.lnt",
            Self::C2012 => "au-misra3.lnt",
            Self::Cpp2008 => "au-misra-cpp.lnt",
        }
    }
}

impl std::fmt::Display for MisraVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::C1998 => write!(f, "MISRA C 1998"),
            Self::C2004 => write!(f, "MISRA C 2004"),
            Self::C2012 => write!(f, "MISRA C 2012"),
            Self::Cpp2008 => write!(f, "MISRA C++ 2008"),
        }
    }
}

/// Severity level of an audit log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational entry.
    Info,
    /// Suspicious suppression that should be reviewed.
    Warning,
    /// Suppressed violation of a required or mandatory guideline.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A guideline violation reported by the static analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// File named in the warning.
    pub file_name: String,
    /// Line named in the warning (1-indexed, 0 if unknown).
    pub line_number: usize,
    /// Guideline id, e.g. `"Rule 10.4"`. Empty if the tool gave none.
    pub guideline_id: String,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        line_number: usize,
        guideline_id: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            line_number,
            guideline_id: guideline_id.into(),
        }
    }
}

/// One guideline suppressed by one comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suppression {
    /// Suppressed guideline id.
    pub guideline_id: String,
    /// Tagged as a false positive.
    pub is_false_positive: bool,
    /// Tagged as a deviation.
    pub is_deviation: bool,
    /// Deviation record identifier.
    pub deviation_reference: Option<String>,
    /// Deviation record link, with its protocol marker restored.
    pub deviation_link: Option<String>,
}

impl Suppression {
    /// Creates an untagged suppression.
    #[must_use]
    pub fn new(guideline_id: impl Into<String>) -> Self {
        Self {
            guideline_id: guideline_id.into(),
            is_false_positive: false,
            is_deviation: false,
            deviation_reference: None,
            deviation_link: None,
        }
    }

    /// Marks this suppression as a false positive.
    #[must_use]
    pub fn false_positive(mut self) -> Self {
        self.is_false_positive = true;
        self
    }
}

/// A parsed suppression comment.
///
/// Suppressions keep the order in which their guideline ids were resolved,
/// so audit output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentProperties {
    /// Source file containing the comment.
    pub file_name: String,
    /// Line of the comment (1-indexed, 0 if it could not be located).
    pub line_number: usize,
    /// Tagged as not MISRA relevant.
    pub is_non_misra: bool,
    suppressions: Vec<Suppression>,
}

impl CommentProperties {
    /// Creates a comment record without suppressions.
    #[must_use]
    pub fn new(file_name: impl Into<String>, line_number: usize) -> Self {
        Self {
            file_name: file_name.into(),
            line_number,
            is_non_misra: false,
            suppressions: Vec::new(),
        }
    }

    /// Marks the comment as not MISRA relevant.
    #[must_use]
    pub fn non_misra(mut self) -> Self {
        self.is_non_misra = true;
        self
    }

    /// Adds a suppression, replacing any existing one for the same guideline.
    #[must_use]
    pub fn with_suppression(mut self, suppression: Suppression) -> Self {
        self.insert(suppression);
        self
    }

    /// Adds a suppression, replacing any existing one for the same guideline.
    pub fn insert(&mut self, suppression: Suppression) {
        match self.get_mut(&suppression.guideline_id) {
            Some(existing) => *existing = suppression,
            None => self.suppressions.push(suppression),
        }
    }

    /// Suppressions in insertion order.
    #[must_use]
    pub fn suppressions(&self) -> &[Suppression] {
        &self.suppressions
    }

    /// Looks up the suppression for a guideline id.
    #[must_use]
    pub fn get(&self, guideline_id: &str) -> Option<&Suppression> {
        self.suppressions
            .iter()
            .find(|s| s.guideline_id == guideline_id)
    }

    /// Looks up the suppression for a guideline id, mutably.
    pub fn get_mut(&mut self, guideline_id: &str) -> Option<&mut Suppression> {
        self.suppressions
            .iter_mut()
            .find(|s| s.guideline_id == guideline_id)
    }

    /// Iterates all suppressions mutably.
    pub fn suppressions_mut(&mut self) -> impl Iterator<Item = &mut Suppression> {
        self.suppressions.iter_mut()
    }

    /// Guideline ids suppressed by this comment, in insertion order.
    pub fn guideline_ids(&self) -> impl Iterator<Item = &str> {
        self.suppressions.iter().map(|s| s.guideline_id.as_str())
    }
}

/// One line of the suppression audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Source file.
    pub file: String,
    /// Line of the comment.
    pub line: usize,
    /// Entry severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl AuditEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(
        file: impl Into<String>,
        line: usize,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            severity,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.file, self.line, self.severity, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_version_tokens() {
        assert_eq!(MisraVersion::from_token("1998"), MisraVersion::C1998);
        assert_eq!(MisraVersion::from_token("2004"), MisraVersion::C2004);
        assert_eq!(MisraVersion::from_token("C++"), MisraVersion::Cpp2008);
        assert_eq!(MisraVersion::from_token("cpp"), MisraVersion::Cpp2008);
        assert_eq!(MisraVersion::from_token("2012"), MisraVersion::C2012);
        assert_eq!(MisraVersion::from_token("whatever"), MisraVersion::C2012);
    }

    #[test]
    fn default_version_is_c2012() {
        assert_eq!(MisraVersion::default(), MisraVersion::C2012);
        assert_eq!(MisraVersion::default(), MisraVersion::from_token(""));
    }

    #[test]
    fn version_display() {
        assert_eq!(MisraVersion::C2012.to_string(), "MISRA C 2012");
        assert_eq!(MisraVersion::Cpp2008.to_string(), "MISRA C++ 2008");
    }

    #[test]
    fn comment_keeps_insertion_order_and_replaces_duplicates() {
        let mut comment = CommentProperties::new("a.c", 3)
            .with_suppression(Suppression::new("Rule 2.1"))
            .with_suppression(Suppression::new("Rule 1.1"));
        comment.insert(Suppression::new("Rule 2.1").false_positive());

        let ids: Vec<&str> = comment.guideline_ids().collect();
        assert_eq!(ids, vec!["Rule 2.1", "Rule 1.1"]);
        assert!(comment.get("Rule 2.1").is_some_and(|s| s.is_false_positive));
    }

    #[test]
    fn audit_entry_display() {
        let entry = AuditEntry::new("file1.c", 20, Severity::Info, "Violation of hus 1.2 (Advisory)");
        assert_eq!(
            entry.to_string(),
            "file1.c:20: info: Violation of hus 1.2 (Advisory)"
        );
    }
}
