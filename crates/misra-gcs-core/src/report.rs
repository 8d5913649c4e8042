//! Summary text, audit log entries and the serializable compliance report.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::ErrorCode;
use crate::guideline::{Category, ComplianceStatus, DeviationReference, Guideline};
use crate::types::{AuditEntry, CommentProperties, Severity};

/// Note attached to a report produced by a run that accumulated errors.
pub const INVALID_REPORT_NOTE: &str =
    "Errors occurred during processing. This report is not valid. See console output for details.";

/// Joins items as `a`, `a and b`, or `a, b and c`.
#[must_use]
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let remaining = items.len() - i;
        out.push_str(item.as_ref());
        if remaining > 2 {
            out.push_str(", ");
        } else if remaining == 2 {
            out.push_str(" and ");
        }
    }
    out
}

/// One sentence counting the guidelines with `status`, by active category.
///
/// `noun` is the plural word for the status, e.g. `"violations"`.
#[must_use]
pub fn status_sentence(catalog: &Catalog, status: ComplianceStatus, noun: &str) -> String {
    let mut counts = [0usize; 3];
    for guideline in catalog.iter().filter(|g| g.status() == status) {
        match guideline.active_category() {
            Category::Mandatory => counts[0] += 1,
            Category::Required => counts[1] += 1,
            Category::Advisory => counts[2] += 1,
            Category::Disapplied | Category::Unknown => {}
        }
    }

    let parts: Vec<String> = ["mandatory", "required", "advisory"]
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(name, count)| {
            let word = if count == 1 { "guideline" } else { "guidelines" };
            format!("{count} {name} {word}")
        })
        .collect();

    if parts.is_empty() {
        format!("There were no {noun}.")
    } else {
        format!("There were {noun} of {}.", join_list(&parts))
    }
}

/// The violations sentence followed by the deviations sentence.
#[must_use]
pub fn summary(catalog: &Catalog) -> String {
    format!(
        "{} {}",
        status_sentence(catalog, ComplianceStatus::Violations, "violations"),
        status_sentence(catalog, ComplianceStatus::Deviations, "deviations")
    )
}

/// Audit log entries for every retained comment, in order.
///
/// Suppressions of guidelines missing from the catalog are listed with the
/// `Unknown` category.
#[must_use]
pub fn audit_entries(
    comments: &[CommentProperties],
    catalog: &Catalog,
    tool_name: &str,
) -> Vec<AuditEntry> {
    let mut entries = Vec::new();
    for comment in comments {
        let file = comment.file_name.as_str();
        let line = comment.line_number;

        if comment.is_non_misra {
            let ids: Vec<&str> = comment.guideline_ids().collect();
            let entry = if ids.is_empty() {
                AuditEntry::new(
                    file,
                    line,
                    Severity::Info,
                    "Tool suppression comment tagged as not MISRA relevant",
                )
            } else {
                AuditEntry::new(
                    file,
                    line,
                    Severity::Warning,
                    format!(
                        "Tool suppression comment tagged as not MISRA relevant, but {tool_name} indicates that this comment suppresses {}",
                        join_list(&ids)
                    ),
                )
            };
            entries.push(entry);
            continue;
        }

        for suppression in comment.suppressions() {
            let id = suppression.guideline_id.as_str();
            let category = catalog
                .get(id)
                .map_or(Category::Unknown, Guideline::active_category);

            if suppression.is_false_positive {
                entries.push(AuditEntry::new(
                    file,
                    line,
                    Severity::Info,
                    format!("Suppression of {id} ({category}) tagged as false positive"),
                ));
            } else if suppression.is_deviation {
                entries.push(AuditEntry::new(
                    file,
                    line,
                    Severity::Info,
                    format!("Deviation of {id} ({category})"),
                ));
            } else if category != Category::Disapplied {
                let severity = if category == Category::Advisory {
                    Severity::Info
                } else {
                    Severity::Error
                };
                entries.push(AuditEntry::new(
                    file,
                    line,
                    severity,
                    format!("Violation of {id} ({category})"),
                ));
            }
        }
    }
    entries
}

/// Final state of one guideline in a [`ComplianceReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuidelineReport {
    /// Catalog id.
    pub id: String,
    /// Category from the reference document.
    pub category: Category,
    /// Category from the recategorization plan.
    pub recategorization: Option<Category>,
    /// Final status.
    pub status: ComplianceStatus,
    /// Recorded deviations.
    pub deviations: Vec<DeviationReference>,
}

impl From<&Guideline> for GuidelineReport {
    fn from(guideline: &Guideline) -> Self {
        Self {
            id: guideline.id().to_string(),
            category: guideline.category(),
            recategorization: guideline.recategorization(),
            status: guideline.status(),
            deviations: guideline.deviation_references().to_vec(),
        }
    }
}

/// Guideline compliance summary for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    /// Project name, if configured.
    pub project_name: Option<String>,
    /// Software version, if configured.
    pub software_version: Option<String>,
    /// MISRA version checked against.
    pub misra_version: String,
    /// Static analysis tool name.
    pub tool: String,
    /// Overall verdict.
    pub compliant: bool,
    /// Violations and deviations summary sentences.
    pub summary: String,
    /// Set when the run accumulated errors.
    pub notes: Option<String>,
    /// Accumulated error bits.
    pub error_code: ErrorCode,
    /// Every guideline in catalog order.
    pub guidelines: Vec<GuidelineReport>,
}
