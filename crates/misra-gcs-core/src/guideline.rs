//! Guideline records and the per-guideline compliance state machine.

use serde::{Deserialize, Serialize};

/// Strictness classification of a guideline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Must always be followed; no deviation is permitted.
    Mandatory,
    /// Must be followed unless a formal deviation exists.
    Required,
    /// Recommended; violations do not affect compliance.
    Advisory,
    /// Excluded from checking for this project.
    Disapplied,
    /// Category could not be determined from the reference document.
    Unknown,
}

impl Category {
    /// Parses a category token, case-insensitively.
    ///
    /// Accepts full names and the short forms used in reference documents
    /// (`mand`, `req`, `adv`, `dis`). Anything else yields [`Category::Unknown`].
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "MANDATORY" | "MAND" => Self::Mandatory,
            "REQUIRED" | "REQ" => Self::Required,
            "ADVISORY" | "ADV" => Self::Advisory,
            "DISAPPLIED" | "DIS" => Self::Disapplied,
            _ => Self::Unknown,
        }
    }

    /// Returns true if moving a guideline from `self` to `new` is allowed.
    ///
    /// Recategorization may only make a guideline stricter: a mandatory
    /// guideline stays mandatory, and a required guideline may not become
    /// advisory or disapplied.
    #[must_use]
    pub fn can_recategorize_to(self, new: Self) -> bool {
        match self {
            Self::Mandatory => new == Self::Mandatory,
            Self::Required => !matches!(new, Self::Advisory | Self::Disapplied),
            Self::Advisory | Self::Disapplied | Self::Unknown => true,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mandatory => write!(f, "Mandatory"),
            Self::Required => write!(f, "Required"),
            Self::Advisory => write!(f, "Advisory"),
            Self::Disapplied => write!(f, "Disapplied"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Compliance state of one guideline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceStatus {
    /// No violations or deviations recorded.
    Compliant,
    /// At least one unexplained violation.
    Violations,
    /// Only documented deviations.
    Deviations,
    /// The guideline is disapplied by the recategorization plan.
    Disapplied,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compliant => write!(f, "Compliant"),
            Self::Violations => write!(f, "Violations"),
            Self::Deviations => write!(f, "Deviations"),
            Self::Disapplied => write!(f, "Disapplied"),
        }
    }
}

/// Reference to the document justifying a deviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviationReference {
    /// Deviation record identifier.
    pub reference: Option<String>,
    /// Link to the deviation record.
    pub link: Option<String>,
}

/// What happened when a deviation was applied to a guideline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviationOutcome {
    /// The deviation was recorded and the status is now `Deviations`.
    Recorded,
    /// The guideline already has violations; the deviation is not recorded.
    ViolationsStand,
    /// The guideline is disapplied; nothing changed.
    Disapplied,
}

/// Mutable compliance record for one guideline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guideline {
    id: String,
    category: Category,
    recategorization: Option<Category>,
    status: ComplianceStatus,
    deviation_references: Vec<DeviationReference>,
}

impl Guideline {
    /// Creates a compliant guideline.
    #[must_use]
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
            recategorization: None,
            status: ComplianceStatus::Compliant,
            deviation_references: Vec::new(),
        }
    }

    /// Creates a guideline that already carries a recategorization.
    #[must_use]
    pub fn with_recategorization(mut self, category: Category) -> Self {
        self.set_recategorization(category);
        self
    }

    /// Catalog id, e.g. `"Rule 10.4"`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Category from the reference document.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Category assigned by the recategorization plan, if any.
    #[must_use]
    pub fn recategorization(&self) -> Option<Category> {
        self.recategorization
    }

    /// Current compliance status.
    #[must_use]
    pub fn status(&self) -> ComplianceStatus {
        self.status
    }

    /// Recorded deviation references, in the order they were found.
    #[must_use]
    pub fn deviation_references(&self) -> &[DeviationReference] {
        &self.deviation_references
    }

    /// The recategorization if present, else the original category.
    #[must_use]
    pub fn active_category(&self) -> Category {
        self.recategorization.unwrap_or(self.category)
    }

    /// True when the recategorization plan disapplied this guideline.
    #[must_use]
    pub fn is_disapplied(&self) -> bool {
        self.recategorization == Some(Category::Disapplied)
    }

    /// False iff the guideline has violations and is required or mandatory.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        !(self.status == ComplianceStatus::Violations
            && matches!(
                self.active_category(),
                Category::Required | Category::Mandatory
            ))
    }

    /// Sets the recategorization. Disapplying pins the status to `Disapplied`.
    pub fn set_recategorization(&mut self, category: Category) {
        self.recategorization = Some(category);
        if category == Category::Disapplied {
            self.status = ComplianceStatus::Disapplied;
        }
    }

    /// Overrides the status. Has no effect on a disapplied guideline.
    pub fn set_status(&mut self, status: ComplianceStatus) {
        if !self.is_disapplied() {
            self.status = status;
        }
    }

    /// Records an unexplained violation.
    ///
    /// Violations override `Compliant` and `Deviations`.
    pub fn record_violation(&mut self) {
        if self.is_disapplied() {
            self.status = ComplianceStatus::Disapplied;
        } else {
            self.status = ComplianceStatus::Violations;
        }
    }

    /// Records a documented deviation.
    ///
    /// The deviation never downgrades existing violations. Legality against
    /// the guideline's category is checked by the caller.
    pub fn record_deviation(
        &mut self,
        reference: Option<String>,
        link: Option<String>,
    ) -> DeviationOutcome {
        if self.is_disapplied() {
            self.status = ComplianceStatus::Disapplied;
            return DeviationOutcome::Disapplied;
        }
        if self.status == ComplianceStatus::Violations {
            return DeviationOutcome::ViolationsStand;
        }
        self.status = ComplianceStatus::Deviations;
        self.deviation_references
            .push(DeviationReference { reference, link });
        DeviationOutcome::Recorded
    }
}

impl std::fmt::Display for Guideline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_category_tokens() {
        assert_eq!(Category::from_token("Mand"), Category::Mandatory);
        assert_eq!(Category::from_token("required"), Category::Required);
        assert_eq!(Category::from_token(" ADV "), Category::Advisory);
        assert_eq!(Category::from_token("disappLIED"), Category::Disapplied);
        assert_eq!(Category::from_token("doc"), Category::Unknown);
        assert_eq!(Category::from_token("Benedict Cumberbatch"), Category::Unknown);
    }

    #[test]
    fn recategorization_legality() {
        use Category::{Advisory, Disapplied, Mandatory, Required, Unknown};

        assert!(Mandatory.can_recategorize_to(Mandatory));
        for to in [Required, Advisory, Disapplied] {
            assert!(!Mandatory.can_recategorize_to(to));
        }

        assert!(Required.can_recategorize_to(Required));
        assert!(Required.can_recategorize_to(Mandatory));
        assert!(!Required.can_recategorize_to(Advisory));
        assert!(!Required.can_recategorize_to(Disapplied));

        for from in [Advisory, Disapplied, Unknown] {
            for to in [Mandatory, Required, Advisory, Disapplied] {
                assert!(from.can_recategorize_to(to));
            }
        }
    }

    #[test]
    fn active_category_prefers_recategorization() {
        let g = Guideline::new("Rule 1", Category::Advisory);
        assert_eq!(g.active_category(), Category::Advisory);

        let g = g.with_recategorization(Category::Required);
        assert_eq!(g.active_category(), Category::Required);
        assert_eq!(g.category(), Category::Advisory);
    }

    #[test]
    fn disapplied_pins_status() {
        let mut g = Guideline::new("Rule 1", Category::Advisory);
        g.record_violation();
        g.set_recategorization(Category::Disapplied);
        assert_eq!(g.status(), ComplianceStatus::Disapplied);

        g.record_violation();
        assert_eq!(g.status(), ComplianceStatus::Disapplied);

        assert_eq!(
            g.record_deviation(Some("DEV-1".into()), None),
            DeviationOutcome::Disapplied
        );
        g.set_status(ComplianceStatus::Violations);
        assert_eq!(g.status(), ComplianceStatus::Disapplied);
        assert!(g.deviation_references().is_empty());
    }

    #[test]
    fn violation_overrides_deviation() {
        let mut g = Guideline::new("Rule 1", Category::Required);
        assert_eq!(
            g.record_deviation(Some("DEV-1".into()), Some("http://dev".into())),
            DeviationOutcome::Recorded
        );
        assert_eq!(g.status(), ComplianceStatus::Deviations);

        g.record_violation();
        assert_eq!(g.status(), ComplianceStatus::Violations);
    }

    #[test]
    fn deviation_does_not_downgrade_violations() {
        let mut g = Guideline::new("Rule 1", Category::Required);
        g.record_violation();

        let outcome = g.record_deviation(Some("DEV-1".into()), None);

        assert_eq!(outcome, DeviationOutcome::ViolationsStand);
        assert_eq!(g.status(), ComplianceStatus::Violations);
        assert!(g.deviation_references().is_empty());
    }

    #[test]
    fn deviation_references_are_appended() {
        let mut g = Guideline::new("Rule 1", Category::Advisory);
        let _ = g.record_deviation(Some("A".into()), None);
        let _ = g.record_deviation(None, Some("http://b".into()));

        let refs = g.deviation_references();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].reference.as_deref(), Some("A"));
        assert_eq!(refs[1].link.as_deref(), Some("http://b"));
    }

    #[test]
    fn compliance_depends_on_active_category() {
        let mut g = Guideline::new("Rule 1", Category::Advisory);
        g.record_violation();
        assert!(g.is_compliant());

        g.set_recategorization(Category::Required);
        assert!(!g.is_compliant());

        g.set_recategorization(Category::Mandatory);
        assert!(!g.is_compliant());
    }
}
