//! Error taxonomy for compliance runs.
//!
//! Two kinds of failure exist:
//!
//! - Fatal errors ([`CatalogError`], [`EngineError`]) stop a run before any
//!   guideline is checked.
//! - Recoverable errors ([`ComplianceError`]) are accumulated during a run.
//!   Each one sets a bit in the run-wide [`ErrorCode`] and processing
//!   continues with the next item.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::MisraVersion;

/// Bitfield of the recoverable error kinds seen during a run.
///
/// A non-zero value makes the run non-compliant regardless of guideline
/// states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(u32);

impl ErrorCode {
    /// No errors.
    pub const NONE: Self = Self(0);
    /// A warning or suppression referred to a guideline that is not in the catalog.
    pub const GUIDELINE_NOT_FOUND: Self = Self(1);
    /// A suppression comment could not be mapped to any guideline.
    pub const UNRESOLVED_SUPPRESSION: Self = Self(2);
    /// The guideline recategorization plan contained an invalid line.
    pub const GRP_ERROR: Self = Self(4);
    /// A deviation from a mandatory guideline was found.
    pub const ILLEGAL_DEVIATION: Self = Self(8);
    /// A source file could not be read.
    pub const FILE_READ_ERROR: Self = Self(16);
    /// The audit log could not be written.
    pub const FILE_WRITE_ERROR: Self = Self(32);

    const NAMED: [(Self, &'static str); 6] = [
        (Self::GUIDELINE_NOT_FOUND, "GuidelineNotFound"),
        (Self::UNRESOLVED_SUPPRESSION, "UnresolvedSuppression"),
        (Self::GRP_ERROR, "GrpError"),
        (Self::ILLEGAL_DEVIATION, "IllegalDeviation"),
        (Self::FILE_READ_ERROR, "FileReadError"),
        (Self::FILE_WRITE_ERROR, "FileWriteError"),
    ];

    /// Creates an error code from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if no error bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Names of the set bits, in bit order.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(code, _)| self.contains(*code))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl std::ops::BitOr for ErrorCode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ErrorCode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        write!(f, "{}", self.names().join(" | "))
    }
}

/// The guideline catalog could not be loaded.
///
/// Without a catalog no guideline can be checked, so this is fatal.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum CatalogError {
    /// The reference document for the version is not available.
    #[error("no reference document available for {version}")]
    #[diagnostic(
        code(misra_gcs::catalog::missing),
        help("provide the reference document `{file_name}` for this MISRA version")
    )]
    Missing {
        /// Version whose document was requested.
        version: MisraVersion,
        /// Expected document file name.
        file_name: &'static str,
    },

    /// The reference document exists but could not be read.
    #[error("failed to read reference document {path}: {source}")]
    #[diagnostic(code(misra_gcs::catalog::io))]
    Io {
        /// Path of the document.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Fatal errors raised while building a [`crate::ComplianceEngine`].
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum EngineError {
    /// The guideline catalog could not be loaded.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    /// No tool adapter was configured.
    #[error("no tool adapter configured")]
    MissingAdapter,

    /// The tool does not support the selected MISRA version.
    #[error("{tool} does not support {version}")]
    #[diagnostic(help("supported versions: {supported}"))]
    UnsupportedVersion {
        /// Tool name.
        tool: String,
        /// Requested version.
        version: MisraVersion,
        /// Human-readable list of supported versions.
        supported: String,
    },
}

/// A recoverable problem found during a run.
///
/// These never abort processing; the engine logs them, records them and
/// sets the matching [`ErrorCode`] bit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplianceError {
    /// The analyzer reported a guideline that the catalog does not know.
    #[error("{tool} warns about the guideline \"{guideline}\" in file \"{file}\", but no such guideline is found in the selected MISRA version")]
    UnknownWarningGuideline {
        /// Tool name.
        tool: String,
        /// Guideline id from the warning.
        guideline: String,
        /// File named by the warning.
        file: String,
    },

    /// A suppression comment suppresses a guideline that the catalog does not know.
    #[error("{file}: suppression comment for the guideline {guideline}, but the guideline was not found")]
    UnknownSuppressedGuideline {
        /// Source file.
        file: String,
        /// Guideline id.
        guideline: String,
    },

    /// A `FALSE_POSITIVE(<id>)` tag names an id the comment does not suppress.
    #[error("{file}: false positive tag found for the guideline {guideline}, but this guideline is not suppressed by the comment \"{comment}\"")]
    FalsePositiveNotSuppressed {
        /// Source file.
        file: String,
        /// Guideline id from the tag.
        guideline: String,
        /// Comment text.
        comment: String,
    },

    /// A three-argument `DEVIATION` tag names an id the comment does not suppress.
    #[error("{file}: deviation tag found for the guideline {guideline}, but this guideline is not suppressed by the comment \"{comment}\"")]
    DeviationNotSuppressed {
        /// Source file.
        file: String,
        /// Guideline id from the tag.
        guideline: String,
        /// Comment text.
        comment: String,
    },

    /// Neither tags nor the tool could tell which guideline a comment suppresses.
    #[error("{file}: could not determine which guideline is suppressed by the comment \"{comment}\". Add a GUIDELINE(<guideline id>) or NONMISRA tag to the comment")]
    UnresolvedSuppression {
        /// Source file.
        file: String,
        /// Comment text.
        comment: String,
    },

    /// A GRP line names a guideline that the catalog does not know.
    #[error("the guideline \"{guideline}\" was found in the guideline recategorization plan (GRP), but no corresponding guideline was found in the current MISRA rule set")]
    GrpGuidelineNotFound {
        /// Guideline id from the GRP.
        guideline: String,
    },

    /// A GRP line has no category.
    #[error("the line \"{line}\" in the GRP is not a valid recategorization; each line should contain a guideline id followed by the new category, separated by a comma, e.g. \"Rule 1.1, required\"")]
    MalformedGrpLine {
        /// Offending line.
        line: String,
    },

    /// A GRP line has a category token that is not recognized.
    #[error("\"{token}\" in the guideline recategorization plan (GRP) was not recognized as a valid MISRA compliance category")]
    UnknownGrpCategory {
        /// Offending token.
        token: String,
    },

    /// A GRP line tries to weaken a guideline.
    #[error("illegal recategorization of {guideline}: cannot recategorize {from} guideline to {to}")]
    IllegalRecategorization {
        /// Guideline id.
        guideline: String,
        /// Original category.
        from: crate::guideline::Category,
        /// Requested category.
        to: crate::guideline::Category,
    },

    /// A deviation was recorded against a mandatory guideline.
    #[error("{file}: {guideline} is mandatory, and deviations are illegal")]
    IllegalDeviation {
        /// Source file.
        file: String,
        /// Guideline id.
        guideline: String,
    },

    /// A source file could not be read.
    #[error("unable to open file \"{file}\": {message}")]
    FileRead {
        /// Source file.
        file: String,
        /// IO error text.
        message: String,
    },

    /// The audit log could not be written.
    #[error("unable to write to log file \"{path}\": {message}")]
    FileWrite {
        /// Log path or sink description.
        path: String,
        /// IO error text.
        message: String,
    },
}

impl ComplianceError {
    /// Returns the error bit this problem sets.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownWarningGuideline { .. }
            | Self::UnknownSuppressedGuideline { .. }
            | Self::FalsePositiveNotSuppressed { .. }
            | Self::DeviationNotSuppressed { .. } => ErrorCode::GUIDELINE_NOT_FOUND,
            Self::UnresolvedSuppression { .. } => ErrorCode::UNRESOLVED_SUPPRESSION,
            Self::GrpGuidelineNotFound { .. }
            | Self::MalformedGrpLine { .. }
            | Self::UnknownGrpCategory { .. }
            | Self::IllegalRecategorization { .. } => ErrorCode::GRP_ERROR,
            Self::IllegalDeviation { .. } => ErrorCode::ILLEGAL_DEVIATION,
            Self::FileRead { .. } => ErrorCode::FILE_READ_ERROR,
            Self::FileWrite { .. } => ErrorCode::FILE_WRITE_ERROR,
        }
    }
}
