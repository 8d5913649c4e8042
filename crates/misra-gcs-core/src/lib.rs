//! # misra-gcs-core
//!
//! Guideline compliance engine for MISRA C and C++.
//!
//! The engine correlates two sources of evidence:
//!
//! - warnings emitted by a static analyzer, and
//! - suppression comments written by developers, annotated with tags such
//!   as `GUIDELINE(...)`, `NONMISRA`, `FALSE_POSITIVE` and `DEVIATION(...)`.
//!
//! It produces a per-guideline compliance verdict, a summary and an audit
//! log of every suppression.
//!
//! This crate provides:
//!
//! - [`Catalog`] for loading the guidelines of a MISRA version
//! - [`Guideline`] and its compliance state machine
//! - [`TagPatterns`] for parsing suppression-comment annotations
//! - [`ToolAdapter`] for plugging in a static analyzer
//! - [`ComplianceEngine`] for running a compliance check
//!
//! ## Example
//!
//! ```ignore
//! use misra_gcs_core::{ComplianceEngine, DirectoryReferenceProvider, MisraVersion, WorkspaceSources};
//!
//! let references = DirectoryReferenceProvider::new("lint");
//! let mut engine = ComplianceEngine::builder()
//!     .adapter(MyTool)
//!     .version(MisraVersion::C2012)
//!     .references(&references)
//!     .build()?;
//!
//! engine.apply_grp(grp_lines);
//! engine.ingest_warnings(warning_lines);
//! engine.ingest_source_files(&files, &WorkspaceSources::new("."));
//!
//! println!("{}", engine.summary());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod annotation;
mod catalog;
mod config;
mod engine;
mod error;
mod guideline;
mod locator;
mod report;
mod source;
mod types;

pub use adapter::{ToolAdapter, ToolAdapterBox};
pub use annotation::{
    restore_protocol_marker, Annotation, DeviationTag, TagPatterns, TagScope,
    DEFAULT_DEVIATION_PATTERN, DEFAULT_FALSE_POSITIVE_PATTERN, DEFAULT_GUIDELINE_PATTERN,
    DEFAULT_NON_MISRA_PATTERN,
};
pub use catalog::{
    Catalog, CatalogCache, DirectoryReferenceProvider, InMemoryReferences, ReferenceProvider,
};
pub use config::{Config, ConfigError, InputsConfig, PolicyConfig, TagConfig};
pub use engine::{ComplianceEngine, ComplianceEngineBuilder};
pub use error::{CatalogError, ComplianceError, EngineError, ErrorCode};
pub use guideline::{
    Category, ComplianceStatus, DeviationOutcome, DeviationReference, Guideline,
};
pub use locator::LineLocator;
pub use report::{join_list, ComplianceReport, GuidelineReport, INVALID_REPORT_NOTE};
pub use source::{SourceProvider, WorkspaceSources};
pub use types::{AuditEntry, CommentProperties, MisraVersion, Severity, Suppression, Violation};
