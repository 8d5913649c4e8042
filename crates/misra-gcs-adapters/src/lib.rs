//! # misra-gcs-adapters
//!
//! Built-in static analyzer adapters for misra-gcs.
//!
//! Each adapter knows how its tool prints MISRA warnings and how developers
//! write suppression comments for it.
//!
//! ## Available Tools
//!
//! | Tool | Name | MISRA versions | Comment form |
//! |------|------|----------------|--------------|
//! | [`PcLint`] | `PC-Lint` | all | `//lint -e9029 ...`, `/*lint ... */` |
//! | [`Cppcheck`] | `Cppcheck` | C:2012 | `// cppcheck-suppress misra-c2012-15.6` |
//!
//! ## Usage
//!
//! ```ignore
//! use misra_gcs_adapters::find_adapter;
//! use misra_gcs_core::ComplianceEngine;
//!
//! let adapter = find_adapter("pclint").ok_or("unknown tool")?;
//! let engine = ComplianceEngine::builder()
//!     .adapter_box(adapter)
//!     .references(&references)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cppcheck;
mod pc_lint;
mod registry;

pub use cppcheck::Cppcheck;
pub use pc_lint::PcLint;
pub use registry::{all_adapters, find_adapter, Tool};

/// Re-export core types for convenience.
pub use misra_gcs_core::{MisraVersion, ToolAdapter, Violation};
