//! Tool adapter trait for plugging in static analyzers.

use crate::types::{MisraVersion, Violation};

/// Knowledge about one static analysis tool.
///
/// An adapter turns the tool's output lines into [`Violation`]s and finds
/// the tool's own suppression comments in source text. The compliance
/// engine handles everything else.
///
/// # Example
///
/// ```ignore
/// use misra_gcs_core::{ToolAdapter, Violation};
///
/// pub struct MyTool;
///
/// impl ToolAdapter for MyTool {
///     fn name(&self) -> &'static str { "MyTool" }
///
///     fn parse_warning_line(&self, line: &str) -> Vec<Violation> {
///         // "<file>:<line>: misra <id>"
///         Vec::new()
///     }
///
///     fn find_suppression_comments<'t>(&self, text: &'t str) -> Vec<&'t str> {
///         Vec::new()
///     }
///
///     fn guideline_ids_from_comment(&self, comment: &str) -> Option<Vec<String>> {
///         None
///     }
/// }
/// ```
pub trait ToolAdapter: Send + Sync {
    /// Display name of the tool (e.g., "PC-Lint").
    fn name(&self) -> &'static str;

    /// MISRA versions this tool can check.
    fn supported_versions(&self) -> &'static [MisraVersion] {
        MisraVersion::ALL
    }

    /// Called once after the catalog for `version` is loaded.
    ///
    /// `reference_text` is the reference document the catalog was read
    /// from. Adapters that translate tool error codes to guideline ids
    /// build their mapping here.
    fn on_version_selected(&mut self, version: MisraVersion, reference_text: &str) {
        let _ = (version, reference_text);
    }

    /// Extracts the violations reported by one line of tool output.
    fn parse_warning_line(&self, line: &str) -> Vec<Violation>;

    /// Returns the text of each suppression comment, in document order.
    ///
    /// Returned slices must be substrings of `text` so they can be located.
    fn find_suppression_comments<'t>(&self, text: &'t str) -> Vec<&'t str>;

    /// Guideline ids a comment suppresses, or `None` if they cannot be determined.
    fn guideline_ids_from_comment(&self, comment: &str) -> Option<Vec<String>>;
}

/// Type alias for boxed `ToolAdapter` trait objects.
pub type ToolAdapterBox = Box<dyn ToolAdapter>;
