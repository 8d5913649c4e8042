//! Compliance engine orchestrating recategorization, warnings and suppressions.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::adapter::{ToolAdapter, ToolAdapterBox};
use crate::annotation::{TagPatterns, TagScope};
use crate::catalog::{Catalog, ReferenceProvider};
use crate::error::{CatalogError, ComplianceError, EngineError, ErrorCode};
use crate::guideline::{Category, DeviationOutcome, Guideline};
use crate::locator::LineLocator;
use crate::report::{self, ComplianceReport, GuidelineReport, INVALID_REPORT_NOTE};
use crate::source::SourceProvider;
use crate::types::{AuditEntry, CommentProperties, MisraVersion, Suppression};

/// Builder for configuring a [`ComplianceEngine`].
#[derive(Default)]
pub struct ComplianceEngineBuilder<'a> {
    adapter: Option<ToolAdapterBox>,
    version: MisraVersion,
    references: Option<&'a dyn ReferenceProvider>,
    catalog: Option<Catalog>,
    patterns: Option<TagPatterns>,
}

impl<'a> ComplianceEngineBuilder<'a> {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tool adapter.
    #[must_use]
    pub fn adapter<A: ToolAdapter + 'static>(mut self, adapter: A) -> Self {
        self.adapter = Some(Box::new(adapter));
        self
    }

    /// Sets a boxed tool adapter.
    #[must_use]
    pub fn adapter_box(mut self, adapter: ToolAdapterBox) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Sets the MISRA version (default: MISRA C:2012).
    #[must_use]
    pub fn version(mut self, version: MisraVersion) -> Self {
        self.version = version;
        self
    }

    /// Sets where the reference document is read from.
    #[must_use]
    pub fn references(mut self, provider: &'a dyn ReferenceProvider) -> Self {
        self.references = Some(provider);
        self
    }

    /// Uses an already parsed catalog instead of parsing the reference document.
    #[must_use]
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Sets the annotation tag patterns.
    #[must_use]
    pub fn patterns(mut self, patterns: TagPatterns) -> Self {
        self.patterns = Some(patterns);
        self
    }

    /// Builds the engine.
    ///
    /// The adapter's [`ToolAdapter::on_version_selected`] hook runs here,
    /// with the reference document if one was configured.
    ///
    /// # Errors
    ///
    /// Returns an error if no adapter was set, the adapter does not support
    /// the version, or no catalog can be obtained.
    pub fn build(self) -> Result<ComplianceEngine, EngineError> {
        let mut adapter = self.adapter.ok_or(EngineError::MissingAdapter)?;
        let version = self.version;

        if !adapter.supported_versions().contains(&version) {
            let supported: Vec<String> = adapter
                .supported_versions()
                .iter()
                .map(ToString::to_string)
                .collect();
            return Err(EngineError::UnsupportedVersion {
                tool: adapter.name().to_string(),
                version,
                supported: report::join_list(&supported),
            });
        }

        let reference_text = self
            .references
            .map(|provider| provider.reference_text(version))
            .transpose()?;

        let catalog = match (self.catalog, reference_text.as_deref()) {
            (Some(catalog), _) => catalog,
            (None, Some(text)) => {
                let catalog = Catalog::parse(text);
                if catalog.is_empty() {
                    warn!("No guidelines found in the reference document for {version}");
                }
                catalog
            }
            (None, None) => {
                return Err(CatalogError::Missing {
                    version,
                    file_name: version.reference_file_name(),
                }
                .into())
            }
        };

        adapter.on_version_selected(version, reference_text.as_deref().unwrap_or_default());
        info!(
            "Checking {version} with {} ({} guidelines)",
            adapter.name(),
            catalog.len()
        );

        Ok(ComplianceEngine {
            adapter,
            version,
            catalog,
            patterns: self.patterns.unwrap_or_default(),
            error_code: ErrorCode::NONE,
            errors: Vec::new(),
            comments: Vec::new(),
        })
    }
}

/// Computes guideline compliance from analyzer warnings and suppression comments.
///
/// Use [`ComplianceEngine::builder()`] to construct an instance. Operations
/// are meant to run in this order:
///
/// 1. [`apply_grp`](Self::apply_grp)
/// 2. [`ingest_warnings`](Self::ingest_warnings)
/// 3. [`ingest_source_files`](Self::ingest_source_files)
///
/// None of them abort on bad input. Problems are logged, recorded in
/// [`errors`](Self::errors) and flagged in [`error_code`](Self::error_code).
/// Running an operation twice with the same input records its effects twice.
pub struct ComplianceEngine {
    adapter: ToolAdapterBox,
    version: MisraVersion,
    catalog: Catalog,
    patterns: TagPatterns,
    error_code: ErrorCode,
    errors: Vec<ComplianceError>,
    comments: Vec<CommentProperties>,
}

impl ComplianceEngine {
    /// Creates a new builder for configuring an engine.
    #[must_use]
    pub fn builder<'a>() -> ComplianceEngineBuilder<'a> {
        ComplianceEngineBuilder::new()
    }

    /// Applies a guideline recategorization plan.
    ///
    /// Each line is `<guideline id>, <category>`. Blank lines and lines with
    /// a blank id are skipped.
    pub fn apply_grp<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            let line = line.as_ref();
            let mut fields = line.split(',').map(str::trim);
            let id = fields.next().unwrap_or_default();
            if id.is_empty() {
                continue;
            }

            let Some(from) = self.catalog.get(id).map(Guideline::category) else {
                self.record(ComplianceError::GrpGuidelineNotFound {
                    guideline: id.to_string(),
                });
                continue;
            };

            let token = fields.next().unwrap_or_default();
            if token.is_empty() {
                self.record(ComplianceError::MalformedGrpLine {
                    line: line.to_string(),
                });
                continue;
            }

            let to = Category::from_token(token);
            if to == Category::Unknown {
                self.record(ComplianceError::UnknownGrpCategory {
                    token: token.to_string(),
                });
                continue;
            }

            if !from.can_recategorize_to(to) {
                self.record(ComplianceError::IllegalRecategorization {
                    guideline: id.to_string(),
                    from,
                    to,
                });
                continue;
            }

            if let Some(guideline) = self.catalog.get_mut(id) {
                guideline.set_recategorization(to);
                debug!(guideline = id, %from, %to, "Recategorized");
            }
        }
    }

    /// Records the violations reported by the analyzer's output lines.
    pub fn ingest_warnings<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut line_count = 0usize;
        let mut violation_count = 0usize;
        for line in lines {
            line_count += 1;
            for violation in self.adapter.parse_warning_line(line.as_ref()) {
                if violation.guideline_id.is_empty() {
                    continue;
                }
                violation_count += 1;
                if let Some(guideline) = self.catalog.get_mut(&violation.guideline_id) {
                    if !guideline.is_disapplied() {
                        guideline.record_violation();
                    }
                    continue;
                }
                self.record(ComplianceError::UnknownWarningGuideline {
                    tool: self.adapter.name().to_string(),
                    guideline: violation.guideline_id,
                    file: violation.file_name,
                });
            }
        }
        info!("Read {violation_count} violations from {line_count} warning lines");
    }

    /// Reads suppression comments from each file and applies them.
    ///
    /// Files that cannot be read are skipped. Comments that do not resolve to
    /// any guideline are dropped; all others are kept for the audit log.
    pub fn ingest_source_files<I, S>(&mut self, files: I, sources: &dyn SourceProvider)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut file_count = 0usize;
        for file in files {
            let file = file.as_ref();
            let text = match sources.read_source(file) {
                Ok(text) => text,
                Err(e) => {
                    self.record(ComplianceError::FileRead {
                        file: file.to_string(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            file_count += 1;

            let comments = self.parse_source_file(file, &text);
            for comment in comments.iter().filter(|c| !c.is_non_misra) {
                for suppression in comment.suppressions() {
                    self.apply_suppression(file, suppression);
                }
            }
            self.comments.extend(comments);
        }
        info!(
            "Scanned {file_count} source files, {} suppression comments retained",
            self.comments.len()
        );
    }

    fn parse_source_file(&mut self, file: &str, text: &str) -> Vec<CommentProperties> {
        let found = self.adapter.find_suppression_comments(text);
        let mut locator = LineLocator::new(text);
        let mut comments = Vec::with_capacity(found.len());
        for comment in found {
            let line = locator.find_next(comment).unwrap_or(0);
            debug!(file, line, comment, "Found suppression comment");
            if let Some(parsed) = self.parse_comment(file, line, comment) {
                comments.push(parsed);
            }
        }
        comments
    }

    fn parse_comment(&mut self, file: &str, line: usize, comment: &str) -> Option<CommentProperties> {
        let annotation = self.patterns.parse(comment);
        let ids = if annotation.guideline_ids.is_empty() {
            self.adapter
                .guideline_ids_from_comment(comment)
                .unwrap_or_default()
        } else {
            annotation.guideline_ids
        };

        let mut props = CommentProperties::new(file, line);
        props.is_non_misra = annotation.non_misra;
        for id in ids {
            props.insert(Suppression::new(id));
        }

        for scope in annotation.false_positives {
            match scope {
                TagScope::AllGuidelines => {
                    for suppression in props.suppressions_mut() {
                        suppression.is_false_positive = true;
                    }
                    break;
                }
                TagScope::Guideline(id) => match props.get_mut(&id) {
                    Some(suppression) => suppression.is_false_positive = true,
                    None => self.record(ComplianceError::FalsePositiveNotSuppressed {
                        file: file.to_string(),
                        guideline: id,
                        comment: comment.to_string(),
                    }),
                },
            }
        }

        for tag in annotation.deviations {
            match tag.scope {
                TagScope::AllGuidelines => {
                    for suppression in props.suppressions_mut() {
                        suppression.is_deviation = true;
                        suppression.deviation_reference.clone_from(&tag.reference);
                        suppression.deviation_link.clone_from(&tag.link);
                    }
                    break;
                }
                TagScope::Guideline(id) => match props.get_mut(&id) {
                    Some(suppression) => {
                        suppression.is_deviation = true;
                        suppression.deviation_reference = tag.reference;
                        suppression.deviation_link = tag.link;
                    }
                    None => self.record(ComplianceError::DeviationNotSuppressed {
                        file: file.to_string(),
                        guideline: id,
                        comment: comment.to_string(),
                    }),
                },
            }
        }

        if props.suppressions().is_empty() && !props.is_non_misra {
            self.record(ComplianceError::UnresolvedSuppression {
                file: file.to_string(),
                comment: comment.to_string(),
            });
            return None;
        }
        Some(props)
    }

    fn apply_suppression(&mut self, file: &str, suppression: &Suppression) {
        let Some(guideline) = self.catalog.get_mut(&suppression.guideline_id) else {
            self.record(ComplianceError::UnknownSuppressedGuideline {
                file: file.to_string(),
                guideline: suppression.guideline_id.clone(),
            });
            return;
        };

        if suppression.is_false_positive {
            return;
        }
        if !suppression.is_deviation {
            guideline.record_violation();
            return;
        }

        let outcome = guideline.record_deviation(
            suppression.deviation_reference.clone(),
            suppression.deviation_link.clone(),
        );
        if outcome != DeviationOutcome::Disapplied
            && guideline.active_category() == Category::Mandatory
        {
            self.record(ComplianceError::IllegalDeviation {
                file: file.to_string(),
                guideline: suppression.guideline_id.clone(),
            });
        }
    }

    fn record(&mut self, error: ComplianceError) {
        warn!("{error}");
        self.error_code |= error.code();
        self.errors.push(error);
    }

    /// True iff no error occurred and no required or mandatory guideline has violations.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.error_code.is_empty() && self.catalog.iter().all(Guideline::is_compliant)
    }

    /// Violations and deviations by category, as two sentences.
    #[must_use]
    pub fn summary(&self) -> String {
        report::summary(&self.catalog)
    }

    /// Audit log entries for every retained suppression comment.
    #[must_use]
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        report::audit_entries(&self.comments, &self.catalog, self.adapter.name())
    }

    /// Writes the audit log to `sink`, one entry per line.
    ///
    /// A failed write sets [`ErrorCode::FILE_WRITE_ERROR`].
    pub fn write_audit_log(&mut self, sink: &mut dyn Write) {
        let entries = self.audit_entries();
        if let Err(e) = write_entries(&entries, sink) {
            self.record(ComplianceError::FileWrite {
                path: "<audit log>".to_string(),
                message: e.to_string(),
            });
        }
    }

    /// Creates or truncates the file at `path` and writes the audit log to it.
    ///
    /// The file is closed before this returns, also on failure.
    pub fn write_audit_log_to_path(&mut self, path: &Path) {
        let entries = self.audit_entries();
        let result = File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            write_entries(&entries, &mut writer)?;
            writer.flush()
        });
        match result {
            Ok(()) => info!("Wrote audit log \"{}\"", path.display()),
            Err(e) => self.record(ComplianceError::FileWrite {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Builds the serializable report of the current state.
    #[must_use]
    pub fn report(
        &self,
        project_name: Option<String>,
        software_version: Option<String>,
    ) -> ComplianceReport {
        ComplianceReport {
            project_name,
            software_version,
            misra_version: self.version.to_string(),
            tool: self.adapter.name().to_string(),
            compliant: self.is_compliant(),
            summary: self.summary(),
            notes: (!self.error_code.is_empty()).then(|| INVALID_REPORT_NOTE.to_string()),
            error_code: self.error_code,
            guidelines: self.catalog.iter().map(GuidelineReport::from).collect(),
        }
    }

    /// Accumulated error bits.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    /// Every recoverable error, in the order it occurred.
    #[must_use]
    pub fn errors(&self) -> &[ComplianceError] {
        &self.errors
    }

    /// The catalog with its current guideline states.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Retained suppression comments, in ingestion order.
    #[must_use]
    pub fn comments(&self) -> &[CommentProperties] {
        &self.comments
    }

    /// Selected MISRA version.
    #[must_use]
    pub fn version(&self) -> MisraVersion {
        self.version
    }

    /// Name of the tool adapter.
    #[must_use]
    pub fn tool_name(&self) -> &'static str {
        self.adapter.name()
    }
}

fn write_entries(entries: &[AuditEntry], sink: &mut dyn Write) -> std::io::Result<()> {
    for entry in entries {
        writeln!(sink, "{entry}")?;
    }
    Ok(())
}
