//! Guideline catalog loading.
//!
//! A catalog is extracted from a per-version reference document. The
//! document is free text; only guideline header banners are read:
//!
//! ```text
//! /*** Rule 10.4 (req) ************************/
//! /*** Dir 4.1 (Req) ***************************/
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::CatalogError;
use crate::guideline::{Category, Guideline};
use crate::types::MisraVersion;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"/\*+ ((?:Rule|Dir(?:ective)?) (?:\d+-\d+-\d+|\d+\.\d+|\d+)) +\(((?i:req|adv|mand|doc))\) +\*",
    )
    .unwrap_or_else(|e| unreachable!("catalog header pattern is valid: {e}"))
});

/// Supplies the reference document text for a MISRA version.
pub trait ReferenceProvider {
    /// Returns the full reference document for `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing or unreadable.
    fn reference_text(&self, version: MisraVersion) -> Result<String, CatalogError>;
}

/// Reads reference documents from a directory, one file per version.
///
/// Files are decoded as ISO-8859-1.
#[derive(Debug, Clone)]
pub struct DirectoryReferenceProvider {
    dir: PathBuf,
}

impl DirectoryReferenceProvider {
    /// Creates a provider reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReferenceProvider for DirectoryReferenceProvider {
    fn reference_text(&self, version: MisraVersion) -> Result<String, CatalogError> {
        let file_name = version.reference_file_name();
        let path = self.dir.join(file_name);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(decode_latin1(&bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CatalogError::Missing { version, file_name })
            }
            Err(source) => Err(CatalogError::Io { path, source }),
        }
    }
}

/// Every byte of ISO-8859-1 is the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Reference documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferences {
    texts: HashMap<MisraVersion, String>,
}

impl InMemoryReferences {
    /// Creates an empty set of documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the document for a version.
    #[must_use]
    pub fn with(mut self, version: MisraVersion, text: impl Into<String>) -> Self {
        self.texts.insert(version, text.into());
        self
    }
}

impl ReferenceProvider for InMemoryReferences {
    fn reference_text(&self, version: MisraVersion) -> Result<String, CatalogError> {
        self.texts
            .get(&version)
            .cloned()
            .ok_or(CatalogError::Missing {
                version,
                file_name: version.reference_file_name(),
            })
    }
}

/// Ordered, duplicate-free set of guidelines for one MISRA version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    guidelines: Vec<Guideline>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Extracts every guideline header from a reference document.
    ///
    /// Unrecognized text is ignored. A repeated id keeps its first entry.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut catalog = Self::default();
        for caps in HEADER.captures_iter(text) {
            let raw_id = &caps[1];
            let id = match raw_id.strip_prefix("Dir ") {
                Some(rest) => format!("Directive {rest}"),
                None => raw_id.to_string(),
            };
            let category = Category::from_token(&caps[2]);
            if catalog.index.contains_key(&id) {
                debug!(guideline = %id, "Skipping duplicate catalog entry");
                continue;
            }
            catalog.push(Guideline::new(id, category));
        }
        catalog
    }

    /// Loads the catalog for `version` from a reference provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot supply the document.
    pub fn load(
        provider: &dyn ReferenceProvider,
        version: MisraVersion,
    ) -> Result<Self, CatalogError> {
        let text = provider.reference_text(version)?;
        let catalog = Self::parse(&text);
        if catalog.is_empty() {
            warn!("No guidelines found in the reference document for {version}");
        } else {
            info!("Loaded {} guidelines for {version}", catalog.len());
        }
        Ok(catalog)
    }

    /// Builds a catalog from existing records, keeping the first of each id.
    #[must_use]
    pub fn from_guidelines(guidelines: impl IntoIterator<Item = Guideline>) -> Self {
        let mut catalog = Self::default();
        for guideline in guidelines {
            if !catalog.index.contains_key(guideline.id()) {
                catalog.push(guideline);
            }
        }
        catalog
    }

    fn push(&mut self, guideline: Guideline) {
        self.index
            .insert(guideline.id().to_string(), self.guidelines.len());
        self.guidelines.push(guideline);
    }

    /// Looks up a guideline by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Guideline> {
        self.index.get(id).map(|&i| &self.guidelines[i])
    }

    /// Looks up a guideline by id, mutably.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Guideline> {
        self.index.get(id).map(|&i| &mut self.guidelines[i])
    }

    /// Guidelines in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Guideline> {
        self.guidelines.iter()
    }

    /// Number of guidelines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guidelines.len()
    }

    /// Returns true if the catalog holds no guideline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guidelines.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Guideline;
    type IntoIter = std::slice::Iter<'a, Guideline>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parses each version's document once and hands out fresh copies.
///
/// Every run starts from a catalog in its initial state, so the cached
/// value is never handed out by reference.
pub struct CatalogCache<P> {
    provider: P,
    parsed: HashMap<MisraVersion, Catalog>,
}

impl<P: ReferenceProvider> CatalogCache<P> {
    /// Creates an empty cache over `provider`.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            parsed: HashMap::new(),
        }
    }

    /// Returns a fresh catalog for `version`, parsing the document on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot supply the document.
    pub fn catalog(&mut self, version: MisraVersion) -> Result<Catalog, CatalogError> {
        if let Some(catalog) = self.parsed.get(&version) {
            return Ok(catalog.clone());
        }
        let catalog = Catalog::load(&self.provider, version)?;
        self.parsed.insert(version, catalog.clone());
        Ok(catalog)
    }
}

impl<P: ReferenceProvider> ReferenceProvider for CatalogCache<P> {
    fn reference_text(&self, version: MisraVersion) -> Result<String, CatalogError> {
        self.provider.reference_text(version)
    }
}
