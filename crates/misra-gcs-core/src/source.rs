//! Access to source file contents.

use std::io;
use std::path::PathBuf;

/// Reads the full text of a source file named by its workspace-relative id.
pub trait SourceProvider {
    /// Returns the text of `file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_source(&self, file: &str) -> io::Result<String>;
}

impl<F> SourceProvider for F
where
    F: Fn(&str) -> io::Result<String>,
{
    fn read_source(&self, file: &str) -> io::Result<String> {
        self(file)
    }
}

/// Reads source files relative to a workspace root.
///
/// Invalid UTF-8 is replaced rather than rejected; suppression comments are
/// ASCII in practice and the surrounding code need not be.
#[derive(Debug, Clone)]
pub struct WorkspaceSources {
    root: PathBuf,
}

impl WorkspaceSources {
    /// Creates a provider rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceProvider for WorkspaceSources {
    fn read_source(&self, file: &str) -> io::Result<String> {
        let bytes = std::fs::read(self.root.join(file))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/main.c"), b"int x; /* \xFF */").unwrap();

        let sources = WorkspaceSources::new(dir.path());
        let text = sources.read_source("src/main.c").unwrap();
        assert!(text.starts_with("int x;"));
        assert!(text.contains('\u{FFFD}'));

        assert!(sources.read_source("src/missing.c").is_err());
    }

    #[test]
    fn closures_are_providers() {
        let provider = |file: &str| -> io::Result<String> { Ok(format!("// {file}")) };
        assert_eq!(provider.read_source("a.c").unwrap(), "// a.c");
    }
}
