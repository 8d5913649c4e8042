//! Lookup of the built-in tool adapters by name.

use std::fmt;

use misra_gcs_core::{MisraVersion, ToolAdapterBox};

use crate::{Cppcheck, PcLint};

/// Built-in static analysis tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Gimpel PC-Lint / PC-lint Plus.
    PcLint,
    /// Cppcheck with the MISRA addon.
    Cppcheck,
}

impl Tool {
    /// Every built-in tool.
    pub const ALL: &'static [Self] = &[Self::PcLint, Self::Cppcheck];

    /// Finds a tool by name, ignoring case, dashes and spaces.
    ///
    /// `"PC-Lint"`, `"pclint"` and `"pc lint"` all select [`Tool::PcLint`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "pclint" | "pclintplus" => Some(Self::PcLint),
            "cppcheck" => Some(Self::Cppcheck),
            _ => None,
        }
    }

    /// Display name, as used in reports and audit entries.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PcLint => crate::pc_lint::NAME,
            Self::Cppcheck => crate::cppcheck::NAME,
        }
    }

    /// A fresh adapter for this tool.
    #[must_use]
    pub fn adapter(self) -> ToolAdapterBox {
        match self {
            Self::PcLint => Box::new(PcLint::new()),
            Self::Cppcheck => Box::new(Cppcheck::new()),
        }
    }

    /// MISRA versions the tool can check.
    #[must_use]
    pub fn supported_versions(self) -> &'static [MisraVersion] {
        self.adapter().supported_versions()
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns a fresh adapter for every built-in tool.
#[must_use]
pub fn all_adapters() -> Vec<ToolAdapterBox> {
    Tool::ALL.iter().map(|tool| tool.adapter()).collect()
}

/// Returns a fresh adapter for the named tool.
#[must_use]
pub fn find_adapter(name: &str) -> Option<ToolAdapterBox> {
    Tool::from_name(name).map(Tool::adapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Tool::from_name("PC-Lint"), Some(Tool::PcLint));
        assert_eq!(Tool::from_name("pclint"), Some(Tool::PcLint));
        assert_eq!(Tool::from_name("PC-lint Plus"), Some(Tool::PcLint));
        assert_eq!(Tool::from_name("CPPCHECK"), Some(Tool::Cppcheck));
        assert_eq!(Tool::from_name("splint"), None);
    }

    #[test]
    fn test_names_match_adapters() {
        for tool in Tool::ALL {
            assert_eq!(tool.adapter().name(), tool.name());
            assert_eq!(tool.to_string(), tool.name());
        }
    }

    #[test]
    fn test_all_adapters() {
        let names: Vec<&str> = all_adapters().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["PC-Lint", "Cppcheck"]);
    }

    #[test]
    fn test_find_adapter() {
        assert_eq!(find_adapter("cppcheck").map(|a| a.name()), Some("Cppcheck"));
        assert!(find_adapter("unknown").is_none());
        assert_eq!(Tool::Cppcheck.supported_versions(), &[MisraVersion::C2012]);
    }
}
