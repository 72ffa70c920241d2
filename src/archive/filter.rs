// file: src/archive/filter.rs
// description: case-insensitive file suffix predicate for archive entries
// reference: internal filtering rules

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixFilter {
    suffix: String,
}

impl SuffixFilter {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.trim().to_lowercase(),
        }
    }

    /// Filter that keeps every entry.
    pub fn any() -> Self {
        Self {
            suffix: String::new(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn matches(&self, name: &str) -> bool {
        self.suffix.is_empty() || name.to_lowercase().ends_with(&self.suffix)
    }
}

impl Default for SuffixFilter {
    fn default() -> Self {
        Self::new(".py")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_case_insensitive() {
        let filter = SuffixFilter::new(".py");
        assert!(filter.matches("src/app.py"));
        assert!(filter.matches("src/APP.PY"));
        assert!(filter.matches("Setup.Py"));
        assert!(!filter.matches("README.md"));
        assert!(!filter.matches("script.pyc"));
    }

    #[test]
    fn test_suffix_is_normalized() {
        let filter = SuffixFilter::new(" .MD ");
        assert_eq!(filter.suffix(), ".md");
        assert!(filter.matches("docs/Guide.md"));
    }

    #[test]
    fn test_any_matches_everything() {
        let filter = SuffixFilter::any();
        assert!(filter.matches("a.txt"));
        assert!(filter.matches("Makefile"));
    }
}
