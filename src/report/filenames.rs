// Output file name derivation

use std::path::{Path, PathBuf};

/// Root used when no output root is configured
pub const DEFAULT_FILE_ROOT: &str = "CUnitAutomated";

/// Longest file name (in bytes) a derived name may have
pub const MAX_FILENAME_LEN: usize = 1024;

pub const LISTING_SUFFIX: &str = "-Listing.xml";
pub const RESULTS_SUFFIX: &str = "-Results.xml";

/// Listing and results file names derived from one root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    listing: PathBuf,
    results: PathBuf,
}

impl OutputFiles {
    /// Derive both file names from `root`.
    ///
    /// An unset or empty root falls back to [`DEFAULT_FILE_ROOT`]. Roots that
    /// would push a name past [`MAX_FILENAME_LEN`] are truncated before the
    /// suffix is appended.
    pub fn derive(root: Option<&str>) -> Self {
        let root = match root {
            Some(r) if !r.is_empty() => r,
            _ => DEFAULT_FILE_ROOT,
        };

        Self {
            listing: PathBuf::from(with_suffix(root, LISTING_SUFFIX)),
            results: PathBuf::from(with_suffix(root, RESULTS_SUFFIX)),
        }
    }

    pub fn listing(&self) -> &Path {
        &self.listing
    }

    pub fn results(&self) -> &Path {
        &self.results
    }
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self::derive(None)
    }
}

fn with_suffix(root: &str, suffix: &str) -> String {
    let mut cut = root.len().min(MAX_FILENAME_LEN - suffix.len());
    while !root.is_char_boundary(cut) {
        cut -= 1;
    }

    let mut name = String::with_capacity(cut + suffix.len());
    name.push_str(&root[..cut]);
    name.push_str(suffix);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_from_root() {
        let files = OutputFiles::derive(Some("Foo"));
        assert_eq!(files.listing(), Path::new("Foo-Listing.xml"));
        assert_eq!(files.results(), Path::new("Foo-Results.xml"));
    }

    #[test]
    fn test_empty_root_uses_default() {
        for root in [None, Some("")] {
            let files = OutputFiles::derive(root);
            assert_eq!(files.listing(), Path::new("CUnitAutomated-Listing.xml"));
            assert_eq!(files.results(), Path::new("CUnitAutomated-Results.xml"));
        }
        assert_eq!(OutputFiles::default(), OutputFiles::derive(None));
    }

    #[test]
    fn test_long_root_truncated() {
        let root = "r".repeat(MAX_FILENAME_LEN * 2);
        let files = OutputFiles::derive(Some(&root));

        let results = files.results().to_string_lossy().into_owned();
        assert_eq!(results.len(), MAX_FILENAME_LEN);
        assert!(results.ends_with(RESULTS_SUFFIX));
        assert!(files.listing().to_string_lossy().len() <= MAX_FILENAME_LEN);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let root = "é".repeat(MAX_FILENAME_LEN);
        let files = OutputFiles::derive(Some(&root));
        let listing = files.listing().to_string_lossy().into_owned();

        assert!(listing.len() <= MAX_FILENAME_LEN);
        assert!(listing.ends_with(LISTING_SUFFIX));
        assert!(listing.trim_end_matches(LISTING_SUFFIX).chars().all(|c| c == 'é'));
    }
}
