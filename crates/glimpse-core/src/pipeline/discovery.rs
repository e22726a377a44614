//! Directory scanning for caption candidates.

use std::path::Path;
use walkdir::WalkDir;

use crate::error::BatchError;
use crate::types::CandidateFile;

/// Filename suffixes accepted for captioning (matched case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".bmp", ".gif", ".webp"];

/// Lists the immediate children of a folder that look like images.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryScanner;

impl DirectoryScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan one folder, without recursion.
    ///
    /// Entries are returned in directory-listing order. Subdirectories and
    /// files without a supported suffix are skipped silently. A listing
    /// failure aborts the scan.
    pub fn scan(&self, folder: &Path) -> Result<Vec<CandidateFile>, BatchError> {
        if !folder.is_dir() {
            return Err(BatchError::InvalidInput(folder.to_path_buf()));
        }

        let mut candidates = Vec::new();

        for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
            // Links are not followed, so walkdir only yields an error here
            // when reading the listing itself fails. That aborts the batch.
            let entry = entry.map_err(|source| BatchError::DirectoryRead {
                path: folder.to_path_buf(),
                source,
            })?;

            // Symlinks are resolved here; a dangling link stays a candidate
            // and fails later at decode time.
            if entry.path().is_dir() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().into_owned();
            if !is_supported(&filename) {
                continue;
            }

            let absolute_path = std::path::absolute(entry.path())
                .unwrap_or_else(|_| entry.path().to_path_buf());
            candidates.push(CandidateFile {
                filename,
                absolute_path,
            });
        }

        Ok(candidates)
    }
}

/// Check whether a filename ends with a supported image suffix.
pub fn is_supported(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Render the allow-list the way it appears in user-facing messages.
pub fn extensions_display() -> String {
    let quoted: Vec<String> = SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!("'{ext}'"))
        .collect();
    format!("({})", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn names(candidates: &[CandidateFile]) -> BTreeSet<String> {
        candidates.iter().map(|c| c.filename.clone()).collect()
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported("test.jpg"));
        assert!(is_supported("test.JPG"));
        assert!(is_supported("test.jpeg"));
        assert!(is_supported("test.png"));
        assert!(is_supported("test.Bmp"));
        assert!(is_supported("test.gif"));
        assert!(is_supported("test.webp"));
        assert!(!is_supported("test.txt"));
        assert!(!is_supported("test.tiff"));
        assert!(!is_supported("jpg"));
        assert!(!is_supported("test.jpg.bak"));
    }

    #[test]
    fn test_extensions_display() {
        assert_eq!(
            extensions_display(),
            "('.png', '.jpg', '.jpeg', '.bmp', '.gif', '.webp')"
        );
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.jpg", "b.txt", "c.PNG", "d.webp", "notes.md"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let found = DirectoryScanner::new().scan(dir.path()).unwrap();
        let expected: BTreeSet<String> = ["a.jpg", "c.PNG", "d.webp"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names(&found), expected);
    }

    #[test]
    fn test_scan_skips_subdirectories_and_does_not_recurse() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("deep.png"), b"x").unwrap();
        std::fs::write(dir.path().join("top.png"), b"x").unwrap();

        let found = DirectoryScanner::new().scan(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].filename, "top.png");
    }

    #[test]
    fn test_scan_returns_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.gif"), b"x").unwrap();

        let found = DirectoryScanner::new().scan(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].absolute_path.is_absolute());
        assert!(found[0].absolute_path.ends_with("a.gif"));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let found = DirectoryScanner::new().scan(dir.path()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_missing_directory_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = DirectoryScanner::new().scan(&missing).unwrap_err();
        assert!(matches!(err, BatchError::InvalidInput(p) if p == missing));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_keeps_dangling_symlink_as_candidate() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.png"), dir.path().join("link.png"))
            .unwrap();
        std::fs::write(dir.path().join("real.jpg"), b"x").unwrap();

        let found = DirectoryScanner::new().scan(dir.path()).unwrap();
        let expected: BTreeSet<String> = ["link.png", "real.jpg"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names(&found), expected);
    }

    #[test]
    fn test_scan_file_path_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.jpg");
        std::fs::write(&file, b"x").unwrap();
        let err = DirectoryScanner::new().scan(&file).unwrap_err();
        assert!(matches!(err, BatchError::InvalidInput(_)));
    }
}
