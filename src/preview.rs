//! Script text preview.
//!
//! Short files are shown whole; files longer than `code_preview_lines` are
//! split into fixed-size pages the navigator steps through.

use std::fs;
use std::path::{Path, PathBuf};

/// Lines per page once a file exceeds the preview limit
pub const PAGE_LINES: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub path: PathBuf,
    pub lines: Vec<String>,
    /// True when the file is longer than the configured limit
    pub paged: bool,
}

impl Preview {
    /// Read `path` as lossy UTF-8
    pub fn load(path: &Path, limit: usize) -> std::io::Result<Self> {
        let bytes = fs::read(path)?;
        Ok(Self::from_text(path, &String::from_utf8_lossy(&bytes), limit))
    }

    pub fn from_text(path: &Path, text: &str, limit: usize) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let paged = lines.len() > limit;
        Self {
            path: path.to_path_buf(),
            lines,
            paged,
        }
    }

    pub fn page_count(&self) -> usize {
        if !self.paged {
            return 1;
        }
        self.lines.len().div_ceil(PAGE_LINES).max(1)
    }

    /// Lines of page `index` (0-based); the whole text when not paged
    pub fn page(&self, index: usize) -> &[String] {
        if !self.paged {
            return &self.lines;
        }
        let start = (index * PAGE_LINES).min(self.lines.len());
        let end = (start + PAGE_LINES).min(self.lines.len());
        &self.lines[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn numbered(count: usize) -> String {
        (1..=count).map(|i| format!("line {i}\n")).collect()
    }

    #[test]
    fn test_short_text_is_single_page() {
        let preview = Preview::from_text(Path::new("a.py"), &numbered(10), 200);
        assert!(!preview.paged);
        assert_eq!(preview.page_count(), 1);
        assert_eq!(preview.page(0).len(), 10);
        assert_eq!(preview.page(5).len(), 10);
    }

    #[test]
    fn test_long_text_is_paged() {
        let preview = Preview::from_text(Path::new("a.py"), &numbered(130), 100);
        assert!(preview.paged);
        assert_eq!(preview.page_count(), 3);
        assert_eq!(preview.page(0).first().map(String::as_str), Some("line 1"));
        assert_eq!(preview.page(1).first().map(String::as_str), Some("line 61"));
        assert_eq!(preview.page(2).len(), 10);
        assert!(preview.page(3).is_empty());
    }

    #[test]
    fn test_limit_is_inclusive() {
        let preview = Preview::from_text(Path::new("a.py"), &numbered(200), 200);
        assert!(!preview.paged);
    }

    #[test]
    fn test_load_replaces_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bin.py");
        fs::write(&path, b"print('ok')\n\xff\xfe\n").unwrap();

        let preview = Preview::load(&path, 200).unwrap();
        assert_eq!(preview.lines[0], "print('ok')");
        assert!(preview.lines[1].contains('\u{FFFD}'));
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(Preview::load(Path::new("/nonexistent/x.py"), 200).is_err());
    }
}
