//! Document loading
//!
//! Detects whether a file is displayed as flowing text or as a paginated
//! PDF and loads just enough of it for the viewport to lay it out. PDF page
//! contents are never parsed; only the page count is recovered.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use tracing::{debug, info};

use crate::{Error, Result};

/// Page counts above this are treated as corrupt
pub const MAX_PDF_PAGES: usize = 100_000;

type Pattern = Lazy<std::result::Result<Regex, regex::Error>>;

/// `/Count` of a `/Type /Pages` dictionary, keys in either order. Outline
/// dictionaries carry a `/Count` too and must not match.
static PAGE_TREE_COUNT: Pattern = Lazy::new(|| {
    Regex::new(
        r"(?-u)<<[^>]*?(?:/Type\s*/Pages\b[^>]*?/Count\s+(\d+)|/Count\s+(\d+)[^>]*?/Type\s*/Pages\b)",
    )
});

/// A single page object; `/Pages` nodes are excluded
static PAGE_OBJECT: Pattern = Lazy::new(|| Regex::new(r"(?-u)/Type\s*/Page(?:[^s]|$)"));

fn pattern(lazy: &'static Pattern) -> Result<&'static Regex> {
    Lazy::force(lazy)
        .as_ref()
        .map_err(|e| Error::Other(e.to_string()))
}

/// How a document is laid out on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Continuous text flow
    Text,
    /// Paginated flow
    Pdf,
}

impl DocumentKind {
    /// `.pdf` (any case) is paginated, everything else is read as text
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => DocumentKind::Pdf,
            _ => DocumentKind::Text,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Text => "TXT",
            DocumentKind::Pdf => "PDF",
        }
    }
}

/// A loaded document
#[derive(Debug, Clone)]
pub enum Document {
    Text { path: PathBuf, content: String },
    Pdf { path: PathBuf, page_count: usize },
}

impl Document {
    pub fn path(&self) -> &Path {
        match self {
            Document::Text { path, .. } | Document::Pdf { path, .. } => path,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Text { .. } => DocumentKind::Text,
            Document::Pdf { .. } => DocumentKind::Pdf,
        }
    }

    /// File name for display, falling back to the full path
    pub fn display_name(&self) -> String {
        self.path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path().display().to_string())
    }
}

/// Load a document from disk
pub fn load(path: &Path) -> Result<Document> {
    if path.is_dir() {
        return Err(Error::UnsupportedDocument(path.to_path_buf()));
    }

    let kind = DocumentKind::from_path(path);
    info!("Loading {}: {}", kind.label(), path.display());

    match kind {
        DocumentKind::Text => {
            let content = std::fs::read_to_string(path)?;
            Ok(Document::Text {
                path: path.to_path_buf(),
                content,
            })
        }
        DocumentKind::Pdf => {
            let bytes = std::fs::read(path)?;
            let page_count = pdf_page_count(&bytes)?;
            debug!(page_count, "PDF page tree scanned");
            Ok(Document::Pdf {
                path: path.to_path_buf(),
                page_count,
            })
        }
    }
}

/// Recover the page count of a PDF without decoding its content streams.
///
/// The page tree root carries the total in `/Count`; nested `/Pages` nodes
/// carry smaller counts, so the largest one wins. Files whose page tree sits
/// in a compressed object stream fall back to counting `/Type /Page` objects.
pub fn pdf_page_count(bytes: &[u8]) -> Result<usize> {
    if !bytes.starts_with(b"%PDF-") {
        return Err(Error::InvalidPdf("missing %PDF- header".to_string()));
    }

    let from_tree = pattern(&PAGE_TREE_COUNT)?
        .captures_iter(bytes)
        .filter_map(|c| {
            let digits = c.get(1).or_else(|| c.get(2))?;
            // Values too large for usize are as corrupt as ones above the cap
            Some(
                std::str::from_utf8(digits.as_bytes())
                    .ok()?
                    .parse::<usize>()
                    .unwrap_or(usize::MAX),
            )
        })
        .max();

    let from_objects = pattern(&PAGE_OBJECT)?.find_iter(bytes).count();

    match from_tree.unwrap_or(0).max(from_objects) {
        0 => Err(Error::InvalidPdf("no pages found".to_string())),
        n if n > MAX_PDF_PAGES => Err(Error::InvalidPdf(format!(
            "page count {} exceeds {}",
            n, MAX_PDF_PAGES
        ))),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tabscroll-doc-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_path(Path::new("song.pdf")), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("SONG.PDF")), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("song.txt")), DocumentKind::Text);
        assert_eq!(DocumentKind::from_path(Path::new("README")), DocumentKind::Text);
    }

    #[test]
    fn test_page_count_from_tree() {
        let pdf = b"%PDF-1.4\n1 0 obj << /Type /Pages /Kids [2 0 R 3 0 R] /Count 2 >>\n\
                    2 0 obj << /Type /Page /Parent 1 0 R >>\n\
                    3 0 obj << /Type /Page /Parent 1 0 R >>\n%%EOF";
        assert_eq!(pdf_page_count(pdf).unwrap(), 2);
    }

    #[test]
    fn test_page_count_nested_tree_uses_root() {
        let pdf = b"%PDF-1.7\n<< /Type /Pages /Count 12 >> << /Type /Pages /Count 5 >>";
        assert_eq!(pdf_page_count(pdf).unwrap(), 12);
    }

    #[test]
    fn test_page_count_from_objects() {
        let pdf = b"%PDF-1.5\n<</Type/Page>> <</Type/Page>> <</Type/Page>>";
        assert_eq!(pdf_page_count(pdf).unwrap(), 3);
    }

    #[test]
    fn test_outline_count_ignored() {
        let pdf = b"%PDF-1.4\n1 0 obj << /Type /Catalog /Pages 2 0 R /Outlines 4 0 R >>\n\
                    2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >>\n\
                    3 0 obj << /Type /Page /Parent 2 0 R >>\n\
                    4 0 obj << /Type /Outlines /First 5 0 R /Count 40 >>\n%%EOF";
        assert_eq!(pdf_page_count(pdf).unwrap(), 1);
    }

    #[test]
    fn test_page_tree_count_before_type() {
        let pdf = b"%PDF-1.4\n<< /Count 7 /Kids [] /Type /Pages >>";
        assert_eq!(pdf_page_count(pdf).unwrap(), 7);
    }

    #[test]
    fn test_absurd_page_count_rejected() {
        let pdf = b"%PDF-1.4\n<< /Type /Pages /Count 18446744073709551615 >>";
        assert!(matches!(pdf_page_count(pdf), Err(Error::InvalidPdf(_))));

        let pdf = b"%PDF-1.4\n<< /Type /Pages /Count 99999999999999999999999 >>";
        assert!(matches!(pdf_page_count(pdf), Err(Error::InvalidPdf(_))));
    }

    #[test]
    fn test_invalid_pdf() {
        assert!(matches!(
            pdf_page_count(b"hello world"),
            Err(Error::InvalidPdf(_))
        ));
        assert!(matches!(
            pdf_page_count(b"%PDF-1.4\n%%EOF"),
            Err(Error::InvalidPdf(_))
        ));
    }

    #[test]
    fn test_load_text() {
        let path = temp_file("tab.txt", b"e|---0---|\nB|---1---|\n");
        let doc = load(&path).unwrap();
        assert_eq!(doc.kind(), DocumentKind::Text);
        assert_eq!(doc.display_name(), "tab.txt");
        match doc {
            Document::Text { content, .. } => assert!(content.starts_with("e|")),
            _ => panic!("expected text document"),
        }
    }

    #[test]
    fn test_load_pdf() {
        let path = temp_file("tab.pdf", b"%PDF-1.4\n<< /Type /Pages /Count 4 >>");
        match load(&path).unwrap() {
            Document::Pdf { page_count, .. } => assert_eq!(page_count, 4),
            _ => panic!("expected pdf document"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_directory_is_unsupported() {
        let err = load(&std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDocument(_)));
    }
}
