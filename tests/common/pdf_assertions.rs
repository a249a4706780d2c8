#![allow(dead_code)]

use lopdf::Document as LopdfDocument;

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        if let Ok(page_text) = doc.extract_text(&[page_num as u32]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    text
}

/// Decoded page content streams, lossily converted to text
pub fn raw_content(doc: &LopdfDocument) -> String {
    let mut content = String::new();
    for page_id in doc.get_pages().values() {
        if let Ok(bytes) = doc.get_page_content(*page_id) {
            content.push_str(&String::from_utf8_lossy(&bytes));
            content.push('\n');
        }
    }
    content
}

/// Names of the image XObjects referenced from any page
pub fn image_xobject_count(doc: &LopdfDocument) -> usize {
    doc.objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .is_ok_and(|name| name == b"Image")
        })
        .count()
}

/// Header, trailer marker, parse and at least one page
pub fn is_structurally_valid(bytes: &[u8]) -> bool {
    if !bytes.starts_with(b"%PDF-") {
        return false;
    }
    let tail = &bytes[bytes.len().saturating_sub(32)..];
    if !tail.windows(5).any(|w| w == b"%%EOF") {
        return false;
    }
    match LopdfDocument::load_mem(bytes) {
        Ok(doc) => !doc.get_pages().is_empty(),
        Err(_) => false,
    }
}

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let searchable = $pdf.searchable_text();
        assert!(
            searchable.contains($text),
            "PDF should contain '{}', but its text was:\n{}",
            $text,
            searchable
        );
    };
}

/// Assert that PDF does NOT contain specific text
#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let searchable = $pdf.searchable_text();
        assert!(
            !searchable.contains($text),
            "PDF should NOT contain '{}', but it was found in:\n{}",
            $text,
            searchable
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert that bytes form a loadable PDF with at least one page
#[macro_export]
macro_rules! assert_valid_pdf {
    ($bytes:expr) => {
        assert!(
            $crate::common::pdf_assertions::is_structurally_valid($bytes),
            "bytes are not a structurally valid PDF ({} bytes)",
            $bytes.len()
        );
    };
}
