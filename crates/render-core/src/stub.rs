//! Minimal PDF writer for the degraded output path.
//!
//! It depends on nothing but this crate, so a stub can be produced even when
//! no rendering backend is compiled in or the backend just failed.

use crate::utils::{encode_win_ansi, pdf_literal};
use offerdoc_layout::text::wrap_text;
use offerdoc_style::StandardFont;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 72.0;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 12.0;
const PRODUCER: &str = "offerdoc";

/// A single-page document stating that full generation was not possible.
#[derive(Debug, Clone, PartialEq)]
pub struct StubDocument {
    title: String,
    paragraphs: Vec<String>,
}

impl StubDocument {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            paragraphs: vec![message.into()],
        }
    }

    /// Appends another paragraph, e.g. the recipient's name.
    pub fn with_paragraph(mut self, text: impl Into<String>) -> Self {
        self.paragraphs.push(text.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn content_stream(&self) -> String {
        let max_width = PAGE_WIDTH - 2.0 * MARGIN;
        let mut ops = String::new();
        let mut y = PAGE_HEIGHT - MARGIN - TITLE_SIZE;
        for line in wrap_text(&self.title, StandardFont::HelveticaBold, TITLE_SIZE, max_width) {
            ops.push_str(&text_op("F1", TITLE_SIZE, MARGIN, y, &line));
            y -= TITLE_SIZE * 1.3;
        }
        y -= BODY_SIZE;
        for paragraph in &self.paragraphs {
            for line in wrap_text(paragraph, StandardFont::Helvetica, BODY_SIZE, max_width) {
                if y < MARGIN {
                    break;
                }
                if !line.is_empty() {
                    ops.push_str(&text_op("F2", BODY_SIZE, MARGIN, y, &line));
                }
                y -= BODY_SIZE * 1.4;
            }
            y -= BODY_SIZE * 0.6;
        }
        ops
    }

    /// Serializes the stub as a complete PDF 1.4 file with a valid
    /// cross-reference table.
    pub fn to_bytes(&self) -> Vec<u8> {
        let content = self.content_stream();
        let objects: [String; 7] = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT
            ),
            font_dict(StandardFont::HelveticaBold),
            font_dict(StandardFont::Helvetica),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                content.len(),
                content
            ),
            format!(
                "<< /Title {} /Producer {} >>",
                pdf_literal(&encode_win_ansi(&self.title)),
                pdf_literal(PRODUCER.as_bytes())
            ),
        ];

        let mut out: Vec<u8> = Vec::with_capacity(2048);
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_start = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R /Info 7 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_start
            )
            .as_bytes(),
        );
        out
    }
}

fn font_dict(font: StandardFont) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        font.base_font_name()
    )
}

fn text_op(font: &str, size: f32, x: f32, y: f32, text: &str) -> String {
    format!(
        "BT /{} {} Tf {:.2} {:.2} Td {} Tj ET\n",
        font,
        size,
        x,
        y,
        pdf_literal(&encode_win_ansi(text))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub() -> StubDocument {
        StubDocument::new("Offer could not be generated", "Please contact us (ref. 42).")
            .with_paragraph("Recipient: Jörg Müller")
    }

    #[test]
    fn stub_has_pdf_header_and_trailer() {
        let bytes = stub().to_bytes();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn stub_loads_in_a_generic_pdf_reader() {
        let doc = lopdf::Document::load_mem(&stub().to_bytes()).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("Offer could not be generated"), "{text}");
        assert!(text.contains("Please contact us"), "{text}");
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = stub().to_bytes();
        let text = String::from_utf8_lossy(&bytes);
        let start: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert!(bytes[start..].starts_with(b"xref"));
        let table = String::from_utf8_lossy(&bytes[start..]);
        for (i, line) in table.lines().skip(3).take(7).enumerate() {
            let offset: usize = line[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(expected.as_bytes()), "object {}", i + 1);
        }
    }

    #[test]
    fn stream_length_matches_content() {
        let bytes = stub().to_bytes();
        let text = String::from_utf8_lossy(&bytes);
        let content = stub().content_stream();
        assert!(text.contains(&format!("/Length {}", content.len())));
        assert!(text.contains("(Please contact us \\(ref. 42\\).)"));
    }

    #[test]
    fn stub_output_is_stable() {
        assert_eq!(stub().to_bytes(), stub().to_bytes());
    }
}
