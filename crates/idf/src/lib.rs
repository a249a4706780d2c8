//! Intermediate Document Format (IDF)
//!
//! The closed set of document primitives every block emits. Elements carry
//! no layout information; the backend decides positions and page breaks.

pub mod format;

use offerdoc_style::{TableStyleRef, TextRole};
use offerdoc_types::SharedData;

/// Where an image's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Encoded image bytes (PNG or JPEG) carried inline.
    Bytes(SharedData),
    /// A key into the draft's resource map.
    Reference(String),
}

/// A backend-agnostic document primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderElement {
    Text {
        content: String,
        role: TextRole,
    },
    Image {
        source: ImageSource,
        /// Requested size in points; the backend scales down to fit the page.
        width: f32,
        height: f32,
        caption: Option<String>,
    },
    Table {
        rows: Vec<Vec<String>>,
        /// Relative column weights. Empty means equal widths.
        column_widths: Vec<f32>,
        style: TableStyleRef,
    },
    Spacer(f32),
    PageBreak,
    /// Children rendered atomically: never split across a page boundary
    /// unless the group is taller than a whole page.
    Group(Vec<RenderElement>),
}

impl RenderElement {
    pub fn text(content: impl Into<String>, role: TextRole) -> Self {
        RenderElement::Text {
            content: content.into(),
            role,
        }
    }

    pub fn body(content: impl Into<String>) -> Self {
        Self::text(content, TextRole::Body)
    }

    pub fn heading(content: impl Into<String>) -> Self {
        Self::text(content, TextRole::Heading)
    }

    pub fn table(rows: Vec<Vec<String>>, column_widths: Vec<f32>, style: TableStyleRef) -> Self {
        RenderElement::Table {
            rows,
            column_widths,
            style,
        }
    }

    pub fn image_bytes(bytes: SharedData, width: f32, height: f32, caption: Option<String>) -> Self {
        RenderElement::Image {
            source: ImageSource::Bytes(bytes),
            width,
            height,
            caption,
        }
    }

    pub fn is_error_marker(&self) -> bool {
        matches!(
            self,
            RenderElement::Text {
                role: TextRole::Error,
                ..
            }
        )
    }

    /// Number of primitives in this element, counting group children
    /// recursively and the group itself once.
    pub fn primitive_count(&self) -> usize {
        match self {
            RenderElement::Group(children) => {
                1 + children.iter().map(RenderElement::primitive_count).sum::<usize>()
            }
            _ => 1,
        }
    }

    /// Concatenated text content, including table cells and captions.
    /// Used for diagnostics and tests.
    pub fn plain_text(&self) -> String {
        match self {
            RenderElement::Text { content, .. } => content.clone(),
            RenderElement::Image { caption, .. } => caption.clone().unwrap_or_default(),
            RenderElement::Table { rows, .. } => rows
                .iter()
                .map(|row| row.join(" | "))
                .collect::<Vec<_>>()
                .join("\n"),
            RenderElement::Group(children) => children
                .iter()
                .map(RenderElement::plain_text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            RenderElement::Spacer(_) | RenderElement::PageBreak => String::new(),
        }
    }
}
