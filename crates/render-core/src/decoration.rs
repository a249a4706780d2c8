use offerdoc_idf::ImageSource;
use offerdoc_layout::text::measure_text;
use offerdoc_layout::{
    ImageElement, LayoutElement, LineElement, PositionedElement, TextElement,
};
use offerdoc_style::{TextStyle, Theme};
use offerdoc_types::{Color, PageMetrics};
use std::sync::Arc;

/// Everything a page decorator may see. Block content is deliberately not
/// part of it.
#[derive(Debug, Clone)]
pub struct PageInfo {
    /// Zero-based index of the page being decorated.
    pub index: usize,
    pub total_pages: usize,
    pub company_name: String,
    /// Resource key of the company logo, if the draft carries one.
    pub logo: Option<String>,
    pub contact_line: Option<String>,
    pub theme: Arc<Theme>,
    pub metrics: PageMetrics,
}

impl PageInfo {
    /// One-based page number for display.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Per-page header/footer callback, invoked once for every physical page.
pub trait PageDecorator: Send + Sync {
    fn decorate(&self, page: &PageInfo, canvas: &mut PageCanvas);
}

/// Leaves every page untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDecoration;

impl PageDecorator for NoDecoration {
    fn decorate(&self, _page: &PageInfo, _canvas: &mut PageCanvas) {}
}

/// Collects decoration drawing operations in page coordinates (top-left
/// origin, points).
#[derive(Debug, Default)]
pub struct PageCanvas {
    elements: Vec<PositionedElement>,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws one line of text with its top edge at `y`.
    pub fn text(&mut self, x: f32, y: f32, content: &str, style: &TextStyle) {
        let width = measure_text(content, style.font, style.size);
        self.elements.push(PositionedElement::new(
            x,
            y,
            width,
            style.line_advance(),
            LayoutElement::Text(TextElement {
                content: content.to_string(),
                font: style.font,
                size: style.size,
                color: style.color,
            }),
        ));
    }

    /// Draws text so that it ends at `right`.
    pub fn text_right(&mut self, right: f32, y: f32, content: &str, style: &TextStyle) {
        let width = measure_text(content, style.font, style.size);
        self.text(right - width, y, content, style);
    }

    pub fn horizontal_line(&mut self, x1: f32, x2: f32, y: f32, color: Color, thickness: f32) {
        self.elements.push(PositionedElement::new(
            x1,
            y,
            x2 - x1,
            0.0,
            LayoutElement::Line(LineElement { color, thickness }),
        ));
    }

    /// Draws an image resource by key. Unknown keys are skipped by the backend.
    pub fn image(&mut self, x: f32, y: f32, width: f32, height: f32, resource_key: &str) {
        self.elements.push(PositionedElement::new(
            x,
            y,
            width,
            height,
            LayoutElement::Image(ImageElement {
                source: ImageSource::Reference(resource_key.to_string()),
            }),
        ));
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn into_elements(self) -> Vec<PositionedElement> {
        self.elements
    }
}
