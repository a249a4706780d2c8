use crate::LayoutError;
use crate::elements::{ImageElement, LaidOutPage, LayoutElement, PositionedElement, TextElement};
use crate::table::layout_table;
use crate::text::{measure_text, wrap_text};
use offerdoc_idf::RenderElement;
use offerdoc_style::{TextAlign, TextRole, Theme};
use offerdoc_types::PageMetrics;
use std::sync::Arc;

const EPSILON: f32 = 0.01;
const CAPTION_GAP: f32 = 4.0;
const IMAGE_SPACING_AFTER: f32 = 8.0;
const TABLE_SPACING_AFTER: f32 = 8.0;
/// Images are never scaled taller than this share of the content area, so a
/// caption always fits beside them.
const MAX_IMAGE_PAGE_SHARE: f32 = 0.8;

/// A vertical slice of content that is never split. Item coordinates are
/// relative to the slice's top-left corner.
#[derive(Clone, Debug)]
pub(crate) struct Fragment {
    pub height: f32,
    pub items: Vec<PositionedElement>,
}

#[derive(Clone, Debug)]
enum Block {
    Fragment(Fragment),
    Spacer(f32),
    PageBreak,
    /// Kept on one page unless taller than a whole page.
    Keep(Vec<Block>),
    Table {
        header: Option<Fragment>,
        rows: Vec<Fragment>,
    },
}

impl Block {
    fn height(&self) -> f32 {
        match self {
            Block::Fragment(f) => f.height,
            Block::Spacer(h) => *h,
            Block::PageBreak => 0.0,
            Block::Keep(children) => children.iter().map(Block::height).sum(),
            Block::Table { header, rows } => {
                header.as_ref().map_or(0.0, |h| h.height) + rows.iter().map(|r| r.height).sum::<f32>()
            }
        }
    }
}

/// Vertical space inserted before and after a text run of the given role.
fn role_spacing(role: TextRole) -> (f32, f32) {
    match role {
        TextRole::Title => (0.0, 10.0),
        TextRole::Heading => (10.0, 6.0),
        TextRole::Subheading => (6.0, 4.0),
        TextRole::Body | TextRole::Emphasis => (0.0, 4.0),
        TextRole::Small | TextRole::Caption => (0.0, 3.0),
        TextRole::Error => (2.0, 4.0),
    }
}

/// Requested image extents must be finite and positive to be drawn.
fn is_drawable_size(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

pub(crate) fn aligned_x(align: TextAlign, line_width: f32, box_width: f32) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Right => (box_width - line_width).max(0.0),
        TextAlign::Center => ((box_width - line_width) / 2.0).max(0.0),
    }
}

/// Flows render elements top to bottom over as many pages as needed.
pub struct LayoutEngine {
    metrics: PageMetrics,
    theme: Arc<Theme>,
}

impl LayoutEngine {
    pub fn new(metrics: PageMetrics, theme: Arc<Theme>) -> Result<Self, LayoutError> {
        if !metrics.is_usable() {
            return Err(LayoutError::UnusablePage {
                width: metrics.width,
                height: metrics.height,
            });
        }
        Ok(Self { metrics, theme })
    }

    pub fn metrics(&self) -> &PageMetrics {
        &self.metrics
    }

    /// Lays out `elements` in order. Always yields at least one page, even
    /// for empty input.
    pub fn paginate(&self, elements: &[RenderElement]) -> Vec<LaidOutPage> {
        let blocks: Vec<Block> = elements.iter().flat_map(|el| self.to_blocks(el)).collect();
        let mut paginator = Paginator::new(&self.metrics);
        for block in &blocks {
            paginator.place_block(block);
        }
        paginator.finish()
    }

    /// Height the element occupies when laid out on an empty page.
    pub fn measure_height(&self, element: &RenderElement) -> f32 {
        self.to_blocks(element).iter().map(Block::height).sum()
    }

    fn to_blocks(&self, element: &RenderElement) -> Vec<Block> {
        let width = self.metrics.content_width();
        match element {
            RenderElement::Text { content, role } => self.text_blocks(content, *role, width),
            RenderElement::Image {
                source,
                width: requested_width,
                height: requested_height,
                caption,
            } => {
                if !is_drawable_size(*requested_width) || !is_drawable_size(*requested_height) {
                    log::debug!("Skipping image with unusable size {requested_width}x{requested_height}");
                    return Vec::new();
                }
                let max_height = self.metrics.content_height() * MAX_IMAGE_PAGE_SHARE;
                let scale = (width / requested_width)
                    .min(max_height / requested_height)
                    .min(1.0);
                let (w, h) = (requested_width * scale, requested_height * scale);
                let mut items = vec![PositionedElement::new(
                    (width - w) / 2.0,
                    0.0,
                    w,
                    h,
                    LayoutElement::Image(ImageElement {
                        source: source.clone(),
                    }),
                )];
                let mut height = h;
                if let Some(caption) = caption.as_deref().filter(|c| !c.trim().is_empty()) {
                    height += CAPTION_GAP;
                    let style = self.theme.text_style(TextRole::Caption);
                    for line in wrap_text(caption, style.font, style.size, width) {
                        let line_width = measure_text(&line, style.font, style.size);
                        items.push(PositionedElement::new(
                            aligned_x(style.align, line_width, width),
                            height,
                            line_width,
                            style.line_advance(),
                            LayoutElement::Text(TextElement {
                                content: line,
                                font: style.font,
                                size: style.size,
                                color: style.color,
                            }),
                        ));
                        height += style.line_advance();
                    }
                }
                vec![
                    Block::Fragment(Fragment { height, items }),
                    Block::Spacer(IMAGE_SPACING_AFTER),
                ]
            }
            RenderElement::Table {
                rows,
                column_widths,
                style,
            } => {
                let table_style = self.theme.table_style(*style);
                let (header, rows) = layout_table(rows, column_widths, &table_style, width);
                if header.is_none() && rows.is_empty() {
                    return Vec::new();
                }
                vec![
                    Block::Table { header, rows },
                    Block::Spacer(TABLE_SPACING_AFTER),
                ]
            }
            RenderElement::Spacer(size) if *size > 0.0 => vec![Block::Spacer(*size)],
            RenderElement::Spacer(_) => Vec::new(),
            RenderElement::PageBreak => vec![Block::PageBreak],
            RenderElement::Group(children) => {
                let inner: Vec<Block> = children.iter().flat_map(|c| self.to_blocks(c)).collect();
                if inner.is_empty() {
                    Vec::new()
                } else {
                    vec![Block::Keep(inner)]
                }
            }
        }
    }

    fn text_blocks(&self, content: &str, role: TextRole, width: f32) -> Vec<Block> {
        let style = self.theme.text_style(role);
        let (before, after) = role_spacing(role);
        let mut blocks = Vec::new();
        if before > 0.0 {
            blocks.push(Block::Spacer(before));
        }
        for line in wrap_text(content, style.font, style.size, width) {
            let line_width = measure_text(&line, style.font, style.size);
            let items = if line.is_empty() {
                Vec::new()
            } else {
                vec![PositionedElement::new(
                    aligned_x(style.align, line_width, width),
                    0.0,
                    line_width,
                    style.line_advance(),
                    LayoutElement::Text(TextElement {
                        content: line,
                        font: style.font,
                        size: style.size,
                        color: style.color,
                    }),
                )]
            };
            blocks.push(Block::Fragment(Fragment {
                height: style.line_advance(),
                items,
            }));
        }
        if after > 0.0 {
            blocks.push(Block::Spacer(after));
        }
        blocks
    }
}

struct Paginator {
    origin_x: f32,
    origin_y: f32,
    content_height: f32,
    pages: Vec<LaidOutPage>,
    current: Vec<PositionedElement>,
    cursor: f32,
}

impl Paginator {
    fn new(metrics: &PageMetrics) -> Self {
        Self {
            origin_x: metrics.margins.left,
            origin_y: metrics.margins.top,
            content_height: metrics.content_height(),
            pages: Vec::new(),
            current: Vec::new(),
            cursor: 0.0,
        }
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= EPSILON
    }

    fn remaining(&self) -> f32 {
        self.content_height - self.cursor
    }

    fn new_page(&mut self) {
        self.pages.push(LaidOutPage {
            elements: std::mem::take(&mut self.current),
        });
        self.cursor = 0.0;
    }

    fn place_block(&mut self, block: &Block) {
        match block {
            Block::Fragment(fragment) => {
                if fragment.height > self.remaining() + EPSILON && !self.at_page_top() {
                    self.new_page();
                }
                self.emit(fragment);
            }
            Block::Spacer(height) => {
                if self.at_page_top() {
                    return;
                }
                if *height >= self.remaining() {
                    self.new_page();
                } else {
                    self.cursor += height;
                }
            }
            Block::PageBreak => {
                if !self.at_page_top() {
                    self.new_page();
                }
            }
            Block::Keep(children) => {
                let total = block.height();
                if total > self.remaining() + EPSILON && !self.at_page_top() {
                    if total <= self.content_height + EPSILON {
                        self.new_page();
                    } else {
                        log::debug!(
                            "Group of {:.1}pt exceeds the {:.1}pt content area; splitting it",
                            total,
                            self.content_height
                        );
                    }
                }
                for child in children {
                    self.place_block(child);
                }
            }
            Block::Table { header, rows } => self.place_table(header.as_ref(), rows),
        }
    }

    fn place_table(&mut self, header: Option<&Fragment>, rows: &[Fragment]) {
        let header_height = header.map_or(0.0, |h| h.height);
        let lead = header_height + rows.first().map_or(0.0, |r| r.height);
        // The header never ends up alone at the bottom of a page.
        if lead > self.remaining() + EPSILON && !self.at_page_top() {
            self.new_page();
        }
        if let Some(header) = header {
            self.emit(header);
        }
        for (i, row) in rows.iter().enumerate() {
            if i > 0 && row.height > self.remaining() + EPSILON && !self.at_page_top() {
                self.new_page();
                if let Some(header) = header {
                    self.emit(header);
                }
            }
            self.emit(row);
        }
    }

    fn emit(&mut self, fragment: &Fragment) {
        let (dx, dy) = (self.origin_x, self.origin_y + self.cursor);
        self.current
            .extend(fragment.items.iter().cloned().map(|item| item.translated(dx, dy)));
        self.cursor += fragment.height;
    }

    fn finish(mut self) -> Vec<LaidOutPage> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}
