use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use offerdoc_idf::ImageSource;
use offerdoc_layout::{ImageElement, LayoutElement, PositionedElement, TextElement};
use offerdoc_render_core::utils::{encode_win_ansi, flip_y};
use offerdoc_style::StandardFont;
use offerdoc_types::Color;
use std::collections::BTreeMap;

/// An image XObject registered in the shared resources.
pub(crate) struct ImageXObject {
    pub name: String,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Resource names of everything a page may draw with.
pub(crate) struct ResourceNames<'a> {
    /// Image resource key to XObject.
    pub images: &'a BTreeMap<String, ImageXObject>,
}

pub(crate) fn font_resource_name(font: StandardFont) -> String {
    let index = StandardFont::all()
        .iter()
        .position(|f| *f == font)
        .unwrap_or(0);
    format!("F{}", index + 1)
}

/// Accumulates the drawing operations of one page.
pub(crate) struct PageContext<'a> {
    names: ResourceNames<'a>,
    page_height: f32,
    content: Content,
    fill_color: Option<Color>,
}

impl<'a> PageContext<'a> {
    pub fn new(names: ResourceNames<'a>, page_height: f32) -> Self {
        Self {
            names,
            page_height,
            content: Content { operations: vec![] },
            fill_color: None,
        }
    }

    pub fn finish(self) -> Content {
        self.content
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    pub fn draw_element(&mut self, el: &PositionedElement) {
        match &el.element {
            LayoutElement::Text(text) => self.draw_text(text, el),
            LayoutElement::Rectangle(rect) => {
                let y = flip_y(el.y + el.height, self.page_height);
                if let Some(fill) = rect.fill {
                    self.set_fill_color(fill);
                    self.op("re", vec![el.x.into(), y.into(), el.width.into(), el.height.into()]);
                    self.op("f", vec![]);
                }
                if let Some((color, width)) = rect.stroke {
                    self.set_stroke(color, width);
                    self.op("re", vec![el.x.into(), y.into(), el.width.into(), el.height.into()]);
                    self.op("S", vec![]);
                }
            }
            LayoutElement::Line(line) => {
                self.set_stroke(line.color, line.thickness);
                let y1 = flip_y(el.y, self.page_height);
                let y2 = flip_y(el.y + el.height, self.page_height);
                self.op("m", vec![el.x.into(), y1.into()]);
                self.op("l", vec![(el.x + el.width).into(), y2.into()]);
                self.op("S", vec![]);
            }
            LayoutElement::Image(image) => self.draw_image(image, el),
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.fill_color != Some(color) {
            let [r, g, b] = color.to_unit_rgb();
            self.op("rg", vec![r.into(), g.into(), b.into()]);
            self.fill_color = Some(color);
        }
    }

    fn set_stroke(&mut self, color: Color, width: f32) {
        let [r, g, b] = color.to_unit_rgb();
        self.op("RG", vec![r.into(), g.into(), b.into()]);
        self.op("w", vec![width.into()]);
    }

    fn draw_text(&mut self, text: &TextElement, el: &PositionedElement) {
        if text.content.is_empty() {
            return;
        }
        // Baseline sits at 80% of the font size below the top of the glyph box,
        // with the box centred in the line.
        let baseline = el.y + (el.height - text.size).max(0.0) / 2.0 + text.size * 0.8;
        self.set_fill_color(text.color);
        self.op("BT", vec![]);
        self.op(
            "Tf",
            vec![font_resource_name(text.font).into(), text.size.into()],
        );
        self.op("Td", vec![el.x.into(), flip_y(baseline, self.page_height).into()]);
        self.op(
            "Tj",
            vec![Object::String(encode_win_ansi(&text.content), StringFormat::Literal)],
        );
        self.op("ET", vec![]);
    }

    fn draw_image(&mut self, image: &ImageElement, el: &PositionedElement) {
        let ImageSource::Reference(key) = &image.source else {
            log::warn!("Inline image reached the page writer unresolved; skipping");
            return;
        };
        let Some(xobject) = self.names.images.get(key) else {
            log::debug!("Skipping image '{}' without a decoded resource", key);
            return;
        };
        // Fit the pixels into the box without distortion, centred.
        let (px_w, px_h) = (xobject.pixel_width as f32, xobject.pixel_height as f32);
        let scale = (el.width / px_w).min(el.height / px_h);
        let (w, h) = (px_w * scale, px_h * scale);
        let x = el.x + (el.width - w) / 2.0;
        let y = flip_y(el.y + (el.height + h) / 2.0, self.page_height);
        let name = xobject.name.clone().into_bytes();
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![w.into(), 0.into(), 0.into(), h.into(), x.into(), y.into()],
        );
        self.op("Do", vec![Object::Name(name)]);
        self.op("Q", vec![]);
    }
}
