use offerdoc_idf::ImageSource;
use offerdoc_style::StandardFont;
use offerdoc_types::Color;

/// A single drawable item with its absolute position on the page.
///
/// Coordinates are in points, measured from the top-left corner of the page;
/// the backend converts them to the PDF's bottom-left origin.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
}

impl PositionedElement {
    pub fn new(x: f32, y: f32, width: f32, height: f32, element: LayoutElement) -> Self {
        Self {
            x,
            y,
            width,
            height,
            element,
        }
    }

    pub fn translated(mut self, dx: f32, dy: f32) -> Self {
        self.x += dx;
        self.y += dy;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutElement {
    Text(TextElement),
    Rectangle(RectElement),
    Line(LineElement),
    Image(ImageElement),
}

/// One line of text. `y` of the owning element is the top of the line box.
#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    pub content: String,
    pub font: StandardFont,
    pub size: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RectElement {
    pub fill: Option<Color>,
    pub stroke: Option<(Color, f32)>,
}

/// A straight line from `(x, y)` to `(x + width, y + height)`.
#[derive(Clone, Debug, PartialEq)]
pub struct LineElement {
    pub color: Color,
    pub thickness: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageElement {
    pub source: ImageSource,
}

/// The positioned content of one physical page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaidOutPage {
    pub elements: Vec<PositionedElement>,
}

impl LaidOutPage {
    /// All text on the page in drawing order, one line per text element.
    pub fn text_lines(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|el| match &el.element {
                LayoutElement::Text(t) => Some(t.content.as_str()),
                _ => None,
            })
            .collect()
    }
}
