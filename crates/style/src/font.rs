use serde::{Deserialize, Serialize};

/// The standard PDF base fonts a theme may reference.
///
/// These need no embedding, which keeps every generated document
/// self-contained without shipping font files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    TimesRoman,
    TimesBold,
    Courier,
    CourierBold,
}

impl StandardFont {
    /// The `BaseFont` name written into the PDF font dictionary.
    pub fn base_font_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
        }
    }

    /// Average glyph advance as a fraction of the font size.
    pub fn average_advance(self) -> f32 {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaOblique => 0.50,
            StandardFont::HelveticaBold => 0.55,
            StandardFont::TimesRoman => 0.45,
            StandardFont::TimesBold => 0.48,
            StandardFont::Courier | StandardFont::CourierBold => 0.60,
        }
    }

    pub fn all() -> [StandardFont; 7] {
        [
            StandardFont::Helvetica,
            StandardFont::HelveticaBold,
            StandardFont::HelveticaOblique,
            StandardFont::TimesRoman,
            StandardFont::TimesBold,
            StandardFont::Courier,
            StandardFont::CourierBold,
        ]
    }
}
