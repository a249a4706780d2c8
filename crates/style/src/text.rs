use crate::font::StandardFont;
use offerdoc_types::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

/// The semantic role of a run of text. Themes map each role to a concrete
/// font, size and color.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextRole {
    Title,
    Heading,
    Subheading,
    #[default]
    Body,
    Emphasis,
    Small,
    Caption,
    /// Visible marker for content that could not be produced.
    Error,
}

/// Concrete text styling resolved from a theme for one role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: StandardFont,
    pub size: f32,
    pub color: Color,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn line_advance(&self) -> f32 {
        self.size * self.line_height
    }
}
