use crate::font::StandardFont;
use crate::text::TextAlign;
use crate::theme::Theme;
use offerdoc_types::Color;
use serde::{Deserialize, Serialize};

/// Names the table style variant a table element asks for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TableStyleRef {
    /// Header row plus striped body.
    #[default]
    Standard,
    /// Two columns of label/value pairs without a header row.
    KeyValue,
    /// Header row, numeric columns right-aligned.
    Financial,
}

/// Concrete table styling derived from a theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub has_header: bool,
    pub header_font: StandardFont,
    pub header_background: Color,
    pub header_text: Color,
    pub body_font: StandardFont,
    pub label_font: StandardFont,
    pub body_text: Color,
    pub stripe_background: Option<Color>,
    pub border_color: Color,
    pub border_width: f32,
    pub font_size: f32,
    pub cell_padding: f32,
    /// Alignment of every column after the first.
    pub value_align: TextAlign,
}

impl TableStyle {
    /// Pure function of the theme: the same theme and kind always yield an
    /// equal style.
    pub fn for_theme(theme: &Theme, kind: TableStyleRef) -> TableStyle {
        let colors = &theme.colors;
        let fonts = &theme.fonts;
        let base = TableStyle {
            has_header: true,
            header_font: fonts.family_bold,
            header_background: colors.primary,
            header_text: colors.background,
            body_font: fonts.family_main,
            label_font: fonts.family_main,
            body_text: colors.text_primary,
            stripe_background: Some(colors.border_light),
            border_color: colors.border_medium,
            border_width: 0.5,
            font_size: fonts.sizes.table,
            cell_padding: 4.0,
            value_align: TextAlign::Left,
        };

        match kind {
            TableStyleRef::Standard => base,
            TableStyleRef::KeyValue => TableStyle {
                has_header: false,
                label_font: fonts.family_bold,
                stripe_background: None,
                border_color: colors.border_light,
                value_align: TextAlign::Right,
                ..base
            },
            TableStyleRef::Financial => TableStyle {
                header_background: colors.secondary,
                value_align: TextAlign::Right,
                ..base
            },
        }
    }
}
