use crate::font::StandardFont;
use crate::table::{TableStyle, TableStyleRef};
use crate::text::{TextAlign, TextRole, TextStyle};
use offerdoc_types::Color;
use serde::{Deserialize, Serialize};

/// Every color a block or the page decoration may reference.
///
/// All keys are mandatory, so a deserialized theme is always complete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ThemeColors {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub background: Color,
    pub border_light: Color,
    pub border_medium: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

/// Font sizes per text role, in points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FontSizes {
    pub title: f32,
    pub heading: f32,
    pub subheading: f32,
    pub body: f32,
    pub small: f32,
    pub caption: f32,
    pub table: f32,
}

impl FontSizes {
    fn all(&self) -> [f32; 7] {
        [
            self.title,
            self.heading,
            self.subheading,
            self.body,
            self.small,
            self.caption,
            self.table,
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThemeFonts {
    pub family_main: StandardFont,
    pub family_bold: StandardFont,
    pub sizes: FontSizes,
}

/// A named, complete bundle of colors, fonts and table styles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
    pub fonts: ThemeFonts,
}

impl Theme {
    /// Checks the invariants serde cannot express: a non-empty name and
    /// strictly positive, finite font sizes.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("theme name must not be empty".to_string());
        }
        if let Some(bad) = self
            .fonts
            .sizes
            .all()
            .into_iter()
            .find(|s| !s.is_finite() || *s <= 0.0)
        {
            return Err(format!("theme '{}' has invalid font size {}", self.name, bad));
        }
        Ok(())
    }

    /// Resolves the concrete text style for a role.
    pub fn text_style(&self, role: TextRole) -> TextStyle {
        let sizes = &self.fonts.sizes;
        let colors = &self.colors;
        let (font, size, color, line_height) = match role {
            TextRole::Title => (self.fonts.family_bold, sizes.title, colors.primary, 1.25),
            TextRole::Heading => (self.fonts.family_bold, sizes.heading, colors.primary, 1.3),
            TextRole::Subheading => (
                self.fonts.family_bold,
                sizes.subheading,
                colors.secondary,
                1.3,
            ),
            TextRole::Body => (self.fonts.family_main, sizes.body, colors.text_primary, 1.4),
            TextRole::Emphasis => (self.fonts.family_bold, sizes.body, colors.accent, 1.4),
            TextRole::Small => (
                self.fonts.family_main,
                sizes.small,
                colors.text_secondary,
                1.35,
            ),
            TextRole::Caption => (
                self.fonts.family_main,
                sizes.caption,
                colors.text_secondary,
                1.3,
            ),
            TextRole::Error => (self.fonts.family_bold, sizes.body, colors.error, 1.4),
        };
        TextStyle {
            font,
            size,
            color,
            line_height,
            align: if role == TextRole::Caption {
                TextAlign::Center
            } else {
                TextAlign::Left
            },
        }
    }

    pub fn table_style(&self, kind: TableStyleRef) -> TableStyle {
        TableStyle::for_theme(self, kind)
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::ThemeRegistry;
    use crate::text::TextRole;

    #[test]
    fn headings_use_bold_family_and_primary_color() {
        let theme = ThemeRegistry::built_in().default_theme();
        let style = theme.text_style(TextRole::Heading);
        assert_eq!(style.font, theme.fonts.family_bold);
        assert_eq!(style.color, theme.colors.primary);
    }

    #[test]
    fn error_role_uses_error_color() {
        let theme = ThemeRegistry::built_in().default_theme();
        assert_eq!(theme.text_style(TextRole::Error).color, theme.colors.error);
    }

    #[test]
    fn validate_rejects_non_positive_sizes() {
        let mut theme = (*ThemeRegistry::built_in().default_theme()).clone();
        theme.fonts.sizes.body = 0.0;
        assert!(theme.validate().is_err());
    }

    #[test]
    fn deserializing_an_incomplete_theme_fails() {
        let json = r##"{"name":"half","colors":{"primary":"#000"},"fonts":{}}"##;
        assert!(serde_json::from_str::<super::Theme>(json).is_err());
    }
}
