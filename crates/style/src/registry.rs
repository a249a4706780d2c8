use crate::font::StandardFont;
use crate::theme::{FontSizes, Theme, ThemeColors, ThemeFonts};
use log::{debug, warn};
use offerdoc_types::Color;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThemeError {
    #[error("Default theme '{0}' is not registered")]
    UnknownDefault(String),
    #[error("Invalid theme: {0}")]
    Invalid(String),
}

/// The outcome of a name lookup.
#[derive(Debug, Clone)]
pub struct ThemeResolution {
    pub theme: Arc<Theme>,
    /// The name that was asked for, when it had to be replaced by the default.
    pub fallback_from: Option<String>,
}

/// An immutable name -> theme map.
///
/// Built once at startup and shared by reference; it holds no mutable state,
/// so concurrent lookups need no locking.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: HashMap<String, Arc<Theme>>,
    default_name: String,
}

impl ThemeRegistry {
    pub const DEFAULT_THEME: &'static str = "classic";

    /// The registry holding only the built-in themes.
    pub fn built_in() -> Self {
        let mut themes = HashMap::new();
        for theme in built_in_themes() {
            themes.insert(theme.name.clone(), Arc::new(theme));
        }
        Self {
            themes,
            default_name: Self::DEFAULT_THEME.to_string(),
        }
    }

    pub fn builder() -> ThemeRegistryBuilder {
        ThemeRegistryBuilder::new()
    }

    /// Resolves a theme name. Never fails: unknown or empty names yield the
    /// full default theme.
    pub fn resolve(&self, name: &str) -> Arc<Theme> {
        self.resolve_with_fallback(name).theme
    }

    /// Like [`resolve`](Self::resolve), but reports whether a fallback happened.
    pub fn resolve_with_fallback(&self, name: &str) -> ThemeResolution {
        let key = name.trim();
        if let Some(theme) = self.themes.get(key) {
            return ThemeResolution {
                theme: Arc::clone(theme),
                fallback_from: None,
            };
        }
        warn!(
            "[THEMES] Unknown theme '{}', falling back to '{}'",
            name, self.default_name
        );
        ThemeResolution {
            theme: self.default_theme(),
            fallback_from: Some(name.to_string()),
        }
    }

    pub fn default_theme(&self) -> Arc<Theme> {
        match self.themes.get(&self.default_name) {
            Some(theme) => Arc::clone(theme),
            // The builder refuses unknown defaults, so only a hand-assembled
            // registry can get here; the classic palette is always complete.
            None => Arc::new(classic()),
        }
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    /// Registered theme names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::built_in()
    }
}

/// Collects custom themes on top of the built-ins before freezing them into
/// a [`ThemeRegistry`].
pub struct ThemeRegistryBuilder {
    themes: HashMap<String, Arc<Theme>>,
    default_name: String,
}

impl ThemeRegistryBuilder {
    pub fn new() -> Self {
        let registry = ThemeRegistry::built_in();
        Self {
            themes: registry.themes,
            default_name: registry.default_name,
        }
    }

    /// Registers a theme, replacing any theme of the same name.
    pub fn with_theme(mut self, theme: Theme) -> Result<Self, ThemeError> {
        theme.validate().map_err(ThemeError::Invalid)?;
        debug!("[THEMES] Registering theme '{}'", theme.name);
        self.themes.insert(theme.name.clone(), Arc::new(theme));
        Ok(self)
    }

    pub fn with_themes<I: IntoIterator<Item = Theme>>(self, themes: I) -> Result<Self, ThemeError> {
        themes.into_iter().try_fold(self, |builder, theme| builder.with_theme(theme))
    }

    pub fn with_default(mut self, name: &str) -> Self {
        self.default_name = name.to_string();
        self
    }

    pub fn build(self) -> Result<ThemeRegistry, ThemeError> {
        if !self.themes.contains_key(&self.default_name) {
            return Err(ThemeError::UnknownDefault(self.default_name));
        }
        Ok(ThemeRegistry {
            themes: self.themes,
            default_name: self.default_name,
        })
    }
}

impl Default for ThemeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn standard_sizes() -> FontSizes {
    FontSizes {
        title: 24.0,
        heading: 16.0,
        subheading: 12.5,
        body: 10.0,
        small: 8.5,
        caption: 8.0,
        table: 9.0,
    }
}

fn helvetica_fonts() -> ThemeFonts {
    ThemeFonts {
        family_main: StandardFont::Helvetica,
        family_bold: StandardFont::HelveticaBold,
        sizes: standard_sizes(),
    }
}

fn classic() -> Theme {
    Theme {
        name: "classic".to_string(),
        colors: ThemeColors {
            primary: Color::rgb(0x1A, 0x52, 0x76),
            secondary: Color::rgb(0x2E, 0x86, 0xC1),
            accent: Color::rgb(0xF3, 0x9C, 0x12),
            text_primary: Color::rgb(0x21, 0x2F, 0x3D),
            text_secondary: Color::rgb(0x5D, 0x6D, 0x7E),
            background: Color::WHITE,
            border_light: Color::rgb(0xEA, 0xEC, 0xEE),
            border_medium: Color::rgb(0xAB, 0xB2, 0xB9),
            success: Color::rgb(0x27, 0xAE, 0x60),
            warning: Color::rgb(0xE6, 0x7E, 0x22),
            error: Color::rgb(0xC0, 0x39, 0x2B),
        },
        fonts: helvetica_fonts(),
    }
}

fn modern() -> Theme {
    Theme {
        name: "modern".to_string(),
        colors: ThemeColors {
            primary: Color::rgb(0x11, 0x18, 0x27),
            secondary: Color::rgb(0x63, 0x66, 0xF1),
            accent: Color::rgb(0x06, 0xB6, 0xD4),
            text_primary: Color::rgb(0x1F, 0x29, 0x37),
            text_secondary: Color::rgb(0x6B, 0x72, 0x80),
            background: Color::WHITE,
            border_light: Color::rgb(0xF3, 0xF4, 0xF6),
            border_medium: Color::rgb(0xD1, 0xD5, 0xDB),
            success: Color::rgb(0x10, 0xB9, 0x81),
            warning: Color::rgb(0xF5, 0x9E, 0x0B),
            error: Color::rgb(0xEF, 0x44, 0x44),
        },
        fonts: ThemeFonts {
            sizes: FontSizes {
                title: 26.0,
                heading: 17.0,
                ..standard_sizes()
            },
            ..helvetica_fonts()
        },
    }
}

fn eco() -> Theme {
    Theme {
        name: "eco".to_string(),
        colors: ThemeColors {
            primary: Color::rgb(0x1E, 0x84, 0x49),
            secondary: Color::rgb(0x58, 0xD6, 0x8D),
            accent: Color::rgb(0xF4, 0xD0, 0x3F),
            text_primary: Color::rgb(0x1B, 0x26, 0x31),
            text_secondary: Color::rgb(0x56, 0x65, 0x73),
            background: Color::WHITE,
            border_light: Color::rgb(0xE9, 0xF7, 0xEF),
            border_medium: Color::rgb(0xA9, 0xDF, 0xBF),
            success: Color::rgb(0x1E, 0x84, 0x49),
            warning: Color::rgb(0xD6, 0x8A, 0x10),
            error: Color::rgb(0xB0, 0x3A, 0x2E),
        },
        fonts: helvetica_fonts(),
    }
}

fn dark_slate() -> Theme {
    Theme {
        name: "dark-slate".to_string(),
        colors: ThemeColors {
            primary: Color::rgb(0x2C, 0x3E, 0x50),
            secondary: Color::rgb(0x34, 0x49, 0x5E),
            accent: Color::rgb(0xE7, 0x4C, 0x3C),
            text_primary: Color::rgb(0x17, 0x20, 0x2A),
            text_secondary: Color::rgb(0x4D, 0x56, 0x56),
            background: Color::rgb(0xFD, 0xFE, 0xFE),
            border_light: Color::rgb(0xE5, 0xE8, 0xE8),
            border_medium: Color::rgb(0x95, 0xA5, 0xA6),
            success: Color::rgb(0x22, 0x99, 0x54),
            warning: Color::rgb(0xCA, 0x6F, 0x1E),
            error: Color::rgb(0xA9, 0x32, 0x26),
        },
        fonts: ThemeFonts {
            family_main: StandardFont::TimesRoman,
            family_bold: StandardFont::TimesBold,
            sizes: FontSizes {
                body: 10.5,
                ..standard_sizes()
            },
        },
    }
}

fn built_in_themes() -> Vec<Theme> {
    vec![classic(), modern(), eco(), dark_slate()]
}
