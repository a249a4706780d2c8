//! Theme registry and style resolution.
//!
//! A [`Theme`] is a complete, named bundle of colors, font specs and table
//! style factories. The [`ThemeRegistry`] resolves theme names and never fails:
//! unknown names resolve to the registry's default theme.

pub mod font;
pub mod registry;
pub mod table;
pub mod text;
pub mod theme;

pub use font::StandardFont;
pub use registry::{ThemeError, ThemeRegistry, ThemeRegistryBuilder, ThemeResolution};
pub use table::{TableStyle, TableStyleRef};
pub use text::{TextAlign, TextRole, TextStyle};
pub use theme::{FontSizes, Theme, ThemeColors, ThemeFonts};
