//! Page geometry in PDF points (1/72 inch).
use serde::{Deserialize, Serialize};

const POINTS_PER_MM: f32 = 2.835;

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn from_mm(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top: top * POINTS_PER_MM,
            right: right * POINTS_PER_MM,
            bottom: bottom * POINTS_PER_MM,
            left: left * POINTS_PER_MM,
        }
    }
}

/// Physical page size plus the margins that frame the content area.
///
/// Header and footer decoration is drawn inside the top and bottom margins,
/// so the content area is exactly the page minus the margins.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PageMetrics {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageMetrics {
    pub fn a4() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margins: Margins::from_mm(25.0, 20.0, 22.0, 20.0),
        }
    }

    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margins: Margins::all(72.0),
        }
    }

    pub fn content_width(&self) -> f32 {
        (self.width - self.margins.left - self.margins.right).max(0.0)
    }

    pub fn content_height(&self) -> f32 {
        (self.height - self.margins.top - self.margins.bottom).max(0.0)
    }

    /// A page is usable when its content box has a positive area.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.content_width() > 0.0
            && self.content_height() > 0.0
    }
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self::a4()
    }
}
