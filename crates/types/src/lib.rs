pub mod color;
pub mod data;
pub mod geometry;

pub use color::Color;
pub use data::SharedData;
pub use geometry::{Margins, PageMetrics};
