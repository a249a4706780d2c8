use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Page of {width:.1}x{height:.1}pt leaves no content area inside its margins")]
    UnusablePage { width: f32, height: f32 },
}

mod elements;
mod engine;
mod table;
pub mod text;

pub use self::elements::{
    ImageElement, LaidOutPage, LayoutElement, LineElement, PositionedElement, RectElement,
    TextElement,
};
pub use self::engine::LayoutEngine;
