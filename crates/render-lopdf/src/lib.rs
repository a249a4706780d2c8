//! PDF backend for offerdoc drafts.
//!
//! Lays the draft out with `offerdoc-layout`, lets the page decorator add
//! headers and footers to every page and writes the result with `lopdf`
//! using the standard Type1 fonts.

mod page;
mod renderer;
mod resources;

pub use renderer::{LopdfBackend, LopdfOptions};
