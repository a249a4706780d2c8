//! Core rendering abstractions shared by document backends.
//!
//! - [`DocumentDraft`]: the element list plus everything a backend needs
//! - [`DocumentBackend`]: turns a draft into final bytes
//! - [`PageDecorator`]: per-page header/footer callback
//! - [`StubDocument`]: minimal, always-valid PDF used as the degraded output

mod backend;
mod decoration;
mod draft;
mod error;
mod stub;
pub mod utils;

pub use backend::{BuiltDocument, Diagnostic, DiagnosticKind, DocumentBackend};
pub use decoration::{NoDecoration, PageCanvas, PageDecorator, PageInfo};
pub use draft::{DocumentDraft, DocumentMetadata, PageBranding};
pub use error::RenderError;
pub use stub::StubDocument;
