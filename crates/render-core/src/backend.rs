use crate::decoration::PageDecorator;
use crate::draft::DocumentDraft;
use crate::error::RenderError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An element could not be rendered as given and was replaced.
    ElementResource,
    /// The backend itself degraded the output.
    Backend,
}

/// A non-fatal issue recorded while building a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DiagnosticKind::ElementResource => "element",
            DiagnosticKind::Backend => "backend",
        };
        write!(f, "[{}] {}", kind, self.message)
    }
}

/// Final bytes of a document plus what happened on the way.
#[derive(Debug, Clone)]
pub struct BuiltDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// A rendering engine that turns a draft into a finished document.
///
/// The draft is consumed: a draft is built exactly once.
pub trait DocumentBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn build(
        &self,
        draft: DocumentDraft,
        decorator: &dyn PageDecorator,
    ) -> Result<BuiltDocument, RenderError>;
}
