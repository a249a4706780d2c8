//! The single place that knows whether a rendering backend exists.

use crate::error::{FailureReason, panic_message};
use offerdoc_render_core::{
    Diagnostic, DiagnosticKind, DocumentBackend, DocumentDraft, PageDecorator, StubDocument,
};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum BuildStatus {
    Built { page_count: usize },
    Stub { reason: FailureReason, detail: String },
}

/// Bytes are always present: the real document or the stub.
#[derive(Debug, Clone)]
pub struct AdapterOutput {
    pub bytes: Vec<u8>,
    pub status: BuildStatus,
    pub diagnostics: Vec<Diagnostic>,
}

/// Wraps the rendering backend. Backend capability is decided once at
/// construction; a missing or failing backend degrades to the stub document.
#[derive(Clone)]
pub struct BackendAdapter {
    backend: Option<Arc<dyn DocumentBackend>>,
}

impl BackendAdapter {
    /// Uses the compiled-in PDF backend when there is one.
    pub fn detect(compress_streams: bool) -> Self {
        #[cfg(feature = "lopdf-backend")]
        {
            let options = offerdoc_render_lopdf::LopdfOptions {
                compress_streams,
                ..Default::default()
            };
            log::debug!("[BACKEND] Using lopdf backend");
            Self::with_backend(Arc::new(offerdoc_render_lopdf::LopdfBackend::new(options)))
        }
        #[cfg(not(feature = "lopdf-backend"))]
        {
            let _ = compress_streams;
            log::warn!("[BACKEND] No rendering backend compiled in; documents will be stubs");
            Self::unavailable()
        }
    }

    pub fn with_backend(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.name())
    }

    /// Builds the draft. Never fails: backend errors and panics yield `stub`.
    pub fn build(
        &self,
        draft: DocumentDraft,
        decorator: &dyn PageDecorator,
        stub: &StubDocument,
    ) -> AdapterOutput {
        let Some(backend) = &self.backend else {
            return stub_output(
                stub,
                FailureReason::BackendUnavailable,
                "no rendering backend available".to_string(),
            );
        };
        match catch_unwind(AssertUnwindSafe(|| backend.build(draft, decorator))) {
            Ok(Ok(document)) if !document.bytes.is_empty() => AdapterOutput {
                bytes: document.bytes,
                status: BuildStatus::Built {
                    page_count: document.page_count,
                },
                diagnostics: document.diagnostics,
            },
            Ok(Ok(_)) => stub_output(
                stub,
                FailureReason::BackendFailure,
                format!("{} backend produced no output", backend.name()),
            ),
            Ok(Err(e)) => stub_output(
                stub,
                FailureReason::BackendFailure,
                format!("{} backend failed: {}", backend.name(), e),
            ),
            Err(payload) => stub_output(
                stub,
                FailureReason::BackendFailure,
                format!(
                    "{} backend panicked: {}",
                    backend.name(),
                    panic_message(payload.as_ref())
                ),
            ),
        }
    }
}

fn stub_output(stub: &StubDocument, reason: FailureReason, detail: String) -> AdapterOutput {
    log::warn!("[BACKEND] Falling back to stub document: {}", detail);
    AdapterOutput {
        bytes: stub.to_bytes(),
        diagnostics: vec![Diagnostic::new(DiagnosticKind::Backend, detail.clone())],
        status: BuildStatus::Stub { reason, detail },
    }
}

impl fmt::Debug for BackendAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendAdapter")
            .field("backend", &self.backend_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offerdoc_render_core::{BuiltDocument, NoDecoration, RenderError};
    use offerdoc_style::ThemeRegistry;
    use offerdoc_types::PageMetrics;

    struct FailingBackend;

    impl DocumentBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn build(
            &self,
            _draft: DocumentDraft,
            _decorator: &dyn PageDecorator,
        ) -> Result<BuiltDocument, RenderError> {
            Err(RenderError::Other("disk on fire".into()))
        }
    }

    struct PanickingBackend;

    impl DocumentBackend for PanickingBackend {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn build(
            &self,
            _draft: DocumentDraft,
            _decorator: &dyn PageDecorator,
        ) -> Result<BuiltDocument, RenderError> {
            panic!("backend bug")
        }
    }

    fn draft() -> DocumentDraft {
        DocumentDraft::new(ThemeRegistry::built_in().default_theme(), PageMetrics::a4())
    }

    fn stub() -> StubDocument {
        StubDocument::new("Offer unavailable", "Please contact us.")
    }

    #[test]
    fn missing_backend_yields_stub() {
        let output = BackendAdapter::unavailable().build(draft(), &NoDecoration, &stub());
        assert!(output.bytes.starts_with(b"%PDF-"));
        assert!(matches!(
            output.status,
            BuildStatus::Stub { reason: FailureReason::BackendUnavailable, .. }
        ));
    }

    #[test]
    fn backend_errors_and_panics_yield_stub() {
        for backend in [
            Arc::new(FailingBackend) as Arc<dyn DocumentBackend>,
            Arc::new(PanickingBackend),
        ] {
            let output = BackendAdapter::with_backend(backend).build(draft(), &NoDecoration, &stub());
            assert_eq!(output.bytes, stub().to_bytes());
            assert!(matches!(
                output.status,
                BuildStatus::Stub { reason: FailureReason::BackendFailure, .. }
            ));
            assert_eq!(output.diagnostics.len(), 1);
        }
    }

    #[cfg(feature = "lopdf-backend")]
    #[test]
    fn detected_backend_builds_documents() {
        let adapter = BackendAdapter::detect(true);
        assert_eq!(adapter.backend_name(), Some("lopdf"));
        let output = adapter.build(draft(), &NoDecoration, &stub());
        assert!(matches!(output.status, BuildStatus::Built { page_count: 1 }));
    }
}
