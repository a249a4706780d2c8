//! The per-document pipeline: validate the context, render every block in
//! registration order, then hand the draft to the backend adapter.

use crate::backend::{BackendAdapter, BuildStatus};
use crate::block::{Block, is_included, standard_blocks};
use crate::context::DocumentContext;
use crate::decorator::StandardPageDecorator;
use crate::error::{
    BlockFailure, BlockRenderError, ConfigError, FailureReason, FatalContextError, panic_message,
};
use crate::limits::{Interrupt, RunLimits};
use crate::result::{GenerationResult, GenerationStatus};
use crate::validation::validate_context;
use log::{debug, warn};
use offerdoc_idf::RenderElement;
use offerdoc_render_core::{DocumentDraft, DocumentMetadata, PageBranding, StubDocument};
use offerdoc_style::TextRole;
use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Resource key under which the company logo is stored in every draft.
pub const LOGO_RESOURCE_KEY: &str = "company-logo";

pub const DEFAULT_BLOCK_TIME_LIMIT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    Init,
    Validating,
    /// Index of the block being evaluated.
    Rendering(usize),
    Building,
    Done,
    StubFallback,
    Cancelled,
}

/// What a block added to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContribution {
    pub block: &'static str,
    pub element_count: usize,
    pub failed: bool,
}

/// A fully composed draft, before the backend has seen it.
#[derive(Debug)]
pub struct DraftOutcome {
    pub draft: DocumentDraft,
    /// Non-fatal validation findings.
    pub warnings: Vec<String>,
    pub failures: Vec<BlockRenderError>,
    pub contributions: Vec<BlockContribution>,
    pub skipped: Vec<&'static str>,
}

impl DraftOutcome {
    pub fn elements(&self) -> &[RenderElement] {
        self.draft.elements()
    }

    pub fn contribution(&self, block: &str) -> Option<&BlockContribution> {
        self.contributions.iter().find(|c| c.block == block)
    }

    pub fn error_marker_count(&self) -> usize {
        self.elements().iter().filter(|e| e.is_error_marker()).count()
    }
}

/// Why composition stopped before a draft was complete.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComposeStop {
    #[error(transparent)]
    Fatal(#[from] FatalContextError),
    #[error("composition interrupted: {0:?}")]
    Interrupted(Interrupt),
}

struct StateTracker<'a> {
    recipient: &'a str,
    state: ComposerState,
}

impl<'a> StateTracker<'a> {
    fn new(recipient: &'a str) -> Self {
        Self {
            recipient,
            state: ComposerState::Init,
        }
    }

    fn advance(&mut self, next: ComposerState) {
        debug!("[COMPOSER] {}: {:?} -> {:?}", self.recipient, self.state, next);
        self.state = next;
    }
}

/// Runs a fixed, ordered list of blocks over a context.
///
/// A composer is immutable after construction and is shared by all workers
/// of a batch.
pub struct Composer {
    blocks: Vec<Arc<dyn Block>>,
    backend: BackendAdapter,
    block_time_limit: Option<Duration>,
}

impl Composer {
    pub fn builder() -> ComposerBuilder {
        ComposerBuilder::new()
    }

    pub fn block_names(&self) -> Vec<&'static str> {
        self.blocks.iter().map(|b| b.name()).collect()
    }

    pub fn backend(&self) -> &BackendAdapter {
        &self.backend
    }

    /// Validates the context and renders all included blocks into a draft.
    pub fn compose_draft(
        &self,
        ctx: &DocumentContext,
        limits: &RunLimits,
    ) -> Result<DraftOutcome, ComposeStop> {
        let mut tracker = StateTracker::new(&ctx.recipient_id);
        self.compose(ctx, limits, &mut tracker)
    }

    /// Runs the whole pipeline. Never panics and never returns without a
    /// result; every failure maps to a [`GenerationStatus::Failed`].
    pub fn generate(&self, ctx: &DocumentContext, limits: &RunLimits) -> GenerationResult {
        let started = Instant::now();
        let mut tracker = StateTracker::new(&ctx.recipient_id);
        let (status, diagnostics) = match self.compose(ctx, limits, &mut tracker) {
            Ok(outcome) => self.build(ctx, outcome, &mut tracker),
            Err(ComposeStop::Fatal(error)) => {
                tracker.advance(ComposerState::StubFallback);
                warn!(
                    "[COMPOSER] {}: {}; producing stub document",
                    ctx.recipient_id, error
                );
                let stub = stub_document(ctx, FailureReason::FatalContext);
                (
                    GenerationStatus::Failed {
                        reason: FailureReason::FatalContext,
                        document: Some(stub.to_bytes()),
                    },
                    vec![error.to_string()],
                )
            }
            Err(ComposeStop::Interrupted(Interrupt::Cancelled)) => {
                tracker.advance(ComposerState::Cancelled);
                (
                    GenerationStatus::Failed {
                        reason: FailureReason::Cancelled,
                        document: None,
                    },
                    vec!["generation was cancelled".to_string()],
                )
            }
            Err(ComposeStop::Interrupted(Interrupt::TimedOut)) => {
                tracker.advance(ComposerState::StubFallback);
                warn!(
                    "[COMPOSER] {}: document deadline exceeded; producing stub document",
                    ctx.recipient_id
                );
                let stub = stub_document(ctx, FailureReason::Timeout);
                (
                    GenerationStatus::Failed {
                        reason: FailureReason::Timeout,
                        document: Some(stub.to_bytes()),
                    },
                    vec!["document deadline exceeded".to_string()],
                )
            }
        };
        GenerationResult {
            recipient_id: ctx.recipient_id.clone(),
            status,
            diagnostics,
            final_state: tracker.state,
            elapsed: started.elapsed(),
        }
    }

    fn compose(
        &self,
        ctx: &DocumentContext,
        limits: &RunLimits,
        tracker: &mut StateTracker<'_>,
    ) -> Result<DraftOutcome, ComposeStop> {
        if let Some(interrupt) = limits.check() {
            return Err(ComposeStop::Interrupted(interrupt));
        }
        tracker.advance(ComposerState::Validating);
        let report = validate_context(ctx)?;
        for warning in &report.warnings {
            debug!("[COMPOSER] {}: {}", ctx.recipient_id, warning);
        }

        let mut draft = new_draft(ctx);
        let mut failures = Vec::new();
        let mut contributions = Vec::new();
        let mut skipped = Vec::new();

        for (index, block) in self.blocks.iter().enumerate() {
            if let Some(interrupt) = limits.check() {
                return Err(ComposeStop::Interrupted(interrupt));
            }
            tracker.advance(ComposerState::Rendering(index));
            if !is_included(block.as_ref(), ctx) {
                debug!(
                    "[COMPOSER] {}: skipping block '{}'",
                    ctx.recipient_id,
                    block.name()
                );
                skipped.push(block.name());
                continue;
            }
            let (elements, failed) = match self.render_block(block.as_ref(), ctx) {
                Ok(elements) => (elements, false),
                Err(cause) => {
                    let error = BlockRenderError {
                        block: block.name().to_string(),
                        cause,
                    };
                    warn!("[COMPOSER] {}: {}", ctx.recipient_id, error);
                    failures.push(error);
                    (vec![error_marker(ctx, block.name())], true)
                }
            };
            contributions.push(BlockContribution {
                block: block.name(),
                element_count: elements.len(),
                failed,
            });
            draft.extend(elements);
        }

        if let Some(interrupt) = limits.check() {
            return Err(ComposeStop::Interrupted(interrupt));
        }
        Ok(DraftOutcome {
            draft,
            warnings: report.warnings,
            failures,
            contributions,
            skipped,
        })
    }

    /// Renders one block in isolation. Panics, over-long renders and empty
    /// output from a required block all become block failures.
    fn render_block(
        &self,
        block: &dyn Block,
        ctx: &DocumentContext,
    ) -> Result<Vec<RenderElement>, BlockFailure> {
        let started = Instant::now();
        let elements = catch_unwind(AssertUnwindSafe(|| block.render(ctx)))
            .map_err(|payload| BlockFailure::Panicked(panic_message(payload.as_ref())))??;
        if let Some(limit) = self.block_time_limit {
            let elapsed = started.elapsed();
            if elapsed > limit {
                return Err(BlockFailure::TimeLimitExceeded {
                    limit_ms: limit.as_millis() as u64,
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }
        }
        if elements.is_empty() && block.required() {
            return Err(BlockFailure::MissingData(
                "required block produced no content".to_string(),
            ));
        }
        Ok(elements)
    }

    fn build(
        &self,
        ctx: &DocumentContext,
        outcome: DraftOutcome,
        tracker: &mut StateTracker<'_>,
    ) -> (GenerationStatus, Vec<String>) {
        tracker.advance(ComposerState::Building);
        let mut diagnostics = outcome.warnings;
        diagnostics.extend(outcome.failures.iter().map(ToString::to_string));

        let decorator = StandardPageDecorator::for_context(ctx);
        let stub = stub_document(ctx, FailureReason::BackendFailure);
        let output = self.backend.build(outcome.draft, &decorator, &stub);
        diagnostics.extend(output.diagnostics.iter().map(ToString::to_string));

        match output.status {
            BuildStatus::Built { page_count } => {
                tracker.advance(ComposerState::Done);
                debug!(
                    "[COMPOSER] {}: built {} page(s), {} bytes",
                    ctx.recipient_id,
                    page_count,
                    output.bytes.len()
                );
                (GenerationStatus::Success(output.bytes), diagnostics)
            }
            BuildStatus::Stub { reason, .. } => {
                tracker.advance(ComposerState::StubFallback);
                (
                    GenerationStatus::Failed {
                        reason,
                        document: Some(output.bytes),
                    },
                    diagnostics,
                )
            }
        }
    }
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("blocks", &self.block_names())
            .field("backend", &self.backend)
            .field("block_time_limit", &self.block_time_limit)
            .finish()
    }
}

fn new_draft(ctx: &DocumentContext) -> DocumentDraft {
    let mut draft = DocumentDraft::new(Arc::clone(&ctx.theme), ctx.page_metrics);
    draft.metadata = DocumentMetadata {
        title: ctx.text("document.title", "Photovoltaic offer").to_string(),
        author: ctx.company.name.clone(),
        subject: ctx.project.as_ref().and_then(|p| p.project_name.clone()),
        created: ctx.created_at,
    };
    draft.branding = PageBranding {
        company_name: ctx.company.name.clone(),
        logo: None,
        contact_line: ctx.company.contact_line(),
    };
    if let Some(logo) = &ctx.company.logo {
        draft.add_resource(LOGO_RESOURCE_KEY, Arc::clone(logo));
        draft.branding.logo = Some(LOGO_RESOURCE_KEY.to_string());
    }
    draft
}

fn error_marker(ctx: &DocumentContext, block: &str) -> RenderElement {
    let template = ctx.text(
        "error.block_failed",
        "The section '{block}' could not be generated.",
    );
    RenderElement::text(template.replace("{block}", block), TextRole::Error)
}

/// The single-page fallback document for a recipient, with a non-technical
/// explanation of what went wrong.
pub fn stub_document(ctx: &DocumentContext, reason: FailureReason) -> StubDocument {
    let title = ctx.text("stub.title", "Your offer could not be completed");
    let message = match reason {
        FailureReason::FatalContext => ctx.text(
            "stub.message.incomplete_data",
            "Some information needed for your offer was missing. We will send you the complete offer shortly.",
        ),
        FailureReason::Timeout => ctx.text(
            "stub.message.timeout",
            "Preparing your offer took longer than expected. We will send you the complete offer shortly.",
        ),
        FailureReason::BackendUnavailable
        | FailureReason::BackendFailure
        | FailureReason::Cancelled => ctx.text(
            "stub.message.technical",
            "A technical problem prevented us from producing the full document. We will send you the complete offer shortly.",
        ),
    };
    let mut stub = StubDocument::new(title, message);
    if let Some(name) = ctx.customer_name() {
        stub = stub.with_paragraph(format!("{} {}", ctx.text("stub.recipient", "Prepared for:"), name));
    }
    if let Some(contact) = ctx.company.contact_line() {
        stub = stub.with_paragraph(contact);
    }
    stub
}

/// Fluent construction of a [`Composer`].
pub struct ComposerBuilder {
    blocks: Vec<Arc<dyn Block>>,
    backend: Option<BackendAdapter>,
    block_time_limit: Option<Duration>,
}

impl ComposerBuilder {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            backend: None,
            block_time_limit: Some(DEFAULT_BLOCK_TIME_LIMIT),
        }
    }

    pub fn with_block(mut self, block: Arc<dyn Block>) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_blocks<I: IntoIterator<Item = Arc<dyn Block>>>(mut self, blocks: I) -> Self {
        self.blocks.extend(blocks);
        self
    }

    pub fn with_standard_blocks(self) -> Self {
        self.with_blocks(standard_blocks())
    }

    pub fn with_backend(mut self, backend: BackendAdapter) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn without_backend(self) -> Self {
        self.with_backend(BackendAdapter::unavailable())
    }

    pub fn with_block_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.block_time_limit = limit;
        self
    }

    pub fn build(self) -> Result<Composer, ConfigError> {
        if self.blocks.is_empty() {
            return Err(ConfigError::Invalid("no blocks registered".to_string()));
        }
        let mut seen = HashSet::new();
        for block in &self.blocks {
            if !seen.insert(block.name()) {
                return Err(ConfigError::Invalid(format!(
                    "block '{}' is registered more than once",
                    block.name()
                )));
            }
        }
        Ok(Composer {
            blocks: self.blocks,
            backend: self.backend.unwrap_or_else(|| BackendAdapter::detect(true)),
            block_time_limit: self.block_time_limit,
        })
    }
}

impl Default for ComposerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
