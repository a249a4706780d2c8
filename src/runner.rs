//! Multi-document generation: one independent composer run per recipient.

use crate::backend::BackendAdapter;
use crate::composer::{Composer, ComposerState, stub_document};
use crate::config::{ExecutorKind, GeneratorConfig};
use crate::context::{DocumentContext, DocumentRequest};
use crate::error::{BatchError, ConfigError, FailureReason, panic_message};
use crate::limits::{CancellationToken, RunLimits};
use crate::result::{BatchSummary, GenerationResult, GenerationStatus};
use log::{info, warn};
use offerdoc_executor::{Executor, ExecutorImpl, SyncExecutor};
use offerdoc_style::ThemeRegistry;
use offerdoc_types::PageMetrics;
use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Documents slower than this are reported at info level.
const SLOW_DOCUMENT: Duration = Duration::from_millis(500);

/// Everything a worker needs to generate one document.
#[derive(Clone)]
struct DocumentJob {
    composer: Arc<Composer>,
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl DocumentJob {
    fn run(&self, ctx: &DocumentContext) -> GenerationResult {
        let limits = RunLimits::starting_now(self.cancel.clone(), self.timeout);
        let result = match catch_unwind(AssertUnwindSafe(|| self.composer.generate(ctx, &limits))) {
            Ok(result) => result,
            Err(payload) => aborted_result(ctx, panic_message(payload.as_ref())),
        };
        report(&result);
        result
    }
}

/// The result for a document whose worker died; it still gets a stub.
fn aborted_result(ctx: &DocumentContext, detail: String) -> GenerationResult {
    warn!("[BATCH] {}: generation aborted: {}", ctx.recipient_id, detail);
    GenerationResult {
        recipient_id: ctx.recipient_id.clone(),
        status: GenerationStatus::Failed {
            reason: FailureReason::BackendFailure,
            document: Some(stub_document(ctx, FailureReason::BackendFailure).to_bytes()),
        },
        diagnostics: vec![detail],
        final_state: ComposerState::StubFallback,
        elapsed: Duration::ZERO,
    }
}

fn report(result: &GenerationResult) {
    let outcome = match result.failure_reason() {
        None => "success".to_string(),
        Some(reason) => format!("failed ({})", reason),
    };
    info!(
        "[BATCH] {}: {} in {:.2?}",
        result.recipient_id, outcome, result.elapsed
    );
    if result.elapsed > SLOW_DOCUMENT {
        info!(
            "[BATCH] {}: slow document, took {} ms",
            result.recipient_id,
            result.elapsed.as_millis()
        );
    }
}

fn check_recipient_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), BatchError> {
    let mut seen = HashSet::new();
    for (index, id) in ids.enumerate() {
        if id.trim().is_empty() {
            return Err(BatchError::EmptyRecipientId { index });
        }
        if !seen.insert(id) {
            return Err(BatchError::DuplicateRecipientId(id.to_string()));
        }
    }
    Ok(())
}

fn log_summary(results: &[GenerationResult], elapsed: Duration) -> BatchSummary {
    let summary = BatchSummary::from_results(results);
    info!(
        "[BATCH] Finished {} document(s) in {:.2?}: {} succeeded, {} failed ({} stubs, {} cancelled)",
        summary.total, elapsed, summary.succeeded, summary.failed, summary.stubs, summary.cancelled
    );
    summary
}

/// Generates one document per context, isolating every recipient from the
/// others. Results come back in input order.
pub struct BatchRunner {
    composer: Arc<Composer>,
    executor: ExecutorImpl,
    themes: Arc<ThemeRegistry>,
    page: PageMetrics,
    concurrency_limit: usize,
    document_timeout: Option<Duration>,
}

impl BatchRunner {
    pub fn builder() -> BatchRunnerBuilder {
        BatchRunnerBuilder::new()
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn themes(&self) -> &ThemeRegistry {
        &self.themes
    }

    pub fn executor(&self) -> &ExecutorImpl {
        &self.executor
    }

    /// Freezes a request into a context using this runner's themes and page.
    pub fn context_for(&self, request: DocumentRequest) -> Arc<DocumentContext> {
        DocumentContext::from_request(request, &self.themes, self.page)
    }

    fn job(&self, cancel: &CancellationToken) -> DocumentJob {
        DocumentJob {
            composer: Arc::clone(&self.composer),
            cancel: cancel.clone(),
            timeout: self.document_timeout,
        }
    }

    /// Generates a single document on the calling thread.
    pub fn generate_one(&self, ctx: &DocumentContext, cancel: &CancellationToken) -> GenerationResult {
        self.job(cancel).run(ctx)
    }

    /// Fails only on malformed input; every recipient failure is a result.
    pub fn generate_all(
        &self,
        contexts: Vec<Arc<DocumentContext>>,
        cancel: &CancellationToken,
    ) -> Result<Vec<GenerationResult>, BatchError> {
        check_recipient_ids(contexts.iter().map(|c| c.recipient_id.as_str()))?;
        info!(
            "[BATCH] Generating {} document(s) with {} (parallelism {})",
            contexts.len(),
            self.executor.name(),
            self.executor.parallelism()
        );
        let started = Instant::now();
        let job = self.job(cancel);
        let results = self
            .executor
            .execute_all(contexts, move |ctx: Arc<DocumentContext>| job.run(&ctx));
        log_summary(&results, started.elapsed());
        Ok(results)
    }

    pub fn generate_requests(
        &self,
        requests: Vec<DocumentRequest>,
        cancel: &CancellationToken,
    ) -> Result<Vec<GenerationResult>, BatchError> {
        let contexts = requests.into_iter().map(|r| self.context_for(r)).collect();
        self.generate_all(contexts, cancel)
    }

    /// Async variant for callers already inside a tokio runtime. At most
    /// `concurrency_limit` documents are built at once, each on the blocking
    /// pool.
    pub async fn generate_all_async(
        &self,
        contexts: Vec<Arc<DocumentContext>>,
        cancel: &CancellationToken,
    ) -> Result<Vec<GenerationResult>, BatchError> {
        check_recipient_ids(contexts.iter().map(|c| c.recipient_id.as_str()))?;
        info!(
            "[BATCH] Generating {} document(s) asynchronously (limit {})",
            contexts.len(),
            self.concurrency_limit
        );
        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.concurrency_limit.max(1)));

        let mut handles = Vec::with_capacity(contexts.len());
        for ctx in contexts {
            let job = self.job(cancel);
            let semaphore = Arc::clone(&semaphore);
            let task_ctx = Arc::clone(&ctx);
            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                tokio::task::spawn_blocking(move || job.run(&task_ctx)).await
            });
            handles.push((ctx, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (ctx, handle) in handles {
            let result = match handle.await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) | Err(e) => aborted_result(&ctx, e.to_string()),
            };
            results.push(result);
        }
        log_summary(&results, started.elapsed());
        Ok(results)
    }
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("composer", &self.composer)
            .field("executor", &self.executor)
            .field("concurrency_limit", &self.concurrency_limit)
            .field("document_timeout", &self.document_timeout)
            .finish()
    }
}

/// Fluent construction of a [`BatchRunner`]. Later calls win over the
/// values of an earlier [`with_config`](Self::with_config).
pub struct BatchRunnerBuilder {
    config: GeneratorConfig,
    executor: Option<ExecutorImpl>,
    backend: Option<BackendAdapter>,
    composer: Option<Composer>,
    themes: Option<ThemeRegistry>,
}

impl BatchRunnerBuilder {
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            executor: None,
            backend: None,
            composer: None,
            themes: None,
        }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.config.concurrency_limit = workers;
        self
    }

    pub fn with_document_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.document_timeout_ms = timeout.map(|t| t.as_millis() as u64);
        self
    }

    pub fn with_executor(mut self, executor: ExecutorImpl) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Ignored when a complete composer is supplied.
    pub fn with_backend(mut self, backend: BackendAdapter) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_composer(mut self, composer: Composer) -> Self {
        self.composer = Some(composer);
        self
    }

    pub fn with_themes(mut self, themes: ThemeRegistry) -> Self {
        self.themes = Some(themes);
        self
    }

    pub fn build(self) -> Result<BatchRunner, ConfigError> {
        let config = self.config;
        config.validate()?;
        let themes = match self.themes {
            Some(themes) => themes,
            None => config.theme_registry()?,
        };
        let composer = match self.composer {
            Some(composer) => composer,
            None => Composer::builder()
                .with_standard_blocks()
                .with_backend(
                    self.backend
                        .unwrap_or_else(|| BackendAdapter::detect(config.compress_streams)),
                )
                .with_block_time_limit(config.block_time_limit())
                .build()?,
        };
        let executor = self.executor.unwrap_or_else(|| match config.executor {
            ExecutorKind::Sync => ExecutorImpl::Sync(SyncExecutor::new()),
            ExecutorKind::Rayon => ExecutorImpl::bounded(config.concurrency_limit),
        });
        Ok(BatchRunner {
            composer: Arc::new(composer),
            executor,
            themes: Arc::new(themes),
            page: config.page,
            concurrency_limit: config.concurrency_limit,
            document_timeout: config.document_timeout(),
        })
    }
}

impl Default for BatchRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
