//! Personalised offer documents, one per recipient.
//!
//! A [`DocumentRequest`] is frozen into a [`DocumentContext`], the
//! [`Composer`] runs the registered [`Block`]s over it in order and the
//! [`BackendAdapter`] turns the resulting draft into PDF bytes. A failing
//! block costs only its own section; a failing context or backend still
//! yields a valid single-page stub. [`BatchRunner`] does this for many
//! recipients at once.

pub mod backend;
pub mod block;
pub mod composer;
pub mod config;
pub mod context;
pub mod decorator;
pub mod error;
pub mod limits;
pub mod result;
pub mod runner;
pub mod validation;

pub use backend::{AdapterOutput, BackendAdapter, BuildStatus};
pub use block::{Block, standard_blocks};
pub use composer::{
    BlockContribution, ComposeStop, Composer, ComposerBuilder, ComposerState, DraftOutcome,
};
pub use config::{ExecutorKind, GeneratorConfig};
pub use context::{
    AnalysisResults, ChartImage, CompanyInfo, Component, CustomerInfo, DocumentContext,
    DocumentRequest, FinancingOption, InclusionOptions, ProjectData, TextCatalog,
};
pub use decorator::StandardPageDecorator;
pub use error::{
    BatchError, BlockFailure, BlockRenderError, ConfigError, FailureReason, FatalContextError,
};
pub use limits::{CancellationToken, RunLimits};
pub use result::{BatchSummary, GenerationResult, GenerationStatus};
pub use runner::{BatchRunner, BatchRunnerBuilder};
pub use validation::{ValidationReport, validate_context};

pub use offerdoc_executor::{ExecutorImpl, SyncExecutor};
pub use offerdoc_idf::{ImageSource, RenderElement};
pub use offerdoc_style::{TableStyleRef, TextRole, Theme, ThemeRegistry};
pub use offerdoc_types::{Color, Margins, PageMetrics};
