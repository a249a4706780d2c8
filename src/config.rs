use crate::error::ConfigError;
use offerdoc_style::{Theme, ThemeRegistry};
use offerdoc_types::PageMetrics;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Which executor runs the documents of a synchronous batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    /// A dedicated pool bounded by `concurrency_limit`.
    #[default]
    Rayon,
    /// One document after the other on the calling thread.
    Sync,
}

/// Process-wide generator settings, usually loaded from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Maximum number of documents built at the same time.
    pub concurrency_limit: usize,
    /// Deadline per document, measured from the moment it starts.
    pub document_timeout_ms: Option<u64>,
    /// Safety bound per block render; `None` disables it.
    pub block_time_limit_ms: Option<u64>,
    /// Overrides the registry's default theme.
    pub default_theme: Option<String>,
    /// Additional complete themes. A theme named like a built-in replaces it.
    pub themes: Vec<Theme>,
    pub page: PageMetrics,
    pub compress_streams: bool,
    pub executor: ExecutorKind,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: num_cpus::get(),
            document_timeout_ms: None,
            block_time_limit_ms: Some(5000),
            default_theme: None,
            themes: Vec::new(),
            page: PageMetrics::a4(),
            compress_streams: true,
            executor: ExecutorKind::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency_limit == 0 {
            return Err(ConfigError::Invalid(
                "concurrency_limit must be at least 1".to_string(),
            ));
        }
        if !self.page.is_usable() {
            return Err(ConfigError::Invalid(format!(
                "page {}x{} leaves no room for content",
                self.page.width, self.page.height
            )));
        }
        Ok(())
    }

    pub fn document_timeout(&self) -> Option<Duration> {
        self.document_timeout_ms.map(Duration::from_millis)
    }

    pub fn block_time_limit(&self) -> Option<Duration> {
        self.block_time_limit_ms.map(Duration::from_millis)
    }

    /// Built-in themes plus the configured ones, frozen into a registry.
    pub fn theme_registry(&self) -> Result<ThemeRegistry, ConfigError> {
        let mut builder = ThemeRegistry::builder().with_themes(self.themes.iter().cloned())?;
        if let Some(name) = &self.default_theme {
            builder = builder.with_default(name);
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = GeneratorConfig::from_json("{}").unwrap();
        assert_eq!(config.concurrency_limit, num_cpus::get());
        assert_eq!(config.block_time_limit(), Some(Duration::from_secs(5)));
        assert_eq!(config.document_timeout(), None);
        assert_eq!(config.executor, ExecutorKind::Rayon);
        assert!(config.compress_streams);
        assert_eq!(config.page, PageMetrics::a4());
    }

    #[test]
    fn fields_are_read_from_json() {
        let config = GeneratorConfig::from_json(
            r#"{"concurrency_limit": 2, "document_timeout_ms": 1500, "executor": "sync", "default_theme": "eco"}"#,
        )
        .unwrap();
        assert_eq!(config.concurrency_limit, 2);
        assert_eq!(config.document_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.executor, ExecutorKind::Sync);
        assert_eq!(config.theme_registry().unwrap().default_name(), "eco");
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = GeneratorConfig::from_json(r#"{"concurrency_limit": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_default_theme_is_a_theme_error() {
        let config = GeneratorConfig::from_json(r#"{"default_theme": "nope"}"#).unwrap();
        assert!(matches!(config.theme_registry(), Err(ConfigError::Theme(_))));
    }

    #[test]
    fn incomplete_custom_themes_fail_to_parse() {
        let err = GeneratorConfig::from_json(r#"{"themes": [{"name": "half"}]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
