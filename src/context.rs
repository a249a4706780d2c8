//! Document input: the serde-facing request and the frozen per-document
//! context the composer reads from.

use chrono::{DateTime, Utc};
use offerdoc_idf::format::NumberLocale;
use offerdoc_style::{Theme, ThemeRegistry};
use offerdoc_types::data::optional_base64_bytes;
use offerdoc_types::{PageMetrics, SharedData};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInfo {
    pub salutation: Option<String>,
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
}

impl CustomerInfo {
    /// The customer name when present and not blank.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    pub fn address_line(&self) -> Option<String> {
        let parts: Vec<&str> = [self.street.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// A selected product, already resolved from the product catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Category such as `module`, `inverter` or `storage`.
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    /// Technical data shown as label/value pairs, in label order.
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
}

/// One financing variant as computed by the financial calculator. Values are
/// displayed as given; non-numeric values are printed verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingOption {
    pub name: String,
    pub monthly_rate: Value,
    pub term_months: Value,
    pub interest_rate_percent: Value,
    pub total_cost: Value,
}

/// A pre-rendered chart image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartImage {
    pub title: String,
    #[serde(with = "offerdoc_types::data::base64_bytes")]
    pub image: SharedData,
    #[serde(default = "default_chart_width")]
    pub width: f32,
    #[serde(default = "default_chart_height")]
    pub height: f32,
    #[serde(default)]
    pub caption: Option<String>,
}

fn default_chart_width() -> f32 {
    480.0
}

fn default_chart_height() -> f32 {
    260.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectData {
    pub customer: CustomerInfo,
    pub project_name: Option<String>,
    pub offer_number: Option<String>,
    pub offer_date: Option<String>,
    pub components: Vec<Component>,
    pub total_price: Option<f64>,
    pub financing_options: Vec<FinancingOption>,
    pub charts: Vec<ChartImage>,
    #[serde(with = "optional_base64_bytes")]
    pub cover_image: Option<SharedData>,
}

impl ProjectData {
    pub fn has_module(&self) -> bool {
        self.components
            .iter()
            .any(|c| c.kind.eq_ignore_ascii_case("module"))
    }
}

/// Results of the yield and economics analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResults {
    pub system_power_kwp: Option<f64>,
    pub annual_yield_kwh: Option<f64>,
    pub self_consumption_percent: Option<f64>,
    pub autarky_percent: Option<f64>,
    pub annual_savings: Option<f64>,
    pub amortization_years: Option<f64>,
    pub co2_savings_kg_per_year: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub name: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    #[serde(with = "optional_base64_bytes")]
    pub logo: Option<SharedData>,
}

impl CompanyInfo {
    /// Single-line contact summary for page footers.
    pub fn contact_line(&self) -> Option<String> {
        let parts: Vec<&str> = [
            Some(self.name.as_str()),
            self.street.as_deref(),
            self.city.as_deref(),
            self.phone.as_deref(),
            self.email.as_deref(),
            self.website.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
        (!parts.is_empty()).then(|| parts.join(" | "))
    }
}

/// `include_<block>` flags. Absent flags mean "included".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InclusionOptions(BTreeMap<String, bool>);

impl InclusionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, block: &str, included: bool) -> Self {
        self.set(block, included);
        self
    }

    pub fn set(&mut self, block: &str, included: bool) {
        self.0.insert(format!("include_{}", block), included);
    }

    /// True only when the block was switched off explicitly.
    pub fn is_excluded(&self, block: &str) -> bool {
        self.0.get(&format!("include_{}", block)) == Some(&false)
    }
}

impl From<BTreeMap<String, bool>> for InclusionOptions {
    fn from(map: BTreeMap<String, bool>) -> Self {
        Self(map)
    }
}

/// Localized texts by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextCatalog(HashMap<String, String>);

impl TextCatalog {
    pub fn new(texts: HashMap<String, String>) -> Self {
        Self(texts)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The text for `key`, or `default` when the key is absent.
    pub fn text_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.0.insert(key.into(), text.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(String, String)> for TextCatalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What a caller submits for one recipient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub recipient_id: String,
    #[serde(default)]
    pub project_data: Option<ProjectData>,
    #[serde(default)]
    pub analysis_results: Option<AnalysisResults>,
    #[serde(default)]
    pub company: CompanyInfo,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub inclusion_options: InclusionOptions,
    #[serde(default)]
    pub texts: Option<TextCatalog>,
    #[serde(default)]
    pub page_metrics: Option<PageMetrics>,
    /// Creation timestamp for the document metadata; the build time when absent.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The read-only input of one document build.
///
/// Constructed once per request and shared as `Arc<DocumentContext>`; nothing
/// mutates it after construction.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    pub recipient_id: String,
    pub project: Option<ProjectData>,
    pub analysis: Option<AnalysisResults>,
    pub company: CompanyInfo,
    pub theme: Arc<Theme>,
    /// The requested theme name when it was unknown and replaced.
    pub theme_fallback_from: Option<String>,
    pub inclusion: InclusionOptions,
    pub texts: Option<TextCatalog>,
    pub page_metrics: PageMetrics,
    pub language: String,
    pub locale: NumberLocale,
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentContext {
    /// Resolves the theme and freezes the request. Missing page metrics fall
    /// back to `default_page`.
    pub fn from_request(
        request: DocumentRequest,
        themes: &ThemeRegistry,
        default_page: PageMetrics,
    ) -> Arc<Self> {
        let (theme, theme_fallback_from) = if request.theme.trim().is_empty() {
            (themes.default_theme(), None)
        } else {
            let resolution = themes.resolve_with_fallback(&request.theme);
            (resolution.theme, resolution.fallback_from)
        };
        let language = request
            .language
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "de".to_string());
        Arc::new(Self {
            recipient_id: request.recipient_id,
            project: request.project_data,
            analysis: request.analysis_results,
            company: request.company,
            theme,
            theme_fallback_from,
            inclusion: request.inclusion_options,
            texts: request.texts,
            page_metrics: request.page_metrics.unwrap_or(default_page),
            locale: NumberLocale::for_language(&language),
            language,
            created_at: request.created_at,
        })
    }

    /// Localized text with a built-in default; also usable when the catalogue
    /// itself is missing, e.g. for the stub document.
    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match &self.texts {
            Some(texts) => texts.text_or(key, default),
            None => default,
        }
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.project.as_ref()?.customer.display_name()
    }
}
