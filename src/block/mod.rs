//! Blocks: named, independently failing units of document content.

mod charts;
mod components;
mod cover;
mod financing;
mod key_metrics;
mod terms;

pub use charts::ChartsBlock;
pub use components::ComponentsBlock;
pub use cover::CoverBlock;
pub use financing::FinancingBlock;
pub use key_metrics::KeyMetricsBlock;
pub use terms::TermsBlock;

use crate::context::DocumentContext;
use crate::error::BlockFailure;
use offerdoc_idf::RenderElement;
use std::sync::Arc;

/// A stateless producer of render elements.
///
/// Blocks never mutate the context and perform no I/O; everything they show
/// arrives pre-resolved in the context.
pub trait Block: Send + Sync {
    /// Unique name; also the suffix of the `include_<name>` flag.
    fn name(&self) -> &'static str;

    /// Required blocks are always rendered and their inclusion is never
    /// evaluated.
    fn required(&self) -> bool {
        false
    }

    /// Data-driven self-exclusion, e.g. when the data the block shows is
    /// absent. Only consulted for optional blocks that were not switched off.
    fn include(&self, _ctx: &DocumentContext) -> bool {
        true
    }

    fn render(&self, ctx: &DocumentContext) -> Result<Vec<RenderElement>, BlockFailure>;
}

/// The inclusion policy: required blocks always, optional blocks unless
/// `include_<name>` is `false` or the block excludes itself.
pub fn is_included(block: &dyn Block, ctx: &DocumentContext) -> bool {
    if block.required() {
        return true;
    }
    !ctx.inclusion.is_excluded(block.name()) && block.include(ctx)
}

/// The offer document's blocks in rendering order.
pub fn standard_blocks() -> Vec<Arc<dyn Block>> {
    vec![
        Arc::new(CoverBlock),
        Arc::new(KeyMetricsBlock),
        Arc::new(ComponentsBlock),
        Arc::new(FinancingBlock),
        Arc::new(ChartsBlock),
        Arc::new(TermsBlock),
    ]
}

/// Builds a label/value row when the value is present.
fn row(label: &str, value: Option<String>) -> Option<Vec<String>> {
    value.map(|v| vec![label.to_string(), v])
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::context::{
        AnalysisResults, Component, CustomerInfo, DocumentContext, DocumentRequest,
        FinancingOption, ProjectData, TextCatalog,
    };
    use offerdoc_style::ThemeRegistry;
    use offerdoc_types::PageMetrics;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    pub fn full_request() -> DocumentRequest {
        DocumentRequest {
            recipient_id: "r-1".into(),
            project_data: Some(ProjectData {
                customer: CustomerInfo {
                    name: Some("Anna Schmidt".into()),
                    street: Some("Hauptstr. 1".into()),
                    city: Some("12345 Berlin".into()),
                    ..CustomerInfo::default()
                },
                project_name: Some("Roof south".into()),
                offer_number: Some("A-2024-001".into()),
                components: vec![
                    Component {
                        kind: "module".into(),
                        name: "SunPower 400".into(),
                        manufacturer: Some("SunPower".into()),
                        quantity: Some(24.0),
                        specs: BTreeMap::from([("Power".to_string(), "400 Wp".to_string())]),
                    },
                    Component {
                        kind: "inverter".into(),
                        name: "Inverter X".into(),
                        manufacturer: None,
                        quantity: Some(1.0),
                        specs: BTreeMap::new(),
                    },
                ],
                total_price: Some(18500.0),
                financing_options: vec![FinancingOption {
                    name: "Loan 10y".into(),
                    monthly_rate: json!(172.5),
                    term_months: json!(120),
                    interest_rate_percent: json!(3.9),
                    total_cost: json!(20700),
                }],
                ..ProjectData::default()
            }),
            analysis_results: Some(AnalysisResults {
                system_power_kwp: Some(9.6),
                annual_yield_kwh: Some(9400.0),
                self_consumption_percent: Some(34.56),
                ..AnalysisResults::default()
            }),
            texts: Some(TextCatalog::from_iter([(
                "cover.title".to_string(),
                "Your solar offer".to_string(),
            )])),
            ..DocumentRequest::default()
        }
    }

    pub fn context(request: DocumentRequest) -> Arc<DocumentContext> {
        DocumentContext::from_request(request, &ThemeRegistry::built_in(), PageMetrics::a4())
    }
}
