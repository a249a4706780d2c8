use super::{Block, row};
use crate::context::DocumentContext;
use crate::error::BlockFailure;
use offerdoc_idf::RenderElement;
use offerdoc_idf::format::{format_currency, format_kwh, format_percent, format_with_unit};
use offerdoc_style::TableStyleRef;

/// Summary of the yield and economics analysis.
pub struct KeyMetricsBlock;

impl Block for KeyMetricsBlock {
    fn name(&self) -> &'static str {
        "key_metrics"
    }

    fn include(&self, ctx: &DocumentContext) -> bool {
        ctx.analysis.is_some()
    }

    fn render(&self, ctx: &DocumentContext) -> Result<Vec<RenderElement>, BlockFailure> {
        let analysis = ctx
            .analysis
            .as_ref()
            .ok_or_else(|| BlockFailure::MissingData("analysis results".to_string()))?;
        let locale = &ctx.locale;

        let rows: Vec<Vec<String>> = [
            row(
                ctx.text("metrics.system_power", "System power"),
                analysis
                    .system_power_kwp
                    .map(|v| format_with_unit(&v, 2, "kWp", locale)),
            ),
            row(
                ctx.text("metrics.annual_yield", "Annual yield"),
                analysis.annual_yield_kwh.map(|v| format_kwh(&v, locale)),
            ),
            row(
                ctx.text("metrics.self_consumption", "Self-consumption"),
                analysis
                    .self_consumption_percent
                    .map(|v| format_percent(&v, locale)),
            ),
            row(
                ctx.text("metrics.autarky", "Self-sufficiency"),
                analysis.autarky_percent.map(|v| format_percent(&v, locale)),
            ),
            row(
                ctx.text("metrics.annual_savings", "Annual savings"),
                analysis.annual_savings.map(|v| format_currency(&v, locale)),
            ),
            row(
                ctx.text("metrics.amortization", "Amortization"),
                analysis
                    .amortization_years
                    .map(|v| format_with_unit(&v, 1, ctx.text("unit.years", "years"), locale)),
            ),
            row(
                ctx.text("metrics.co2_savings", "CO2 savings per year"),
                analysis
                    .co2_savings_kg_per_year
                    .map(|v| format_with_unit(&v, 0, "kg", locale)),
            ),
        ]
        .into_iter()
        .flatten()
        .collect();

        if rows.is_empty() {
            return Err(BlockFailure::MissingData(
                "analysis results contain no metrics".to_string(),
            ));
        }

        Ok(vec![RenderElement::Group(vec![
            RenderElement::heading(ctx.text("metrics.heading", "Key figures")),
            RenderElement::table(rows, vec![3.0, 2.0], TableStyleRef::KeyValue),
        ])])
    }
}
