use super::Block;
use crate::context::DocumentContext;
use crate::error::BlockFailure;
use offerdoc_idf::RenderElement;
use offerdoc_idf::format::{format_currency, format_percent, format_with_unit};
use offerdoc_style::{TableStyleRef, TextRole};

/// Side-by-side comparison of financing options. The figures come from the
/// financial calculator; this block only formats them.
pub struct FinancingBlock;

impl Block for FinancingBlock {
    fn name(&self) -> &'static str {
        "financing"
    }

    fn include(&self, ctx: &DocumentContext) -> bool {
        ctx.project
            .as_ref()
            .is_some_and(|p| !p.financing_options.is_empty())
    }

    fn render(&self, ctx: &DocumentContext) -> Result<Vec<RenderElement>, BlockFailure> {
        let options = ctx
            .project
            .as_ref()
            .map(|p| p.financing_options.as_slice())
            .filter(|o| !o.is_empty())
            .ok_or_else(|| BlockFailure::MissingData("financing options".to_string()))?;
        let locale = &ctx.locale;
        let months = ctx.text("unit.months", "months");

        let mut rows = vec![vec![
            ctx.text("financing.option", "Option").to_string(),
            ctx.text("financing.monthly_rate", "Monthly rate").to_string(),
            ctx.text("financing.term", "Term").to_string(),
            ctx.text("financing.interest", "Interest").to_string(),
            ctx.text("financing.total_cost", "Total cost").to_string(),
        ]];
        rows.extend(options.iter().map(|option| {
            vec![
                option.name.clone(),
                format_currency(&option.monthly_rate, locale),
                format_with_unit(&option.term_months, 0, months, locale),
                format_percent(&option.interest_rate_percent, locale),
                format_currency(&option.total_cost, locale),
            ]
        }));

        Ok(vec![
            RenderElement::heading(ctx.text("financing.heading", "Financing options")),
            RenderElement::body(ctx.text(
                "financing.intro",
                "The following financing options are available for your system.",
            )),
            RenderElement::table(rows, vec![3.0, 2.0, 1.5, 1.5, 2.0], TableStyleRef::Financial),
            RenderElement::text(
                ctx.text(
                    "financing.note",
                    "All figures are provided by our financing partner and are subject to a credit check.",
                ),
                TextRole::Small,
            ),
        ])
    }
}
