use super::Block;
use crate::context::DocumentContext;
use crate::error::BlockFailure;
use offerdoc_idf::RenderElement;
use offerdoc_style::TextRole;

const DEFAULT_TERMS: &str = "Prices include the statutory value added tax. \
Installation dates are agreed after order confirmation.\n\n\
Ownership of all delivered goods remains with us until full payment has been received.";

pub struct TermsBlock;

impl Block for TermsBlock {
    fn name(&self) -> &'static str {
        "terms"
    }

    fn render(&self, ctx: &DocumentContext) -> Result<Vec<RenderElement>, BlockFailure> {
        let mut elements = vec![RenderElement::heading(
            ctx.text("terms.heading", "Terms and conditions"),
        )];
        elements.extend(
            ctx.text("terms.body", DEFAULT_TERMS)
                .split("\n\n")
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(RenderElement::body),
        );
        elements.push(RenderElement::text(
            ctx.text("terms.validity", "This offer is valid for 30 days."),
            TextRole::Small,
        ));
        elements.push(RenderElement::body(ctx.text(
            "terms.closing",
            "We look forward to working with you.",
        )));
        if !ctx.company.name.trim().is_empty() {
            elements.push(RenderElement::text(ctx.company.name.as_str(), TextRole::Emphasis));
        }
        Ok(elements)
    }
}
