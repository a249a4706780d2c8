use super::{Block, row};
use crate::context::DocumentContext;
use crate::error::BlockFailure;
use offerdoc_idf::format::format_currency;
use offerdoc_idf::{ImageSource, RenderElement};
use offerdoc_style::{TableStyleRef, TextRole};

const DEFAULT_INTRO: &str = "Thank you for your interest in a photovoltaic system. \
On the following pages we have put together an offer tailored to your roof and your \
energy consumption.";

/// Title page. Always rendered, even for sparse projects.
pub struct CoverBlock;

impl Block for CoverBlock {
    fn name(&self) -> &'static str {
        "cover"
    }

    fn required(&self) -> bool {
        true
    }

    fn render(&self, ctx: &DocumentContext) -> Result<Vec<RenderElement>, BlockFailure> {
        let mut elements = vec![RenderElement::text(
            ctx.text("cover.title", "Your photovoltaic offer"),
            TextRole::Title,
        )];

        if let Some(project) = &ctx.project {
            if let Some(name) = project.project_name.as_deref().filter(|n| !n.trim().is_empty()) {
                elements.push(RenderElement::text(name, TextRole::Subheading));
            }
            if let Some(image) = &project.cover_image {
                let width = ctx.page_metrics.content_width();
                elements.push(RenderElement::Image {
                    source: ImageSource::Bytes(image.clone()),
                    width,
                    height: width * 0.5,
                    caption: None,
                });
            }

            let rows: Vec<Vec<String>> = [
                row(
                    ctx.text("cover.customer", "Customer"),
                    project.customer.display_name().map(str::to_string),
                ),
                row(ctx.text("cover.address", "Address"), project.customer.address_line()),
                row(
                    ctx.text("cover.offer_number", "Offer number"),
                    project.offer_number.clone(),
                ),
                row(ctx.text("cover.offer_date", "Date"), project.offer_date.clone()),
                row(
                    ctx.text("cover.total_price", "Total price"),
                    project.total_price.map(|p| format_currency(&p, &ctx.locale)),
                ),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !rows.is_empty() {
                elements.push(RenderElement::table(rows, vec![1.0, 2.0], TableStyleRef::KeyValue));
            }
        }

        let greeting = match ctx.project.as_ref().map(|p| &p.customer) {
            Some(customer) if customer.display_name().is_some() => {
                let salutation = customer
                    .salutation
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| ctx.text("cover.greeting", "Dear"));
                format!(
                    "{} {},",
                    salutation,
                    customer.display_name().unwrap_or_default()
                )
            }
            _ => ctx
                .text("cover.greeting_generic", "Dear Sir or Madam,")
                .to_string(),
        };
        elements.push(RenderElement::Spacer(12.0));
        elements.push(RenderElement::body(greeting));
        elements.push(RenderElement::body(ctx.text("cover.intro", DEFAULT_INTRO)));
        Ok(elements)
    }
}
