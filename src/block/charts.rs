use super::Block;
use crate::context::DocumentContext;
use crate::error::BlockFailure;
use offerdoc_idf::{ImageSource, RenderElement};
use offerdoc_style::TextRole;

/// Pre-rendered charts, each kept together with its title.
pub struct ChartsBlock;

impl Block for ChartsBlock {
    fn name(&self) -> &'static str {
        "charts"
    }

    fn include(&self, ctx: &DocumentContext) -> bool {
        ctx.project.as_ref().is_some_and(|p| !p.charts.is_empty())
    }

    fn render(&self, ctx: &DocumentContext) -> Result<Vec<RenderElement>, BlockFailure> {
        let charts = ctx
            .project
            .as_ref()
            .map(|p| p.charts.as_slice())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| BlockFailure::MissingData("charts".to_string()))?;

        let mut elements = vec![RenderElement::heading(
            ctx.text("charts.heading", "Analysis charts"),
        )];
        for chart in charts {
            if !is_usable_size(chart.width) || !is_usable_size(chart.height) {
                return Err(BlockFailure::InvalidData(format!(
                    "chart '{}' has size {}x{}",
                    chart.title, chart.width, chart.height
                )));
            }
            elements.push(RenderElement::Group(vec![
                RenderElement::text(chart.title.as_str(), TextRole::Subheading),
                RenderElement::Image {
                    source: ImageSource::Bytes(chart.image.clone()),
                    width: chart.width,
                    height: chart.height,
                    caption: chart.caption.clone(),
                },
            ]));
        }
        Ok(elements)
    }
}

fn is_usable_size(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
