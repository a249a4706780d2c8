use super::Block;
use crate::context::DocumentContext;
use crate::error::BlockFailure;
use offerdoc_idf::RenderElement;
use offerdoc_idf::format::format_number;
use offerdoc_style::{TableStyleRef, TextRole};

/// Bill of components plus the technical data of each product.
pub struct ComponentsBlock;

impl Block for ComponentsBlock {
    fn name(&self) -> &'static str {
        "components"
    }

    fn include(&self, ctx: &DocumentContext) -> bool {
        ctx.project
            .as_ref()
            .is_some_and(|p| !p.components.is_empty())
    }

    fn render(&self, ctx: &DocumentContext) -> Result<Vec<RenderElement>, BlockFailure> {
        let components = ctx
            .project
            .as_ref()
            .map(|p| p.components.as_slice())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| BlockFailure::MissingData("component selection".to_string()))?;

        let mut rows = vec![vec![
            ctx.text("components.category", "Category").to_string(),
            ctx.text("components.product", "Product").to_string(),
            ctx.text("components.manufacturer", "Manufacturer").to_string(),
            ctx.text("components.quantity", "Quantity").to_string(),
        ]];
        for (i, component) in components.iter().enumerate() {
            if component.name.trim().is_empty() {
                return Err(BlockFailure::InvalidData(format!(
                    "component {} has no name",
                    i + 1
                )));
            }
            let quantity = component.quantity.map(|q| {
                let decimals = if q.fract() == 0.0 { 0 } else { 2 };
                format_number(&q, decimals, &ctx.locale)
            });
            rows.push(vec![
                ctx.text(&format!("component.kind.{}", component.kind), &component.kind)
                    .to_string(),
                component.name.clone(),
                component.manufacturer.clone().unwrap_or_default(),
                quantity.unwrap_or_default(),
            ]);
        }

        let mut elements = vec![
            RenderElement::heading(ctx.text("components.heading", "Components")),
            RenderElement::table(rows, vec![2.0, 4.0, 3.0, 1.5], TableStyleRef::Standard),
        ];
        for component in components.iter().filter(|c| !c.specs.is_empty()) {
            let specs = component
                .specs
                .iter()
                .map(|(label, value)| vec![label.clone(), value.clone()])
                .collect();
            elements.push(RenderElement::Group(vec![
                RenderElement::text(component.name.as_str(), TextRole::Subheading),
                RenderElement::table(specs, vec![1.0, 1.0], TableStyleRef::KeyValue),
            ]));
        }
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::test_support::{context, full_request};

    #[test]
    fn lists_every_component_and_groups_specs() {
        let elements = ComponentsBlock.render(&context(full_request())).unwrap();
        // heading, overview table, one spec group for the module
        assert_eq!(elements.len(), 3);
        let overview = elements[1].plain_text();
        assert!(overview.contains("module | SunPower 400 | SunPower | 24"));
        assert!(overview.contains("inverter | Inverter X |  | 1"));
        assert!(matches!(elements[2], RenderElement::Group(_)));
    }

    #[test]
    fn nameless_components_are_invalid() {
        let mut request = full_request();
        if let Some(project) = request.project_data.as_mut() {
            project.components[1].name = " ".into();
        }
        let result = ComponentsBlock.render(&context(request));
        assert!(matches!(result, Err(BlockFailure::InvalidData(_))));
    }
}
