use crate::context::DocumentContext;
use offerdoc_render_core::{PageCanvas, PageDecorator, PageInfo};
use offerdoc_style::TextRole;

const LOGO_WIDTH: f32 = 72.0;
const LOGO_HEIGHT: f32 = 24.0;
const RULE_THICKNESS: f32 = 0.5;

/// Company header and page-numbered footer, drawn inside the page margins.
#[derive(Debug, Clone)]
pub struct StandardPageDecorator {
    /// Footer label; `{page}` and `{total}` are substituted.
    page_label: String,
}

impl StandardPageDecorator {
    pub const DEFAULT_PAGE_LABEL: &'static str = "Page {page} of {total}";

    pub fn new(page_label: impl Into<String>) -> Self {
        Self {
            page_label: page_label.into(),
        }
    }

    pub fn for_context(ctx: &DocumentContext) -> Self {
        Self::new(ctx.text("footer.page", Self::DEFAULT_PAGE_LABEL))
    }

    fn page_label(&self, page: &PageInfo) -> String {
        self.page_label
            .replace("{page}", &page.number().to_string())
            .replace("{total}", &page.total_pages.to_string())
    }
}

impl Default for StandardPageDecorator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_LABEL)
    }
}

impl PageDecorator for StandardPageDecorator {
    fn decorate(&self, page: &PageInfo, canvas: &mut PageCanvas) {
        let metrics = &page.metrics;
        let colors = &page.theme.colors;
        let left = metrics.margins.left;
        let right = metrics.width - metrics.margins.right;

        // Header sits in the lower part of the top margin.
        let header_rule = (metrics.margins.top - 8.0).max(0.0);
        let header_top = (header_rule - LOGO_HEIGHT - 4.0).max(0.0);
        if let Some(logo) = &page.logo {
            canvas.image(left, header_top, LOGO_WIDTH, LOGO_HEIGHT, logo);
        }
        if !page.company_name.trim().is_empty() {
            let mut style = page.theme.text_style(TextRole::Subheading);
            style.color = colors.primary;
            let y = header_top + (LOGO_HEIGHT - style.line_advance()).max(0.0);
            canvas.text_right(right, y, &page.company_name, &style);
        }
        canvas.horizontal_line(left, right, header_rule, colors.border_medium, RULE_THICKNESS);

        let footer_rule = metrics.height - metrics.margins.bottom + 10.0;
        canvas.horizontal_line(left, right, footer_rule, colors.border_light, RULE_THICKNESS);
        let small = page.theme.text_style(TextRole::Small);
        let footer_text = footer_rule + 4.0;
        if let Some(contact) = &page.contact_line {
            canvas.text(left, footer_text, contact, &small);
        }
        canvas.text_right(right, footer_text, &self.page_label(page), &small);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offerdoc_layout::LayoutElement;
    use offerdoc_style::ThemeRegistry;
    use offerdoc_types::PageMetrics;

    fn page(index: usize, total: usize, logo: Option<&str>) -> PageInfo {
        PageInfo {
            index,
            total_pages: total,
            company_name: "Sunworks GmbH".into(),
            logo: logo.map(str::to_string),
            contact_line: Some("Sunny Street 1 | 01234 Solar City".into()),
            theme: ThemeRegistry::built_in().default_theme(),
            metrics: PageMetrics::a4(),
        }
    }

    fn texts(canvas: PageCanvas) -> Vec<String> {
        canvas
            .into_elements()
            .into_iter()
            .filter_map(|el| match el.element {
                LayoutElement::Text(t) => Some(t.content),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn footer_shows_page_of_total() {
        let mut canvas = PageCanvas::new();
        StandardPageDecorator::default().decorate(&page(1, 3, None), &mut canvas);
        let texts = texts(canvas);
        assert!(texts.contains(&"Page 2 of 3".to_string()));
        assert!(texts.contains(&"Sunworks GmbH".to_string()));
        assert!(texts.contains(&"Sunny Street 1 | 01234 Solar City".to_string()));
    }

    #[test]
    fn custom_labels_are_substituted() {
        let mut canvas = PageCanvas::new();
        StandardPageDecorator::new("Seite {page} von {total}").decorate(&page(0, 1, None), &mut canvas);
        assert!(texts(canvas).contains(&"Seite 1 von 1".to_string()));
    }

    #[test]
    fn logo_is_drawn_only_when_present() {
        let count_images = |canvas: PageCanvas| {
            canvas
                .into_elements()
                .iter()
                .filter(|el| matches!(el.element, LayoutElement::Image(_)))
                .count()
        };
        let mut with_logo = PageCanvas::new();
        StandardPageDecorator::default().decorate(&page(0, 1, Some("company-logo")), &mut with_logo);
        let mut without = PageCanvas::new();
        StandardPageDecorator::default().decorate(&page(0, 1, None), &mut without);
        assert_eq!(count_images(with_logo), 1);
        assert_eq!(count_images(without), 0);
    }

    #[test]
    fn decoration_stays_out_of_the_content_area() {
        let info = page(0, 1, Some("company-logo"));
        let metrics = info.metrics;
        let mut canvas = PageCanvas::new();
        StandardPageDecorator::default().decorate(&info, &mut canvas);
        for el in canvas.into_elements() {
            let in_header = el.y + el.height <= metrics.margins.top;
            let in_footer = el.y >= metrics.height - metrics.margins.bottom;
            assert!(in_header || in_footer, "{:?} overlaps the content area", el);
        }
    }
}
