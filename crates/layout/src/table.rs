use crate::elements::{LayoutElement, LineElement, PositionedElement, RectElement, TextElement};
use crate::engine::{Fragment, aligned_x};
use crate::text::{measure_text, wrap_text};
use offerdoc_style::{TableStyle, TextAlign};

const LINE_HEIGHT: f32 = 1.3;

/// Turns table rows into one fragment per row, the header row separated out
/// so the paginator can repeat it on continuation pages.
pub(crate) fn layout_table(
    rows: &[Vec<String>],
    column_widths: &[f32],
    style: &TableStyle,
    content_width: f32,
) -> (Option<Fragment>, Vec<Fragment>) {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return (None, Vec::new());
    }
    let widths = resolve_column_widths(column_widths, columns, content_width);

    let mut body = rows.iter();
    let header = if style.has_header {
        body.next().map(|row| layout_row(row, &widths, style, RowKind::Header))
    } else {
        None
    };
    let rows = body
        .enumerate()
        .map(|(i, row)| layout_row(row, &widths, style, RowKind::Body { striped: i % 2 == 1 }))
        .collect();
    (header, rows)
}

/// Column weights are honoured only when one positive weight is given per
/// column; anything else falls back to equal widths.
fn resolve_column_widths(weights: &[f32], columns: usize, content_width: f32) -> Vec<f32> {
    let usable = weights.len() == columns && weights.iter().all(|w| w.is_finite() && *w > 0.0);
    if !usable {
        return vec![content_width / columns as f32; columns];
    }
    let total: f32 = weights.iter().sum();
    weights.iter().map(|w| w / total * content_width).collect()
}

#[derive(Clone, Copy)]
enum RowKind {
    Header,
    Body { striped: bool },
}

fn layout_row(row: &[String], widths: &[f32], style: &TableStyle, kind: RowKind) -> Fragment {
    let pad = style.cell_padding;
    let advance = style.font_size * LINE_HEIGHT;

    let cells: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(col, width)| {
            let content = row.get(col).map(String::as_str).unwrap_or("");
            wrap_text(content, cell_font(style, kind, col), style.font_size, width - 2.0 * pad)
        })
        .collect();
    let line_count = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let height = line_count as f32 * advance + 2.0 * pad;
    let total_width: f32 = widths.iter().sum();

    let mut items = Vec::new();
    let background = match kind {
        RowKind::Header => Some(style.header_background),
        RowKind::Body { striped: true } => style.stripe_background,
        RowKind::Body { striped: false } => None,
    };
    if let Some(fill) = background {
        items.push(PositionedElement::new(
            0.0,
            0.0,
            total_width,
            height,
            LayoutElement::Rectangle(RectElement {
                fill: Some(fill),
                stroke: None,
            }),
        ));
    }

    let color = match kind {
        RowKind::Header => style.header_text,
        RowKind::Body { .. } => style.body_text,
    };
    let mut x = 0.0;
    for (col, (lines, width)) in cells.iter().zip(widths).enumerate() {
        let font = cell_font(style, kind, col);
        let align = if col == 0 {
            TextAlign::Left
        } else {
            style.value_align
        };
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let line_width = measure_text(line, font, style.font_size);
            items.push(PositionedElement::new(
                x + pad + aligned_x(align, line_width, width - 2.0 * pad),
                pad + i as f32 * advance,
                line_width,
                advance,
                LayoutElement::Text(TextElement {
                    content: line.clone(),
                    font,
                    size: style.font_size,
                    color,
                }),
            ));
        }
        x += width;
    }

    if style.border_width > 0.0 {
        items.push(PositionedElement::new(
            0.0,
            height,
            total_width,
            0.0,
            LayoutElement::Line(LineElement {
                color: style.border_color,
                thickness: style.border_width,
            }),
        ));
    }

    Fragment { height, items }
}

fn cell_font(style: &TableStyle, kind: RowKind, col: usize) -> offerdoc_style::StandardFont {
    match kind {
        RowKind::Header => style.header_font,
        RowKind::Body { .. } if col == 0 => style.label_font,
        RowKind::Body { .. } => style.body_font,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offerdoc_style::{TableStyleRef, ThemeRegistry};

    fn rows(n: usize) -> Vec<Vec<String>> {
        (0..n)
            .map(|i| vec![format!("Item {i}"), format!("{i},00 €")])
            .collect()
    }

    #[test]
    fn header_is_split_from_body_rows() {
        let theme = ThemeRegistry::built_in().default_theme();
        let style = theme.table_style(TableStyleRef::Standard);
        let (header, body) = layout_table(&rows(4), &[], &style, 400.0);
        assert!(header.is_some());
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn key_value_tables_have_only_body_rows() {
        let theme = ThemeRegistry::built_in().default_theme();
        let style = theme.table_style(TableStyleRef::KeyValue);
        let (header, body) = layout_table(&rows(4), &[], &style, 400.0);
        assert!(header.is_none());
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn invalid_weights_fall_back_to_equal_columns() {
        assert_eq!(resolve_column_widths(&[1.0], 2, 100.0), vec![50.0, 50.0]);
        assert_eq!(resolve_column_widths(&[1.0, -1.0], 2, 100.0), vec![50.0, 50.0]);
        assert_eq!(resolve_column_widths(&[3.0, 1.0], 2, 100.0), vec![75.0, 25.0]);
    }

    #[test]
    fn wrapped_cells_grow_the_row() {
        let theme = ThemeRegistry::built_in().default_theme();
        let style = theme.table_style(TableStyleRef::KeyValue);
        let plain = RowKind::Body { striped: false };
        let short = layout_row(&["a".into(), "b".into()], &[100.0, 100.0], &style, plain);
        let long_text = "very long description text ".repeat(8);
        let long = layout_row(&[long_text, "b".into()], &[100.0, 100.0], &style, plain);
        assert!(long.height > short.height);
    }
}
