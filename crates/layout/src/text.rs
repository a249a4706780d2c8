//! Approximate text metrics for the standard PDF fonts.
//!
//! Widths are estimated from per-character classes rather than real font
//! tables; good enough for line breaking and alignment of business
//! documents without embedding fonts.

use offerdoc_style::StandardFont;

/// Advance width of a character in Helvetica em units.
fn helvetica_advance(c: char) -> f32 {
    match c {
        ' ' => 0.278,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '!' | '\'' | '|' => 0.24,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' | '/' => 0.33,
        'm' | 'w' => 0.83,
        'M' | 'W' | '@' | '%' => 0.89,
        '0'..='9' | '€' | '$' => 0.556,
        'A'..='Z' => 0.68,
        _ => 0.52,
    }
}

/// Width of `text` in points when set in `font` at `size`.
pub fn measure_text(text: &str, font: StandardFont, size: f32) -> f32 {
    match font {
        StandardFont::Courier | StandardFont::CourierBold => {
            text.chars().count() as f32 * 0.6 * size
        }
        _ => {
            // Scale the Helvetica classes by the family's relative average advance.
            let scale = font.average_advance() / StandardFont::Helvetica.average_advance();
            text.chars().map(helvetica_advance).sum::<f32>() * size * scale
        }
    }
}

/// Greedy word wrapping. Explicit newlines start new lines; words wider than
/// the line are broken between characters.
pub fn wrap_text(text: &str, font: StandardFont, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut had_words = false;
        for word in paragraph.split_whitespace() {
            had_words = true;
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if measure_text(&candidate, font, size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if measure_text(word, font, size) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(word, font, size, max_width);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        if had_words {
            lines.push(current);
        } else {
            lines.push(String::new());
        }
    }
    lines
}

fn break_word(word: &str, font: StandardFont, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if piece.chars().count() > 1 && measure_text(&piece, font, size) > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
