//! Pure layout math for the report renderers
//!
//! Width resolution, approximate text metrics for the built-in Helvetica
//! faces, and greedy word wrapping. Kept free of printpdf types so it can be
//! unit tested directly.

const PT_TO_MM: f32 = 0.352_778;

/// Average glyph advance as a fraction of the font size (Helvetica)
const AVG_CHAR_FACTOR: f32 = 0.5;

/// Approximate rendered width of `text` in millimeters
pub fn approx_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * AVG_CHAR_FACTOR * PT_TO_MM
}

/// Resolve relative column weights into absolute widths summing to `available`
///
/// Falls back to uniform widths when weights are missing, mismatched, or
/// contain non-positive entries.
pub fn resolve_widths(weights: Option<&[f32]>, columns: usize, available: f32) -> Vec<f32> {
    if columns == 0 {
        return Vec::new();
    }
    match weights {
        Some(w) if w.len() == columns && w.iter().all(|v| *v > 0.0) => {
            let total: f32 = w.iter().sum();
            w.iter().map(|v| v / total * available).collect()
        }
        _ => vec![available / columns as f32; columns],
    }
}

/// Maximum characters that fit in `width` millimeters at `font_size`
pub fn max_chars_for(width: f32, font_size: f32) -> usize {
    let per_char = font_size * AVG_CHAR_FACTOR * PT_TO_MM;
    ((width / per_char).floor() as usize).max(1)
}

/// Wrap a cell value to fit its column width
pub fn wrap_cell(text: &str, width: f32, font_size: f32) -> Vec<String> {
    wrap_text(text, max_chars_for(width, font_size))
}

/// Greedy word wrap; words longer than a line are hard-broken
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(max_chars).collect();
            let split_at = head.len();
            lines.push(head);
            word = &word[split_at..];
        }
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_widths_weighted() {
        let widths = resolve_widths(Some(&[1.0, 3.0]), 2, 100.0);
        assert_eq!(widths.len(), 2);
        assert!((widths[0] - 25.0).abs() < 0.001);
        assert!((widths[1] - 75.0).abs() < 0.001);
    }

    #[test]
    fn test_resolve_widths_uniform_fallback() {
        let widths = resolve_widths(None, 4, 100.0);
        assert_eq!(widths, vec![25.0; 4]);

        // mismatched weight count falls back too
        let widths = resolve_widths(Some(&[1.0]), 4, 100.0);
        assert_eq!(widths, vec![25.0; 4]);
    }

    #[test]
    fn test_resolve_widths_empty() {
        assert!(resolve_widths(None, 0, 100.0).is_empty());
    }

    #[test]
    fn test_wrap_text_short_line() {
        assert_eq!(wrap_text("AV. JUAREZ 123", 20), vec!["AV. JUAREZ 123"]);
    }

    #[test]
    fn test_wrap_text_breaks_on_words() {
        let lines = wrap_text("LIMPIEZA DE LOTE BALDIO", 10);
        assert_eq!(lines, vec!["LIMPIEZA", "DE LOTE", "BALDIO"]);
    }

    #[test]
    fn test_wrap_text_hard_breaks_long_words() {
        let lines = wrap_text("ABCDEFGHIJ", 4);
        assert_eq!(lines, vec!["ABCD", "EFGH", "IJ"]);
    }

    #[test]
    fn test_wrap_text_empty_is_single_blank_line() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_wrap_text_multibyte() {
        let lines = wrap_text("CÉDULA MUNICIPAL", 6);
        assert_eq!(lines, vec!["CÉDULA", "MUNICI", "PAL"]);
    }
}
