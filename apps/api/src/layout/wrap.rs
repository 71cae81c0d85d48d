//! Greedy word wrap over the static metric tables.

use crate::layout::font_metrics::FontMetricTable;

/// Wraps `text` into lines no wider than `max_width_px` at `font_size_px`.
///
/// Explicit newlines start a new line; an empty paragraph yields an empty line so
/// blank lines keep their height. A single word wider than the line is kept whole
/// on its own line. Empty input returns no lines.
pub fn wrap_lines(
    text: &str,
    metrics: &FontMetricTable,
    font_size_px: f32,
    max_width_px: f32,
) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let max_width_em = max_width_px / font_size_px;
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in paragraph.split_whitespace() {
            let word_w = metrics.measure_str(word);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + metrics.space_width + word_w > max_width_em {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += metrics.space_width + word_w;
            }
        }
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{get_metrics, FontFace};

    fn regular() -> &'static FontMetricTable {
        get_metrics(FontFace::Regular)
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(wrap_lines("", regular(), 14.0, 500.0).is_empty());
        assert!(wrap_lines("   \n ", regular(), 14.0, 500.0).is_empty());
    }

    #[test]
    fn test_short_text_fits_one_line() {
        let lines = wrap_lines("Led a team of 40", regular(), 14.0, 500.0);
        assert_eq!(lines, vec!["Led a team of 40"]);
    }

    #[test]
    fn test_long_text_wraps_without_overflow() {
        let text = "Managed end-to-end distribution across twelve regional warehouses \
                    and cut outbound freight cost by eighteen percent within two years";
        let lines = wrap_lines(text, regular(), 14.0, 300.0);
        assert!(lines.len() > 1);
        for line in &lines {
            let width_px = regular().measure_str(line) * 14.0;
            assert!(width_px <= 300.0, "line overflows: {line} ({width_px}px)");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_newlines_and_blank_paragraphs_are_kept() {
        let lines = wrap_lines("first\n\nthird", regular(), 14.0, 500.0);
        assert_eq!(lines, vec!["first", "", "third"]);
    }

    #[test]
    fn test_overlong_word_stays_whole() {
        let word = "Supercalifragilisticexpialidocious";
        let lines = wrap_lines(word, regular(), 14.0, 40.0);
        assert_eq!(lines, vec![word]);
    }
}
