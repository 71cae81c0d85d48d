//! Static advance-width tables for the base-14 Helvetica faces the PDF export draws with.
//!
//! Widths are in em units (glyph space / 1000), taken from the standard Adobe AFM files,
//! so measured text wraps exactly where the exported PDF would put it.
//! Tables cover ASCII 0x20..=0x7E; index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

/// Typefaces used by the report. Oblique shares the regular face's widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
}

impl FontFace {
    /// The PDF base-font name for this face.
    pub fn base_font(self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"Helvetica",
            FontFace::Bold => b"Helvetica-Bold",
            FontFace::Oblique => b"Helvetica-Oblique",
        }
    }

    /// Resource name under which a page or form references the face.
    pub fn resource_name(self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"F1",
            FontFace::Bold => b"F2",
            FontFace::Oblique => b"F3",
        }
    }

    pub const ALL: [FontFace; 3] = [FontFace::Regular, FontFace::Bold, FontFace::Oblique];
}

pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for characters outside the table.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the advance width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }
}

/// Returns the metric table for a face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Regular | FontFace::Oblique => &HELVETICA,
        FontFace::Bold => &HELVETICA_BOLD,
    }
}

#[rustfmt::skip]
static HELVETICA: FontMetricTable = FontMetricTable {
    widths: [
        // sp     !      "      #      $      %      &      '
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191,
        // (      )      *      +      ,      -      .      /
        0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A-Z
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500,
        0.667, 0.556, 0.833, 0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611,
        0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a-z
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222,
        0.500, 0.222, 0.833, 0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278,
        0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    space_width: 0.278,
};

#[rustfmt::skip]
static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    widths: [
        // sp     !      "      #      $      %      &      '
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238,
        // (      )      *      +      ,      -      .      /
        0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A-Z
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556,
        0.722, 0.611, 0.833, 0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611,
        0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a-z
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278,
        0.556, 0.278, 0.889, 0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333,
        0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.611,
    space_width: 0.278,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        let m = get_metrics(FontFace::Regular);
        assert!((m.char_width('W') - 0.944).abs() < 1e-6);
        assert!((m.char_width('i') - 0.222).abs() < 1e-6);
        assert!((m.char_width('~') - 0.584).abs() < 1e-6);
        assert!((m.measure_str("  ") - 0.556).abs() < 1e-6);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Director, Supply Chain Operations";
        assert!(
            get_metrics(FontFace::Bold).measure_str(text)
                > get_metrics(FontFace::Regular).measure_str(text)
        );
    }

    #[test]
    fn test_non_ascii_uses_average() {
        let m = get_metrics(FontFace::Regular);
        assert!((m.measure_str("é") - m.average_char_width).abs() < 1e-6);
    }

    #[test]
    fn test_oblique_shares_regular_metrics() {
        let text = "Acme Logistics | 2019 - Present";
        assert_eq!(
            get_metrics(FontFace::Oblique).measure_str(text),
            get_metrics(FontFace::Regular).measure_str(text)
        );
    }
}
