//! Band capture: turns a list of paints into a scaled drawing surface.
//!
//! The surface is a PDF content stream in device pixels (`css × scale`) with the
//! origin at the bottom-left, ready to be wrapped in a form XObject. Capturing is
//! CPU-bound, so the async entry point runs it on the blocking pool.

use pdf_writer::{Content, Name, Str};
use tracing::debug;

use crate::export::ExportError;
use crate::render::flow::Paint;

/// A captured band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSurface {
    pub css_width: f32,
    pub css_height: f32,
    pub scale: f32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Content stream drawing the band inside `[0, pixel_width] × [0, pixel_height]`.
    pub stream: Vec<u8>,
}

/// Captures `paints` laid out in a `css_width × css_height` box.
pub fn capture(
    label: &'static str,
    paints: &[Paint],
    css_width: f32,
    css_height: f32,
    scale: f32,
    max_surface_px: u32,
) -> Result<BandSurface, ExportError> {
    if !(css_width > 0.0 && css_height > 0.0 && scale > 0.0) {
        return Err(ExportError::Capture(format!(
            "{label} has an empty surface ({css_width}x{css_height} at scale {scale})"
        )));
    }

    let pixel_width = (css_width * scale).ceil();
    let pixel_height = (css_height * scale).ceil();
    if pixel_width > max_surface_px as f32 || pixel_height > max_surface_px as f32 {
        return Err(ExportError::Capture(format!(
            "{label} surface {pixel_width}x{pixel_height}px exceeds the {max_surface_px}px limit"
        )));
    }
    let pixel_width = pixel_width as u32;
    let pixel_height = pixel_height as u32;
    let top = pixel_height as f32;

    let mut content = Content::new();
    for paint in paints {
        match paint {
            Paint::Fill {
                x,
                y,
                width,
                height,
                color,
            } => {
                let [r, g, b] = color.unit();
                content.set_fill_rgb(r, g, b);
                content.rect(x * scale, top - (y + height) * scale, width * scale, height * scale);
                content.fill_nonzero();
            }
            Paint::Text {
                x,
                baseline,
                size,
                face,
                color,
                text,
            } => {
                let [r, g, b] = color.unit();
                content.set_fill_rgb(r, g, b);
                content.begin_text();
                content.set_font(Name(face.resource_name()), size * scale);
                content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x * scale, top - baseline * scale]);
                content.show(Str(&encode_win_ansi(text)));
                content.end_text();
            }
        }
    }

    let stream = content.finish().to_vec();
    debug!(
        band = label,
        pixel_width,
        pixel_height,
        paints = paints.len(),
        bytes = stream.len(),
        "Captured band"
    );

    Ok(BandSurface {
        css_width,
        css_height,
        scale,
        pixel_width,
        pixel_height,
        stream,
    })
}

/// Runs [`capture`] on the blocking pool.
pub async fn capture_band(
    label: &'static str,
    paints: Vec<Paint>,
    css_width: f32,
    css_height: f32,
    scale: f32,
    max_surface_px: u32,
) -> Result<BandSurface, ExportError> {
    tokio::task::spawn_blocking(move || {
        capture(label, &paints, css_width, css_height, scale, max_surface_px)
    })
    .await
    .map_err(|e| ExportError::Capture(format!("{label} capture task failed: {e}")))?
}

/// Encodes text for the standard Type1 fonts under WinAnsiEncoding.
/// Characters with no WinAnsi code point become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{201a}' => 0x82,
            '\u{201e}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            _ => b'?',
        })
        .collect()
}
