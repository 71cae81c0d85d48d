//! Paginated export engine.
//!
//! `render_pdf` turns a rendered report into an A4 PDF in which header and footer
//! repeat on every page and no professional-experience entry is split across a
//! page boundary. The content region is borrowed exclusively for the whole run
//! and is handed back exactly as it was, with no spacers and all controls
//! visible, whether the export succeeds or fails.

pub mod capture;
pub mod doc;
pub mod geometry;
pub mod handlers;
pub mod pagination;
pub mod pdf;
pub mod scope;

use thiserror::Error;
use tracing::{info, warn};

use crate::export::capture::capture_band;
use crate::export::geometry::{scaled_height_mm, BandLayout, PageGeometry};
use crate::export::pagination::{find_split_unit, repair_page_breaks};
use crate::export::pdf::{assemble, Bands};
use crate::export::scope::ExportScope;
use crate::models::Report;
use crate::render::view::ReportView;

/// Device pixels per CSS pixel when capturing bands.
pub const CAPTURE_SCALE: f32 = 2.0;

/// Largest capture surface edge, in device pixels.
pub const DEFAULT_MAX_SURFACE_PX: u32 = 65_535;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Report region '{0}' is missing or has no size")]
    MissingRegion(&'static str),

    #[error(
        "Header ({header_mm:.1}mm) and footer ({footer_mm:.1}mm) leave no room for content on a {page_mm:.1}mm page"
    )]
    BandsExceedPage {
        header_mm: f64,
        footer_mm: f64,
        page_mm: f64,
    },

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Document rendering failed: {0}")]
    Template(#[from] askama::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct ExportConfig {
    pub page: PageGeometry,
    pub scale: f32,
    pub max_surface_px: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::A4,
            scale: CAPTURE_SCALE,
            max_surface_px: DEFAULT_MAX_SURFACE_PX,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub spacers_inserted: usize,
    /// Height of the repaired content in page millimetres.
    pub content_height_mm: f64,
    /// Usable content height on each page.
    pub content_band_mm: f64,
}

/// Runs the PDF export pipeline over `view`.
pub async fn render_pdf(
    view: &mut ReportView,
    config: &ExportConfig,
    title: &str,
) -> Result<PdfArtifact, ExportError> {
    check_region("header", view.header.width, view.header.height)?;
    check_region("footer", view.footer.width, view.footer.height)?;
    check_region(
        "content",
        view.content.scroll_width(),
        view.content.scroll_height(),
    )?;

    let mut scope = ExportScope::enter(&mut view.content);

    let (header, footer) = tokio::try_join!(
        capture_band(
            "header",
            view.header.paints.clone(),
            view.header.width,
            view.header.height,
            config.scale,
            config.max_surface_px,
        ),
        capture_band(
            "footer",
            view.footer.paints.clone(),
            view.footer.width,
            view.footer.height,
            config.scale,
            config.max_surface_px,
        ),
    )?;

    let layout = BandLayout::new(config.page, &header, &footer)?;
    let page_pixel_height = layout.page_pixel_height(scope.region().scroll_width());

    let outcome = repair_page_breaks(&mut scope, page_pixel_height);
    if let Some((unit, span)) = find_split_unit(&scope.region().atomic_spans(), page_pixel_height) {
        warn!(unit, top = span.top, height = span.height, "Entry still crosses a page boundary");
    }

    let content = capture_band(
        "content",
        scope.region().paint_list(),
        scope.region().scroll_width(),
        scope.region().scroll_height(),
        config.scale,
        config.max_surface_px,
    )
    .await?;

    let content_height_mm = scaled_height_mm(&content, &layout.page);
    let page_count = layout.page_count(content_height_mm);

    let bytes = assemble(
        &layout,
        &Bands {
            header: &header,
            footer: &footer,
            content: &content,
        },
        page_count,
        title,
    );

    info!(
        header_mm = layout.header_mm,
        footer_mm = layout.footer_mm,
        content_band_mm = layout.content_mm,
        page_pixel_height,
        spacers = outcome.spacers_inserted,
        passes = outcome.passes,
        pages = page_count,
        bytes = bytes.len(),
        "Rendered PDF export"
    );

    Ok(PdfArtifact {
        bytes,
        page_count,
        spacers_inserted: outcome.spacers_inserted,
        content_height_mm,
        content_band_mm: layout.content_mm,
    })
}

fn check_region(name: &'static str, width: f32, height: f32) -> Result<(), ExportError> {
    if width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ExportError::MissingRegion(name))
    }
}

/// `Report - {name}.pdf`, falling back to `candidate`.
pub fn pdf_filename(report: &Report) -> String {
    format!("Report - {}.pdf", report.display_name("candidate"))
}

/// `Resume - {name}.doc`, falling back to `Candidate`.
pub fn doc_filename(report: &Report) -> String {
    format!("Resume - {}.doc", report.display_name("Candidate"))
}
