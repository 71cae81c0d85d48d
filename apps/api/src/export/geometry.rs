//! Page geometry: converts captured band surfaces into page units and derives the
//! per-page content band.
//!
//! All band heights are scaled to the page width, so a surface keeps its aspect
//! ratio when it is drawn edge to edge: `height_mm = pixel_height * page_width / pixel_width`.

use crate::export::capture::BandSurface;
use crate::export::ExportError;

/// PostScript points per millimetre.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Relative slack when turning a content height into a whole page count.
const PAGE_COUNT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    pub fn width_pt(&self) -> f64 {
        self.width_mm * PT_PER_MM
    }

    pub fn height_pt(&self) -> f64 {
        self.height_mm * PT_PER_MM
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Height in page millimetres of a surface drawn across the full page width.
pub fn scaled_height_mm(surface: &BandSurface, page: &PageGeometry) -> f64 {
    surface.pixel_height as f64 * page.width_mm / surface.pixel_width as f64
}

/// Vertical split of every page into header, content band and footer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLayout {
    pub page: PageGeometry,
    pub header_mm: f64,
    pub footer_mm: f64,
    /// Usable content height on each page.
    pub content_mm: f64,
}

impl BandLayout {
    /// Fails with `BandsExceedPage` when header and footer leave no room for content.
    pub fn new(
        page: PageGeometry,
        header: &BandSurface,
        footer: &BandSurface,
    ) -> Result<Self, ExportError> {
        let header_mm = scaled_height_mm(header, &page);
        let footer_mm = scaled_height_mm(footer, &page);
        let content_mm = page.height_mm - header_mm - footer_mm;

        if !(content_mm > 0.0) {
            return Err(ExportError::BandsExceedPage {
                header_mm,
                footer_mm,
                page_mm: page.height_mm,
            });
        }

        Ok(Self {
            page,
            header_mm,
            footer_mm,
            content_mm,
        })
    }

    /// The span of unscaled content pixels that fills one page's content band.
    pub fn page_pixel_height(&self, content_css_width: f32) -> f32 {
        (self.content_mm * content_css_width as f64 / self.page.width_mm) as f32
    }

    /// `ceil(content_height_mm / content_mm)`, never less than one page.
    pub fn page_count(&self, content_height_mm: f64) -> usize {
        let pages = content_height_mm / self.content_mm;
        let pages = (pages - pages.abs() * PAGE_COUNT_TOLERANCE).ceil();
        if pages.is_finite() && pages >= 1.0 {
            pages as usize
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(pixel_width: u32, pixel_height: u32) -> BandSurface {
        BandSurface {
            css_width: pixel_width as f32 / 2.0,
            css_height: pixel_height as f32 / 2.0,
            scale: 2.0,
            pixel_width,
            pixel_height,
            stream: Vec::new(),
        }
    }

    #[test]
    fn test_band_heights_scale_to_page_width() {
        let layout =
            BandLayout::new(PageGeometry::A4, &surface(1588, 200), &surface(1588, 400)).unwrap();
        assert!((layout.header_mm - 200.0 * 210.0 / 1588.0).abs() < 1e-9);
        assert!((layout.footer_mm - 400.0 * 210.0 / 1588.0).abs() < 1e-9);
        assert!((layout.content_mm - (297.0 - layout.header_mm - layout.footer_mm)).abs() < 1e-9);
    }

    #[test]
    fn test_page_pixel_height_maps_back_to_css_pixels() {
        let layout =
            BandLayout::new(PageGeometry::A4, &surface(200, 20), &surface(200, 20)).unwrap();
        // 21mm header and footer leave 255mm, which is 255 * 100 / 210 css px at 100px wide.
        assert_eq!(layout.content_mm, 255.0);
        assert!((layout.page_pixel_height(100.0) - 121.428_57).abs() < 1e-3);
    }

    #[test]
    fn test_oversized_bands_are_rejected() {
        let err = BandLayout::new(PageGeometry::A4, &surface(200, 200), &surface(200, 100))
            .unwrap_err();
        assert!(matches!(err, ExportError::BandsExceedPage { .. }));
    }

    #[test]
    fn test_bands_exactly_filling_page_are_rejected() {
        let band = surface(200, 140);
        let page = PageGeometry {
            width_mm: 210.0,
            height_mm: 2.0 * scaled_height_mm(&band, &PageGeometry::A4),
        };
        assert!(BandLayout::new(page, &band, &band).is_err());
    }

    #[test]
    fn test_page_count_rounds_up() {
        let layout =
            BandLayout::new(PageGeometry::A4, &surface(200, 20), &surface(200, 20)).unwrap();
        assert_eq!(layout.page_count(0.0), 1);
        assert_eq!(layout.page_count(100.0), 1);
        assert_eq!(layout.page_count(255.0), 1);
        assert_eq!(layout.page_count(255.1), 2);
        assert_eq!(layout.page_count(720.3), 3);
        assert_eq!(layout.page_count(3.0 * 255.0), 3);
    }

    #[test]
    fn test_a4_in_points() {
        assert!((PageGeometry::A4.width_pt() - 595.275_6).abs() < 1e-3);
        assert!((PageGeometry::A4.height_pt() - 841.889_8).abs() < 1e-3);
    }
}
