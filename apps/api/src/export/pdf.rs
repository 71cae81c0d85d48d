//! PDF assembly over captured band surfaces.
//!
//! Each surface becomes one form XObject. Every page draws the header flush at
//! the top and the footer flush at the bottom, then clips to the content band and
//! draws the single tall content surface shifted up by `i * content_mm`, so the
//! pages read as a moving viewport over one continuous drawing.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, TextStr};

use crate::export::capture::BandSurface;
use crate::export::geometry::{BandLayout, PT_PER_MM};
use crate::layout::font_metrics::FontFace;

const HEADER: Name<'static> = Name(b"Hdr");
const FOOTER: Name<'static> = Name(b"Ftr");
const BODY: Name<'static> = Name(b"Body");

pub struct Bands<'a> {
    pub header: &'a BandSurface,
    pub footer: &'a BandSurface,
    pub content: &'a BandSurface,
}

pub fn assemble(layout: &BandLayout, bands: &Bands<'_>, page_count: usize, title: &str) -> Vec<u8> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let info_id = alloc.bump();
    let font_ids: Vec<(FontFace, Ref)> = FontFace::ALL.iter().map(|f| (*f, alloc.bump())).collect();
    let header_id = alloc.bump();
    let footer_id = alloc.bump();
    let body_id = alloc.bump();
    let page_ids: Vec<(Ref, Ref)> = (0..page_count)
        .map(|_| (alloc.bump(), alloc.bump()))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_count as i32);
    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr(concat!("report-api ", env!("CARGO_PKG_VERSION"))));

    for (face, id) in &font_ids {
        pdf.type1_font(*id)
            .base_font(Name(face.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    for (id, surface) in [
        (header_id, bands.header),
        (footer_id, bands.footer),
        (body_id, bands.content),
    ] {
        let mut form = pdf.form_xobject(id, &surface.stream);
        form.bbox(Rect::new(
            0.0,
            0.0,
            surface.pixel_width as f32,
            surface.pixel_height as f32,
        ));
        let mut resources = form.resources();
        let mut fonts = resources.fonts();
        for (face, font_id) in &font_ids {
            fonts.pair(Name(face.resource_name()), *font_id);
        }
    }

    let page_w = layout.page.width_pt();
    let page_h = layout.page.height_pt();
    let header_pt = layout.header_mm * PT_PER_MM;
    let footer_pt = layout.footer_mm * PT_PER_MM;
    let content_pt = layout.content_mm * PT_PER_MM;
    let fit = |surface: &BandSurface| page_w / surface.pixel_width as f64;
    let body_height_pt = bands.content.pixel_height as f64 * fit(bands.content);

    for (i, (page_id, stream_id)) in page_ids.iter().enumerate() {
        let mut content = Content::new();
        place(&mut content, HEADER, fit(bands.header), 0.0, page_h - header_pt);
        place(&mut content, FOOTER, fit(bands.footer), 0.0, 0.0);

        content.save_state();
        content.rect(0.0, footer_pt as f32, page_w as f32, content_pt as f32);
        content.clip_nonzero();
        content.end_path();
        let body_top = page_h - header_pt + i as f64 * content_pt;
        place(
            &mut content,
            BODY,
            fit(bands.content),
            0.0,
            body_top - body_height_pt,
        );
        content.restore_state();

        let stream = content.finish();
        pdf.stream(*stream_id, &stream);

        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, page_w as f32, page_h as f32));
        page.parent(page_tree_id);
        page.contents(*stream_id);
        page.resources()
            .x_objects()
            .pair(HEADER, header_id)
            .pair(FOOTER, footer_id)
            .pair(BODY, body_id);
    }

    pdf.finish()
}

/// Draws a form XObject uniformly scaled with its bottom-left corner at `(x, y)`.
fn place(content: &mut Content, name: Name<'_>, scale: f64, x: f64, y: f64) {
    content.save_state();
    content.transform([scale as f32, 0.0, 0.0, scale as f32, x as f32, y as f32]);
    content.x_object(name);
    content.restore_state();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::capture::capture;
    use crate::export::geometry::PageGeometry;
    use crate::render::flow::{Paint, Rgb};

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    fn band(height: f32) -> BandSurface {
        let paints = vec![Paint::Fill {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height,
            color: Rgb::BLACK,
        }];
        capture("band", &paints, 100.0, height, 2.0, 65_535).unwrap()
    }

    #[test]
    fn test_assembles_one_page_per_content_slice() {
        let header = band(10.0);
        let footer = band(10.0);
        let content = band(300.0);
        let layout = BandLayout::new(PageGeometry::A4, &header, &footer).unwrap();
        let bands = Bands {
            header: &header,
            footer: &footer,
            content: &content,
        };

        let bytes = assemble(&layout, &bands, 3, "Report - Jane Doe");

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"%%EOF"));
        assert!(contains(&bytes, b"/Count 3"));
        assert!(contains(&bytes, b"/WinAnsiEncoding"));
        assert!(contains(&bytes, b"/Helvetica-Bold"));
        // Header, footer and body are each referenced once per page.
        assert_eq!(count(&bytes, b"/Body Do"), 3);
        assert_eq!(count(&bytes, b"/Hdr Do"), 3);
        assert_eq!(count(&bytes, b"/Ftr Do"), 3);
    }

    #[test]
    fn test_single_page_document() {
        let header = band(10.0);
        let footer = band(10.0);
        let content = band(50.0);
        let layout = BandLayout::new(PageGeometry::A4, &header, &footer).unwrap();
        let bytes = assemble(
            &layout,
            &Bands {
                header: &header,
                footer: &footer,
                content: &content,
            },
            1,
            "Report - candidate",
        );
        assert!(contains(&bytes, b"/Count 1"));
        assert_eq!(count(&bytes, b"/Body Do"), 1);
    }
}
