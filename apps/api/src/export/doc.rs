//! Word-processor export: the report serialized as static HTML with inline styling,
//! served as a legacy `.doc` that word processors open natively. Not paginated.

use askama::Template;

use crate::export::ExportError;
use crate::models::Report;
use crate::render::view::{BRAND_LINES, FOOTER_CONTACT, FOOTER_TAGLINE};

pub const DOC_CONTENT_TYPE: &str = "application/msword";

#[derive(Template)]
#[template(path = "report.doc.html", escape = "html")]
struct DocTemplate<'a> {
    report: &'a Report,
    brand_lines: &'a [&'a str],
    footer_tagline: &'a str,
    footer_contact: &'a str,
}

mod filters {
    /// Turns line breaks in already escaped text into `<br/>`.
    pub fn breaks<T: std::fmt::Display>(text: T) -> ::askama::Result<String> {
        Ok(text.to_string().replace("\r\n", "\n").replace('\n', "<br/>"))
    }
}

/// Renders the document, prefixed with a UTF-8 byte-order mark.
pub fn render_doc(report: &Report) -> Result<String, ExportError> {
    let template = DocTemplate {
        report,
        brand_lines: &BRAND_LINES,
        footer_tagline: FOOTER_TAGLINE,
        footer_contact: FOOTER_CONTACT,
    };
    let body = template.render()?;
    Ok(format!("\u{feff}{body}"))
}
