//! Lays a `Report` out into header, content and footer bands at a fixed CSS-pixel width.
//!
//! The layout mirrors the on-screen report: name and designation, a facts grid,
//! summary, a two-column education/certification section, the functional
//! evaluation form, and one atomic block per professional-experience entry.
//! The "Add …" affordances are emitted as `no_print` segments so the export can
//! hide them before measuring.

use crate::layout::font_metrics::{get_metrics, FontFace};
use crate::layout::wrap::wrap_lines;
use crate::models::{Report, UNSPECIFIED};
use crate::render::flow::{Band, Block, ContentRegion, Paint, Rgb, Segment};

/// A4 width at 96 dpi.
pub const REPORT_WIDTH_PX: f32 = 794.0;
const PADDING: f32 = 32.0;
const INNER_WIDTH: f32 = REPORT_WIDTH_PX - 2.0 * PADDING;

pub const BRAND_LINES: [&str; 2] = ["ALCOTT", "GLOBAL"];
pub const FOOTER_DISCLAIMER: &str = "Interview of candidates referred by Alcott Global. shall be \
    deemed acceptance of the standard terms of business and agreement to pay the relevant agency \
    fee for such candidates employed by the organization to whom the referral was made or any \
    other organization or person associated with it.";
pub const FOOTER_TAGLINE: &str = "Alcott Global \u{2013} Upgrading Value Chains, One Connection at a Time";
pub const FOOTER_REGIONS: &str = "NORTH AMERICA | APAC | EUROPE | MIDDLE EAST | LATAM";
pub const FOOTER_CONTACT: &str = "contact@alcottglobal.com | www.alcottglobal.com";

pub const EDUCATION_BANNER: &str = "EDUCATION, PROFESSIONAL TRAININGS & CERTIFICATION";
pub const EVALUATION_BANNER: &str = "FUNCTIONAL EVALUATION FORM";
pub const EXPERIENCE_BANNER: &str = "PROFESSIONAL EXPERIENCE";

const GRAY_400: Rgb = Rgb(156, 163, 175);
const GRAY_500: Rgb = Rgb(107, 114, 128);
const GRAY_600: Rgb = Rgb(75, 85, 99);
const GRAY_800: Rgb = Rgb(31, 41, 55);
const GRAY_50: Rgb = Rgb(249, 250, 251);
const GRAY_300: Rgb = Rgb(209, 213, 219);
const PRIMARY: Rgb = Rgb(37, 99, 235);

/// The three measured regions of a rendered report.
#[derive(Debug, Clone)]
pub struct ReportView {
    pub header: Band,
    pub content: ContentRegion,
    pub footer: Band,
}

pub fn render_report(report: &Report) -> ReportView {
    ReportView {
        header: header_band(),
        content: content_region(report),
        footer: footer_band(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Segment builder
// ────────────────────────────────────────────────────────────────────────────

/// Accumulates paints top-down with a running cursor.
struct SegmentBuilder {
    y: f32,
    paints: Vec<Paint>,
}

impl SegmentBuilder {
    fn new() -> Self {
        Self {
            y: 0.0,
            paints: Vec::new(),
        }
    }

    fn gap(&mut self, px: f32) -> &mut Self {
        self.y += px;
        self
    }

    fn fill(&mut self, x: f32, width: f32, height: f32, color: Rgb) -> &mut Self {
        self.paints.push(Paint::Fill {
            x,
            y: self.y,
            width,
            height,
            color,
        });
        self
    }

    /// Wrapped text, left-aligned at `x`. Advances by one line height per line.
    fn text(&mut self, text: &str, style: TextStyle, x: f32, max_width: f32) -> &mut Self {
        for line in wrap_lines(text, get_metrics(style.face), style.size, max_width) {
            self.line(line, style, x);
        }
        self
    }

    /// Single centered line within `[x, x + width]`.
    fn centered(&mut self, text: &str, style: TextStyle, x: f32, width: f32) -> &mut Self {
        let text_w = get_metrics(style.face).measure_str(text) * style.size;
        self.line(text.to_string(), style, x + ((width - text_w) / 2.0).max(0.0));
        self
    }

    /// Field value, or the gray "Not specified" placeholder when blank.
    fn value(&mut self, text: &str, style: TextStyle, x: f32, max_width: f32) -> &mut Self {
        if text.trim().is_empty() {
            let placeholder = TextStyle {
                face: FontFace::Oblique,
                color: GRAY_400,
                ..style
            };
            self.text(UNSPECIFIED, placeholder, x, max_width)
        } else {
            self.text(text, style, x, max_width)
        }
    }

    fn line(&mut self, text: String, style: TextStyle, x: f32) {
        let leading = (style.line_height - style.size) / 2.0;
        self.paints.push(Paint::Text {
            x,
            baseline: self.y + leading + style.size * 0.8,
            size: style.size,
            face: style.face,
            color: style.color,
            text,
        });
        self.y += style.line_height;
    }

    fn finish(self, no_print: bool) -> Segment {
        Segment {
            height: self.y,
            no_print,
            paints: self.paints,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    face: FontFace,
    size: f32,
    line_height: f32,
    color: Rgb,
}

const fn style(face: FontFace, size: f32, line_height: f32, color: Rgb) -> TextStyle {
    TextStyle {
        face,
        size,
        line_height,
        color,
    }
}

const NAME: TextStyle = style(FontFace::Bold, 36.0, 40.0, Rgb(17, 24, 39));
const DESIGNATION: TextStyle = style(FontFace::Regular, 20.0, 28.0, PRIMARY);
const LABEL: TextStyle = style(FontFace::Bold, 12.0, 16.0, GRAY_500);
const BODY: TextStyle = style(FontFace::Regular, 16.0, 24.0, GRAY_800);
const BODY_MUTED: TextStyle = style(FontFace::Regular, 16.0, 26.0, GRAY_600);
const SMALL: TextStyle = style(FontFace::Regular, 14.0, 20.0, GRAY_500);
const SECTION_TITLE: TextStyle = style(FontFace::Bold, 20.0, 28.0, GRAY_800);
const BANNER: TextStyle = style(FontFace::Bold, 18.0, 28.0, Rgb::WHITE);
const CATEGORY: TextStyle = style(FontFace::Bold, 18.0, 28.0, Rgb(55, 65, 81));
const STRONG: TextStyle = style(FontFace::Bold, 16.0, 24.0, GRAY_800);
const POSITION: TextStyle = style(FontFace::Bold, 18.0, 28.0, GRAY_800);
const AFFORDANCE: TextStyle = style(FontFace::Bold, 12.0, 16.0, PRIMARY);
const BRAND: TextStyle = style(FontFace::Bold, 20.0, 20.0, Rgb::WHITE);

fn printable(build: impl FnOnce(&mut SegmentBuilder)) -> Segment {
    let mut b = SegmentBuilder::new();
    build(&mut b);
    b.finish(false)
}

fn control(label: &str, x: f32, top_gap: f32) -> Segment {
    let mut b = SegmentBuilder::new();
    b.gap(top_gap).text(&format!("+ {label}"), AFFORDANCE, x, INNER_WIDTH);
    b.finish(true)
}

// ────────────────────────────────────────────────────────────────────────────
// Bands
// ────────────────────────────────────────────────────────────────────────────

fn header_band() -> Band {
    let mut b = SegmentBuilder::new();
    b.gap(16.0);
    for line in BRAND_LINES {
        b.centered(line, BRAND, 0.0, REPORT_WIDTH_PX);
    }
    b.gap(16.0);
    let height = b.y;
    let mut paints = vec![Paint::Fill {
        x: 0.0,
        y: 0.0,
        width: REPORT_WIDTH_PX,
        height,
        color: Rgb::BLACK,
    }];
    paints.extend(b.paints);
    Band {
        width: REPORT_WIDTH_PX,
        height,
        paints,
    }
}

fn footer_band() -> Band {
    let small = style(FontFace::Regular, 12.0, 16.0, GRAY_400);
    let tagline = style(FontFace::Bold, 12.0, 16.0, Rgb::WHITE);
    let regions = style(FontFace::Regular, 12.0, 16.0, GRAY_300);
    let contact = style(FontFace::Regular, 12.0, 16.0, Rgb::WHITE);
    let inset = 16.0;
    let text_width = REPORT_WIDTH_PX - 2.0 * inset;
    let logo_width = 120.0;

    let mut b = SegmentBuilder::new();
    b.gap(inset).text(FOOTER_DISCLAIMER, small, inset, text_width);
    b.gap(8.0).fill(inset, text_width, 1.0, GRAY_600).gap(8.0);

    let info_top = b.y;
    b.text(FOOTER_TAGLINE, tagline, inset, text_width - logo_width)
        .text(FOOTER_REGIONS, regions, inset, text_width - logo_width)
        .gap(4.0)
        .text(FOOTER_CONTACT, contact, inset, text_width - logo_width);
    let info_bottom = b.y;

    b.y = info_top + ((info_bottom - info_top) - 40.0).max(0.0) / 2.0;
    let logo_x = REPORT_WIDTH_PX - inset - logo_width;
    for line in BRAND_LINES {
        b.centered(line, BRAND, logo_x, logo_width);
    }
    b.y = b.y.max(info_bottom) + inset;

    let height = b.y;
    let mut paints = vec![Paint::Fill {
        x: 0.0,
        y: 0.0,
        width: REPORT_WIDTH_PX,
        height,
        color: Rgb::BLACK,
    }];
    paints.extend(b.paints);
    Band {
        width: REPORT_WIDTH_PX,
        height,
        paints,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Content
// ────────────────────────────────────────────────────────────────────────────

fn content_region(report: &Report) -> ContentRegion {
    let mut region = ContentRegion::new(REPORT_WIDTH_PX, PADDING, PADDING);

    region.push(Block::flow(vec![identity(report)]));
    region.push(Block::flow(vec![facts_grid(report)]));

    if !report.summary.trim().is_empty() {
        region.push(Block::flow(vec![printable(|b| {
            b.gap(32.0);
            section_title(b, "Summary", PADDING, INNER_WIDTH);
            b.text(&report.summary, BODY_MUTED, PADDING, INNER_WIDTH);
        })]));
    }

    region.push(banner(EDUCATION_BANNER));
    region.push(Block::flow(vec![education_columns(report)]));
    region.push(Block::flow(vec![
        control("Add Education", PADDING, 16.0),
        control("Add Certification", PADDING + INNER_WIDTH / 2.0 + 16.0, 0.0),
    ]));

    region.push(banner(EVALUATION_BANNER));
    for (i, category) in report.functional_evaluation.iter().enumerate() {
        if i > 0 {
            region.push(Block::gap(32.0));
        }
        region.push(Block::flow(vec![printable(|b| {
            b.text(&category.category.to_uppercase(), CATEGORY, PADDING, INNER_WIDTH)
                .gap(16.0);
        })]));
        for (q, qa) in category.questions.iter().enumerate() {
            if q > 0 {
                region.push(Block::gap(24.0));
            }
            region.push(Block::flow(vec![question_card(&qa.question, &qa.answer)]));
        }
    }

    region.push(banner(EXPERIENCE_BANNER));
    for (i, exp) in report.professional_experience.iter().enumerate() {
        if i > 0 {
            region.push(Block::gap(24.0));
        }
        region.push(Block::atomic(vec![
            printable(|b| {
                let x = PADDING + 32.0;
                let width = INNER_WIDTH - 32.0;
                b.fill(PADDING + 10.0, 8.0, 8.0, PRIMARY);
                b.value(&exp.position, POSITION, x, width)
                    .value(&exp.company, BODY_MUTED, x, width)
                    .gap(4.0)
                    .value(&exp.duration, SMALL, x, width)
                    .gap(12.0);
                for detail in &exp.details {
                    b.text("\u{2022}", BODY_MUTED, x + 8.0, 16.0);
                    b.y -= BODY_MUTED.line_height;
                    b.value(detail, BODY_MUTED, x + 24.0, width - 24.0).gap(4.0);
                }
            }),
            control("Add Detail", PADDING + 40.0, 8.0),
        ]));
    }
    region.push(Block::flow(vec![control("Add Experience", PADDING, 24.0)]));

    region
}

fn identity(report: &Report) -> Segment {
    printable(|b| {
        b.value(&report.candidate_name, NAME, PADDING, INNER_WIDTH)
            .gap(4.0)
            .value(&report.designation, DESIGNATION, PADDING, INNER_WIDTH)
            .gap(24.0);
    })
}

fn facts_grid(report: &Report) -> Segment {
    let facts = [
        ("CURRENT EMPLOYER", report.employer.as_str()),
        ("LOCATION", report.location.as_str()),
        ("INDUSTRY", report.industry.as_str()),
        ("FUNCTION", report.function.as_str()),
        ("LANGUAGES", report.language.as_str()),
    ];
    let column_gap = 32.0;
    let column_width = (INNER_WIDTH - 2.0 * column_gap) / 3.0;

    let mut b = SegmentBuilder::new();
    b.fill(PADDING, INNER_WIDTH, 1.0, Rgb(229, 231, 235)).gap(16.0);
    for row in facts.chunks(3) {
        let row_top = b.y;
        let mut row_bottom = row_top;
        for (col, (label, value)) in row.iter().enumerate() {
            let x = PADDING + col as f32 * (column_width + column_gap);
            b.y = row_top;
            b.text(label, LABEL, x, column_width)
                .gap(4.0)
                .value(value, BODY, x, column_width);
            row_bottom = row_bottom.max(b.y);
        }
        b.y = row_bottom + 24.0;
    }
    b.y -= 8.0;
    b.fill(PADDING, INNER_WIDTH, 1.0, Rgb(229, 231, 235)).gap(1.0);
    b.finish(false)
}

fn banner(title: &str) -> Block {
    Block::flow(vec![printable(|b| {
        b.gap(32.0);
        let top = b.y;
        b.fill(PADDING, INNER_WIDTH, 52.0, Rgb::BLACK).gap(12.0);
        b.centered(title, BANNER, PADDING, INNER_WIDTH);
        b.y = top + 52.0 + 32.0;
    })])
}

fn section_title(b: &mut SegmentBuilder, title: &str, x: f32, width: f32) {
    b.text(title, SECTION_TITLE, x, width)
        .gap(8.0)
        .fill(x, width, 2.0, GRAY_300)
        .gap(16.0);
}

fn education_columns(report: &Report) -> Segment {
    let column_gap = 32.0;
    let column_width = (INNER_WIDTH - column_gap) / 2.0;
    let left = PADDING;
    let right = PADDING + column_width + column_gap;

    let mut b = SegmentBuilder::new();
    section_title(&mut b, "Education", left, column_width);
    for (i, edu) in report.education.iter().enumerate() {
        if i > 0 {
            b.gap(16.0);
        }
        let degree = if edu.field_of_study.trim().is_empty() {
            edu.degree.clone()
        } else {
            format!("{}, {}", edu.degree, edu.field_of_study)
        };
        b.value(&edu.institution, STRONG, left, column_width)
            .value(&degree, BODY_MUTED, left, column_width)
            .value(&edu.year, SMALL, left, column_width);
    }
    let left_bottom = b.y;

    b.y = 0.0;
    section_title(&mut b, "Certifications", right, column_width);
    for (i, cert) in report.certifications.iter().enumerate() {
        if i > 0 {
            b.gap(16.0);
        }
        b.value(&cert.name, STRONG, right, column_width);
        if !cert.issuing_organization.trim().is_empty() {
            b.text(&cert.issuing_organization, BODY_MUTED, right, column_width);
        }
        b.value(&cert.year, SMALL, right, column_width);
    }
    b.y = b.y.max(left_bottom);
    b.finish(false)
}

fn question_card(question: &str, answer: &str) -> Segment {
    let inset = 16.0;
    let x = PADDING + inset;
    let width = INNER_WIDTH - 2.0 * inset;

    let mut inner = SegmentBuilder::new();
    inner
        .gap(inset)
        .text(question, STRONG, x, width)
        .gap(8.0)
        .value(answer, BODY_MUTED, x, width)
        .gap(inset);

    let mut paints = vec![Paint::Fill {
        x: PADDING,
        y: 0.0,
        width: INNER_WIDTH,
        height: inner.y,
        color: GRAY_50,
    }];
    paints.extend(inner.paints);
    Segment {
        height: inner.y,
        no_print: false,
        paints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Certification, Education, ProfessionalExperience, QuestionAndAnswer, QuestionCategory,
    };

    fn texts(paints: &[Paint]) -> Vec<String> {
        paints
            .iter()
            .filter_map(|p| match p {
                Paint::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn report() -> Report {
        Report {
            candidate_name: "Ada Lovelace".to_string(),
            designation: "Director, Logistics".to_string(),
            employer: "Acme".to_string(),
            summary: "Twenty years in distribution.".to_string(),
            education: vec![Education {
                institution: "MIT".to_string(),
                degree: "MSc".to_string(),
                field_of_study: "Supply Chain".to_string(),
                year: "2004".to_string(),
            }],
            certifications: vec![Certification {
                name: "CSCP".to_string(),
                issuing_organization: "APICS".to_string(),
                year: "2010".to_string(),
            }],
            professional_experience: vec![
                ProfessionalExperience {
                    company: "Acme".to_string(),
                    position: "Director".to_string(),
                    duration: "2019 - Present".to_string(),
                    details: vec!["Ran US distribution".to_string()],
                },
                ProfessionalExperience::placeholder(),
            ],
            functional_evaluation: vec![QuestionCategory {
                category: "Compensation".to_string(),
                questions: vec![QuestionAndAnswer {
                    question: "What is your Notice Period?".to_string(),
                    answer: "Three months".to_string(),
                }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_one_atomic_block_per_experience_entry() {
        let view = render_report(&report());
        assert_eq!(view.content.atomic_count(), 2);
        let spans = view.content.atomic_spans();
        assert!(spans[0].bottom() <= spans[1].top);
    }

    #[test]
    fn test_content_renders_sections_in_order() {
        let view = render_report(&report());
        let all = texts(&view.content.paint_list());
        let pos = |needle: &str| {
            all.iter()
                .position(|t| t == needle)
                .unwrap_or_else(|| panic!("missing {needle}: {all:?}"))
        };
        assert!(pos("Ada Lovelace") < pos("Summary"));
        assert!(pos("Summary") < pos(EDUCATION_BANNER));
        assert!(pos(EDUCATION_BANNER) < pos(EVALUATION_BANNER));
        assert!(pos("COMPENSATION") < pos(EXPERIENCE_BANNER));
        assert!(pos(EXPERIENCE_BANNER) < pos("Ran US distribution"));
        assert!(all.contains(&"MSc, Supply Chain".to_string()));
        assert!(all.contains(&"APICS".to_string()));
    }

    #[test]
    fn test_blank_fields_show_placeholder() {
        let view = render_report(&report());
        let all = texts(&view.content.paint_list());
        // location, industry, function, language are blank
        assert_eq!(all.iter().filter(|t| *t == UNSPECIFIED).count(), 4);
    }

    #[test]
    fn test_controls_are_hidden_for_print() {
        let mut view = render_report(&report());
        let visible = texts(&view.content.paint_list());
        assert!(visible.contains(&"+ Add Detail".to_string()));
        assert!(visible.contains(&"+ Add Experience".to_string()));
        let height = view.content.scroll_height();

        view.content.set_no_print_hidden(true);
        let printed = texts(&view.content.paint_list());
        assert!(printed.iter().all(|t| !t.starts_with("+ Add")));
        assert!(view.content.scroll_height() < height);
    }

    #[test]
    fn test_missing_collections_render_empty_sections_with_affordances() {
        let report: Report = serde_json::from_str(
            r#"{"candidateName": "Ada", "professionalExperience": [], "functionalEvaluation": []}"#,
        )
        .unwrap();
        let view = render_report(&report);
        assert_eq!(view.content.atomic_count(), 0);
        let all = texts(&view.content.paint_list());
        assert!(all.contains(&"Education".to_string()));
        assert!(all.contains(&"+ Add Education".to_string()));
        assert!(all.contains(&"+ Add Certification".to_string()));
        assert!(!all.contains(&"Summary".to_string()));
    }

    #[test]
    fn test_bands_are_full_width_and_branded() {
        let view = render_report(&Report::default());
        for band in [&view.header, &view.footer] {
            assert_eq!(band.width, REPORT_WIDTH_PX);
            assert!(band.height > 0.0);
            assert!(texts(&band.paints).contains(&"ALCOTT".to_string()));
        }
        assert!(view.footer.height > view.header.height);
    }

    #[test]
    fn test_long_details_grow_the_entry() {
        let mut short = report();
        short.professional_experience.truncate(1);
        let mut long = short.clone();
        long.professional_experience[0].details = vec!["Ran US distribution".to_string(); 30];

        let short_h = render_report(&short).content.atomic_spans()[0].height;
        let long_h = render_report(&long).content.atomic_spans()[0].height;
        assert!(long_h > short_h + 29.0 * 24.0);
    }
}
