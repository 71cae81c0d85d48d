//! Block flow model for a rendered report band.
//!
//! A `ContentRegion` is a vertical stack of blocks inside fixed horizontal
//! padding. Block offsets are never stored: they are recomputed from the stack,
//! so inserting a spacer shifts every later block exactly as a browser reflow
//! would. Segments tagged `no_print` take no space while hidden.

use serde::Serialize;

use crate::layout::font_metrics::FontFace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Components scaled to 0.0..=1.0 for PDF colour operators.
    pub fn unit(self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }
}

/// A drawing primitive in CSS pixels, y growing downward, relative to the
/// enclosing segment (or band) origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Paint {
    Text {
        x: f32,
        baseline: f32,
        size: f32,
        face: FontFace,
        color: Rgb,
        text: String,
    },
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
}

impl Paint {
    pub fn offset(&self, dy: f32) -> Paint {
        match self.clone() {
            Paint::Text {
                x,
                baseline,
                size,
                face,
                color,
                text,
            } => Paint::Text {
                x,
                baseline: baseline + dy,
                size,
                face,
                color,
                text,
            },
            Paint::Fill {
                x,
                y,
                width,
                height,
                color,
            } => Paint::Fill {
                x,
                y: y + dy,
                width,
                height,
                color,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub height: f32,
    /// Interactive control: removed from the flow while the region is printing.
    pub no_print: bool,
    pub paints: Vec<Paint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpacerId(u32);

#[derive(Debug, Clone, PartialEq)]
enum BlockRole {
    Flow,
    /// Must never be split across a page boundary.
    Atomic,
    Spacer(SpacerId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    role: BlockRole,
    segments: Vec<Segment>,
}

impl Block {
    pub fn flow(segments: Vec<Segment>) -> Self {
        Self {
            role: BlockRole::Flow,
            segments,
        }
    }

    pub fn atomic(segments: Vec<Segment>) -> Self {
        Self {
            role: BlockRole::Atomic,
            segments,
        }
    }

    /// Vertical whitespace that is always printed.
    pub fn gap(height: f32) -> Self {
        Self::flow(vec![Segment {
            height,
            no_print: false,
            paints: Vec::new(),
        }])
    }

    pub fn is_atomic(&self) -> bool {
        self.role == BlockRole::Atomic
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self.role, BlockRole::Spacer(_))
    }

    fn height(&self, hide_no_print: bool) -> f32 {
        self.visible(hide_no_print).map(|s| s.height).sum()
    }

    fn visible(&self, hide_no_print: bool) -> impl Iterator<Item = &Segment> {
        self.segments
            .iter()
            .filter(move |s| !(hide_no_print && s.no_print))
    }
}

/// Top offset and height of an atomic block, in region pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSpan {
    pub top: f32,
    pub height: f32,
}

impl UnitSpan {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

#[derive(Debug, Clone)]
pub struct ContentRegion {
    width: f32,
    padding_top: f32,
    padding_bottom: f32,
    blocks: Vec<Block>,
    no_print_hidden: bool,
    next_spacer: u32,
}

impl ContentRegion {
    pub fn new(width: f32, padding_top: f32, padding_bottom: f32) -> Self {
        Self {
            width,
            padding_top,
            padding_bottom,
            blocks: Vec::new(),
            no_print_hidden: false,
            next_spacer: 0,
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn scroll_width(&self) -> f32 {
        self.width
    }

    pub fn scroll_height(&self) -> f32 {
        self.padding_top
            + self
                .blocks
                .iter()
                .map(|b| b.height(self.no_print_hidden))
                .sum::<f32>()
            + self.padding_bottom
    }

    pub fn no_print_hidden(&self) -> bool {
        self.no_print_hidden
    }

    /// Toggles visibility of every `no_print` segment; returns how many segments
    /// are affected.
    pub fn set_no_print_hidden(&mut self, hidden: bool) -> usize {
        self.no_print_hidden = hidden;
        self.blocks
            .iter()
            .flat_map(|b| b.segments.iter())
            .filter(|s| s.no_print)
            .count()
    }

    pub fn atomic_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_atomic()).count()
    }

    pub fn spacer_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_spacer()).count()
    }

    /// Spans of every atomic block in document order.
    pub fn atomic_spans(&self) -> Vec<UnitSpan> {
        let mut spans = Vec::new();
        let mut y = self.padding_top;
        for block in &self.blocks {
            let height = block.height(self.no_print_hidden);
            if block.is_atomic() {
                spans.push(UnitSpan { top: y, height });
            }
            y += height;
        }
        spans
    }

    /// Inserts an empty block of `height` immediately before the `unit`-th atomic block.
    ///
    /// Returns `None` when there is no such unit.
    pub fn insert_spacer_before(&mut self, unit: usize, height: f32) -> Option<SpacerId> {
        let index = self
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_atomic())
            .nth(unit)
            .map(|(i, _)| i)?;

        let id = SpacerId(self.next_spacer);
        self.next_spacer += 1;
        self.blocks.insert(
            index,
            Block {
                role: BlockRole::Spacer(id),
                segments: vec![Segment {
                    height,
                    no_print: false,
                    paints: Vec::new(),
                }],
            },
        );
        Some(id)
    }

    /// Removes a previously inserted spacer. Returns false if it is already gone.
    pub fn remove_spacer(&mut self, id: SpacerId) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.role != BlockRole::Spacer(id));
        self.blocks.len() != before
    }

    /// Flattens the visible blocks into region coordinates.
    pub fn paint_list(&self) -> Vec<Paint> {
        let mut out = Vec::new();
        let mut y = self.padding_top;
        for block in &self.blocks {
            for segment in block.visible(self.no_print_hidden) {
                out.extend(segment.paints.iter().map(|p| p.offset(y)));
                y += segment.height;
            }
        }
        out
    }
}

/// A fixed-height band (header or footer) drawn identically on every page.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub width: f32,
    pub height: f32,
    pub paints: Vec<Paint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(height: f32, no_print: bool) -> Segment {
        Segment {
            height,
            no_print,
            paints: vec![Paint::Fill {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height,
                color: Rgb::BLACK,
            }],
        }
    }

    fn region() -> ContentRegion {
        let mut region = ContentRegion::new(800.0, 32.0, 32.0);
        region.push(Block::flow(vec![seg(100.0, false)]));
        region.push(Block::atomic(vec![seg(200.0, false), seg(20.0, true)]));
        region.push(Block::gap(24.0));
        region.push(Block::atomic(vec![seg(150.0, false)]));
        region.push(Block::flow(vec![seg(30.0, true)]));
        region
    }

    #[test]
    fn test_offsets_follow_the_flow() {
        let region = region();
        assert_eq!(
            region.atomic_spans(),
            vec![
                UnitSpan { top: 132.0, height: 220.0 },
                UnitSpan { top: 376.0, height: 150.0 },
            ]
        );
        assert_eq!(region.scroll_height(), 32.0 + 100.0 + 220.0 + 24.0 + 150.0 + 30.0 + 32.0);
    }

    #[test]
    fn test_hiding_no_print_reflows() {
        let mut region = region();
        assert_eq!(region.set_no_print_hidden(true), 2);
        assert_eq!(
            region.atomic_spans(),
            vec![
                UnitSpan { top: 132.0, height: 200.0 },
                UnitSpan { top: 356.0, height: 150.0 },
            ]
        );
        region.set_no_print_hidden(false);
        assert_eq!(region.atomic_spans()[1].top, 376.0);
    }

    #[test]
    fn test_spacer_insert_and_remove() {
        let mut region = region();
        let height_before = region.scroll_height();

        let id = region.insert_spacer_before(1, 50.0).unwrap();
        assert_eq!(region.atomic_spans()[1].top, 426.0);
        assert_eq!(region.spacer_count(), 1);
        assert_eq!(region.scroll_height(), height_before + 50.0);

        assert!(region.remove_spacer(id));
        assert!(!region.remove_spacer(id));
        assert_eq!(region.spacer_count(), 0);
        assert_eq!(region.scroll_height(), height_before);

        assert!(region.insert_spacer_before(7, 10.0).is_none());
    }

    #[test]
    fn test_paint_list_skips_hidden_segments() {
        let mut region = region();
        assert_eq!(region.paint_list().len(), 5);
        region.set_no_print_hidden(true);
        let paints = region.paint_list();
        assert_eq!(paints.len(), 3);
        match &paints[2] {
            Paint::Fill { y, .. } => assert_eq!(*y, 356.0),
            other => panic!("unexpected paint {other:?}"),
        }
    }
}
