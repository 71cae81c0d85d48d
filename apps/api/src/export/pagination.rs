//! Page-break repair: pushes atomic units past page boundaries they would straddle.
//!
//! # Algorithm
//! Scan the atomic units in document order with a running page-break line `Y`
//! (initially one page). For each unit, advance `Y` by whole pages until it is at
//! or past the unit's top. If the unit's bottom is beyond `Y`, insert a spacer of
//! `Y - top` before it and restart the scan, since every later offset moved.
//! Stop when a full scan inserts nothing.
//!
//! Each insertion lands one unit exactly on a boundary and never moves an earlier
//! unit, so at most one spacer per unit is inserted and the loop ends within
//! `units + 1` scans. A unit taller than a page that already starts on a boundary
//! needs zero fill and is left to overflow.

use tracing::{debug, warn};

use crate::render::flow::UnitSpan;

/// Sub-pixel tolerance for boundary comparisons.
const EPSILON: f32 = 0.05;

/// Slack used when auditing a finished layout for split units.
const AUDIT_TOLERANCE: f32 = 0.5;

/// A measurable flow of atomic units that accepts spacers.
pub trait AtomicFlow {
    /// Spans of all atomic units in document order, reflecting every spacer
    /// inserted so far.
    fn atomic_spans(&self) -> Vec<UnitSpan>;

    /// Inserts `height` of blank space immediately before the `unit`-th atomic unit.
    /// Returns false if the unit does not exist.
    fn insert_spacer_before(&mut self, unit: usize, height: f32) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepairOutcome {
    pub spacers_inserted: usize,
    pub passes: usize,
    /// False only if the pass cap was hit.
    pub converged: bool,
}

/// Runs page-break repair to a fixed point.
///
/// A non-positive (or NaN) `page_pixel_height` leaves the flow untouched.
pub fn repair_page_breaks<F>(flow: &mut F, page_pixel_height: f32) -> RepairOutcome
where
    F: AtomicFlow + ?Sized,
{
    let mut outcome = RepairOutcome {
        converged: true,
        ..Default::default()
    };
    if !(page_pixel_height > 0.0) {
        return outcome;
    }

    let max_passes = flow.atomic_spans().len() + 1;

    'scan: loop {
        if outcome.passes == max_passes {
            warn!(
                passes = outcome.passes,
                spacers = outcome.spacers_inserted,
                "Page-break repair hit its pass limit"
            );
            outcome.converged = false;
            break;
        }
        outcome.passes += 1;

        let spans = flow.atomic_spans();
        let mut boundary = page_pixel_height;

        for (index, span) in spans.iter().enumerate() {
            while boundary + EPSILON < span.top {
                boundary += page_pixel_height;
            }

            if span.bottom() > boundary + EPSILON {
                let fill = boundary - span.top;
                if fill > EPSILON && flow.insert_spacer_before(index, fill) {
                    debug!(unit = index, fill, boundary, "Inserted page-break spacer");
                    outcome.spacers_inserted += 1;
                    continue 'scan;
                }
            }
        }
        break;
    }

    outcome
}

/// The first unit (index and span) that crosses a page boundary while being no
/// taller than a page, if any.
pub fn find_split_unit(spans: &[UnitSpan], page_pixel_height: f32) -> Option<(usize, UnitSpan)> {
    spans.iter().copied().enumerate().find(|(_, span)| {
        if span.height > page_pixel_height + AUDIT_TOLERANCE {
            return false;
        }
        let page_of_top = ((span.top + AUDIT_TOLERANCE) / page_pixel_height).floor();
        let page_of_bottom = ((span.bottom() - AUDIT_TOLERANCE) / page_pixel_height).floor();
        page_of_top != page_of_bottom
    })
}
