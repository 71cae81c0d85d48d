//! Exclusive, self-restoring access to a content region for the length of an export.

use tracing::debug;

use crate::export::pagination::AtomicFlow;
use crate::render::flow::{ContentRegion, SpacerId, UnitSpan};

/// Hides `no_print` segments on entry and records every spacer inserted through it.
///
/// Dropping the scope removes those spacers and restores the previous visibility,
/// whether the export finished or bailed out early with `?`.
pub struct ExportScope<'a> {
    region: &'a mut ContentRegion,
    was_hidden: bool,
    spacers: Vec<SpacerId>,
}

impl<'a> ExportScope<'a> {
    pub fn enter(region: &'a mut ContentRegion) -> Self {
        let was_hidden = region.no_print_hidden();
        let hidden = region.set_no_print_hidden(true);
        debug!(hidden, "Hid non-printable controls for export");
        Self {
            region,
            was_hidden,
            spacers: Vec::new(),
        }
    }

    pub fn region(&self) -> &ContentRegion {
        self.region
    }

    pub fn spacers_inserted(&self) -> usize {
        self.spacers.len()
    }
}

impl AtomicFlow for ExportScope<'_> {
    fn atomic_spans(&self) -> Vec<UnitSpan> {
        self.region.atomic_spans()
    }

    fn insert_spacer_before(&mut self, unit: usize, height: f32) -> bool {
        match self.region.insert_spacer_before(unit, height) {
            Some(id) => {
                self.spacers.push(id);
                true
            }
            None => false,
        }
    }
}

impl Drop for ExportScope<'_> {
    fn drop(&mut self) {
        let region = &mut *self.region;
        let removed = self
            .spacers
            .drain(..)
            .filter(|id| region.remove_spacer(*id))
            .count();
        region.set_no_print_hidden(self.was_hidden);
        debug!(removed, "Restored content region after export");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::pagination::{find_split_unit, repair_page_breaks};
    use crate::render::flow::{Block, Segment};

    fn seg(height: f32, no_print: bool) -> Segment {
        Segment {
            height,
            no_print,
            paints: Vec::new(),
        }
    }

    /// Intro text, then experience entries each followed by a hidden "Add Detail" control.
    fn region() -> ContentRegion {
        let mut region = ContentRegion::new(794.0, 32.0, 32.0);
        region.push(Block::flow(vec![seg(500.0, false)]));
        for height in [180.0, 260.0, 220.0, 300.0] {
            region.push(Block::atomic(vec![seg(height, false), seg(36.0, true)]));
            region.push(Block::gap(24.0));
        }
        region.push(Block::flow(vec![seg(40.0, true)]));
        region
    }

    #[test]
    fn test_scope_hides_controls_and_repairs() {
        let mut region = region();
        let original_height = region.scroll_height();
        {
            let mut scope = ExportScope::enter(&mut region);
            assert!(scope.region().no_print_hidden());
            let outcome = repair_page_breaks(&mut scope, 800.0);
            assert!(outcome.converged);
            assert_eq!(scope.spacers_inserted(), outcome.spacers_inserted);
            assert!(outcome.spacers_inserted > 0);
            assert!(find_split_unit(&scope.region().atomic_spans(), 800.0).is_none());
        }
        assert_eq!(region.spacer_count(), 0);
        assert!(!region.no_print_hidden());
        assert_eq!(region.scroll_height(), original_height);
    }

    #[test]
    fn test_scope_restores_after_early_exit() {
        fn failing_export(region: &mut ContentRegion) -> Result<(), &'static str> {
            let mut scope = ExportScope::enter(region);
            repair_page_breaks(&mut scope, 700.0);
            Err("capture failed")
        }

        let mut region = region();
        let original_spans = region.atomic_spans();
        assert!(failing_export(&mut region).is_err());
        assert_eq!(region.spacer_count(), 0);
        assert!(!region.no_print_hidden());
        assert_eq!(region.atomic_spans(), original_spans);
    }

    #[test]
    fn test_scope_keeps_previous_hidden_state() {
        let mut region = region();
        region.set_no_print_hidden(true);
        drop(ExportScope::enter(&mut region));
        assert!(region.no_print_hidden());
    }
}
