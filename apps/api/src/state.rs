use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::editing::session::ReportSession;
use crate::export::ExportConfig;
use crate::extraction::ReportExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The single editable report. Edits, resets and exports serialize on this lock.
    pub session: Arc<Mutex<ReportSession>>,
    /// Pluggable extractor. Default: `GeminiClient`.
    pub extractor: Arc<dyn ReportExtractor>,
    pub export: ExportConfig,
    pub export_busy: BusyFlag,
    pub extraction_busy: BusyFlag,
}

/// At most one holder at a time; a second caller is turned away instead of waiting.
#[derive(Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| BusyGuard(Arc::clone(&self.0)))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the flag when dropped.
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_flag_admits_one_holder() {
        let flag = BusyFlag::default();
        let guard = flag.try_acquire().unwrap();
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());
        assert!(flag.clone().try_acquire().is_none());
        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_some());
    }
}
