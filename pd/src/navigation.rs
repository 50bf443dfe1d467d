//! View navigation
//!
//! One owner of the current view. Consumers read it and ask for transitions
//! through `navigate`; every click is tagged with the view it happened in.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::AppView;
use crate::tracking::ClickTracker;

pub struct Navigator {
    current: AppView,
    tracker: Option<Arc<ClickTracker>>,
}

impl Navigator {
    pub fn new(tracker: Option<Arc<ClickTracker>>) -> Self {
        Self {
            current: AppView::default(),
            tracker,
        }
    }

    pub fn current(&self) -> AppView {
        self.current
    }

    /// Switch views; returns the view that was left
    pub fn navigate(&mut self, to: AppView) -> AppView {
        let from = self.current;
        debug!(%from, %to, "navigate: called");
        self.current = to;
        from
    }

    /// Record a click in the current view
    ///
    /// Tracking failures are logged and never surface to the caller.
    pub fn click(&self, element: &str, label: Option<&str>) {
        let Some(tracker) = &self.tracker else {
            return;
        };
        if let Err(e) = tracker.record(element, label, self.current) {
            warn!(error = %e, %element, "click: failed to record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackingConfig;
    use crate::tracking::{LocalStore, MemoryStore};

    #[test]
    fn test_navigate() {
        let mut nav = Navigator::new(None);
        assert_eq!(nav.current(), AppView::Home);
        assert_eq!(nav.navigate(AppView::Translator), AppView::Home);
        assert_eq!(nav.current(), AppView::Translator);
        nav.click("BUTTON", Some("ignored without tracker"));
    }

    #[test]
    fn test_click_uses_current_view() {
        let store = Arc::new(MemoryStore::new());
        let tracker = Arc::new(ClickTracker::new(store.clone(), &TrackingConfig::default()));
        let mut nav = Navigator::new(Some(tracker.clone()));

        nav.navigate(AppView::Library);
        nav.click("A", Some("Inspired"));

        let entries = tracker.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].view, AppView::Library);
        assert!(store.get(crate::tracking::CLICKS_KEY).unwrap().is_some());
    }
}
