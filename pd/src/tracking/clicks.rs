//! Click log
//!
//! Every click on a button or link is appended to a bounded JSON array in
//! the local store. The log is write-only as far as the app is concerned.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::store::{LocalStore, StoreError};
use crate::config::TrackingConfig;
use crate::domain::AppView;

/// Store key holding the click log
pub const CLICKS_KEY: &str = "plain_digital_clicks";

/// Label used when the clicked element has no text
pub const UNNAMED_ELEMENT: &str = "unnamed-element";

/// Element tags whose clicks are recorded
const TRACKABLE_TAGS: [&str; 2] = ["BUTTON", "A"];

/// One recorded click
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickLogEntry {
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
    /// Element tag, uppercase
    pub element: String,
    /// Element label, truncated
    pub text: String,
    pub view: AppView,
}

pub fn is_trackable(element: &str) -> bool {
    TRACKABLE_TAGS.iter().any(|t| t.eq_ignore_ascii_case(element))
}

/// Appends clicks to the bounded log
pub struct ClickTracker {
    store: Arc<dyn LocalStore>,
    enabled: bool,
    max_entries: usize,
    label_max_chars: usize,
}

impl ClickTracker {
    pub fn new(store: Arc<dyn LocalStore>, config: &TrackingConfig) -> Self {
        debug!(enabled = config.enabled, max_entries = config.max_entries, "ClickTracker::new: called");
        Self {
            store,
            enabled: config.enabled,
            max_entries: config.max_entries,
            label_max_chars: config.label_max_chars,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a click on `element` labelled `label` while `view` is shown
    ///
    /// Returns the stored entry, or `None` when tracking is off or the
    /// element is not a button or link.
    pub fn record(&self, element: &str, label: Option<&str>, view: AppView) -> Result<Option<ClickLogEntry>, StoreError> {
        debug!(%element, %view, "ClickTracker::record: called");
        if !self.enabled || !is_trackable(element) {
            debug!("ClickTracker::record: not tracked");
            return Ok(None);
        }

        let text = match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => label.chars().take(self.label_max_chars).collect(),
            None => UNNAMED_ELEMENT.to_string(),
        };
        let entry = ClickLogEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            element: element.to_ascii_uppercase(),
            text,
            view,
        };

        let max_entries = self.max_entries;
        let new_entry = entry.clone();
        self.store.update(CLICKS_KEY, &mut |old| {
            let mut log = match old.as_deref().map(serde_json::from_str::<Vec<ClickLogEntry>>) {
                Some(Ok(log)) => log,
                Some(Err(e)) => {
                    warn!(error = %e, "click log unreadable, starting over");
                    Vec::new()
                }
                None => Vec::new(),
            };
            log.push(new_entry.clone());
            if log.len() > max_entries {
                log.drain(..log.len() - max_entries);
            }
            serde_json::to_string(&log).unwrap_or_else(|_| "[]".to_string())
        })?;

        Ok(Some(entry))
    }

    /// Everything currently in the log, oldest first
    pub fn entries(&self) -> Result<Vec<ClickLogEntry>, StoreError> {
        let raw = self.store.get(CLICKS_KEY)?;
        Ok(raw.and_then(|s| serde_json::from_str(&s).ok()).unwrap_or_default())
    }
}
