//! Local persistence: key-value store, click log and consent flag

mod clicks;
mod consent;
mod store;

pub use clicks::{CLICKS_KEY, ClickLogEntry, ClickTracker, UNNAMED_ELEMENT, is_trackable};
pub use consent::{CONSENT_ACCEPTED, CONSENT_KEY, Consent};
pub use store::{FileStore, LocalStore, MemoryStore, StoreError};
