//! Cookie consent flag

use std::sync::Arc;

use tracing::debug;

use super::store::{LocalStore, StoreError};

pub const CONSENT_KEY: &str = "plain_digital_cookie_consent";
pub const CONSENT_ACCEPTED: &str = "accepted";

pub struct Consent {
    store: Arc<dyn LocalStore>,
}

impl Consent {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub fn is_accepted(&self) -> Result<bool, StoreError> {
        let value = self.store.get(CONSENT_KEY)?;
        debug!(?value, "Consent::is_accepted: called");
        Ok(value.as_deref() == Some(CONSENT_ACCEPTED))
    }

    pub fn accept(&self) -> Result<(), StoreError> {
        debug!("Consent::accept: called");
        self.store.set(CONSENT_KEY, CONSENT_ACCEPTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::store::MemoryStore;

    #[test]
    fn test_accept() {
        let consent = Consent::new(Arc::new(MemoryStore::new()));
        assert!(!consent.is_accepted().unwrap());
        consent.accept().unwrap();
        assert!(consent.is_accepted().unwrap());
    }

    #[test]
    fn test_other_values_are_not_consent() {
        let store = Arc::new(MemoryStore::new());
        store.set(CONSENT_KEY, "declined").unwrap();
        assert!(!Consent::new(store).is_accepted().unwrap());
    }
}
