//! Jargon translator controller
//!
//! Holds at most one translation. A new query clears the previous result
//! before the request goes out, so a failure leaves nothing stale on screen.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::adapter::translation_export;
use crate::domain::JargonTranslation;
use crate::gateway::{Gateway, GatewayError, Surface};

pub struct Translator {
    gateway: Arc<Gateway>,
    translation: Option<JargonTranslation>,
    error: Option<String>,
}

impl Translator {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            translation: None,
            error: None,
        }
    }

    /// Translate `term`; a blank term is ignored and returns `Ok(None)`
    pub async fn translate(&mut self, term: &str) -> Result<Option<&JargonTranslation>, GatewayError> {
        let term = term.trim();
        debug!(%term, "Translator::translate: called");
        if term.is_empty() {
            return Ok(None);
        }

        self.clear();
        let generated = self.gateway.translate_jargon(term).await;
        match generated {
            Ok(translation) => Ok(Some(&*self.translation.insert(translation))),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "translation failed");
                self.error = Some(e.user_message(Surface::Translator).to_string());
                Err(e)
            }
        }
    }

    pub fn translation(&self) -> Option<&JargonTranslation> {
        self.translation.as_ref()
    }

    /// User-facing message from the last failed request
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear(&mut self) {
        self.translation = None;
        self.error = None;
    }

    /// Plain-text copy of the current translation
    pub fn clipboard_text(&self) -> Option<String> {
        self.translation.as_ref().map(translation_export)
    }
}
