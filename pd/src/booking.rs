//! Booking funnel
//!
//! Turns a tier choice and an email address into a `mailto:` link addressed
//! to the contact inbox.

use thiserror::Error;
use tracing::debug;

use crate::domain::ServiceTier;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Please enter your email address.")]
    MissingEmail,

    #[error("Please choose a session type.")]
    MissingTier,

    #[error("'{0}' does not look like an email address.")]
    InvalidEmail(String),
}

/// A validated booking request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    tier_id: String,
    email: String,
}

impl BookingRequest {
    pub fn new(tier_id: &str, email: &str) -> Result<Self, BookingError> {
        debug!(%tier_id, "BookingRequest::new: called");
        let tier_id = tier_id.trim();
        let email = email.trim();
        if email.is_empty() {
            return Err(BookingError::MissingEmail);
        }
        if tier_id.is_empty() {
            return Err(BookingError::MissingTier);
        }
        if !email.contains('@') {
            return Err(BookingError::InvalidEmail(email.to_string()));
        }
        Ok(Self {
            tier_id: tier_id.to_string(),
            email: email.to_string(),
        })
    }

    /// Tier title, or the raw id for tiers we do not know
    pub fn tier_title(&self) -> &str {
        ServiceTier::by_id(&self.tier_id).map_or(self.tier_id.as_str(), |t| t.title)
    }

    pub fn subject(&self) -> String {
        format!("Engagement Request: {}", self.tier_title())
    }

    pub fn body(&self) -> String {
        format!(
            "Hello,\n\nI am interested in a {} live session.\n\nMy Email: {}\n\nPlease share more details.\n\nBest regards,\n[My Name]",
            self.tier_title(),
            self.email
        )
    }

    pub fn mailto_link(&self, contact: &str) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            contact,
            urlencoding::encode(&self.subject()),
            urlencoding::encode(&self.body())
        )
    }
}
