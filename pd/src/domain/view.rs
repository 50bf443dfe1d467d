//! Top-level views of the site

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppView {
    #[default]
    Home,
    Workshop,
    Translator,
    Library,
    Connect,
    About,
    Privacy,
}

impl AppView {
    pub const ALL: [AppView; 7] = [
        Self::Home,
        Self::Workshop,
        Self::Translator,
        Self::Library,
        Self::Connect,
        Self::About,
        Self::Privacy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Workshop => "workshop",
            Self::Translator => "translator",
            Self::Library => "library",
            Self::Connect => "connect",
            Self::About => "about",
            Self::Privacy => "privacy",
        }
    }

    /// Navigation label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Home => "Understandable Systems",
            Self::Workshop => "Build in 4 steps",
            Self::Translator => "Jargon Translator",
            Self::Library => "Library",
            Self::Connect => "Live Sessions",
            Self::About => "About",
            Self::Privacy => "Privacy Policy",
        }
    }
}

impl fmt::Display for AppView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| format!("Unknown view '{}'", s))
    }
}
