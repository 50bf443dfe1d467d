//! Bookable live-session tiers

/// A live-session offering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTier {
    pub id: &'static str,
    pub title: &'static str,
    pub focus: &'static str,
    pub description: &'static str,
    pub services: &'static [&'static str],
}

pub static TIERS: [ServiceTier; 3] = [
    ServiceTier {
        id: "individual",
        title: "Individual Contributors",
        focus: "The Clarity Session",
        description: "For professionals who feel stuck or are changing their job path",
        services: &["Advice & Strategy", "Decision Help", "Product Research"],
    },
    ServiceTier {
        id: "startup",
        title: "Start-ups",
        focus: "The Discovery Lab",
        description: "Support for new businesses moving from an idea to a real product",
        services: &["Lean Roadmaps", "User Flow Help", "Competition Analysis"],
    },
    ServiceTier {
        id: "scaleup",
        title: "Scale-ups",
        focus: "The Systemic Audit",
        description: "Deep help for growing teams dealing with too much complexity",
        services: &["Expert Consulting", "Learning Tech Research", "System Analysis"],
    },
];

impl ServiceTier {
    pub fn by_id(id: &str) -> Option<&'static ServiceTier> {
        TIERS.iter().find(|t| t.id == id)
    }
}
