//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{AppView, ConceptField, ProductConcept, TeamStatus};

/// Plain Digital - understandable systems for non-technical founders
#[derive(Parser)]
#[command(
    name = "pd",
    about = "Guided product workshop, jargon translator and live-session booking",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the workshop: describe a goal, answer a few questions, get a plan
    Workshop {
        /// What you want to achieve (prompted for when absent)
        goal: Option<String>,
    },

    /// Turn a product concept into a four-chapter roadmap
    Concept(ConceptArgs),

    /// Explain a technical term in plain English
    Translate {
        /// Term to translate (omit to see suggestions)
        term: Option<String>,

        /// Print the plain-text clipboard export instead
        #[arg(long)]
        copy: bool,
    },

    /// Request a live session; prints a ready-to-send mailto link
    Book {
        /// Session type (see `pd tiers`)
        #[arg(short, long)]
        tier: String,

        /// Your email address
        #[arg(short, long)]
        email: String,
    },

    /// List live-session types
    Tiers,

    /// List recommended books
    Library {
        /// Only show one category
        #[arg(long)]
        category: Option<String>,
    },

    /// List the four chapters of the concept form
    Chapters,

    /// Show or record local-storage consent
    Consent {
        /// Accept and remember the choice
        #[arg(long)]
        accept: bool,
    },
}

impl Command {
    /// View the command belongs to, for click tracking
    pub fn view(&self) -> AppView {
        match self {
            Self::Workshop { .. } | Self::Concept(_) | Self::Chapters => AppView::Workshop,
            Self::Translate { .. } => AppView::Translator,
            Self::Book { .. } | Self::Tiers => AppView::Connect,
            Self::Library { .. } => AppView::Library,
            Self::Consent { .. } => AppView::Privacy,
        }
    }

    /// Label recorded in the click log
    pub fn label(&self) -> &'static str {
        match self {
            Self::Workshop { .. } => "workshop",
            Self::Concept(args) if args.hint.is_some() => "concept hint",
            Self::Concept(_) => "concept",
            Self::Translate { .. } => "translate",
            Self::Book { .. } => "book",
            Self::Tiers => "tiers",
            Self::Library { .. } => "library",
            Self::Chapters => "chapters",
            Self::Consent { .. } => "consent",
        }
    }
}

/// Concept input: a YAML file, field flags, or both (flags win)
#[derive(Debug, Clone, Default, Args)]
pub struct ConceptArgs {
    /// YAML or JSON file with the concept (camelCase keys)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Idea name
    #[arg(long)]
    pub name: Option<String>,

    /// Who the product is for
    #[arg(long)]
    pub audience: Option<String>,

    /// Their biggest struggle
    #[arg(long)]
    pub problem: Option<String>,

    /// The chance you saw
    #[arg(long)]
    pub opportunity: Option<String>,

    /// Who is building it (solo, team, hiring)
    #[arg(long)]
    pub team: Option<TeamStatus>,

    /// Any other field as key=value, e.g. --set hypothesis="..."
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(ConceptField, String)>,

    /// Ask for help with one chapter (1-4) instead of generating the roadmap
    #[arg(long, value_name = "CHAPTER", value_parser = clap::value_parser!(u8).range(1..=4))]
    pub hint: Option<u8>,
}

impl ConceptArgs {
    /// Apply the flags on top of `base`
    pub fn apply(&self, mut base: ProductConcept) -> ProductConcept {
        debug!(fields = self.fields.len(), "ConceptArgs::apply: called");
        let named = [
            (ConceptField::Name, &self.name),
            (ConceptField::TargetAudience, &self.audience),
            (ConceptField::CoreProblem, &self.problem),
            (ConceptField::Opportunity, &self.opportunity),
        ];
        for (field, value) in named {
            if let Some(value) = value {
                field.set(&mut base, value.clone());
            }
        }
        for (field, value) in &self.fields {
            field.set(&mut base, value.clone());
        }
        if let Some(team) = self.team {
            base.team_status = team;
        }
        base
    }
}

fn parse_field(s: &str) -> Result<(ConceptField, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let field = ConceptField::from_key(key.trim()).ok_or_else(|| {
        let keys: Vec<_> = ConceptField::ALL.iter().map(|f| f.key()).collect();
        format!("unknown field '{}'. Expected one of: {}", key.trim(), keys.join(", "))
    })?;
    Ok((field, value.to_string()))
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plaindigital")
        .join("logs")
        .join("plaindigital.log")
}

/// Pull `--config` out of raw arguments before clap parses them
///
/// The help text is built before parsing, so it needs the config path early.
pub fn config_path_from_args<I, T>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into).skip(1);
    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            continue;
        };
        match text {
            "--" => break,
            "-c" | "--config" => return args.next().map(PathBuf::from),
            _ => {
                if let Some(path) = text.strip_prefix("--config=") {
                    return Some(PathBuf::from(path));
                }
                if let Some(path) = text.strip_prefix("-c").filter(|p| !p.is_empty()) {
                    return Some(PathBuf::from(path.strip_prefix('=').unwrap_or(path)));
                }
            }
        }
    }
    None
}

/// Generate the after_help text with API key status and log location
pub fn generate_after_help(api_key_env: &str) -> String {
    debug!(%api_key_env, "generate_after_help: called");
    let key_set = std::env::var(api_key_env).is_ok_and(|k| !k.trim().is_empty());

    let mut help = String::new();
    help.push_str("AI features:\n");
    let icon = if key_set {
        debug!("generate_after_help: api key set");
        "\u{2705}"
    } else {
        debug!("generate_after_help: api key missing");
        "\u{274C}"
    };
    let status = if key_set { "set" } else { "not set" };
    help.push_str(&format!("  {} {:<16} {}\n", icon, api_key_env, status));

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}
