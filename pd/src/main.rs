//! Plain Digital - understandable systems
//!
//! CLI entry point for the workshop, the jargon translator and the booking funnel.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use plaindigital::adapter::{plan_export, translation_export};
use plaindigital::booking::BookingRequest;
use plaindigital::cli::{Cli, Command, ConceptArgs, config_path_from_args, generate_after_help, get_log_path};
use plaindigital::config::Config;
use plaindigital::domain::{AppView, CHAPTERS, Chapter, ProductConcept, SUGGESTIONS, TIERS, books_in};
use plaindigital::gateway::{Gateway, PromptLimits};
use plaindigital::llm::create_client;
use plaindigital::navigation::Navigator;
use plaindigital::prompts::PromptLoader;
use plaindigital::tracking::{ClickTracker, Consent, FileStore, LocalStore};
use plaindigital::translator::Translator;
use plaindigital::workflow::{
    Orchestrator, Pending, PlanResult, Stage, WorkflowInput, WorkflowManager, WorkflowVariant,
};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level);
    let level = if let Some(s) = level_str {
        match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        }
    } else {
        tracing::Level::INFO
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Build command with dynamic after_help that shows the configured API key status
    let early_config_path = config_path_from_args(std::env::args_os());
    let api_key_env = Config::load_api_key_env(early_config_path.as_ref());
    let cmd = Cli::command().after_help(generate_after_help(&api_key_env));

    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(variant = %config.workshop.variant, model = %config.llm.model, "Plain Digital loaded config");

    let Some(command) = cli.command else {
        debug!("main: no command, printing help");
        Cli::command().print_help()?;
        return Ok(());
    };

    let store: Arc<dyn LocalStore> = Arc::new(FileStore::new(&config.storage.data_dir));
    let tracker = Arc::new(ClickTracker::new(store.clone(), &config.tracking));
    let tracking = tracker.is_enabled();
    let consent = Consent::new(store);
    let mut navigator = Navigator::new(tracking.then_some(tracker));

    if tracking && !matches!(command, Command::Consent { .. }) {
        show_consent_banner(&consent);
    }

    navigator.navigate(command.view());
    navigator.click("BUTTON", Some(command.label()));

    debug!(command = ?command, "main: dispatching command");
    match command {
        Command::Workshop { goal } => {
            debug!("main: matched Workshop command");
            cmd_workshop(&config, goal).await
        }
        Command::Concept(args) => {
            debug!("main: matched Concept command");
            cmd_concept(&config, &args).await
        }
        Command::Translate { term, copy } => {
            debug!(?term, copy, "main: matched Translate command");
            cmd_translate(&config, term.as_deref(), copy).await
        }
        Command::Book { tier, email } => {
            debug!(%tier, "main: matched Book command");
            cmd_book(&config, &tier, &email)
        }
        Command::Tiers => {
            debug!("main: matched Tiers command");
            cmd_tiers();
            Ok(())
        }
        Command::Library { category } => {
            debug!(?category, "main: matched Library command");
            cmd_library(category.as_deref());
            Ok(())
        }
        Command::Chapters => {
            debug!("main: matched Chapters command");
            cmd_chapters();
            Ok(())
        }
        Command::Consent { accept } => {
            debug!(accept, "main: matched Consent command");
            cmd_consent(&consent, accept)
        }
    }
}

fn show_consent_banner(consent: &Consent) {
    match consent.is_accepted() {
        Ok(true) => {}
        Ok(false) => {
            eprintln!(
                "{}",
                "Plain Digital keeps a small click log on this machine. Run `pd consent --accept` to hide this notice."
                    .dimmed()
            );
        }
        Err(e) => warn!(error = %e, "show_consent_banner: could not read consent"),
    }
}

/// Wire up the gateway; fails when the API key is missing
fn build_gateway(config: &Config) -> Result<Arc<Gateway>> {
    debug!("build_gateway: called");
    config.validate()?;
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompts = Arc::new(PromptLoader::from_dir(config.prompts_dir.as_deref()));
    let limits = PromptLimits {
        max_questions: config.workshop.max_questions,
        max_steps: config.workshop.max_steps,
    };
    Ok(Arc::new(Gateway::new(llm, prompts, config.llm.max_tokens, limits)))
}

fn spawn_manager(gateway: Arc<Gateway>, variant: WorkflowVariant) -> WorkflowManager {
    WorkflowManager::spawn(Orchestrator::new(gateway, variant.strategy()))
}

/// Print a progress line whenever the workflow starts generating
fn spawn_progress(mut stages: watch::Receiver<Stage>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while stages.changed().await.is_ok() {
            let stage = *stages.borrow_and_update();
            match stage {
                Stage::Generating(Pending::Questions) => {
                    eprintln!("{}", "Thinking about your situation...".dimmed())
                }
                Stage::Generating(Pending::Plan) => eprintln!("{}", "Building your plan...".dimmed()),
                _ => {}
            }
        }
    })
}

/// Read one line; `None` on Ctrl-C or Ctrl-D
fn prompt_line(rl: &mut DefaultEditor, prompt: &str) -> Result<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(eyre::eyre!("Failed to read input: {}", e)),
    }
}

async fn cmd_workshop(config: &Config, goal: Option<String>) -> Result<()> {
    debug!(goal = ?goal, variant = %config.workshop.variant, "cmd_workshop: called");
    let gateway = build_gateway(config)?;
    let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

    let input = match config.workshop.variant {
        WorkflowVariant::Guided => {
            let goal = match goal.filter(|g| !g.trim().is_empty()) {
                Some(goal) => goal,
                None => {
                    println!("{}", "What do you want to achieve?".bold());
                    match prompt_line(&mut rl, "> ")? {
                        Some(goal) => goal,
                        None => return Ok(()),
                    }
                }
            };
            WorkflowInput::Goal(goal)
        }
        WorkflowVariant::Concept => match prompt_concept(&mut rl)? {
            Some(concept) => WorkflowInput::Concept(concept),
            None => return Ok(()),
        },
    };

    let manager = spawn_manager(gateway, config.workshop.variant);
    let progress = spawn_progress(manager.subscribe());

    let outcome = run_workshop(&manager, &mut rl, input).await;
    manager.shutdown().await.ok();
    progress.abort();
    outcome
}

async fn run_workshop(manager: &WorkflowManager, rl: &mut DefaultEditor, input: WorkflowInput) -> Result<()> {
    let stage = manager.begin(input).await.map_err(|e| eyre::eyre!(e.user_message()))?;

    if stage == Stage::Questions {
        let snapshot = manager.snapshot().await?;
        println!("\n{}", "A few questions to personalise your plan (Enter to skip):".bold());
        let mut answers = BTreeMap::new();
        for (idx, question) in snapshot.questions.iter().enumerate() {
            println!("{} {}", format!("{}.", idx + 1).cyan(), question);
            match prompt_line(rl, "> ")? {
                Some(answer) if !answer.is_empty() => {
                    answers.insert(idx, answer);
                }
                Some(_) => {}
                None => return Ok(()),
            }
        }
        manager
            .answer_and_continue(answers)
            .await
            .map_err(|e| eyre::eyre!(e.user_message()))?;
    }

    let snapshot = manager.snapshot().await?;
    let Some(plan) = snapshot.result else {
        return Err(eyre::eyre!("Workshop finished without a plan"));
    };
    print_plan(&plan);

    println!("{}", "Questions about your roadmap? (empty line to finish)".dimmed());
    loop {
        let question = match prompt_line(rl, "? ")? {
            Some(q) if !q.is_empty() => q,
            _ => break,
        };
        match manager.ask(question).await {
            Ok(Some(answer)) => println!("{}\n", answer),
            Ok(None) => {}
            Err(e) => eprintln!("{}", e.user_message().red()),
        }
    }
    Ok(())
}

/// Walk the four chapters field by field; `None` if the user bails out
fn prompt_concept(rl: &mut DefaultEditor) -> Result<Option<ProductConcept>> {
    debug!("prompt_concept: called");
    let mut concept = ProductConcept::default();
    for chapter in &CHAPTERS {
        println!("\n{} {}", format!("Chapter {}:", chapter.id).cyan().bold(), chapter.title.bold());
        println!("{}", chapter.why.dimmed());
        for field in chapter.fields {
            println!("{} {}", field.label(), format!("({})", field.hint()).dimmed());
            match prompt_line(rl, "> ")? {
                Some(value) => field.set(&mut concept, value),
                None => return Ok(None),
            }
        }
    }
    Ok(Some(concept))
}

fn load_concept(args: &ConceptArgs) -> Result<ProductConcept> {
    debug!(file = ?args.file, "load_concept: called");
    let base: ProductConcept = match &args.file {
        Some(path) => {
            let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
            serde_yaml::from_str(&content).context(format!("Failed to parse concept from {}", path.display()))?
        }
        None => ProductConcept::default(),
    };
    Ok(args.apply(base))
}

async fn cmd_concept(config: &Config, args: &ConceptArgs) -> Result<()> {
    debug!(hint = ?args.hint, "cmd_concept: called");
    let concept = load_concept(args)?;
    let gateway = build_gateway(config)?;
    let manager = spawn_manager(gateway, WorkflowVariant::Concept);

    let outcome = match args.hint {
        Some(chapter_id) => {
            let title = Chapter::by_id(chapter_id).map_or("", |c| c.title);
            manager
                .chapter_help(chapter_id, concept)
                .await
                .map(|help| println!("{} {}\n{}", "Tip for".dimmed(), title.bold(), help))
                .map_err(|e| eyre::eyre!(e.user_message()))
        }
        None => {
            let progress = spawn_progress(manager.subscribe());
            let result = concept_plan(&manager, concept).await;
            progress.abort();
            result
        }
    };
    manager.shutdown().await.ok();
    outcome
}

async fn concept_plan(manager: &WorkflowManager, concept: ProductConcept) -> Result<()> {
    manager
        .begin(WorkflowInput::Concept(concept))
        .await
        .map_err(|e| eyre::eyre!(e.user_message()))?;
    let snapshot = manager.snapshot().await?;
    let plan = snapshot
        .result
        .ok_or_else(|| eyre::eyre!("Workshop finished without a plan"))?;
    print_plan(&plan);
    Ok(())
}

fn print_plan(plan: &PlanResult) {
    println!("\n{}\n", plan_export(plan));
}

fn print_suggestions() {
    println!("{}", "Nothing to translate. Try one of:".bold());
    for suggestion in SUGGESTIONS {
        println!("  pd translate \"{}\"", suggestion);
    }
}

async fn cmd_translate(config: &Config, term: Option<&str>, copy: bool) -> Result<()> {
    debug!(?term, copy, "cmd_translate: called");
    let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        debug!("cmd_translate: empty term, showing suggestions");
        print_suggestions();
        return Ok(());
    };
    let gateway = build_gateway(config)?;
    let mut translator = Translator::new(gateway);

    let outcome = translator.translate(term).await.map(|t| t.is_some());
    if let Err(e) = outcome {
        debug!(kind = e.kind(), "cmd_translate: translation failed");
        let message = translator.error().unwrap_or("Translation failed").to_string();
        return Err(eyre::eyre!(message));
    }
    let Some(translation) = translator.translation() else {
        return Err(eyre::eyre!("Please enter a term to translate"));
    };

    if copy {
        println!("{}", translation_export(translation));
    } else {
        println!("{}", translation.original.bold());
        println!("{} {}", "In plain English:".cyan(), translation.plain_version);
        println!("{} {}", "Think of it like:".cyan(), translation.analogy);
    }
    Ok(())
}

fn cmd_book(config: &Config, tier: &str, email: &str) -> Result<()> {
    debug!(%tier, "cmd_book: called");
    let request = BookingRequest::new(tier, email)?;
    println!("{}", request.subject().bold());
    println!("{}", request.mailto_link(&config.booking.contact_email));
    Ok(())
}

fn cmd_tiers() {
    for tier in &TIERS {
        println!("{} {} {}", tier.id.cyan().bold(), tier.title.bold(), format!("({})", tier.focus).dimmed());
        println!("   {}", tier.description);
        for service in tier.services {
            println!("   - {}", service);
        }
        println!();
    }
}

fn cmd_library(category: Option<&str>) {
    let books = books_in(category);
    if books.is_empty() {
        println!("No books in that category.");
        return;
    }
    for book in books {
        println!("{} {} {}", book.title.bold(), "by".dimmed(), book.author);
        println!("   {} {}", format!("[{}]", book.category).cyan(), book.note);
    }
}

fn cmd_chapters() {
    for chapter in &CHAPTERS {
        println!(
            "{} {} {}",
            format!("{}.", chapter.id).cyan().bold(),
            chapter.title.bold(),
            format!("({})", chapter.subtitle).dimmed()
        );
        println!("   {}", chapter.why);
        let fields: Vec<_> = chapter.fields.iter().map(|f| f.key()).collect();
        println!("   {} {}", "fields:".dimmed(), fields.join(", "));
    }
}

fn cmd_consent(consent: &Consent, accept: bool) -> Result<()> {
    debug!(accept, "cmd_consent: called");
    if accept {
        consent.accept().context("Failed to record consent")?;
    }
    let accepted = consent.is_accepted().context("Failed to read consent")?;
    if accepted {
        println!("Consent: {}", "accepted".green());
    } else {
        println!("Consent: {}", "not given".yellow());
        println!("See {} in the site navigation.", AppView::Privacy.label());
    }
    Ok(())
}
