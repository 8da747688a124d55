//! Command handlers for emberctl
//!
//! Each handler builds a recorder over the configured store, runs the
//! engine, and renders the result in sectioned text.

use anyhow::{Context as _, Result};
use chrono::Utc;
use ember_core::{
    challenge_catalog, find_challenge, ActivityKind, ActivityOutcome, ActivityRecorder,
    EngineConfig, GamificationData, Milestone, Persona, SignalsSnapshot, StateStore, StoreBackend,
    TrackedAction,
};
use owo_colors::OwoColorize;
use std::path::Path;

/// Separator sized to the terminal, capped like the dashboard's column width.
fn separator() -> String {
    let (_, width) = console::Term::stdout().size();
    "-".repeat((width as usize).saturating_sub(4).min(60))
}

/// Resolved config, store and user for one invocation.
pub struct Context {
    store: Box<dyn StateStore>,
    user: String,
}

impl Context {
    pub fn build(config_path: Option<&Path>, user: Option<String>) -> Result<Self> {
        let config = match config_path {
            Some(path) => EngineConfig::load_from(path),
            None => EngineConfig::load(),
        };
        let store: Box<dyn StateStore> = match config.store {
            StoreBackend::Json => Box::new(ember_core::JsonFileStore::new(&config.data_dir)),
            StoreBackend::Sqlite => Box::new(
                ember_core::SqliteStore::open_at(config.sqlite_path())
                    .context("opening engagement database")?,
            ),
        };
        Ok(Self {
            store,
            user: user.unwrap_or(config.default_user),
        })
    }

    fn recorder(&self) -> ActivityRecorder<&Box<dyn StateStore>> {
        ActivityRecorder::new(&self.store, self.user.as_str())
    }
}

fn load_signals(path: Option<&Path>) -> Result<SignalsSnapshot> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading signals snapshot {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing signals snapshot {}", path.display()))
        }
        None => Ok(SignalsSnapshot::default()),
    }
}

fn parse_persona(label: Option<&str>) -> Persona {
    label.map(Persona::from_label).unwrap_or(Persona::Unclassified)
}

/// Show the user's engagement status.
pub fn status(ctx: &Context) -> Result<()> {
    let state = ctx.recorder().load_state();
    println!();
    println!("{}", format!("  Ember Status - {}", ctx.user).bold());
    println!("{}", separator());
    print_data(&state.data);

    println!("[STREAK]");
    println!(
        "  Current: {} days   Longest: {} days",
        state.streak.streak, state.streak.longest_streak
    );
    match state.streak.last_activity {
        Some(at) => println!("  Last activity: {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => println!("  Last activity: never"),
    }
    println!();
    Ok(())
}

fn print_data(data: &GamificationData) {
    println!("[LEVEL]");
    println!(
        "  Level {}   {} / {} XP ({} total)",
        data.level, data.level_progress, data.level_max, data.total_points
    );
    println!();

    println!("[ACHIEVEMENTS]");
    if data.achievements.is_empty() {
        println!("  None yet");
    }
    for a in &data.achievements {
        println!(
            "  {} {} (+{} pts, {})",
            a.icon,
            a.title,
            a.points,
            a.earned_at.format("%Y-%m-%d")
        );
    }
    println!();

    println!("[CHALLENGES]");
    match &data.active_challenge {
        Some(active) => println!(
            "  Active: {} ({}/{} days)",
            active.challenge.title,
            active.progress_as_of(Utc::now()),
            active.challenge.duration_days
        ),
        None => println!("  Active: none"),
    }
    println!("  Completed: {}", data.completed_challenges.len());
    println!();
}

fn print_events(outcome: &ActivityOutcome) {
    for event in &outcome.events {
        println!("  {} {}", "*".green(), event.to_notice_line());
    }
    if !outcome.persisted {
        println!("  {} state not persisted; continuing in memory", "!".yellow());
    }
}

/// Record a tracked activity.
pub fn record(
    ctx: &Context,
    activity: &str,
    points: Option<u32>,
    persona: Option<&str>,
    signals_path: Option<&Path>,
) -> Result<()> {
    let Some(kind) = ActivityKind::from_label(activity) else {
        anyhow::bail!(
            "unknown activity '{}'; expected one of recommendation_completed, \
             lesson_completed, calculator_used, dashboard_reviewed, challenge_completed",
            activity
        );
    };
    let signals = load_signals(signals_path)?;

    let mut action = TrackedAction::new(kind, Utc::now());
    if let Some(points) = points {
        action = action.with_points(points);
    }
    let outcome = ctx.recorder().record(action, parse_persona(persona), &signals);

    println!();
    print_events(&outcome);
    println!();
    println!(
        "  Level {}  |  {} points  |  {} day streak",
        outcome.data.level, outcome.data.total_points, outcome.data.streak
    );
    println!();
    Ok(())
}

/// List the challenge catalog.
pub fn challenges() -> Result<()> {
    println!();
    println!("{}", "  Challenge Catalog".bold());
    println!("{}", separator());
    for c in challenge_catalog() {
        println!(
            "  {}  [{:?}] {} days, ~${:.0} saved",
            c.id.bold(),
            c.difficulty,
            c.duration_days,
            c.potential_savings
        );
        println!("      {}", c.description.dimmed());
    }
    println!();
    Ok(())
}

/// Start a catalog challenge.
pub fn challenge_start(ctx: &Context, id: &str) -> Result<()> {
    let challenge = find_challenge(id)?;
    let outcome = ctx.recorder().start_challenge(&challenge, Utc::now())?;
    println!();
    print_events(&outcome);
    println!();
    Ok(())
}

/// Complete the active challenge.
pub fn challenge_complete(
    ctx: &Context,
    persona: Option<&str>,
    signals_path: Option<&Path>,
) -> Result<()> {
    let signals = load_signals(signals_path)?;
    let outcome = ctx
        .recorder()
        .complete_challenge(parse_persona(persona), &signals, Utc::now())?;
    println!();
    print_events(&outcome);
    println!();
    Ok(())
}

/// Evaluate persona milestones against a signals snapshot.
pub fn milestones(persona: &str, signals_path: Option<&Path>) -> Result<()> {
    let persona = Persona::from_label(persona);
    let signals = load_signals(signals_path)?;
    let milestones = ember_core::evaluate_milestones(persona, &signals);

    println!();
    println!("{}", format!("  Milestones - {}", persona.label()).bold());
    println!("{}", separator());
    if milestones.is_empty() {
        println!("  No milestones for this persona");
    }
    for m in &milestones {
        print_milestone(m);
    }
    println!();
    println!(
        "  Achieved points: {}",
        ember_core::milestone_points(&milestones)
    );
    println!();
    Ok(())
}

fn print_milestone(m: &Milestone) {
    let mark = if m.achieved {
        "[x]".green().to_string()
    } else {
        "[ ]".dimmed().to_string()
    };
    println!("  {} {} (+{} pts)", mark, m.title, m.points);
    println!("      {}", m.description.dimmed());
}
