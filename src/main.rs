//! Marion CLI
//!
//! Usage:
//!   marion --text "your text here"                 # Single mediation + routing
//!   marion --action top10 --year 1988 --lane music # Structured action turn
//!   marion --interactive                           # Minimal in-memory host
//!   marion --serve                                 # Stateless HTTP adapter
//!   marion --text "text" --json                    # JSON output

use clap::Parser;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::io::{self, BufRead, Write};

use marion::core::{run_server, DomainRouter, Mediator, RouterWeights, Weights};
use marion::types::{
    Cognition, DomainRouting, Intent, MarionState, MediationOptions, NormalizedTurn,
    RouteOptions, SessionSnapshot,
};
use marion::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "marion",
    version = VERSION,
    about = "Marion - conversation mediation and domain routing",
    long_about = "Marion classifies each conversational turn (mode, intent, immersion,\n\
                  novelty) and routes it to a knowledge domain, without ever storing\n\
                  or echoing the raw text.\n\n\
                  Modes:\n  \
                  --interactive  Keep a session in memory, '@action [year] text' submits actions\n  \
                  --serve        Stateless HTTP adapter\n\n\
                  States:\n  \
                  SEEK       - Ask, nothing concrete yet\n  \
                  DELIVER    - Answer the selected action\n  \
                  BRIDGE     - Keep continuity, offer a next step\n  \
                  STABILIZE  - Slow down, ground the user"
)]
struct Args {
    /// Text to mediate (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Explicit action token (chip / button)
    #[arg(short, long)]
    action: Option<String>,

    /// Lane the turn arrived on
    #[arg(short, long)]
    lane: Option<String>,

    /// Year attached to the action
    #[arg(short, long)]
    year: Option<i32>,

    /// Interactive host mode - read turns from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Weights file: {"weights": {...}, "router": {...}}
    #[arg(long)]
    config: Option<String>,

    /// Session snapshot JSON to start from
    #[arg(long)]
    session: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show trace and debug logs
    #[arg(long)]
    verbose: bool,
}

/// Weight overrides loaded from `--config`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    weights: Weights,
    router: RouterWeights,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TurnOutput<'a> {
    cognition: &'a Cognition,
    routing: &'a DomainRouting,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    if args.no_color {
        colored::control::set_override(false);
    }

    let result = match load_components(&args) {
        Ok((mediator, router)) => run(&args, mediator, router).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(args: &Args, mediator: Mediator, router: DomainRouter) -> Result<(), Box<dyn Error>> {
    if args.serve {
        run_server(&args.addr, mediator, router).await
    } else if args.interactive || (args.text.is_none() && args.action.is_none()) {
        // Default to interactive if no turn given
        run_interactive(args, &mediator, &router)
    } else {
        run_single(args, &mediator, &router)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,marion=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_components(args: &Args) -> Result<(Mediator, DomainRouter), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => serde_json::from_str::<Config>(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    config.weights.validate()?;
    if !config.router.is_usable() {
        return Err("router weights must be finite with a positive ceiling".into());
    }
    Ok((
        Mediator::new().with_weights(config.weights),
        DomainRouter::new().with_weights(config.router),
    ))
}

fn load_session(args: &Args) -> Result<SessionSnapshot, Box<dyn Error>> {
    match &args.session {
        Some(path) => {
            let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            Ok(SessionSnapshot::from_value(&value))
        }
        None => Ok(SessionSnapshot::default()),
    }
}

/// Run a single mediation
fn run_single(
    args: &Args,
    mediator: &Mediator,
    router: &DomainRouter,
) -> Result<(), Box<dyn Error>> {
    let mut turn = NormalizedTurn::text(args.text.clone().unwrap_or_default());
    turn.action = args.action.clone();
    turn.lane = args.lane.clone();
    turn.year = args.year;
    let session = load_session(args)?;

    let cognition = mediator.mediate(&turn, &session, &MediationOptions::default());
    let routing = router.route(&turn, &session, &cognition, &RouteOptions::default());
    print_turn(&cognition, &routing, args)
}

/// Interactive host: keeps the snapshot and folds each update back in
fn run_interactive(
    args: &Args,
    mediator: &Mediator,
    router: &DomainRouter,
) -> Result<(), Box<dyn Error>> {
    let mut session = load_session(args)?;

    print_header();
    println!("Type text and press Enter. '@action [year] text' submits an action.");
    println!("':lane <name>' switches lane. Type 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lane = args.lane.clone();

    loop {
        print!("{} > ", format_prompt(&session));
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended. Turns: {}", session.turn_count);
            break;
        }
        if line.is_empty() {
            continue;
        }
        if let Some(name) = line.strip_prefix(":lane") {
            let name = name.trim();
            lane = if name.is_empty() { None } else { Some(name.to_string()) };
            continue;
        }

        let mut turn = parse_turn_line(line);
        turn.lane = lane.clone();

        let cognition = mediator.mediate(&turn, &session, &MediationOptions::default());
        let routing = router.route(&turn, &session, &cognition, &RouteOptions::default());
        print_turn(&cognition, &routing, args)?;

        if let Some(update) = &cognition.session_update {
            session.apply(update);
        }
    }
    Ok(())
}

/// `@action [year] rest` or plain text
fn parse_turn_line(line: &str) -> NormalizedTurn {
    let Some(rest) = line.strip_prefix('@') else {
        return NormalizedTurn::text(line);
    };
    let mut parts = rest.splitn(2, char::is_whitespace);
    let action = parts.next().unwrap_or_default().to_string();
    let tail = parts.next().unwrap_or_default().trim();

    let (year, text) = match tail.split_once(char::is_whitespace) {
        Some((head, text)) if head.parse::<i32>().is_ok() => {
            (head.parse::<i32>().ok(), text.trim())
        }
        _ => match tail.parse::<i32>() {
            Ok(y) => (Some(y), ""),
            Err(_) => (None, tail),
        },
    };
    NormalizedTurn::action(action, year).with_text(text)
}

fn print_header() {
    println!("{}", "========================================".bold());
    println!("{}", format!("  Marion v{} - Interactive Host", VERSION).bold());
    println!("{}", "========================================".bold());
    println!();
}

fn format_prompt(session: &SessionSnapshot) -> String {
    let velvet = if session.velvet_mode { " velvet" } else { "" };
    let lane = session.lane.as_deref().unwrap_or("-");
    format!("[{}{} #{}]", lane, velvet, session.turn_count)
        .dimmed()
        .to_string()
}

fn state_color(cognition: &Cognition) -> ColoredString {
    let label = cognition.marion_state.as_str();
    if cognition.is_fail_open() {
        return label.red().bold();
    }
    match cognition.marion_state {
        MarionState::Deliver => label.green().bold(),
        MarionState::Bridge => label.cyan().bold(),
        MarionState::Stabilize => label.magenta().bold(),
        MarionState::Seek => label.yellow().bold(),
    }
}

fn print_turn(
    cognition: &Cognition,
    routing: &DomainRouting,
    args: &Args,
) -> Result<(), Box<dyn Error>> {
    if args.json {
        let out = TurnOutput { cognition, routing };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let intent = match cognition.intent {
        Intent::Advance => cognition.intent.as_str().green(),
        Intent::Clarify => cognition.intent.as_str().yellow(),
        Intent::Stabilize => cognition.intent.as_str().magenta(),
    };
    println!(
        "{} {} mode={} dominance={} budget={} desire={}",
        state_color(cognition),
        intent,
        cognition.mode.as_str(),
        cognition.dominance.as_str(),
        cognition.budget.as_str(),
        cognition.latent_desire.as_str(),
    );
    println!(
        "  confidence user={:.2} nyx={:.2} | velvet={} | novelty={:.2}{}",
        cognition.confidence.user,
        cognition.confidence.nyx,
        cognition.velvet,
        cognition.novelty_score,
        if cognition.discovery_hint.enabled {
            format!(" ({})", cognition.discovery_hint.style.as_str()).cyan().to_string()
        } else {
            String::new()
        },
    );
    let secondary: Vec<&str> = routing.secondary.iter().map(|d| d.as_str()).collect();
    println!(
        "  route {} [{}] confidence={:.2}",
        routing.primary.as_str().bold(),
        secondary.join(", "),
        routing.reason.confidence,
    );

    if args.verbose {
        println!("  {} {}", "trace:".dimmed(), cognition.trace.dimmed());
        println!("  {} {}", "hash:".dimmed(), cognition.trace_hash.dimmed());
        println!("  {} {}", "signals:".dimmed(), routing.reason.signals.join(" ").dimmed());
        if !cognition.telemetry.overrides.is_empty() {
            let overrides: Vec<&str> =
                cognition.telemetry.overrides.iter().map(|o| o.as_str()).collect();
            println!("  {} {}", "overrides:".dimmed(), overrides.join(" ").dimmed());
        }
        if let Some(code) = cognition.error_code {
            println!("  {} {}", "error:".red(), code);
        }
    }
    Ok(())
}
