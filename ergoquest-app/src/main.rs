use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use ergoquest_common::config::{self, Config};
use ergoquest_common::error::{LedgerError, QuestError};
use ergoquest_common::logging::{self, LogLevel};
use ergoquest_common::math::{format_erg, parse_erg};
use ergoquest_common::selection::{select, SelectionStrategy, SelectionTarget};
use ergoquest_common::swap::{minimum_received, swap_output, BasisPoints, PoolState};
use ergoquest_common::types::ValueRecord;
use ergoquest_lib::lessons::{self, catalogue, find_lesson, run_lesson, LessonSettings};
use ergoquest_lib::paths;
use ergoquest_lib::progress::{JsonFileProgressStore, ProgressStore, ProgressTracker};
use num_bigint::BigUint;

/// Command-line entrypoint for the ErgoQuest tutorials.
#[derive(Parser, Debug)]
#[command(name = "ergoquest", version, about = "Learn eUTXO transactions one lesson at a time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Progress file (JSON)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List lessons and their completion state
    Lessons,
    /// Run a lesson and earn its XP
    Run {
        /// Lesson id, as shown by `lessons`
        lesson: String,
    },
    /// Show XP, level and achievements
    Progress,
    /// Select boxes covering an ERG amount
    Select {
        /// Amount in ERG, e.g. 1.5
        #[arg(long)]
        amount: String,
        /// first-fit or largest-first (defaults to the configured strategy)
        #[arg(long)]
        policy: Option<String>,
        /// JSON array of records to select from (defaults to the demo wallet)
        #[arg(long)]
        pool: Option<PathBuf>,
    },
    /// Quote a constant-product swap, amounts in base units
    Swap {
        #[arg(long)]
        input: String,
        #[arg(long)]
        reserve_in: String,
        #[arg(long)]
        reserve_out: String,
        /// Pool fee (defaults to the configured fee)
        #[arg(long)]
        fee_bps: Option<u32>,
        /// Slippage tolerance (defaults to the configured tolerance)
        #[arg(long)]
        slippage_bps: Option<u32>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", describe(&err));
            ExitCode::FAILURE
        }
    }
}

/// Prefer the domain message of ledger failures over the raw error chain
fn describe(err: &anyhow::Error) -> String {
    if let Some(quest) = err.downcast_ref::<QuestError>() {
        return quest.user_message();
    }
    if let Some(ledger) = err.downcast_ref::<LedgerError>() {
        return ledger.user_message();
    }
    format!("{:#}", err)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    config.validate()?;

    match cli.verbose {
        0 => {}
        1 => config.logging.level = LogLevel::Debug,
        _ => config.logging.level = LogLevel::Trace,
    }
    logging::init(&config.logging).map_err(|e| anyhow!(e))?;

    let progress_path = match cli.data {
        Some(path) => path,
        None => paths::default_progress_file().context("Could not determine the progress file location")?,
    };
    let tracker = ProgressTracker::new(JsonFileProgressStore::new(progress_path));

    match cli.command {
        Commands::Lessons => list_lessons(&tracker),
        Commands::Run { lesson } => run_one(&tracker, &config, &lesson),
        Commands::Progress => show_progress(&tracker),
        Commands::Select { amount, policy, pool } => select_boxes(&config, &amount, policy.as_deref(), pool.as_deref()),
        Commands::Swap {
            input,
            reserve_in,
            reserve_out,
            fee_bps,
            slippage_bps,
        } => quote_swap(&config, &input, &reserve_in, &reserve_out, fee_bps, slippage_bps),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        config::ensure_config_exists(path)?;
        return Config::load(&path.to_string_lossy());
    }

    match paths::default_config_file() {
        Ok(path) if path.exists() => Config::load(&path.to_string_lossy()),
        _ => Ok(Config::default()),
    }
}

fn list_lessons<S: ProgressStore>(tracker: &ProgressTracker<S>) -> Result<()> {
    let state = tracker.state()?;

    for lesson in catalogue() {
        let mark = if state.is_completed(lesson.id) { "x" } else { " " };
        println!("[{}] {:<16} {} ({} XP)", mark, lesson.id, lesson.title, lesson.xp);
        println!("    {}", lesson.summary);
    }
    Ok(())
}

fn run_one<S: ProgressStore>(tracker: &ProgressTracker<S>, config: &Config, id: &str) -> Result<()> {
    let settings = LessonSettings::from_config(config)?;
    let report = run_lesson(id, &settings)?;

    println!("== {} ==", report.title);
    for line in &report.lines {
        println!("  {}", line);
    }

    let lesson = find_lesson(id).ok_or_else(|| anyhow!("Unknown lesson: {}", id))?;
    let outcome = tracker.complete_lesson(lesson)?;

    println!();
    if outcome.xp_awarded > 0 {
        println!("+{} XP (total {}, level {})", outcome.xp_awarded, outcome.total_xp, outcome.level);
    } else {
        println!("Lesson already completed, no XP awarded (total {})", outcome.total_xp);
    }
    if outcome.leveled_up {
        println!("Level up! You are now level {}", outcome.level);
    }
    for achievement in &outcome.new_achievements {
        println!("Achievement unlocked: {}", achievement);
    }
    Ok(())
}

fn show_progress<S: ProgressStore>(tracker: &ProgressTracker<S>) -> Result<()> {
    let state = tracker.state()?;

    println!("XP: {}", state.xp);
    println!("Level: {}", state.level());
    println!("Lessons: {}/{}", state.completed_lessons.len(), catalogue().len());
    if state.achievements.is_empty() {
        println!("Achievements: none yet");
    } else {
        println!("Achievements:");
        for achievement in &state.achievements {
            println!("  {}", achievement);
        }
    }
    Ok(())
}

fn select_boxes(config: &Config, amount: &str, policy: Option<&str>, pool: Option<&Path>) -> Result<()> {
    let required = parse_erg(amount)?;
    let strategy: SelectionStrategy = match policy {
        Some(name) => name.parse::<SelectionStrategy>()?,
        None => config.strategy()?,
    };

    let pool: Vec<ValueRecord> = match pool {
        Some(path) => {
            let content = fs::read_to_string(path).with_context(|| format!("Failed to read pool {}", path.display()))?;
            serde_json::from_str(&content).with_context(|| format!("Invalid pool file {}", path.display()))?
        }
        None => lessons::demo_pool()?,
    };

    let target = SelectionTarget::value(required);
    let selection = select(&pool, &target, strategy)?;

    println!("Strategy: {}", strategy);
    for record in &selection.chosen {
        println!("  {:<20} {} ERG", record.id(), format_erg(record.value()));
    }
    println!("Selected: {} ERG", format_erg(&selection.total_value));
    println!("Over target: {} ERG", format_erg(&selection.excess_value(&target)));
    Ok(())
}

fn parse_amount(name: &str, text: &str) -> Result<BigUint> {
    text.trim()
        .parse::<BigUint>()
        .map_err(|e| anyhow!("Invalid {} '{}': {}", name, text, e))
}

fn quote_swap(
    config: &Config,
    input: &str,
    reserve_in: &str,
    reserve_out: &str,
    fee_bps: Option<u32>,
    slippage_bps: Option<u32>,
) -> Result<()> {
    let input = parse_amount("input", input)?;
    let pool = PoolState::new(
        parse_amount("reserve-in", reserve_in)?,
        parse_amount("reserve-out", reserve_out)?,
        fee_bps.unwrap_or(config.swap.fee_rate_bps),
    )?;
    let slippage = match slippage_bps {
        Some(bps) => BasisPoints::new(bps)?,
        None => config.slippage()?,
    };

    let quote = swap_output(&pool, &input)?;

    println!("Input after fee: {}", quote.input_after_fee);
    println!("Output: {}", quote.output_amount);
    if let Some(impact) = quote.price_impact_display() {
        println!("Price impact: {:.4}%", impact);
    }
    if let Some(price) = quote.execution_price_display() {
        println!("Execution price: {}", price);
    }
    println!(
        "Minimum received at {} bps slippage: {}",
        slippage.get(),
        minimum_received(&quote, slippage)
    );
    Ok(())
}
