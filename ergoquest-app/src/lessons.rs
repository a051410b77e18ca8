//! Lesson catalogue and scenario runner
//!
//! Each lesson builds a small mock wallet, runs it through the selection,
//! balance and swap arithmetic of `ergoquest-common` and explains the result
//! line by line. Nothing here talks to a node; the records are fixtures.

use std::collections::BTreeSet;

use ergoquest_common::balance::{BalanceCalculator, TransactionSummary};
use ergoquest_common::config::Config;
use ergoquest_common::error::{config_error, LedgerError, QuestResult};
use ergoquest_common::logging::sanitize_for_logging;
use ergoquest_common::math::format_erg;
use ergoquest_common::selection::{select, SelectionResult, SelectionStrategy, SelectionTarget};
use ergoquest_common::swap::{minimum_received, swap_output, BasisPoints, PoolState};
use ergoquest_common::types::{Asset, OutputCandidate, ValueRecord, NANOERGS_PER_ERG, RECOMMENDED_MIN_FEE_VALUE};
use num_bigint::BigUint;

/// Id of the swap lesson
pub const DEFI_LESSON_ID: &str = "defi-swap";

/// Token used by the token lesson
pub const DEMO_TOKEN_ID: &str = "4b2d8b7beb3eaac8234d9e61792d270898a43934d6a27275e4f3a044609c9f2a";

/// ERG/SigUSD reserves used by the swap lesson, in base units
pub const DEMO_POOL_ERG_RESERVE: u64 = 100_000_000_000_000;
pub const DEMO_POOL_SIGUSD_RESERVE: u64 = 21_500_000_000;

/// A lesson in the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub xp: u64,
}

static LESSONS: [Lesson; 5] = [
    Lesson {
        id: "basic-transfer",
        title: "Your first transfer",
        summary: "Spend one box, pay a fee and get change back",
        xp: 100,
    },
    Lesson {
        id: "multi-output",
        title: "Paying several people at once",
        summary: "One transaction, three recipients, one change box",
        xp: 150,
    },
    Lesson {
        id: "token-transfer",
        title: "Sending tokens",
        summary: "Tokens ride inside boxes that still need a minimum value",
        xp: 200,
    },
    Lesson {
        id: "box-selection",
        title: "Choosing which boxes to spend",
        summary: "First-fit versus largest-first on the same wallet",
        xp: 250,
    },
    Lesson {
        id: DEFI_LESSON_ID,
        title: "Swapping on an AMM",
        summary: "Constant-product pricing, fees, price impact and slippage",
        xp: 300,
    },
];

/// Every lesson, in teaching order
pub fn catalogue() -> &'static [Lesson] {
    &LESSONS
}

/// Look up a lesson by id
pub fn find_lesson(id: &str) -> Option<&'static Lesson> {
    LESSONS.iter().find(|lesson| lesson.id == id)
}

/// Narrated outcome of a lesson run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonReport {
    pub lesson_id: String,
    pub title: String,
    pub lines: Vec<String>,
}

impl LessonReport {
    fn new(lesson: &Lesson) -> Self {
        Self {
            lesson_id: lesson.id.to_string(),
            title: lesson.title.to_string(),
            lines: Vec::new(),
        }
    }

    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }
}

/// Ledger settings a lesson runs under
#[derive(Debug, Clone)]
pub struct LessonSettings {
    pub strategy: SelectionStrategy,
    pub fee: BigUint,
    pub calculator: BalanceCalculator,
    pub pool_fee_bps: u32,
    pub slippage: BasisPoints,
}

impl Default for LessonSettings {
    fn default() -> Self {
        Self {
            strategy: SelectionStrategy::FirstFit,
            fee: BigUint::from(RECOMMENDED_MIN_FEE_VALUE),
            calculator: BalanceCalculator::default(),
            pool_fee_bps: 30,
            slippage: BasisPoints::new(50).unwrap_or(BasisPoints::ZERO),
        }
    }
}

impl LessonSettings {
    /// Settings taken from a loaded configuration
    pub fn from_config(config: &Config) -> QuestResult<Self> {
        let strategy = config.strategy().map_err(|e| config_error(e.to_string()))?;
        let slippage = config.slippage().map_err(|e| config_error(e.to_string()))?;

        Ok(Self {
            strategy,
            fee: config.default_fee(),
            calculator: config.balance_calculator(),
            pool_fee_bps: config.swap.fee_rate_bps,
            slippage,
        })
    }
}

/// Run the lesson with the given id
pub fn run_lesson(id: &str, settings: &LessonSettings) -> QuestResult<LessonReport> {
    let lesson = find_lesson(id).ok_or_else(|| LedgerError::invalid_input(format!("Unknown lesson: {}", id)))?;

    match lesson.id {
        "basic-transfer" => basic_transfer(lesson, settings),
        "multi-output" => multi_output(lesson, settings),
        "token-transfer" => token_transfer(lesson, settings),
        "box-selection" => box_selection(lesson),
        DEFI_LESSON_ID => defi_swap(lesson, settings),
        other => Err(LedgerError::invalid_input(format!("Lesson {} has no runner", other)).into()),
    }
}

/// The mixed wallet used by the selection lesson and the CLI
pub fn demo_pool() -> QuestResult<Vec<ValueRecord>> {
    let values = [100_000_000u64, 250_000_000, 2_000_000_000, 50_000_000, 1_000_000_000];
    let mut pool = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        pool.push(ValueRecord::with_value(format!("wallet-box-{}", i + 1), *value)?);
    }
    Ok(pool)
}

fn erg(nano_ergs: u64) -> String {
    format!("{} ERG", format_erg(&BigUint::from(nano_ergs)))
}

fn big_erg(nano_ergs: &BigUint) -> String {
    format!("{} ERG", format_erg(nano_ergs))
}

fn describe_inputs(report: &mut LessonReport, selection: &SelectionResult) {
    report.line(format!(
        "Selected {} input box(es) worth {}: {}",
        selection.len(),
        big_erg(&selection.total_value),
        selection.ids().join(", ")
    ));
}

fn describe_change(report: &mut LessonReport, summary: &TransactionSummary) {
    report.line(format!("Fee: {}", big_erg(&summary.fee)));
    if summary.needs_change_output() {
        report.line(format!("Change back to you: {}", big_erg(&summary.change_value)));
    } else {
        report.line("Inputs were spent exactly, no change box needed");
    }
}

fn basic_transfer(lesson: &Lesson, settings: &LessonSettings) -> QuestResult<LessonReport> {
    let mut report = LessonReport::new(lesson);
    let pool = vec![ValueRecord::with_value("wallet-box-1", NANOERGS_PER_ERG)?];
    let amount = BigUint::from(100_000_000u64);

    report.line(format!("Wallet holds one box of {}", erg(NANOERGS_PER_ERG)));

    let target = SelectionTarget::value(&amount + &settings.fee);
    let selection = select(&pool, &target, settings.strategy)?;
    describe_inputs(&mut report, &selection);

    let outputs = vec![OutputCandidate::new(amount.clone())];
    let summary = settings
        .calculator
        .summarize(&selection.chosen, &outputs, &settings.fee, &BTreeSet::new())?;

    report.line(format!("Recipient receives {}", big_erg(&amount)));
    describe_change(&mut report, &summary);
    report.line("Inputs = outputs + fee + change, to the last nanoERG");
    Ok(report)
}

fn multi_output(lesson: &Lesson, settings: &LessonSettings) -> QuestResult<LessonReport> {
    let mut report = LessonReport::new(lesson);
    let pool = vec![
        ValueRecord::with_value("wallet-box-1", 500_000_000u64)?,
        ValueRecord::with_value("wallet-box-2", 1_200_000_000u64)?,
        ValueRecord::with_value("wallet-box-3", 300_000_000u64)?,
    ];
    let payments = [("alice", 250_000_000u64), ("bob", 400_000_000), ("carol", 100_000_000)];

    let outputs: Vec<OutputCandidate> = payments.iter().map(|(_, value)| OutputCandidate::new(*value)).collect();
    let paid: BigUint = payments.iter().map(|(_, value)| BigUint::from(*value)).sum();

    let target = SelectionTarget::value(&paid + &settings.fee);
    let selection = select(&pool, &target, settings.strategy)?;
    describe_inputs(&mut report, &selection);

    let summary = settings
        .calculator
        .summarize(&selection.chosen, &outputs, &settings.fee, &BTreeSet::new())?;

    for (name, value) in payments {
        report.line(format!("{} receives {}", name, erg(value)));
    }
    report.line(format!("Total paid out: {}", big_erg(&summary.total_output_value)));
    describe_change(&mut report, &summary);
    report.line("A single fee covers every output in the transaction");
    Ok(report)
}

fn token_transfer(lesson: &Lesson, settings: &LessonSettings) -> QuestResult<LessonReport> {
    let mut report = LessonReport::new(lesson);
    let min_box = settings.calculator.min_box_value().clone();
    let sent = BigUint::from(250u32);

    let pool = vec![
        ValueRecord::new(
            "token-box",
            BigUint::from(10_000_000u64),
            vec![Asset::new(DEMO_TOKEN_ID, BigUint::from(1_000u32))],
        )?,
        ValueRecord::with_value("wallet-box-1", 2 * NANOERGS_PER_ERG)?,
    ];

    // Room for the recipient's box, the fee and a change box for leftover tokens
    let target = SelectionTarget::value(&min_box + &settings.fee + &min_box).with_asset(DEMO_TOKEN_ID, sent.clone());
    let selection = select(&pool, &target, settings.strategy)?;
    describe_inputs(&mut report, &selection);

    let outputs = vec![OutputCandidate::new(min_box.clone()).with_asset(DEMO_TOKEN_ID, sent.clone())];
    let summary = settings
        .calculator
        .summarize(&selection.chosen, &outputs, &settings.fee, &BTreeSet::new())?;

    report.line(format!(
        "Recipient box carries {} tokens and the minimum value of {}",
        sent,
        big_erg(&min_box)
    ));
    describe_change(&mut report, &summary);
    for (asset_id, amount) in &summary.change_assets {
        report.line(format!(
            "{} tokens of {} return to you in the change box",
            amount,
            sanitize_for_logging(asset_id)
        ));
    }
    report.line("Tokens cannot travel without a box holding at least the minimum value");
    Ok(report)
}

fn box_selection(lesson: &Lesson) -> QuestResult<LessonReport> {
    let mut report = LessonReport::new(lesson);
    let pool = demo_pool()?;
    let target = SelectionTarget::value(BigUint::from(1_500_000_000u64));

    let values: Vec<String> = pool.iter().map(|record| big_erg(record.value())).collect();
    report.line(format!("Wallet boxes in order: {}", values.join(", ")));
    report.line(format!("Target: {}", big_erg(&target.required_value)));

    for strategy in SelectionStrategy::ALL {
        let selection = select(&pool, &target, strategy)?;
        report.line(format!(
            "{}: {} box(es), {} selected, {} over target",
            strategy,
            selection.len(),
            big_erg(&selection.total_value),
            big_erg(&selection.excess_value(&target))
        ));
    }

    report.line("First-fit keeps wallet order; largest-first spends fewer boxes");
    Ok(report)
}

fn defi_swap(lesson: &Lesson, settings: &LessonSettings) -> QuestResult<LessonReport> {
    let mut report = LessonReport::new(lesson);
    let pool = PoolState::new(
        BigUint::from(DEMO_POOL_ERG_RESERVE),
        BigUint::from(DEMO_POOL_SIGUSD_RESERVE),
        settings.pool_fee_bps,
    )?;
    let input = BigUint::from(10 * NANOERGS_PER_ERG);

    report.line(format!(
        "Pool reserves: {} and {} SigUSD units, fee {} bps",
        big_erg(pool.reserve_in()),
        pool.reserve_out(),
        pool.fee_rate_bps()
    ));

    let quote = swap_output(&pool, &input)?;
    report.line(format!(
        "Swapping {} ({} after the pool fee) returns {} SigUSD units",
        big_erg(&quote.input_amount),
        big_erg(&quote.input_after_fee),
        quote.output_amount
    ));

    let impact = quote
        .price_impact_display()
        .map(|pct| format!("{:.4}%", pct))
        .unwrap_or_else(|| "n/a".to_string());
    report.line(format!("Price impact: {}", impact));

    let floor = minimum_received(&quote, settings.slippage);
    report.line(format!(
        "With {} bps slippage tolerance, accept no less than {} units",
        settings.slippage.get(),
        floor
    ));

    let next = pool.after_swap(&quote)?;
    report.line(format!(
        "Constant product grew from {} to {}",
        pool.constant_product(),
        next.constant_product()
    ));

    let back = swap_output(&next.reversed(), &quote.output_amount)?;
    report.line(format!(
        "Swapping the tokens straight back returns {}; the difference stays in the pool",
        big_erg(&back.output_amount)
    ));
    Ok(report)
}
