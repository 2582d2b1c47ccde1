use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sicuan_core::allocation::scoring::ScoringOptions;
use sicuan_core::config::Settings;
use sicuan_core::domain::input::{parse_amount, Horizon, HorizonUnit, PlanRequest};
use sicuan_core::domain::plan::AllocationPolicy;
use sicuan_core::engine::AllocationEngine;
use sicuan_core::ingest::{HttpJsonPriceHistory, PriceHistorySource, StaticPriceHistory};
use sicuan_core::universe::{UniverseOptions, MARKET_TICKERS};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "sicuan", about = "Personalized allocation plans for IDX investors")]
struct Args {
    /// Offline price history (JSON map of code -> [{date, close}]) instead of the HTTP provider.
    #[arg(long, global = true)]
    prices: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build an allocation plan for one client goal.
    Plan(PlanArgs),

    /// Summarize current index and bellwether trends.
    Market,
}

#[derive(Debug, clap::Args)]
struct PlanArgs {
    /// What the client is saving for.
    #[arg(long, default_value = "Investment goal")]
    goal: String,

    /// Starting capital; separators and currency prefixes are ignored ("Rp 10.000.000").
    #[arg(long)]
    initial_capital: String,

    /// Target amount, same format as the initial capital.
    #[arg(long)]
    target: String,

    #[arg(long, default_value_t = 0)]
    horizon: i64,

    #[arg(long, value_enum, default_value_t = UnitArg::Months)]
    unit: UnitArg,

    /// Eight questionnaire answers, comma-separated. Omit to assume a moderate profile.
    #[arg(long, value_delimiter = ',')]
    answers: Option<Vec<i64>>,

    #[arg(long, value_enum, default_value_t = PolicyArg::Hybrid)]
    policy: PolicyArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitArg {
    Months,
    Years,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Hybrid,
    Direct,
}

impl From<UnitArg> for HorizonUnit {
    fn from(v: UnitArg) -> Self {
        match v {
            UnitArg::Months => HorizonUnit::Months,
            UnitArg::Years => HorizonUnit::Years,
        }
    }
}

impl From<PolicyArg> for AllocationPolicy {
    fn from(v: PolicyArg) -> Self {
        match v {
            PolicyArg::Hybrid => AllocationPolicy::HybridBlend,
            PolicyArg::Direct => AllocationPolicy::DirectOptimizer,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let res = execute(&settings, &args).await;

    if let Err(err) = &res {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %err, "command failed");
    }
    res
}

/// Picks the price source and runs the command; every failure surfaces here.
async fn execute(settings: &Settings, args: &Args) -> anyhow::Result<()> {
    match args.prices.as_deref() {
        Some(path) => {
            let source = StaticPriceHistory::from_json_file(path)?;
            tracing::info!(instruments = source.len(), path = %path.display(), "using offline price history");
            run(source, args).await
        }
        None => {
            let source = HttpJsonPriceHistory::from_settings(settings)?;
            run(source, args).await
        }
    }
}

async fn run<S: PriceHistorySource>(source: S, args: &Args) -> anyhow::Result<()> {
    let scoring = ScoringOptions::from_env();

    match &args.command {
        Command::Plan(plan_args) => {
            let request = build_request(plan_args);
            let engine = AllocationEngine::new(source)
                .with_universe(UniverseOptions::from_env())
                .with_scoring(scoring);

            let plan = engine
                .plan(&request)
                .await
                .map_err(anyhow::Error::new)
                .context("allocation unavailable")?;

            print_json(&plan, args.pretty)
        }
        Command::Market => {
            let signals =
                sicuan_core::market::market_overview(&source, &MARKET_TICKERS, &scoring.lookback)
                    .await;
            print_json(&signals, args.pretty)
        }
    }
}

fn build_request(args: &PlanArgs) -> PlanRequest {
    PlanRequest {
        goal: args.goal.trim().to_string(),
        initial_capital: parse_amount(&args.initial_capital),
        target_amount: parse_amount(&args.target),
        horizon: Horizon {
            value: args.horizon,
            unit: args.unit.into(),
        },
        answers: args.answers.clone(),
        policy: args.policy.into(),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
