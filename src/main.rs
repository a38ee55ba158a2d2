use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use flasharb::app::{self, AppCfg};
use flasharb::config::Config;
use flasharb::Direction;

#[derive(Parser, Debug)]
#[command(version, about = "Flash loan arbitrage between two venues")]
struct Args {
    /// Path to config file; the built-in demo world is used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Amount of the borrowed token to flash-borrow (raw units)
    #[arg(long)]
    amount: Option<u64>,

    /// Which venue trades first: first-then-second or second-then-first
    #[arg(long)]
    direction: Option<Direction>,

    /// Slippage tolerance in basis points
    #[arg(long)]
    slippage_bps: Option<u32>,

    /// Surplus that must stay with the engine after repayment
    #[arg(long)]
    amount_required: Option<u64>,

    /// Seconds from the ledger clock until the swaps expire
    #[arg(long)]
    deadline_secs: Option<i64>,

    /// Write the JSON report here instead of stdout
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    // Priority: CLI args > Config file > Defaults
    let cfg = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let mut app_cfg = AppCfg::from_config(cfg)?;

    if let Some(amount) = args.amount {
        app_cfg.amount = amount;
    }
    if let Some(direction) = args.direction {
        app_cfg.direction = direction;
    }
    if let Some(slippage_bps) = args.slippage_bps {
        app_cfg.slippage_bps = slippage_bps;
    }
    if let Some(amount_required) = args.amount_required {
        app_cfg.amount_required = amount_required;
    }
    if let Some(deadline_secs) = args.deadline_secs {
        app_cfg.deadline_secs = deadline_secs;
    }
    app_cfg.report_path = args.report;
    app_cfg.validate()?;

    app::run(app_cfg)
}
