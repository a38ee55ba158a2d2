// src/app.rs
use anyhow::{bail, Context, Result};
use solana_sdk::clock::UnixTimestamp;
use solana_sdk::pubkey::Pubkey;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::{parse_address, Config, VenueCfg};
use crate::domain::arbitrage::{ArbitrageParams, Direction, FlashArbitrage};
use crate::domain::dex::{ConstantProductVenue, FixedRateVenue, Venue, VenueKind};
use crate::domain::execution::{Ledger, Runtime};
use crate::domain::lending::{FlashLender, PoolLender};
use crate::math::{calculate_min_out, BPS_DENOMINATOR};
use crate::report::{ArbitrageReport, HopAmounts};
use crate::shared::errors::{ExecutionResult, VenueError};
use crate::shared::types::Token;
use crate::shared::utils::{format_amount, short_address};

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub world: Config,
    pub amount: u64,
    pub direction: Direction,
    pub slippage_bps: u32,
    pub amount_required: u64,
    pub deadline_secs: i64,
    pub report_path: Option<PathBuf>,
}

impl AppCfg {
    pub fn from_config(cfg: Config) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            amount: cfg.trade.amount,
            direction: cfg.trade.direction,
            slippage_bps: cfg.trade.slippage_bps,
            amount_required: cfg.trade.amount_required,
            deadline_secs: cfg.trade.deadline_secs,
            report_path: None,
            world: cfg,
        })
    }

    /// Trade settings can be overridden after the file was validated, so check them again.
    pub fn validate(&self) -> Result<()> {
        if self.amount == 0 {
            bail!("amount must be positive");
        }
        if u64::from(self.slippage_bps) > BPS_DENOMINATOR {
            bail!("slippage_bps must not exceed {}", BPS_DENOMINATOR);
        }
        Ok(())
    }
}

/// Everything one attempt runs against
pub struct World {
    pub runtime: Runtime,
    pub engine: FlashArbitrage,
    pub borrowed: Token,
    pub swap: Token,
    pub profit_receiver: Pubkey,
}

fn build_venue(ledger: &mut Ledger, cfg: &VenueCfg, borrowed: &Pubkey, swap: &Pubkey) -> Result<Arc<dyn Venue>> {
    let address = parse_address(&cfg.address)?;
    let venue: Arc<dyn Venue> = match cfg.kind {
        VenueKind::ConstantProduct => {
            let mut venue = ConstantProductVenue::new(address, cfg.fee_bps);
            let pool = venue.create_pair(*borrowed, *swap);
            ledger.mint(borrowed, &pool, cfg.liquidity_borrowed)?;
            ledger.mint(swap, &pool, cfg.liquidity_swap)?;
            Arc::new(venue)
        }
        VenueKind::FixedRate => {
            let (numerator, denominator) = cfg.price()?;
            let mut venue = FixedRateVenue::new(address, cfg.fee_bps);
            venue.set_rate(*borrowed, *swap, numerator, denominator);
            venue.set_rate(*swap, *borrowed, denominator, numerator);
            ledger.mint(borrowed, &address, cfg.liquidity_borrowed)?;
            ledger.mint(swap, &address, cfg.liquidity_swap)?;
            Arc::new(venue)
        }
        #[cfg(test)]
        VenueKind::Scripted => bail!("scripted venues cannot be configured"),
    };
    info!(venue = %short_address(&address), kind = cfg.kind.as_str(), fee_bps = cfg.fee_bps, "venue ready");
    Ok(venue)
}

/// Mint tokens, seed liquidity and wire the engine to its lender and venues.
pub fn build_world(cfg: &Config) -> Result<World> {
    let now = cfg.clock.now.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let mut ledger = Ledger::new(now);

    let borrowed = Token::new(
        parse_address(&cfg.tokens.borrowed.mint)?,
        cfg.tokens.borrowed.symbol.clone(),
        cfg.tokens.borrowed.decimals,
    );
    let swap = Token::new(
        parse_address(&cfg.tokens.swap.mint)?,
        cfg.tokens.swap.symbol.clone(),
        cfg.tokens.swap.decimals,
    );

    let lender = PoolLender::new(parse_address(&cfg.lender.address)?, cfg.lender.fee_bps).with_asset(borrowed.mint);
    ledger.mint(&borrowed.mint, &lender.address(), cfg.lender.liquidity)?;

    let first = build_venue(&mut ledger, &cfg.venues.first, &borrowed.mint, &swap.mint).context("venues.first")?;
    let second = build_venue(&mut ledger, &cfg.venues.second, &borrowed.mint, &swap.mint).context("venues.second")?;

    let engine = FlashArbitrage::new(Pubkey::new_unique(), Arc::new(lender), first, second);
    info!(engine = %engine.address(), clock = now, "world built");

    Ok(World {
        runtime: Runtime::new(ledger),
        engine,
        borrowed,
        swap,
        profit_receiver: parse_address(&cfg.trade.profit_receiver)?,
    })
}

/// Caller-side plan: quotes, floors and the params that go into the attempt
struct Plan {
    fee: u64,
    quotes: HopAmounts,
    floors: HopAmounts,
    params: ArbitrageParams,
}

fn last(amounts: Vec<u64>) -> ExecutionResult<u64> {
    amounts
        .last()
        .copied()
        .ok_or_else(|| VenueError::InvalidPath(amounts.len()).into())
}

fn plan(world: &World, cfg: &AppCfg) -> ExecutionResult<Plan> {
    let ledger = world.runtime.ledger();
    let (first, second) = world.engine.route(cfg.direction);
    let (borrowed, swap) = (world.borrowed.mint, world.swap.mint);

    let first_hop = last(first.quote(ledger, cfg.amount, &[borrowed, swap])?)?;
    let second_hop = last(second.quote(ledger, first_hop, &[swap, borrowed])?)?;
    let fee = world.engine.lender().flash_fee(&borrowed, cfg.amount)?;

    let base = ArbitrageParams {
        swap_token: swap,
        direction: cfg.direction,
        deadline: 0,
        amount_required: cfg.amount_required,
        profit_receiver: world.profit_receiver,
        min_amount_swap_token: 0,
        min_amount_borrowed_token: 0,
    };
    let required = base.required_proceeds(cfg.amount, fee)?;
    let floors = HopAmounts {
        first_hop: calculate_min_out(first_hop, cfg.slippage_bps),
        second_hop: calculate_min_out(second_hop, cfg.slippage_bps).max(required),
    };
    let deadline: UnixTimestamp = ledger.now().saturating_add(cfg.deadline_secs);

    Ok(Plan {
        fee,
        quotes: HopAmounts {
            first_hop,
            second_hop,
        },
        floors,
        params: ArbitrageParams {
            deadline,
            min_amount_swap_token: floors.first_hop,
            min_amount_borrowed_token: floors.second_hop,
            ..base
        },
    })
}

/// Plan and submit one attempt, reporting the outcome either way.
pub fn run_attempt(world: &mut World, cfg: &AppCfg) -> ArbitrageReport {
    let report = ArbitrageReport::new(cfg.direction, world.borrowed.clone(), world.swap.clone(), cfg.amount);

    let plan = match plan(world, cfg) {
        Ok(plan) => plan,
        Err(e) => {
            error!("planning failed: {}", e);
            return report.with_error(e);
        }
    };
    let payload = match plan.params.encode() {
        Ok(payload) => payload,
        Err(e) => return report.with_error(e),
    };
    let report = report.with_plan(plan.fee, plan.quotes, plan.floors, &payload);

    info!(
        "Borrowing {} {} ({}), floors {} / {}",
        format_amount(cfg.amount, world.borrowed.decimals),
        world.borrowed.symbol,
        cfg.direction,
        plan.floors.first_hop,
        plan.floors.second_hop
    );

    let (borrowed, receiver) = (world.borrowed.mint, world.profit_receiver);
    let before = world.runtime.ledger().balance_of(&borrowed, &receiver);
    let start = world.runtime.ledger().events().len();
    let engine = &world.engine;
    let result = world
        .runtime
        .execute("arbitrage", |ledger| engine.arbitrage(ledger, &borrowed, cfg.amount, &plan.params));

    match result {
        Ok(_) => {
            let ledger = world.runtime.ledger();
            let delta = ledger.balance_of(&borrowed, &receiver).saturating_sub(before);
            let events = ledger.events()[start..].to_vec();
            info!(
                "Arbitrage succeeded, receiver got {} {}",
                format_amount(delta, world.borrowed.decimals),
                world.borrowed.symbol
            );
            report.with_events(events, delta)
        }
        Err(e) => {
            error!("Arbitrage failed: {}", e);
            report.with_error(e)
        }
    }
}

pub fn run(app_cfg: AppCfg) -> Result<()> {
    app_cfg.validate()?;
    info!("Starting flash arbitrage");
    let mut world = build_world(&app_cfg.world)?;
    let report = run_attempt(&mut world, &app_cfg);
    let json = report.to_json()?;

    match &app_cfg.report_path {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
