use anyhow::{bail, Context, Result};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::{fs, path::Path, str::FromStr};

use crate::domain::arbitrage::Direction;
use crate::domain::dex::VenueKind;
use crate::math::BPS_DENOMINATOR;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    /// Base58 mint; generated when omitted
    pub mint: Option<String>,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenCfg {
    /// Asset that is flash-borrowed and repaid
    pub borrowed: TokenInfo,
    /// Intermediate asset bought on the first hop
    pub swap: TokenInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LenderCfg {
    pub address: Option<String>,
    pub fee_bps: u32,
    /// Borrowed-token liquidity seeded into the lender
    pub liquidity: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueCfg {
    pub kind: VenueKind,
    pub address: Option<String>,
    pub fee_bps: u32,
    /// Pool reserves for a constant product venue, inventory for a fixed-rate one
    pub liquidity_borrowed: u64,
    pub liquidity_swap: u64,
    /// Fixed-rate price as swap tokens per borrowed token
    pub price_numerator: Option<u64>,
    pub price_denominator: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenuesCfg {
    pub first: VenueCfg,
    pub second: VenueCfg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradeCfg {
    pub amount: u64,
    #[serde(default)]
    pub direction: Direction,
    pub slippage_bps: u32,
    #[serde(default)]
    pub amount_required: u64,
    pub deadline_secs: i64,
    pub profit_receiver: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockCfg {
    /// Starting ledger time; wall clock when omitted
    pub now: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub tokens: TokenCfg,
    pub lender: LenderCfg,
    pub venues: VenuesCfg,
    pub trade: TradeCfg,
    #[serde(default)]
    pub clock: ClockCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse Config.toml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trade.amount == 0 {
            bail!("trade.amount must be positive");
        }
        if u64::from(self.trade.slippage_bps) > BPS_DENOMINATOR {
            bail!("trade.slippage_bps must not exceed {}", BPS_DENOMINATOR);
        }
        if u64::from(self.lender.fee_bps) > BPS_DENOMINATOR {
            bail!("lender.fee_bps must not exceed {}", BPS_DENOMINATOR);
        }
        for (name, venue) in [("first", &self.venues.first), ("second", &self.venues.second)] {
            venue.validate().with_context(|| format!("venues.{}", name))?;
        }
        parse_address(&self.tokens.borrowed.mint).context("tokens.borrowed.mint")?;
        parse_address(&self.tokens.swap.mint).context("tokens.swap.mint")?;
        parse_address(&self.lender.address).context("lender.address")?;
        parse_address(&self.trade.profit_receiver).context("trade.profit_receiver")?;
        Ok(())
    }
}

impl VenueCfg {
    fn validate(&self) -> Result<()> {
        if u64::from(self.fee_bps) > BPS_DENOMINATOR {
            bail!("fee_bps must not exceed {}", BPS_DENOMINATOR);
        }
        match self.kind {
            VenueKind::ConstantProduct => {
                if self.liquidity_borrowed == 0 || self.liquidity_swap == 0 {
                    bail!("constant product venue needs liquidity on both sides");
                }
            }
            VenueKind::FixedRate => {
                let (numerator, denominator) = self.price()?;
                if numerator == 0 || denominator == 0 {
                    bail!("fixed-rate price must be non-zero");
                }
            }
            #[cfg(test)]
            VenueKind::Scripted => bail!("scripted venues cannot be configured"),
        }
        parse_address(&self.address).context("address")?;
        Ok(())
    }

    /// (numerator, denominator) of the fixed-rate price
    pub fn price(&self) -> Result<(u64, u64)> {
        match (self.price_numerator, self.price_denominator) {
            (Some(numerator), Some(denominator)) => Ok((numerator, denominator)),
            _ => bail!("fixed-rate venue needs price_numerator and price_denominator"),
        }
    }
}

/// Parse an optional base58 address, generating a fresh one when absent
pub fn parse_address(value: &Option<String>) -> Result<Pubkey> {
    match value {
        Some(s) => Pubkey::from_str(s).with_context(|| format!("invalid address: {}", s)),
        None => Ok(Pubkey::new_unique()),
    }
}

impl Default for Config {
    /// Demo world: SOL priced at 2 USDC on a constant product pool, bought back at
    /// 1.9 USDC from a fixed-rate desk.
    fn default() -> Self {
        Self {
            tokens: TokenCfg {
                borrowed: TokenInfo {
                    mint: None,
                    symbol: "SOL".to_string(),
                    decimals: 9,
                },
                swap: TokenInfo {
                    mint: None,
                    symbol: "USDC".to_string(),
                    decimals: 6,
                },
            },
            lender: LenderCfg {
                address: None,
                fee_bps: 50,
                liquidity: 1_000_000,
            },
            venues: VenuesCfg {
                first: VenueCfg {
                    kind: VenueKind::ConstantProduct,
                    address: None,
                    fee_bps: 30,
                    liquidity_borrowed: 1_000_000,
                    liquidity_swap: 2_000_000,
                    price_numerator: None,
                    price_denominator: None,
                },
                second: VenueCfg {
                    kind: VenueKind::FixedRate,
                    address: None,
                    fee_bps: 0,
                    liquidity_borrowed: 100_000,
                    liquidity_swap: 100_000,
                    price_numerator: Some(19),
                    price_denominator: Some(10),
                },
            },
            trade: TradeCfg {
                amount: 1_000,
                direction: Direction::FirstVenueThenSecond,
                slippage_bps: 50,
                amount_required: 3,
                deadline_secs: 60,
                profit_receiver: None,
            },
            clock: ClockCfg::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[tokens.borrowed]
symbol = "SOL"
decimals = 9

[tokens.swap]
mint = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"
symbol = "USDC"
decimals = 6

[lender]
fee_bps = 9
liquidity = 5000000

[venues.first]
kind = "constant_product"
fee_bps = 30
liquidity_borrowed = 1000000
liquidity_swap = 2000000

[venues.second]
kind = "fixed_rate"
fee_bps = 0
liquidity_borrowed = 100000
liquidity_swap = 100000
price_numerator = 19
price_denominator = 10

[trade]
amount = 1000
direction = "second_venue_then_first"
slippage_bps = 50
deadline_secs = 60

[clock]
now = 1700000000
"#;

    #[test]
    fn parses_sample_config() {
        let cfg = Config::from_toml(SAMPLE).unwrap();
        assert_eq!(cfg.lender.fee_bps, 9);
        assert_eq!(cfg.venues.first.kind, VenueKind::ConstantProduct);
        assert_eq!(cfg.venues.second.price().unwrap(), (19, 10));
        assert_eq!(cfg.trade.direction, Direction::SecondVenueThenFirst);
        assert_eq!(cfg.trade.amount_required, 0);
        assert_eq!(cfg.clock.now, Some(1_700_000_000));
        assert_eq!(
            parse_address(&cfg.tokens.swap.mint).unwrap().to_string(),
            "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"
        );
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_fixed_rate_without_price() {
        let mut cfg = Config::default();
        cfg.venues.second.price_denominator = None;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_amount_and_bad_address() {
        let mut cfg = Config::default();
        cfg.trade.amount = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.lender.address = Some("not-a-key".to_string());
        assert!(cfg.validate().is_err());
    }
}
