//! Arbitrage parameters and their callback payload encoding

use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use solana_sdk::clock::UnixTimestamp;
use solana_sdk::pubkey::Pubkey;

use crate::shared::errors::{ExecutionError, ExecutionResult};
use crate::shared::utils::pubkey_serde;

/// Which venue trades first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[serde(rename_all = "snake_case")]
#[borsh(use_discriminant = true)]
pub enum Direction {
    #[default]
    FirstVenueThenSecond = 0,
    SecondVenueThenFirst = 1,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::FirstVenueThenSecond => write!(f, "first-then-second"),
            Direction::SecondVenueThenFirst => write!(f, "second-then-first"),
        }
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "first-then-second" | "first-venue-then-second" | "forward" => Ok(Direction::FirstVenueThenSecond),
            "second-then-first" | "second-venue-then-first" | "reverse" => Ok(Direction::SecondVenueThenFirst),
            _ => Err(anyhow::anyhow!("Unknown direction: {}", s)),
        }
    }
}

/// Caller-chosen parameters for one arbitrage attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageParams {
    /// Intermediate asset bought on the first hop
    #[serde(with = "pubkey_serde")]
    pub swap_token: Pubkey,
    pub direction: Direction,
    /// Upper bound on the ledger clock for both swaps
    pub deadline: UnixTimestamp,
    /// Surplus that must remain with the engine after repayment
    pub amount_required: u64,
    #[serde(with = "pubkey_serde")]
    pub profit_receiver: Pubkey,
    /// Slippage floor for hop one
    pub min_amount_swap_token: u64,
    /// Slippage floor for hop two
    pub min_amount_borrowed_token: u64,
}

/// Fixed-layout form of [`ArbitrageParams`] that crosses the callback boundary
#[derive(BorshSerialize, BorshDeserialize)]
struct Payload {
    swap_token: [u8; 32],
    direction: Direction,
    deadline: i64,
    amount_required: u64,
    profit_receiver: [u8; 32],
    min_amount_swap_token: u64,
    min_amount_borrowed_token: u64,
}

impl ArbitrageParams {
    /// Repayment plus required surplus for a loan of `amount` costing `fee`
    pub fn required_proceeds(&self, amount: u64, fee: u64) -> ExecutionResult<u64> {
        amount
            .checked_add(fee)
            .and_then(|repay| repay.checked_add(self.amount_required))
            .ok_or(ExecutionError::ArithmeticOverflow)
    }

    /// The hop-two floor must cover repayment and surplus, otherwise the swaps could
    /// clear their floors and still leave settlement short.
    pub fn ensure_consistent(&self, amount: u64, fee: u64) -> ExecutionResult<()> {
        let required = self.required_proceeds(amount, fee)?;
        if self.min_amount_borrowed_token < required {
            return Err(ExecutionError::InconsistentParams {
                min_amount_out: self.min_amount_borrowed_token,
                required,
            });
        }
        Ok(())
    }

    pub fn encode(&self) -> ExecutionResult<Vec<u8>> {
        let payload = Payload {
            swap_token: self.swap_token.to_bytes(),
            direction: self.direction,
            deadline: self.deadline,
            amount_required: self.amount_required,
            profit_receiver: self.profit_receiver.to_bytes(),
            min_amount_swap_token: self.min_amount_swap_token,
            min_amount_borrowed_token: self.min_amount_borrowed_token,
        };
        borsh::to_vec(&payload).map_err(|e| ExecutionError::MalformedPayload(e.to_string()))
    }

    /// Rejects short input, trailing bytes and unknown direction tags.
    pub fn decode(bytes: &[u8]) -> ExecutionResult<Self> {
        let payload: Payload =
            borsh::from_slice(bytes).map_err(|e| ExecutionError::MalformedPayload(e.to_string()))?;
        Ok(Self {
            swap_token: Pubkey::new_from_array(payload.swap_token),
            direction: payload.direction,
            deadline: payload.deadline,
            amount_required: payload.amount_required,
            profit_receiver: Pubkey::new_from_array(payload.profit_receiver),
            min_amount_swap_token: payload.min_amount_swap_token,
            min_amount_borrowed_token: payload.min_amount_borrowed_token,
        })
    }
}
