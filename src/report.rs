// src/report.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::arbitrage::Direction;
use crate::domain::execution::LedgerEvent;
use crate::math::calculate_profit_bps;
use crate::shared::types::Token;
use crate::shared::utils;

/// Amounts for the two hops of a round trip, in trading order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopAmounts {
    /// Swap token received on hop one
    pub first_hop: u64,
    /// Borrowed token received on hop two
    pub second_hop: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArbitrageReport {
    pub id: String,
    pub success: bool,
    pub error: Option<String>,

    pub direction: Direction,
    pub borrowed_token: Token,
    pub swap_token: Token,
    pub amount: u64,
    pub fee: u64,

    pub quotes: HopAmounts,
    pub floors: HopAmounts,
    pub realized: Option<HopAmounts>,

    pub profit: u64,
    pub profit_ui: f64,
    /// Net profit relative to the principal
    pub profit_bps: i64,
    /// Hop-two output against the principal, before the fee and the retained surplus
    pub gross_spread_bps: i64,
    pub receiver_delta: u64,

    /// Hex of the borsh callback payload
    pub payload: Option<String>,
    pub events: Vec<LedgerEvent>,
    pub timestamp: DateTime<Utc>,
}

impl ArbitrageReport {
    pub fn new(direction: Direction, borrowed_token: Token, swap_token: Token, amount: u64) -> Self {
        Self {
            id: utils::generate_id(),
            success: false,
            error: None,
            direction,
            borrowed_token,
            swap_token,
            amount,
            fee: 0,
            quotes: HopAmounts::default(),
            floors: HopAmounts::default(),
            realized: None,
            profit: 0,
            profit_ui: 0.0,
            profit_bps: 0,
            gross_spread_bps: 0,
            receiver_delta: 0,
            payload: None,
            events: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_plan(mut self, fee: u64, quotes: HopAmounts, floors: HopAmounts, payload: &[u8]) -> Self {
        self.fee = fee;
        self.quotes = quotes;
        self.floors = floors;
        self.payload = Some(hex::encode(payload));
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.success = false;
        self.error = Some(error.to_string());
        self
    }

    /// Fill realized amounts from the events of a committed attempt
    pub fn with_events(mut self, events: Vec<LedgerEvent>, receiver_delta: u64) -> Self {
        let swaps: Vec<u64> = events
            .iter()
            .filter_map(|e| match e {
                LedgerEvent::Swap { amount_out, .. } => Some(*amount_out),
                _ => None,
            })
            .collect();
        if let [first_hop, second_hop] = swaps.as_slice() {
            self.realized = Some(HopAmounts {
                first_hop: *first_hop,
                second_hop: *second_hop,
            });
            self.gross_spread_bps = calculate_profit_bps(self.amount, *second_hop);
        }
        self.profit = events
            .iter()
            .find_map(|e| match e {
                LedgerEvent::Settlement { profit, .. } => Some(*profit),
                _ => None,
            })
            .unwrap_or(0);
        self.profit_ui = self.borrowed_token.to_ui(self.profit);
        self.profit_bps = calculate_profit_bps(self.amount, self.amount.saturating_add(self.profit));
        self.receiver_delta = receiver_delta;
        self.success = true;
        self.error = None;
        self.events = events;
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
