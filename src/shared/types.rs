//! Common types used across the application

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Token representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    #[serde(with = "crate::shared::utils::pubkey_serde")]
    pub mint: Pubkey,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(mint: Pubkey, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            mint,
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Convert a raw amount into UI units
    pub fn to_ui(&self, amount: u64) -> f64 {
        amount as f64 / 10_f64.powi(self.decimals as i32)
    }
}
