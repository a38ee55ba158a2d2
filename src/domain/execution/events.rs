//! Events recorded on the ledger during a unit of execution

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::shared::utils::pubkey_serde;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    Transfer {
        #[serde(with = "pubkey_serde")]
        token: Pubkey,
        #[serde(with = "pubkey_serde")]
        from: Pubkey,
        #[serde(with = "pubkey_serde")]
        to: Pubkey,
        amount: u64,
    },
    Approval {
        #[serde(with = "pubkey_serde")]
        token: Pubkey,
        #[serde(with = "pubkey_serde")]
        owner: Pubkey,
        #[serde(with = "pubkey_serde")]
        spender: Pubkey,
        amount: u64,
    },
    Swap {
        #[serde(with = "pubkey_serde")]
        venue: Pubkey,
        #[serde(with = "pubkey_serde")]
        sender: Pubkey,
        #[serde(with = "pubkey_serde")]
        token_in: Pubkey,
        #[serde(with = "pubkey_serde")]
        token_out: Pubkey,
        amount_in: u64,
        amount_out: u64,
        #[serde(with = "pubkey_serde")]
        recipient: Pubkey,
    },
    FlashLoan {
        #[serde(with = "pubkey_serde")]
        lender: Pubkey,
        #[serde(with = "pubkey_serde")]
        receiver: Pubkey,
        #[serde(with = "pubkey_serde")]
        initiator: Pubkey,
        #[serde(with = "pubkey_serde")]
        asset: Pubkey,
        amount: u64,
        fee: u64,
    },
    Settlement {
        #[serde(with = "pubkey_serde")]
        engine: Pubkey,
        #[serde(with = "pubkey_serde")]
        asset: Pubkey,
        #[serde(with = "pubkey_serde")]
        profit_receiver: Pubkey,
        profit: u64,
        repay: u64,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "transfer",
            LedgerEvent::Approval { .. } => "approval",
            LedgerEvent::Swap { .. } => "swap",
            LedgerEvent::FlashLoan { .. } => "flash_loan",
            LedgerEvent::Settlement { .. } => "settlement",
        }
    }
}
