//! Liquidity pool that offers single-asset flash loans for a basis-point fee

use std::collections::HashSet;

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use super::flash_lender::{callback_success, FlashLender, FlashLoanReceiver};
use crate::domain::execution::{Ledger, LedgerEvent};
use crate::math;
use crate::shared::errors::{ExecutionError, ExecutionResult, LendingError};

#[derive(Debug, Clone)]
pub struct PoolLender {
    address: Pubkey,
    fee_bps: u32,
    assets: HashSet<Pubkey>,
}

impl PoolLender {
    pub fn new(address: Pubkey, fee_bps: u32) -> Self {
        Self {
            address,
            fee_bps,
            assets: HashSet::new(),
        }
    }

    pub fn with_asset(mut self, asset: Pubkey) -> Self {
        self.assets.insert(asset);
        self
    }

    pub fn supports(&self, asset: &Pubkey) -> bool {
        self.assets.contains(asset)
    }

    /// Liquidity currently available for `asset`
    pub fn max_flash_loan(&self, ledger: &Ledger, asset: &Pubkey) -> u64 {
        if !self.supports(asset) {
            return 0;
        }
        ledger.balance_of(asset, &self.address)
    }
}

impl FlashLender for PoolLender {
    fn address(&self) -> Pubkey {
        self.address
    }

    fn flash_fee(&self, asset: &Pubkey, amount: u64) -> ExecutionResult<u64> {
        if !self.supports(asset) {
            return Err(LendingError::UnsupportedAsset(*asset).into());
        }
        math::flash_fee(amount, self.fee_bps)
    }

    fn flash_loan(
        &self,
        ledger: &mut Ledger,
        initiator: &Pubkey,
        receiver: &dyn FlashLoanReceiver,
        asset: &Pubkey,
        amount: u64,
        payload: &[u8],
    ) -> ExecutionResult<()> {
        if amount == 0 {
            return Err(LendingError::ZeroAmount.into());
        }
        let fee = self.flash_fee(asset, amount)?;
        let repayment = amount.checked_add(fee).ok_or(ExecutionError::ArithmeticOverflow)?;
        let available = self.max_flash_loan(ledger, asset);
        if available < amount {
            return Err(LendingError::InsufficientLiquidity {
                requested: amount,
                available,
            }
            .into());
        }

        let receiver_address = receiver.address();
        ledger.transfer(asset, &self.address, &receiver_address, amount)?;
        debug!(%receiver_address, amount, fee, "flash loan disbursed");

        let ack = receiver.execute_operation(ledger, &self.address, asset, amount, fee, initiator, payload)?;
        if ack != callback_success() {
            return Err(LendingError::CallbackRejected(receiver_address).into());
        }

        ledger.transfer_from(asset, &self.address, &receiver_address, &self.address, repayment)?;
        ledger.emit(LedgerEvent::FlashLoan {
            lender: self.address,
            receiver: receiver_address,
            initiator: *initiator,
            asset: *asset,
            amount,
            fee,
        });
        Ok(())
    }
}
