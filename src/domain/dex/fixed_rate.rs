//! Inventory-backed market maker quoting fixed rates

use std::collections::HashMap;

use solana_sdk::clock::UnixTimestamp;
use solana_sdk::pubkey::Pubkey;

use super::dex_interface::{ensure_deadline, ensure_min_out, ensure_path, Venue};
use super::VenueKind;
use crate::domain::execution::{Ledger, LedgerEvent};
use crate::math::fixed_rate_amount_out;
use crate::shared::errors::{ExecutionResult, VenueError};

/// Rate for one direction: `amount_out = amount_in * numerator / denominator`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rate {
    numerator: u64,
    denominator: u64,
}

/// Quotes single-hop swaps at configured rates and pays out of its own balance.
#[derive(Debug, Clone)]
pub struct FixedRateVenue {
    address: Pubkey,
    fee_bps: u32,
    rates: HashMap<(Pubkey, Pubkey), Rate>,
}

impl FixedRateVenue {
    pub fn new(address: Pubkey, fee_bps: u32) -> Self {
        Self {
            address,
            fee_bps,
            rates: HashMap::new(),
        }
    }

    pub fn set_rate(&mut self, token_in: Pubkey, token_out: Pubkey, numerator: u64, denominator: u64) {
        self.rates.insert(
            (token_in, token_out),
            Rate {
                numerator,
                denominator,
            },
        );
    }

    fn rate(&self, token_in: &Pubkey, token_out: &Pubkey) -> Option<Rate> {
        self.rates.get(&(*token_in, *token_out)).copied()
    }

    fn amount_out(&self, ledger: &Ledger, amount_in: u64, path: &[Pubkey]) -> ExecutionResult<Vec<u64>> {
        ensure_path(path, 2)?;
        let (token_in, token_out) = (path[0], path[1]);
        let rate = self.rate(&token_in, &token_out).ok_or(VenueError::PairNotFound {
            token_in,
            token_out,
        })?;
        let amount_out = fixed_rate_amount_out(amount_in, rate.numerator, rate.denominator, self.fee_bps)?;
        if ledger.balance_of(&token_out, &self.address) < amount_out {
            return Err(VenueError::InsufficientLiquidity.into());
        }
        Ok(vec![amount_in, amount_out])
    }
}

impl Venue for FixedRateVenue {
    fn address(&self) -> Pubkey {
        self.address
    }

    fn kind(&self) -> VenueKind {
        VenueKind::FixedRate
    }

    fn quote(&self, ledger: &Ledger, amount_in: u64, path: &[Pubkey]) -> ExecutionResult<Vec<u64>> {
        self.amount_out(ledger, amount_in, path)
    }

    fn swap(
        &self,
        ledger: &mut Ledger,
        sender: &Pubkey,
        amount_in: u64,
        amount_out_min: u64,
        path: &[Pubkey],
        recipient: &Pubkey,
        deadline: UnixTimestamp,
    ) -> ExecutionResult<Vec<u64>> {
        ensure_deadline(ledger, deadline)?;
        let amounts = self.amount_out(ledger, amount_in, path)?;
        let amount_out = ensure_min_out(&amounts, amount_out_min)?;

        ledger.transfer_from(&path[0], &self.address, sender, &self.address, amount_in)?;
        ledger.transfer(&path[1], &self.address, recipient, amount_out)?;

        ledger.emit(LedgerEvent::Swap {
            venue: self.address,
            sender: *sender,
            token_in: path[0],
            token_out: path[1],
            amount_in,
            amount_out,
            recipient: *recipient,
        });
        Ok(amounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::errors::ExecutionError;

    #[test]
    fn swaps_at_configured_rate() {
        let mut ledger = Ledger::new(0);
        let (sol, usdc, trader) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let mut venue = FixedRateVenue::new(Pubkey::new_unique(), 10);
        venue.set_rate(usdc, sol, 1, 2);
        ledger.mint(&sol, &venue.address(), 10_000).unwrap();
        ledger.mint(&usdc, &trader, 2_000).unwrap();
        ledger.approve(&usdc, &trader, &venue.address(), 2_000).unwrap();

        let amounts = venue
            .swap(&mut ledger, &trader, 2_000, 999, &[usdc, sol], &trader, 0)
            .unwrap();

        assert_eq!(amounts, vec![2_000, 999]);
        assert_eq!(ledger.balance_of(&sol, &trader), 999);
        assert_eq!(ledger.balance_of(&usdc, &venue.address()), 2_000);
    }

    #[test]
    fn quote_fails_without_inventory() {
        let ledger = Ledger::new(0);
        let (sol, usdc) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut venue = FixedRateVenue::new(Pubkey::new_unique(), 0);
        venue.set_rate(usdc, sol, 1, 2);

        assert_eq!(
            venue.quote(&ledger, 100, &[usdc, sol]),
            Err(ExecutionError::Venue(VenueError::InsufficientLiquidity))
        );
    }

    #[test]
    fn rates_are_directional() {
        let ledger = Ledger::new(0);
        let (sol, usdc) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut venue = FixedRateVenue::new(Pubkey::new_unique(), 0);
        venue.set_rate(usdc, sol, 1, 2);

        assert!(matches!(
            venue.quote(&ledger, 100, &[sol, usdc]),
            Err(ExecutionError::Venue(VenueError::PairNotFound { .. }))
        ));
    }
}
