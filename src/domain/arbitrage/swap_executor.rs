//! Single-hop swap against one venue

use solana_sdk::clock::UnixTimestamp;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::domain::dex::Venue;
use crate::domain::execution::Ledger;
use crate::shared::errors::{ExecutionResult, VenueError};

/// One hop of the round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapLeg {
    pub token_in: Pubkey,
    pub token_out: Pubkey,
    pub amount_in: u64,
    pub min_amount_out: u64,
    pub deadline: UnixTimestamp,
}

/// Authorize `venue` for exactly `leg.amount_in`, swap, and return the realized output.
///
/// The approval overwrites whatever allowance the venue held before.
pub fn execute_swap(ledger: &mut Ledger, engine: &Pubkey, venue: &dyn Venue, leg: &SwapLeg) -> ExecutionResult<u64> {
    let spender = venue.address();
    ledger.approve(&leg.token_in, engine, &spender, leg.amount_in)?;

    let amounts = venue.swap(
        ledger,
        engine,
        leg.amount_in,
        leg.min_amount_out,
        &[leg.token_in, leg.token_out],
        engine,
        leg.deadline,
    )?;
    let amount_out = amounts
        .last()
        .copied()
        .ok_or(VenueError::InvalidPath(amounts.len()))?;

    debug!(
        venue = %spender,
        kind = venue.kind().as_str(),
        amount_in = leg.amount_in,
        amount_out,
        "swap filled"
    );
    Ok(amount_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dex::scripted::ScriptedVenue;
    use crate::shared::errors::ExecutionError;

    fn leg(token_in: Pubkey, token_out: Pubkey, amount_in: u64, min_amount_out: u64) -> SwapLeg {
        SwapLeg {
            token_in,
            token_out,
            amount_in,
            min_amount_out,
            deadline: 100,
        }
    }

    #[test]
    fn approval_is_exact_for_each_swap() {
        let (weth, usdc) = (Pubkey::new_unique(), Pubkey::new_unique());
        let engine = Pubkey::new_unique();
        let venue = ScriptedVenue::new().with_script(weth, usdc, 0, 500);
        let mut ledger = Ledger::new(0);
        ledger.mint(&weth, &engine, 1_000).unwrap();
        ledger.mint(&usdc, &venue.address(), 1_000).unwrap();
        ledger.approve(&weth, &engine, &venue.address(), 777).unwrap();

        execute_swap(&mut ledger, &engine, &venue, &leg(weth, usdc, 100, 0)).unwrap();
        execute_swap(&mut ledger, &engine, &venue, &leg(weth, usdc, 250, 0)).unwrap();

        assert_eq!(venue.observed_allowances(), vec![100, 250]);
        assert_eq!(ledger.allowance(&weth, &engine, &venue.address()), 0);
    }

    #[test]
    fn returns_realized_output_paid_to_engine() {
        let (weth, usdc) = (Pubkey::new_unique(), Pubkey::new_unique());
        let engine = Pubkey::new_unique();
        let venue = ScriptedVenue::new().with_script(weth, usdc, 1_200, 1_190);
        let mut ledger = Ledger::new(0);
        ledger.mint(&weth, &engine, 1_000).unwrap();
        ledger.mint(&usdc, &venue.address(), 5_000).unwrap();

        let out = execute_swap(&mut ledger, &engine, &venue, &leg(weth, usdc, 1_000, 1_180)).unwrap();

        assert_eq!(out, 1_190);
        assert_eq!(ledger.balance_of(&usdc, &engine), 1_190);
        assert_eq!(ledger.balance_of(&weth, &engine), 0);
    }

    #[test]
    fn venue_floor_is_enforced() {
        let (weth, usdc) = (Pubkey::new_unique(), Pubkey::new_unique());
        let engine = Pubkey::new_unique();
        let venue = ScriptedVenue::new().with_script(weth, usdc, 1_200, 1_190);
        let mut ledger = Ledger::new(0);
        ledger.mint(&weth, &engine, 1_000).unwrap();
        ledger.mint(&usdc, &venue.address(), 5_000).unwrap();

        let err = execute_swap(&mut ledger, &engine, &venue, &leg(weth, usdc, 1_000, 1_191)).unwrap_err();

        assert_eq!(
            err,
            ExecutionError::SlippageExceeded {
                amount_out: 1_190,
                amount_out_min: 1_191
            }
        );
    }
}
