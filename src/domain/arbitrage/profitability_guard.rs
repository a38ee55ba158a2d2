//! Pre-flight simulation of both hops

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use super::ArbitrageParams;
use crate::domain::dex::Venue;
use crate::domain::execution::Ledger;
use crate::shared::errors::{ExecutionError, ExecutionResult, VenueError};

/// Simulated output of both hops against current venue state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitabilityQuote {
    pub swap_token_out: u64,
    pub borrowed_token_out: u64,
}

fn last_amount(amounts: &[u64]) -> ExecutionResult<u64> {
    amounts
        .last()
        .copied()
        .ok_or_else(|| VenueError::InvalidPath(amounts.len()).into())
}

/// Quote `amount` of `borrowed_token` through `first` then back through `second` and
/// reject the attempt if the result misses the hop-two floor.
///
/// Read-only and advisory: prices can move before the real swaps, whose floors are the
/// binding guarantee.
pub fn check_profitability(
    ledger: &Ledger,
    first: &dyn Venue,
    second: &dyn Venue,
    borrowed_token: &Pubkey,
    amount: u64,
    params: &ArbitrageParams,
) -> ExecutionResult<ProfitabilityQuote> {
    let swap_token_out = last_amount(&first.quote(ledger, amount, &[*borrowed_token, params.swap_token])?)?;
    let borrowed_token_out =
        last_amount(&second.quote(ledger, swap_token_out, &[params.swap_token, *borrowed_token])?)?;
    debug!(amount, swap_token_out, borrowed_token_out, "simulated both hops");

    if borrowed_token_out < params.min_amount_borrowed_token {
        return Err(ExecutionError::AmountOutTooLow {
            quoted: borrowed_token_out,
            minimum: params.min_amount_borrowed_token,
        });
    }
    Ok(ProfitabilityQuote {
        swap_token_out,
        borrowed_token_out,
    })
}
