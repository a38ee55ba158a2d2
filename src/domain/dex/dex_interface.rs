//! Venue interface trait

use solana_sdk::clock::UnixTimestamp;
use solana_sdk::pubkey::Pubkey;

use super::VenueKind;
use crate::domain::execution::Ledger;
use crate::shared::errors::{ExecutionError, ExecutionResult, VenueError};

/// Common interface for all trading venues.
///
/// The engine relies on nothing beyond this trait: a read-only quote and a
/// state-mutating swap, both along an ordered token path.
pub trait Venue: Send + Sync {
    /// Address of the venue, used as the spender of the caller's allowance
    fn address(&self) -> Pubkey;

    fn kind(&self) -> VenueKind;

    /// Amounts along `path` for `amount_in` of `path[0]`, one entry per token.
    fn quote(&self, ledger: &Ledger, amount_in: u64, path: &[Pubkey]) -> ExecutionResult<Vec<u64>>;

    /// Swap exactly `amount_in` of `path[0]` pulled from `sender` for the last token of
    /// `path`, paid to `recipient`.
    ///
    /// Fails with `DeadlineExpired` when the ledger clock is past `deadline` and with
    /// `SlippageExceeded` when the realized output is below `amount_out_min`.
    #[allow(clippy::too_many_arguments)]
    fn swap(
        &self,
        ledger: &mut Ledger,
        sender: &Pubkey,
        amount_in: u64,
        amount_out_min: u64,
        path: &[Pubkey],
        recipient: &Pubkey,
        deadline: UnixTimestamp,
    ) -> ExecutionResult<Vec<u64>>;
}

pub(crate) fn ensure_deadline(ledger: &Ledger, deadline: UnixTimestamp) -> ExecutionResult<()> {
    let now = ledger.now();
    if now > deadline {
        return Err(ExecutionError::DeadlineExpired { deadline, now });
    }
    Ok(())
}

pub(crate) fn ensure_min_out(amounts: &[u64], amount_out_min: u64) -> ExecutionResult<u64> {
    let amount_out = *amounts
        .last()
        .ok_or(VenueError::InvalidPath(amounts.len()))?;
    if amount_out < amount_out_min {
        return Err(ExecutionError::SlippageExceeded {
            amount_out,
            amount_out_min,
        });
    }
    Ok(amount_out)
}

pub(crate) fn ensure_path(path: &[Pubkey], max_len: usize) -> ExecutionResult<()> {
    if path.len() < 2 || path.len() > max_len {
        return Err(VenueError::InvalidPath(path.len()).into());
    }
    Ok(())
}
