//! Test venue that quotes and fills exact, pre-scripted amounts

use std::collections::HashMap;
use std::sync::Mutex;

use solana_sdk::clock::UnixTimestamp;
use solana_sdk::pubkey::Pubkey;

use super::dex_interface::{ensure_deadline, ensure_min_out, ensure_path, Venue};
use super::VenueKind;
use crate::domain::execution::{Ledger, LedgerEvent};
use crate::shared::errors::{ExecutionResult, VenueError};

#[derive(Debug, Clone, Copy)]
struct Script {
    quoted: u64,
    filled: u64,
}

/// Quotes `quoted` and fills `filled` for a directed pair regardless of the input size,
/// paying out of its own balance. Records the allowance it saw on every swap.
#[derive(Debug)]
pub struct ScriptedVenue {
    address: Pubkey,
    scripts: HashMap<(Pubkey, Pubkey), Script>,
    observed_allowances: Mutex<Vec<u64>>,
}

impl ScriptedVenue {
    pub fn new() -> Self {
        Self {
            address: Pubkey::new_unique(),
            scripts: HashMap::new(),
            observed_allowances: Mutex::new(Vec::new()),
        }
    }

    pub fn with_script(mut self, token_in: Pubkey, token_out: Pubkey, quoted: u64, filled: u64) -> Self {
        self.scripts.insert((token_in, token_out), Script { quoted, filled });
        self
    }

    pub fn observed_allowances(&self) -> Vec<u64> {
        self.observed_allowances.lock().unwrap().clone()
    }

    fn script(&self, path: &[Pubkey]) -> ExecutionResult<Script> {
        ensure_path(path, 2)?;
        self.scripts
            .get(&(path[0], path[1]))
            .copied()
            .ok_or_else(|| {
                VenueError::PairNotFound {
                    token_in: path[0],
                    token_out: path[1],
                }
                .into()
            })
    }
}

impl Venue for ScriptedVenue {
    fn address(&self) -> Pubkey {
        self.address
    }

    fn kind(&self) -> VenueKind {
        VenueKind::Scripted
    }

    fn quote(&self, _ledger: &Ledger, amount_in: u64, path: &[Pubkey]) -> ExecutionResult<Vec<u64>> {
        Ok(vec![amount_in, self.script(path)?.quoted])
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
        let script = self.script(path)?;
        self.observed_allowances
            .lock()
            .unwrap()
            .push(ledger.allowance(&path[0], sender, &self.address));
        let amounts = vec![amount_in, script.filled];
        ensure_min_out(&amounts, amount_out_min)?;

        ledger.transfer_from(&path[0], &self.address, sender, &self.address, amount_in)?;
        ledger.transfer(&path[1], &self.address, recipient, script.filled)?;
        ledger.emit(LedgerEvent::Swap {
            venue: self.address,
            sender: *sender,
            token_in: path[0],
            token_out: path[1],
            amount_in,
            amount_out: script.filled,
            recipient: *recipient,
        });
        Ok(amounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_its_own_kind() {
        assert_eq!(ScriptedVenue::new().kind(), VenueKind::Scripted);
    }
}
