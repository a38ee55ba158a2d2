//! Journaled token ledger backing every capability the engine talks to.
//!
//! All balances and allowances live here. Each mutation pushes an undo record so a
//! checkpoint can be rolled back exactly, which is what gives a [`Runtime`] unit of
//! execution its all-or-nothing behaviour.
//!
//! [`Runtime`]: super::Runtime

use std::collections::HashMap;

use solana_sdk::clock::UnixTimestamp;
use solana_sdk::pubkey::Pubkey;
use tracing::trace;

use super::events::LedgerEvent;
use crate::shared::errors::{ExecutionResult, TokenError};

type BalanceKey = (Pubkey, Pubkey);
type AllowanceKey = (Pubkey, Pubkey, Pubkey);

#[derive(Debug, Clone)]
enum JournalEntry {
    Balance {
        key: BalanceKey,
        previous: Option<u64>,
    },
    Allowance {
        key: AllowanceKey,
        previous: Option<u64>,
    },
}

/// Marker returned by [`Ledger::checkpoint`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    journal_len: usize,
    events_len: usize,
    depth: usize,
}

#[derive(Debug, Default)]
pub struct Ledger {
    balances: HashMap<BalanceKey, u64>,
    allowances: HashMap<AllowanceKey, u64>,
    events: Vec<LedgerEvent>,
    journal: Vec<JournalEntry>,
    depth: usize,
    clock: UnixTimestamp,
}

impl Ledger {
    pub fn new(clock: UnixTimestamp) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    // === Clock ===

    /// Current time of the execution environment
    pub fn now(&self) -> UnixTimestamp {
        self.clock
    }

    pub fn set_clock(&mut self, clock: UnixTimestamp) {
        self.clock = clock;
    }

    pub fn advance_clock(&mut self, seconds: i64) {
        self.clock = self.clock.saturating_add(seconds);
    }

    // === Token capability ===

    pub fn balance_of(&self, token: &Pubkey, owner: &Pubkey) -> u64 {
        self.balances.get(&(*token, *owner)).copied().unwrap_or(0)
    }

    pub fn allowance(&self, token: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> u64 {
        self.allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Create `amount` of `token` out of thin air. Only used to seed state.
    pub fn mint(&mut self, token: &Pubkey, to: &Pubkey, amount: u64) -> ExecutionResult<()> {
        let balance = self.balance_of(token, to);
        let updated = balance.checked_add(amount).ok_or(TokenError::BalanceOverflow {
            token: *token,
            owner: *to,
        })?;
        self.write_balance(*token, *to, updated);
        Ok(())
    }

    /// Set the allowance of `spender` over `owner`'s tokens to exactly `amount`.
    pub fn approve(
        &mut self,
        token: &Pubkey,
        owner: &Pubkey,
        spender: &Pubkey,
        amount: u64,
    ) -> ExecutionResult<()> {
        self.write_allowance(*token, *owner, *spender, amount);
        self.emit(LedgerEvent::Approval {
            token: *token,
            owner: *owner,
            spender: *spender,
            amount,
        });
        Ok(())
    }

    pub fn transfer(
        &mut self,
        token: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> ExecutionResult<()> {
        let from_balance = self.balance_of(token, from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance {
                token: *token,
                owner: *from,
                required: amount,
                available: from_balance,
            }
            .into());
        }
        if from != to {
            let to_balance = self.balance_of(token, to);
            let credited = to_balance.checked_add(amount).ok_or(TokenError::BalanceOverflow {
                token: *token,
                owner: *to,
            })?;
            self.write_balance(*token, *from, from_balance - amount);
            self.write_balance(*token, *to, credited);
        }
        self.emit(LedgerEvent::Transfer {
            token: *token,
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    pub fn transfer_from(
        &mut self,
        token: &Pubkey,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> ExecutionResult<()> {
        let allowed = self.allowance(token, from, spender);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                token: *token,
                owner: *from,
                spender: *spender,
                required: amount,
                available: allowed,
            }
            .into());
        }
        self.transfer(token, from, to, amount)?;
        self.write_allowance(*token, *from, *spender, allowed - amount);
        Ok(())
    }

    // === Events ===

    pub fn emit(&mut self, event: LedgerEvent) {
        trace!(event = event.name(), "ledger event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Events recorded since `checkpoint` was taken
    pub fn events_since(&self, checkpoint: &Checkpoint) -> &[LedgerEvent] {
        &self.events[checkpoint.events_len.min(self.events.len())..]
    }

    // === Journal ===

    pub fn checkpoint(&mut self) -> Checkpoint {
        self.depth += 1;
        Checkpoint {
            journal_len: self.journal.len(),
            events_len: self.events.len(),
            depth: self.depth,
        }
    }

    /// Keep everything done since `checkpoint`. Undo records are only dropped once the
    /// outermost checkpoint commits, so an enclosing checkpoint can still revert.
    pub fn commit(&mut self, checkpoint: Checkpoint) {
        debug_assert_eq!(checkpoint.depth, self.depth, "checkpoints must close in order");
        self.depth = checkpoint.depth - 1;
        if self.depth == 0 {
            self.journal.clear();
        }
    }

    /// Undo every balance, allowance and event change made since `checkpoint`.
    pub fn revert_to(&mut self, checkpoint: Checkpoint) {
        debug_assert_eq!(checkpoint.depth, self.depth, "checkpoints must close in order");
        while self.journal.len() > checkpoint.journal_len {
            match self.journal.pop() {
                Some(JournalEntry::Balance { key, previous }) => match previous {
                    Some(value) => {
                        self.balances.insert(key, value);
                    }
                    None => {
                        self.balances.remove(&key);
                    }
                },
                Some(JournalEntry::Allowance { key, previous }) => match previous {
                    Some(value) => {
                        self.allowances.insert(key, value);
                    }
                    None => {
                        self.allowances.remove(&key);
                    }
                },
                None => break,
            }
        }
        self.events.truncate(checkpoint.events_len);
        self.depth = checkpoint.depth - 1;
    }

    fn write_balance(&mut self, token: Pubkey, owner: Pubkey, value: u64) {
        let key = (token, owner);
        let previous = self.balances.insert(key, value);
        if self.depth > 0 {
            self.journal.push(JournalEntry::Balance { key, previous });
        }
    }

    fn write_allowance(&mut self, token: Pubkey, owner: Pubkey, spender: Pubkey, value: u64) {
        let key = (token, owner, spender);
        let previous = self.allowances.insert(key, value);
        if self.depth > 0 {
            self.journal.push(JournalEntry::Allowance { key, previous });
        }
    }
}
