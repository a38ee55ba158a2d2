//! Transactional boundary around the ledger

use tracing::{debug, warn};

use super::ledger::Ledger;
use crate::shared::errors::ExecutionResult;

/// Execution environment that runs closures as indivisible units.
///
/// The engine cannot roll back its own effects; whoever submits an attempt does so
/// through [`Runtime::execute`], which reverts every journaled ledger change when the
/// closure returns an error.
#[derive(Debug, Default)]
pub struct Runtime {
    ledger: Ledger,
}

impl Runtime {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// Run `f` as one unit of execution: either all of its effects persist or none do.
    pub fn execute<T, F>(&mut self, label: &str, f: F) -> ExecutionResult<T>
    where
        F: FnOnce(&mut Ledger) -> ExecutionResult<T>,
    {
        let checkpoint = self.ledger.checkpoint();
        match f(&mut self.ledger) {
            Ok(value) => {
                let emitted = self.ledger.events_since(&checkpoint).len();
                self.ledger.commit(checkpoint);
                debug!(unit = label, events = emitted, "unit of execution committed");
                Ok(value)
            }
            Err(err) => {
                self.ledger.revert_to(checkpoint);
                warn!(unit = label, error = %err, "unit of execution reverted");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::errors::ExecutionError;
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn execute_commits_on_success() {
        let token = Pubkey::new_unique();
        let (alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut runtime = Runtime::new(Ledger::new(0));
        runtime.ledger_mut().mint(&token, &alice, 10).unwrap();

        let moved = runtime
            .execute("transfer", |ledger| {
                ledger.transfer(&token, &alice, &bob, 4)?;
                Ok(4)
            })
            .unwrap();

        assert_eq!(moved, 4);
        assert_eq!(runtime.ledger().balance_of(&token, &bob), 4);
    }

    #[test]
    fn execute_reverts_everything_on_failure() {
        let token = Pubkey::new_unique();
        let (alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut runtime = Runtime::new(Ledger::new(0));
        runtime.ledger_mut().mint(&token, &alice, 10).unwrap();

        let result: ExecutionResult<()> = runtime.execute("failing", |ledger| {
            ledger.transfer(&token, &alice, &bob, 4)?;
            ledger.approve(&token, &bob, &alice, 4)?;
            Err(ExecutionError::ArithmeticOverflow)
        });

        assert_eq!(result, Err(ExecutionError::ArithmeticOverflow));
        assert_eq!(runtime.ledger().balance_of(&token, &alice), 10);
        assert_eq!(runtime.ledger().balance_of(&token, &bob), 0);
        assert_eq!(runtime.ledger().allowance(&token, &bob, &alice), 0);
        assert!(runtime.ledger().events().is_empty());
    }
}
