//! Callback authentication

use solana_sdk::pubkey::Pubkey;

use crate::shared::errors::{ExecutionError, ExecutionResult};

/// Accept a loan callback only from the configured lender, for a loan the engine
/// itself requested.
pub fn verify_callback(
    caller: &Pubkey,
    initiator: &Pubkey,
    trusted_lender: &Pubkey,
    engine: &Pubkey,
) -> ExecutionResult<()> {
    if caller != trusted_lender {
        return Err(ExecutionError::UntrustedLender {
            caller: *caller,
            expected: *trusted_lender,
        });
    }
    if initiator != engine {
        return Err(ExecutionError::UntrustedInitiator {
            initiator: *initiator,
            expected: *engine,
        });
    }
    Ok(())
}

/// A loan the engine has requested and whose callback has not run yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlightLoan {
    pub asset: Pubkey,
    pub amount: u64,
}

/// The initiator a lender reports is whatever its caller claimed, so a callback is only
/// honoured while the engine itself has a matching loan outstanding.
pub fn verify_in_flight(
    in_flight: Option<InFlightLoan>,
    asset: &Pubkey,
    amount: u64,
    initiator: &Pubkey,
    engine: &Pubkey,
) -> ExecutionResult<()> {
    match in_flight {
        Some(loan) if loan.asset == *asset && loan.amount == amount => Ok(()),
        _ => Err(ExecutionError::UntrustedInitiator {
            initiator: *initiator,
            expected: *engine,
        }),
    }
}
