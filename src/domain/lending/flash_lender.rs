//! Flash loan protocol between a lending facility and a borrower

use solana_sdk::hash::{hash, Hash};
use solana_sdk::pubkey::Pubkey;

use crate::domain::execution::Ledger;
use crate::shared::errors::{ExecutionError, ExecutionResult};

/// Value a receiver returns from its callback to accept the loan.
pub fn callback_success() -> Hash {
    hash(b"FlashLoanReceiver.executeOperation")
}

/// A loan as seen by the borrower during the callback window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loan {
    pub lender: Pubkey,
    pub asset: Pubkey,
    pub amount: u64,
    pub fee: u64,
    pub initiator: Pubkey,
}

impl Loan {
    /// Principal plus fee
    pub fn repayment(&self) -> ExecutionResult<u64> {
        self.amount
            .checked_add(self.fee)
            .ok_or(ExecutionError::ArithmeticOverflow)
    }
}

/// Borrower side of the protocol
pub trait FlashLoanReceiver: Send + Sync {
    fn address(&self) -> Pubkey;

    /// Called by the lender after `amount` of `asset` was transferred to the receiver.
    ///
    /// Before returning [`callback_success`] the receiver must have approved the
    /// lender for at least `amount + fee`.
    #[allow(clippy::too_many_arguments)]
    fn execute_operation(
        &self,
        ledger: &mut Ledger,
        caller: &Pubkey,
        asset: &Pubkey,
        amount: u64,
        fee: u64,
        initiator: &Pubkey,
        payload: &[u8],
    ) -> ExecutionResult<Hash>;
}

/// Lender side of the protocol
pub trait FlashLender: Send + Sync {
    fn address(&self) -> Pubkey;

    /// Fee charged for borrowing `amount` of `asset`
    fn flash_fee(&self, asset: &Pubkey, amount: u64) -> ExecutionResult<u64>;

    /// Lend `amount` of `asset` to `receiver` for the duration of its callback and pull
    /// back `amount + fee` afterwards. `initiator` is whoever requested the loan.
    fn flash_loan(
        &self,
        ledger: &mut Ledger,
        initiator: &Pubkey,
        receiver: &dyn FlashLoanReceiver,
        asset: &Pubkey,
        amount: u64,
        payload: &[u8],
    ) -> ExecutionResult<()>;
}
