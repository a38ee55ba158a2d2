//! Lending domain - flash loan protocol and a reference lender

mod flash_lender;
mod pool_lender;

pub use flash_lender::{callback_success, FlashLender, FlashLoanReceiver, Loan};
pub use pool_lender::PoolLender;
