//! flasharb - atomic two-venue flash loan arbitrage
//! Built with Domain-Driven Design principles
//!
//! The engine borrows an asset from a flash lender, sells it on one venue, buys it back on
//! another and repays the loan inside a single unit of execution. Any failed check unwinds
//! every effect of the attempt.

pub mod app;
pub mod config;
pub mod domain;
pub mod math;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use domain::arbitrage::{ArbitrageParams, Direction, FlashArbitrage};
pub use domain::dex::Venue;
pub use domain::execution::{Ledger, Runtime};
pub use domain::lending::{FlashLender, FlashLoanReceiver};
