//! Arbitrage domain - the flash loan funded two-venue round trip

mod arbitrage_engine;
mod arbitrage_params;
mod arbitrage_route;
mod profitability_guard;
mod settlement;
mod swap_executor;
mod trust_gate;

pub use arbitrage_engine::FlashArbitrage;
pub use arbitrage_params::{ArbitrageParams, Direction};
pub use arbitrage_route::select_route;
pub use profitability_guard::{check_profitability, ProfitabilityQuote};
pub use settlement::{settle, SettlementOutcome};
pub use swap_executor::{execute_swap, SwapLeg};
pub use trust_gate::{verify_callback, verify_in_flight, InFlightLoan};
