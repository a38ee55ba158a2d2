//! Domain layer - core business logic

pub mod arbitrage;
pub mod dex;
pub mod execution;
pub mod lending;
