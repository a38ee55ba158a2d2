//! Execution domain - ledger state and the unit-of-execution boundary

mod events;
mod ledger;
mod runtime;

pub use events::LedgerEvent;
pub use ledger::{Checkpoint, Ledger};
pub use runtime::Runtime;
