//! Loan repayment and profit distribution

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::domain::execution::{Ledger, LedgerEvent};
use crate::domain::lending::Loan;
use crate::shared::errors::{ExecutionError, ExecutionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub repay: u64,
    pub profit: u64,
}

/// Pay out profit and authorize the lender to pull back principal plus fee.
///
/// `received` is what hop two returned. Everything above repayment and
/// `amount_required` goes to `profit_receiver`; `amount_required` stays with the engine.
pub fn settle(
    ledger: &mut Ledger,
    engine: &Pubkey,
    loan: &Loan,
    received: u64,
    amount_required: u64,
    profit_receiver: &Pubkey,
) -> ExecutionResult<SettlementOutcome> {
    let repay = loan.repayment()?;
    let required = repay
        .checked_add(amount_required)
        .ok_or(ExecutionError::ArithmeticOverflow)?;
    if received < required {
        return Err(ExecutionError::InsufficientProceeds { received, required });
    }
    let profit = received - required;

    if profit > 0 {
        ledger.transfer(&loan.asset, engine, profit_receiver, profit)?;
    }
    ledger.approve(&loan.asset, engine, &loan.lender, repay)?;
    ledger.emit(LedgerEvent::Settlement {
        engine: *engine,
        asset: loan.asset,
        profit_receiver: *profit_receiver,
        profit,
        repay,
    });
    info!(profit, repay, retained = amount_required, "arbitrage settled");

    Ok(SettlementOutcome { repay, profit })
}
