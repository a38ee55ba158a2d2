//! Arbitrage engine - flash loan funded round trip between two venues

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info};

use super::profitability_guard::{check_profitability, ProfitabilityQuote};
use super::settlement::settle;
use super::swap_executor::{execute_swap, SwapLeg};
use super::trust_gate::{verify_callback, verify_in_flight, InFlightLoan};
use super::{select_route, ArbitrageParams, Direction};
use crate::domain::dex::Venue;
use crate::domain::execution::Ledger;
use crate::domain::lending::{callback_success, FlashLender, FlashLoanReceiver, Loan};
use crate::shared::errors::ExecutionResult;

/// Borrows one asset, trades it through one venue and back through the other, repays
/// the lender and forwards the surplus.
///
/// The engine holds no funds between attempts beyond the `amount_required` surplus it
/// keeps on each success. Atomicity comes from the caller running [`FlashArbitrage::arbitrage`]
/// inside a [`Runtime`](crate::domain::execution::Runtime) unit.
///
/// A callback is only honoured while a loan requested by [`FlashArbitrage::arbitrage`] is
/// outstanding, and at most once per loan.
pub struct FlashArbitrage {
    address: Pubkey,
    lender: Arc<dyn FlashLender>,
    first_venue: Arc<dyn Venue>,
    second_venue: Arc<dyn Venue>,
    in_flight: Mutex<Option<InFlightLoan>>,
}

impl FlashArbitrage {
    pub fn new(
        address: Pubkey,
        lender: Arc<dyn FlashLender>,
        first_venue: Arc<dyn Venue>,
        second_venue: Arc<dyn Venue>,
    ) -> Self {
        Self {
            address,
            lender,
            first_venue,
            second_venue,
            in_flight: Mutex::new(None),
        }
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn lender(&self) -> &Arc<dyn FlashLender> {
        &self.lender
    }

    fn in_flight(&self) -> MutexGuard<'_, Option<InFlightLoan>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Venues in trading order for `direction`
    pub fn route(&self, direction: Direction) -> (&dyn Venue, &dyn Venue) {
        select_route(direction, self.first_venue.as_ref(), self.second_venue.as_ref())
    }

    /// Start an attempt: simulate, validate the floors, then request the loan.
    ///
    /// Nothing is borrowed when the simulation misses `min_amount_borrowed_token` or the
    /// floor cannot cover repayment plus `amount_required`.
    pub fn arbitrage(
        &self,
        ledger: &mut Ledger,
        borrowed_token: &Pubkey,
        amount: u64,
        params: &ArbitrageParams,
    ) -> ExecutionResult<ProfitabilityQuote> {
        let (first, second) = self.route(params.direction);
        let quote = check_profitability(ledger, first, second, borrowed_token, amount, params)?;

        let fee = self.lender.flash_fee(borrowed_token, amount)?;
        params.ensure_consistent(amount, fee)?;
        let payload = params.encode()?;

        info!(
            direction = %params.direction,
            amount,
            fee,
            expected_out = quote.borrowed_token_out,
            "requesting flash loan"
        );
        *self.in_flight() = Some(InFlightLoan {
            asset: *borrowed_token,
            amount,
        });
        let loan = self
            .lender
            .flash_loan(ledger, &self.address, self, borrowed_token, amount, &payload);
        // Cleared on both paths so a later callback cannot ride on this request
        self.in_flight().take();
        loan?;
        Ok(quote)
    }
}

impl FlashLoanReceiver for FlashArbitrage {
    fn address(&self) -> Pubkey {
        self.address
    }

    fn execute_operation(
        &self,
        ledger: &mut Ledger,
        caller: &Pubkey,
        asset: &Pubkey,
        amount: u64,
        fee: u64,
        initiator: &Pubkey,
        payload: &[u8],
    ) -> ExecutionResult<Hash> {
        verify_callback(caller, initiator, &self.lender.address(), &self.address)?;
        let in_flight = self.in_flight().take();
        verify_in_flight(in_flight, asset, amount, initiator, &self.address)?;
        let params = ArbitrageParams::decode(payload)?;
        // The actual fee may differ from the one checked before the loan
        params.ensure_consistent(amount, fee)?;

        let (first, second) = self.route(params.direction);
        let swapped = execute_swap(
            ledger,
            &self.address,
            first,
            &SwapLeg {
                token_in: *asset,
                token_out: params.swap_token,
                amount_in: amount,
                min_amount_out: params.min_amount_swap_token,
                deadline: params.deadline,
            },
        )?;
        let received = execute_swap(
            ledger,
            &self.address,
            second,
            &SwapLeg {
                token_in: params.swap_token,
                token_out: *asset,
                amount_in: swapped,
                min_amount_out: params.min_amount_borrowed_token,
                deadline: params.deadline,
            },
        )?;
        debug!(amount, swapped, received, "round trip complete");

        let loan = Loan {
            lender: *caller,
            asset: *asset,
            amount,
            fee,
            initiator: *initiator,
        };
        settle(
            ledger,
            &self.address,
            &loan,
            received,
            params.amount_required,
            &params.profit_receiver,
        )?;
        Ok(callback_success())
    }
}
