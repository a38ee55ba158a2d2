//! Constant product (x * y = k) router

use std::collections::HashMap;

use solana_sdk::clock::UnixTimestamp;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use super::dex_interface::{ensure_deadline, ensure_min_out, ensure_path, Venue};
use super::VenueKind;
use crate::domain::execution::{Ledger, LedgerEvent};
use crate::math::get_amount_out;
use crate::shared::errors::{ExecutionResult, VenueError};

const POOL_SEED: &[u8] = b"pool";
const MAX_PATH_LEN: usize = 4;

/// Router over constant product pairs.
///
/// Pair reserves are simply the ledger balances held by the pair's pool address, so
/// every swap is visible to (and reverted with) the ledger journal.
#[derive(Debug, Clone)]
pub struct ConstantProductVenue {
    address: Pubkey,
    fee_bps: u32,
    pairs: HashMap<(Pubkey, Pubkey), Pubkey>,
}

fn sort_tokens(a: Pubkey, b: Pubkey) -> (Pubkey, Pubkey) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl ConstantProductVenue {
    pub fn new(address: Pubkey, fee_bps: u32) -> Self {
        Self {
            address,
            fee_bps,
            pairs: HashMap::new(),
        }
    }

    /// Deterministic pool address for a token pair, independent of argument order
    pub fn pair_address(&self, token_a: &Pubkey, token_b: &Pubkey) -> Pubkey {
        let (lo, hi) = sort_tokens(*token_a, *token_b);
        Pubkey::find_program_address(&[POOL_SEED, lo.as_ref(), hi.as_ref()], &self.address).0
    }

    /// Register a pair. Returns the pool address.
    pub fn create_pair(&mut self, token_a: Pubkey, token_b: Pubkey) -> Pubkey {
        let pool = self.pair_address(&token_a, &token_b);
        self.pairs.insert(sort_tokens(token_a, token_b), pool);
        pool
    }

    pub fn pool(&self, token_a: &Pubkey, token_b: &Pubkey) -> Option<Pubkey> {
        self.pairs.get(&sort_tokens(*token_a, *token_b)).copied()
    }

    /// Move liquidity from `provider` into the pair's pool
    pub fn add_liquidity(
        &self,
        ledger: &mut Ledger,
        provider: &Pubkey,
        token_a: &Pubkey,
        token_b: &Pubkey,
        amount_a: u64,
        amount_b: u64,
    ) -> ExecutionResult<()> {
        let pool = self.pool(token_a, token_b).ok_or(VenueError::PairNotFound {
            token_in: *token_a,
            token_out: *token_b,
        })?;
        ledger.transfer(token_a, provider, &pool, amount_a)?;
        ledger.transfer(token_b, provider, &pool, amount_b)?;
        debug!(%pool, amount_a, amount_b, "liquidity added");
        Ok(())
    }

    /// (pool, reserve_in, reserve_out) for a directed hop
    pub fn reserves(
        &self,
        ledger: &Ledger,
        token_in: &Pubkey,
        token_out: &Pubkey,
    ) -> ExecutionResult<(Pubkey, u64, u64)> {
        let pool = self.pool(token_in, token_out).ok_or(VenueError::PairNotFound {
            token_in: *token_in,
            token_out: *token_out,
        })?;
        Ok((
            pool,
            ledger.balance_of(token_in, &pool),
            ledger.balance_of(token_out, &pool),
        ))
    }

    fn amounts_out(&self, ledger: &Ledger, amount_in: u64, path: &[Pubkey]) -> ExecutionResult<(Vec<u64>, Vec<Pubkey>)> {
        ensure_path(path, MAX_PATH_LEN)?;
        let mut amounts = Vec::with_capacity(path.len());
        let mut pools = Vec::with_capacity(path.len() - 1);
        amounts.push(amount_in);
        for hop in path.windows(2) {
            let (pool, reserve_in, reserve_out) = self.reserves(ledger, &hop[0], &hop[1])?;
            // Amounts are priced against pre-swap reserves, so a pair may appear only once
            if pools.contains(&pool) {
                return Err(VenueError::InvalidPath(path.len()).into());
            }
            let previous = amounts[amounts.len() - 1];
            amounts.push(get_amount_out(previous, reserve_in, reserve_out, self.fee_bps)?);
            pools.push(pool);
        }
        Ok((amounts, pools))
    }
}

impl Venue for ConstantProductVenue {
    fn address(&self) -> Pubkey {
        self.address
    }

    fn kind(&self) -> VenueKind {
        VenueKind::ConstantProduct
    }

    fn quote(&self, ledger: &Ledger, amount_in: u64, path: &[Pubkey]) -> ExecutionResult<Vec<u64>> {
        self.amounts_out(ledger, amount_in, path).map(|(amounts, _)| amounts)
    }

    fn swap(
        &self,
        ledger: &mut Ledger,
        sender: &Pubkey,
        amount_in: u64,
        amount_out_min: u64,
        path: &[Pubkey],
        recipient: &Pubkey,
        deadline: UnixTimestamp,
    ) -> ExecutionResult<Vec<u64>> {
        ensure_deadline(ledger, deadline)?;
        let (amounts, pools) = self.amounts_out(ledger, amount_in, path)?;
        let amount_out = ensure_min_out(&amounts, amount_out_min)?;

        ledger.transfer_from(&path[0], &self.address, sender, &pools[0], amount_in)?;
        for (i, pool) in pools.iter().enumerate() {
            let to = pools.get(i + 1).unwrap_or(recipient);
            ledger.transfer(&path[i + 1], pool, to, amounts[i + 1])?;
        }

        ledger.emit(LedgerEvent::Swap {
            venue: self.address,
            sender: *sender,
            token_in: path[0],
            token_out: path[path.len() - 1],
            amount_in,
            amount_out,
            recipient: *recipient,
        });
        Ok(amounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::errors::{ExecutionError, TokenError};

    struct Fixture {
        ledger: Ledger,
        venue: ConstantProductVenue,
        sol: Pubkey,
        usdc: Pubkey,
        trader: Pubkey,
    }

    fn setup() -> Fixture {
        let mut ledger = Ledger::new(1_000);
        let (sol, usdc) = (Pubkey::new_unique(), Pubkey::new_unique());
        let (lp, trader) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut venue = ConstantProductVenue::new(Pubkey::new_unique(), 30);
        venue.create_pair(sol, usdc);
        ledger.mint(&sol, &lp, 100_000).unwrap();
        ledger.mint(&usdc, &lp, 100_000).unwrap();
        venue.add_liquidity(&mut ledger, &lp, &sol, &usdc, 100_000, 100_000).unwrap();
        ledger.mint(&sol, &trader, 5_000).unwrap();
        Fixture { ledger, venue, sol, usdc, trader }
    }

    #[test]
    fn pair_address_is_order_independent() {
        let f = setup();
        assert_eq!(f.venue.pair_address(&f.sol, &f.usdc), f.venue.pair_address(&f.usdc, &f.sol));
        assert_eq!(f.venue.pool(&f.usdc, &f.sol), Some(f.venue.pair_address(&f.sol, &f.usdc)));
    }

    #[test]
    fn quote_matches_swap() {
        let mut f = setup();
        let path = [f.sol, f.usdc];
        let quoted = f.venue.quote(&f.ledger, 1_000, &path).unwrap();
        assert_eq!(quoted, vec![1_000, 987]);

        let venue_address = f.venue.address();
        f.ledger.approve(&f.sol, &f.trader, &venue_address, 1_000).unwrap();
        let realized = f
            .venue
            .swap(&mut f.ledger, &f.trader, 1_000, 980, &path, &f.trader, 1_000)
            .unwrap();

        assert_eq!(realized, quoted);
        assert_eq!(f.ledger.balance_of(&f.usdc, &f.trader), 987);
        assert_eq!(f.ledger.balance_of(&f.sol, &f.trader), 4_000);
        assert_eq!(f.ledger.allowance(&f.sol, &f.trader, &venue_address), 0);
        let (_, reserve_sol, reserve_usdc) = f.venue.reserves(&f.ledger, &f.sol, &f.usdc).unwrap();
        assert_eq!((reserve_sol, reserve_usdc), (101_000, 99_013));
    }

    #[test]
    fn swap_enforces_floor() {
        let mut f = setup();
        let venue_address = f.venue.address();
        f.ledger.approve(&f.sol, &f.trader, &venue_address, 1_000).unwrap();

        let err = f
            .venue
            .swap(&mut f.ledger, &f.trader, 1_000, 988, &[f.sol, f.usdc], &f.trader, 1_000)
            .unwrap_err();

        assert_eq!(
            err,
            ExecutionError::SlippageExceeded {
                amount_out: 987,
                amount_out_min: 988
            }
        );
    }

    #[test]
    fn swap_enforces_deadline_against_ledger_clock() {
        let mut f = setup();
        let venue_address = f.venue.address();
        f.ledger.approve(&f.sol, &f.trader, &venue_address, 1_000).unwrap();
        f.ledger.advance_clock(1);

        let err = f
            .venue
            .swap(&mut f.ledger, &f.trader, 1_000, 0, &[f.sol, f.usdc], &f.trader, 1_000)
            .unwrap_err();

        assert_eq!(
            err,
            ExecutionError::DeadlineExpired {
                deadline: 1_000,
                now: 1_001
            }
        );
    }

    #[test]
    fn swap_requires_allowance() {
        let mut f = setup();
        let err = f
            .venue
            .swap(&mut f.ledger, &f.trader, 1_000, 0, &[f.sol, f.usdc], &f.trader, 1_000)
            .unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::Token(TokenError::InsufficientAllowance { .. })
        ));
    }

    #[test]
    fn unknown_pair_and_bad_path_are_rejected() {
        let f = setup();
        let stranger = Pubkey::new_unique();
        assert!(matches!(
            f.venue.quote(&f.ledger, 10, &[f.sol, stranger]),
            Err(ExecutionError::Venue(VenueError::PairNotFound { .. }))
        ));
        assert_eq!(
            f.venue.quote(&f.ledger, 10, &[f.sol]),
            Err(ExecutionError::Venue(VenueError::InvalidPath(1)))
        );
        assert_eq!(
            f.venue.quote(&f.ledger, 10, &[f.sol, f.usdc, f.sol]),
            Err(ExecutionError::Venue(VenueError::InvalidPath(3)))
        );
    }
}
