// src/math.rs
use crate::shared::errors::{ExecutionError, ExecutionResult, VenueError};

pub const BPS_DENOMINATOR: u64 = 10_000;

/// Output of a constant product swap after the pool fee.
///
/// `amount_out = in * (10000 - fee) * reserve_out / (reserve_in * 10000 + in * (10000 - fee))`
pub fn get_amount_out(
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u32,
) -> ExecutionResult<u64> {
    if amount_in == 0 {
        return Err(VenueError::InsufficientInputAmount.into());
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(VenueError::InsufficientLiquidity.into());
    }
    let fee_bps = u64::from(fee_bps).min(BPS_DENOMINATOR);
    let amount_in_with_fee = amount_in as u128 * (BPS_DENOMINATOR - fee_bps) as u128;
    let numerator = amount_in_with_fee * reserve_out as u128;
    let denominator = reserve_in as u128 * BPS_DENOMINATOR as u128 + amount_in_with_fee;
    // numerator / denominator < reserve_out, so the cast cannot truncate
    Ok((numerator / denominator) as u64)
}

/// Output of a fixed-rate conversion `amount * numerator / denominator`, less a fee.
pub fn fixed_rate_amount_out(
    amount_in: u64,
    numerator: u64,
    denominator: u64,
    fee_bps: u32,
) -> ExecutionResult<u64> {
    if amount_in == 0 {
        return Err(VenueError::InsufficientInputAmount.into());
    }
    if denominator == 0 {
        return Err(VenueError::InsufficientLiquidity.into());
    }
    let fee_bps = u64::from(fee_bps).min(BPS_DENOMINATOR);
    let gross = amount_in as u128 * numerator as u128 / denominator as u128;
    let net = gross * (BPS_DENOMINATOR - fee_bps) as u128 / BPS_DENOMINATOR as u128;
    u64::try_from(net).map_err(|_| ExecutionError::ArithmeticOverflow)
}

/// Fee on a flash loan, rounded up in the lender's favour
pub fn flash_fee(amount: u64, fee_bps: u32) -> ExecutionResult<u64> {
    let product = amount as u128 * fee_bps as u128;
    let fee = product.div_ceil(BPS_DENOMINATOR as u128);
    u64::try_from(fee).map_err(|_| ExecutionError::ArithmeticOverflow)
}

/// Calculate minimum output amount with slippage protection
pub fn calculate_min_out(amount_out: u64, slippage_bps: u32) -> u64 {
    let slippage_bps = u64::from(slippage_bps).min(BPS_DENOMINATOR);
    (amount_out as u128 * (BPS_DENOMINATOR - slippage_bps) as u128 / BPS_DENOMINATOR as u128) as u64
}

/// Calculate spread between what goes in and what comes back, in basis points
pub fn calculate_profit_bps(amount_in: u64, amount_back: u64) -> i64 {
    if amount_in == 0 {
        return 0;
    }
    let diff = amount_back as i128 - amount_in as i128;
    (diff * BPS_DENOMINATOR as i128 / amount_in as i128) as i64
}
