//! Error handling for the engine and its collaborators

use solana_sdk::clock::UnixTimestamp;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Token ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance of {token} for {owner}: need {required}, have {available}")]
    InsufficientBalance {
        token: Pubkey,
        owner: Pubkey,
        required: u64,
        available: u64,
    },

    #[error("insufficient allowance of {token} from {owner} to {spender}: need {required}, have {available}")]
    InsufficientAllowance {
        token: Pubkey,
        owner: Pubkey,
        spender: Pubkey,
        required: u64,
        available: u64,
    },

    #[error("balance overflow for {token} held by {owner}")]
    BalanceOverflow { token: Pubkey, owner: Pubkey },
}

/// Venue errors other than slippage and deadline violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VenueError {
    #[error("invalid swap path of length {0}")]
    InvalidPath(usize),

    #[error("no pool for {token_in} -> {token_out}")]
    PairNotFound { token_in: Pubkey, token_out: Pubkey },

    #[error("insufficient input amount")]
    InsufficientInputAmount,

    #[error("insufficient liquidity")]
    InsufficientLiquidity,
}

/// Lending facility errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LendingError {
    #[error("asset {0} is not supported by the lender")]
    UnsupportedAsset(Pubkey),

    #[error("flash loan amount must be positive")]
    ZeroAmount,

    #[error("insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: u64, available: u64 },

    #[error("receiver {0} did not acknowledge the flash loan")]
    CallbackRejected(Pubkey),
}

/// Reason a unit of execution failed.
///
/// Every variant is fatal: the runtime reverts all effects of the unit and hands the
/// error back to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("untrusted lender: callback from {caller}, expected {expected}")]
    UntrustedLender { caller: Pubkey, expected: Pubkey },

    #[error("untrusted initiator: loan initiated by {initiator}, expected {expected}")]
    UntrustedInitiator { initiator: Pubkey, expected: Pubkey },

    #[error("amount out too low: quoted {quoted}, minimum {minimum}")]
    AmountOutTooLow { quoted: u64, minimum: u64 },

    #[error("slippage exceeded: amount out {amount_out} below minimum {amount_out_min}")]
    SlippageExceeded { amount_out: u64, amount_out_min: u64 },

    #[error("deadline {deadline} expired at {now}")]
    DeadlineExpired {
        deadline: UnixTimestamp,
        now: UnixTimestamp,
    },

    #[error("insufficient proceeds: received {received}, required {required}")]
    InsufficientProceeds { received: u64, required: u64 },

    #[error("inconsistent params: borrowed token floor {min_amount_out} below repayment plus surplus {required}")]
    InconsistentParams { min_amount_out: u64, required: u64 },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Venue(#[from] VenueError),

    #[error(transparent)]
    Lending(#[from] LendingError),
}

/// Convenient Result alias for anything running inside a unit of execution.
pub type ExecutionResult<T> = Result<T, ExecutionError>;
