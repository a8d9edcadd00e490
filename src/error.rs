//! Error types for distribution lookup and router parameter building

use thiserror::Error;

/// Errors raised while resolving or building a liquidity distribution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    /// The tag does not name one of the known shapes.
    #[error("invalid distribution tag: {0:?} (expected SPOT, CURVE or BID_ASK)")]
    InvalidDistributionTag(String),

    /// Bins per side outside the supported range.
    #[error("radius must be in 1..={max} (got {radius})")]
    InvalidRadius {
        /// Requested bins per side
        radius: u32,
        /// Largest supported radius
        max: u32,
    },

    /// Fixed-point arithmetic left the 128-bit range.
    #[error("fixed-point overflow while normalizing weights")]
    Overflow,
}

/// Errors raised while preparing the router's add-liquidity parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// Amount string is empty or not a plain decimal number.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// More fractional digits than the token carries.
    #[error("too many decimals in {amount:?} (token has {decimals})")]
    TooManyDecimals {
        /// Offending amount
        amount: String,
        /// Token decimals
        decimals: u8,
    },

    /// Amount does not fit the integer range.
    #[error("amount overflows: {0:?}")]
    AmountOverflow(String),

    /// Slippage above 100%.
    #[error("slippage must be ≤ 10000 bps (got {0})")]
    InvalidSlippage(u32),

    /// Not a `0x`-prefixed 20-byte hex address.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    /// Active id plus a delta id falls outside the bin id range.
    #[error("bin id out of range: active {active_id} + delta {delta_id}")]
    BinOutOfRange {
        /// Pool active id
        active_id: u32,
        /// Relative offset
        delta_id: i32,
    },
}
