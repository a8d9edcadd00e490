#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
//! Library entry for Liquidity Book distribution shapes.
//!
//! This crate computes how liquidity is spread across the discrete price bins
//! of a Liquidity Book pair (Spot, Curve, Bid-Ask), verifies the fixed-point
//! weight arrays, and prepares the router's add-liquidity parameters.
//!
//! # Modules
//! - [`shapes`]: Integer weight profiles per shape
//! - [`distribution`]: Presets, builder and lookup
//! - [`verifier`]: Exact-sum and layout checks
//! - [`router`]: Amount parsing, slippage, deposit gating, router params
//! - [`plot`]: Visualization (optional in binaries)

/// Error types
pub mod error;

/// Integer weight profiles for each liquidity shape
pub mod shapes;

/// Distribution calculator: presets, builder and lookup
pub mod distribution;

/// Verification of distribution invariants
pub mod verifier;

/// Router parameter preparation and deposit form gating
pub mod router;

/// Visualization utilities for generating charts
pub mod plot;

pub use distribution::{
    get_liquidity_config, get_liquidity_config_by_tag, DistributionBuilder, LiquidityDistribution,
    LiquidityDistributionParams, PRECISION,
};
pub use error::{DistributionError, RouterError};
