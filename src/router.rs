//! Add-liquidity parameters for the LB router, plus token amount handling and
//! deposit form gating

use crate::distribution::{dec_string, LiquidityDistributionParams};
use crate::error::RouterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Arbitrum One chain id
pub const ARBITRUM_CHAIN_ID: u64 = 42161;
/// Wrapped ETH on Arbitrum
pub const WETH_ARBITRUM: &str = "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1";
/// Native USDC on Arbitrum
pub const USDC_ARBITRUM: &str = "0xaf88d065e77c8cC2239327C5EDb3A432268e5831";
/// LB router on Arbitrum
pub const LB_ROUTER_ARBITRUM: &str = "0xb4315e873dBcf96Ffd0acd8EA43f689D8c20fB30";

/// Basis-point denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u32 = 10_000;
/// Default amount slippage (0.5%)
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;
/// Default tolerated active-id drift, in bins
pub const DEFAULT_ID_SLIPPAGE: u32 = 5;
/// Default bin step of the WETH/USDC pair, in bps
pub const DEFAULT_BIN_STEP: u16 = 15;
/// Default deadline offset, in seconds
pub const DEFAULT_DEADLINE_SECS: u64 = 3600;

/// Parses a decimal string like `"1.25"` into integer base units.
pub fn parse_units(amount: &str, decimals: u8) -> Result<u128, RouterError> {
    let s = amount.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    let is_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
        return Err(RouterError::InvalidAmount(amount.to_string()));
    }
    let frac = frac.trim_end_matches('0');
    if frac.len() > usize::from(decimals) {
        return Err(RouterError::TooManyDecimals { amount: amount.to_string(), decimals });
    }

    let overflow = || RouterError::AmountOverflow(amount.to_string());
    let scale = 10u128.checked_pow(u32::from(decimals)).ok_or_else(overflow)?;
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| overflow())? };
    let frac_units: u128 = if frac.is_empty() {
        0
    } else {
        let pad = 10u128.pow(u32::from(decimals) - frac.len() as u32);
        frac.parse::<u128>().map_err(|_| overflow())? * pad
    };
    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(overflow)
}

/// Formats base units as a decimal string; always keeps at least one
/// fractional digit (`"1.0"`).
pub fn format_units(value: u128, decimals: u8) -> String {
    let width = usize::from(decimals);
    let (whole, rem) = match 10u128.checked_pow(u32::from(decimals)) {
        Some(scale) => (value / scale, value % scale),
        None => (0, value),
    };
    let frac = format!("{rem:0>width$}");
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{frac}")
    }
}

/// Lowest acceptable amount after `slippage_bps`: amount * (10000 - bps) / 10000.
pub fn min_amount(amount: u128, slippage_bps: u32) -> Result<u128, RouterError> {
    if slippage_bps > BPS_DENOMINATOR {
        return Err(RouterError::InvalidSlippage(slippage_bps));
    }
    let keep = u128::from(BPS_DENOMINATOR - slippage_bps);
    let denom = u128::from(BPS_DENOMINATOR);
    // (a / d) * k + (a % d) * k / d avoids overflowing a * k
    Ok(amount / denom * keep + amount % denom * keep / denom)
}

/// Checks for a `0x`-prefixed, 40-hex-digit address.
pub fn validate_address(addr: &str) -> Result<(), RouterError> {
    let ok = addr
        .strip_prefix("0x")
        .map(|hex| hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
        .unwrap_or(false);
    if ok { Ok(()) } else { Err(RouterError::InvalidAddress(addr.to_string())) }
}

/// One side of an LB pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Contract address
    pub address: String,
    /// Ticker shown to the user
    pub symbol: String,
    /// ERC-20 decimals
    pub decimals: u8,
    /// Whether the token is sent as native value (no ERC-20 approval)
    pub native: bool,
}

/// An LB pair identified by its two tokens and bin step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairConfig {
    /// X token
    pub token_x: Token,
    /// Y token
    pub token_y: Token,
    /// Bin step in bps
    pub bin_step: u16,
}

impl PairConfig {
    /// ETH/USDC on Arbitrum, ETH paid as native value.
    pub fn arbitrum_eth_usdc() -> Self {
        Self {
            token_x: Token { address: WETH_ARBITRUM.into(), symbol: "ETH".into(), decimals: 18, native: true },
            token_y: Token { address: USDC_ARBITRUM.into(), symbol: "USDC".into(), decimals: 6, native: false },
            bin_step: DEFAULT_BIN_STEP,
        }
    }
}

/// What the deposit form's primary button should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositStatus {
    /// No wallet connected
    ConnectWallet,
    /// Amount missing or unparsable for the named token
    EnterAmount(String),
    /// Amount above the wallet balance for the named token
    Insufficient(String),
    /// Router allowance below the amount for the named token
    NeedsApproval(String),
    /// Ready to submit
    Ready,
}

impl DepositStatus {
    /// True when submission must not proceed.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::EnterAmount(_) | Self::Insufficient(_))
    }
}

impl fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectWallet => f.write_str("Connect Wallet"),
            Self::EnterAmount(sym) => write!(f, "Enter {sym} amount"),
            Self::Insufficient(sym) => write!(f, "Not enough {sym}"),
            Self::NeedsApproval(sym) => write!(f, "Approve {sym}"),
            Self::Ready => f.write_str("Add liquidity"),
        }
    }
}

/// Wallet-side state of one token in the deposit form
#[derive(Debug, Clone, Default)]
pub struct TokenInput {
    /// Amount as typed
    pub amount: String,
    /// Wallet balance in base units
    pub balance: u128,
    /// Router allowance in base units; ignored for native tokens
    pub allowance: u128,
}

impl TokenInput {
    /// The whole balance formatted for the amount field.
    pub fn max_amount(&self, decimals: u8) -> String {
        format_units(self.balance, decimals)
    }

    /// Fills the amount field with the whole balance.
    pub fn fill_max(&mut self, decimals: u8) {
        self.amount = self.max_amount(decimals);
    }
}

/// Snapshot of the deposit form
#[derive(Debug, Clone)]
pub struct DepositForm {
    /// Pair being deposited into
    pub pair: PairConfig,
    /// Whether a wallet is connected
    pub connected: bool,
    /// X token input
    pub x: TokenInput,
    /// Y token input
    pub y: TokenInput,
}

/// Gates the form in order: wallet, X amount, X balance, Y amount, Y balance,
/// then allowances.
pub fn check_deposit(form: &DepositForm) -> DepositStatus {
    if !form.connected {
        return DepositStatus::ConnectWallet;
    }
    let sides = [(&form.pair.token_x, &form.x), (&form.pair.token_y, &form.y)];
    let mut amounts = [0u128; 2];
    for (i, (token, input)) in sides.iter().enumerate() {
        let amount = match parse_units(&input.amount, token.decimals) {
            Ok(a) => a,
            Err(_) => return DepositStatus::EnterAmount(token.symbol.clone()),
        };
        if amount > input.balance {
            return DepositStatus::Insufficient(token.symbol.clone());
        }
        amounts[i] = amount;
    }
    for ((token, input), amount) in sides.iter().zip(amounts) {
        if !token.native && amount > input.allowance {
            return DepositStatus::NeedsApproval(token.symbol.clone());
        }
    }
    DepositStatus::Ready
}

/// Inputs for one add-liquidity submission
#[derive(Debug, Clone)]
pub struct DepositRequest<'a> {
    /// Target pair
    pub pair: &'a PairConfig,
    /// X amount in base units
    pub amount_x: u128,
    /// Y amount in base units
    pub amount_y: u128,
    /// Tolerated amount slippage
    pub slippage_bps: u32,
    /// Pool active id observed by the caller
    pub active_id: u32,
    /// Tolerated active-id drift, in bins
    pub id_slippage: u32,
    /// Receiver of LB tokens and refunds
    pub recipient: &'a str,
    /// Unix deadline in seconds
    pub deadline: u64,
    /// Shape to deposit with
    pub distribution: &'a LiquidityDistributionParams,
}

/// Argument struct of the LB router's `addLiquidity` / `addLiquidityNATIVE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidityParams {
    /// X token address
    pub token_x: String,
    /// Y token address
    pub token_y: String,
    /// Pair bin step
    pub bin_step: u16,
    /// X amount
    #[serde(with = "dec_string")]
    pub amount_x: u128,
    /// Y amount
    #[serde(with = "dec_string")]
    pub amount_y: u128,
    /// X amount floor
    #[serde(with = "dec_string")]
    pub amount_x_min: u128,
    /// Y amount floor
    #[serde(with = "dec_string")]
    pub amount_y_min: u128,
    /// Expected active id
    pub active_id_desired: u32,
    /// Tolerated active-id drift
    pub id_slippage: u32,
    /// Bin offsets
    pub delta_ids: Vec<i32>,
    /// X weights
    #[serde(with = "dec_string::vec")]
    pub distribution_x: Vec<u128>,
    /// Y weights
    #[serde(with = "dec_string::vec")]
    pub distribution_y: Vec<u128>,
    /// LB token receiver
    pub to: String,
    /// Refund receiver
    pub refund_to: String,
    /// Unix deadline in seconds
    pub deadline: u64,
}

impl AddLiquidityParams {
    /// Validates addresses and bin range and applies amount slippage.
    pub fn new(req: &DepositRequest<'_>) -> Result<Self, RouterError> {
        validate_address(&req.pair.token_x.address)?;
        validate_address(&req.pair.token_y.address)?;
        validate_address(req.recipient)?;
        req.distribution.bin_ids(req.active_id)?;

        let params = Self {
            token_x: req.pair.token_x.address.clone(),
            token_y: req.pair.token_y.address.clone(),
            bin_step: req.pair.bin_step,
            amount_x: req.amount_x,
            amount_y: req.amount_y,
            amount_x_min: min_amount(req.amount_x, req.slippage_bps)?,
            amount_y_min: min_amount(req.amount_y, req.slippage_bps)?,
            active_id_desired: req.active_id,
            id_slippage: req.id_slippage,
            delta_ids: req.distribution.delta_ids.clone(),
            distribution_x: req.distribution.distribution_x.clone(),
            distribution_y: req.distribution.distribution_y.clone(),
            to: req.recipient.to_string(),
            refund_to: req.recipient.to_string(),
            deadline: req.deadline,
        };
        debug!(
            active_id = req.active_id,
            bins = params.delta_ids.len(),
            amount_x_min = %params.amount_x_min,
            amount_y_min = %params.amount_y_min,
            "prepared add-liquidity params"
        );
        Ok(params)
    }

    /// Native value to attach when the X token is paid natively.
    pub fn native_value(&self, pair: &PairConfig) -> u128 {
        if pair.token_x.native {
            self.amount_x
        } else if pair.token_y.native {
            self.amount_y
        } else {
            0
        }
    }
}
