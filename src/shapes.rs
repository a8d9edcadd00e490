//! Weight profiles for Liquidity Book distribution shapes

use serde::{Deserialize, Serialize};

/// Generic interface for a one-sided weight profile on the LB bin grid.
///
/// Weights are unnormalized integers indexed by `distance` from the active bin
/// (0 = active bin, `radius` = outermost bin). Normalization to 10^18 happens
/// in [`crate::distribution`].
pub trait WeightProfile {
    /// Returns the name of this profile
    fn name(&self) -> &'static str;

    /// Returns the raw weight of the bin `distance` steps away from the active bin
    fn raw_weight(&self, distance: u32, radius: u32) -> u128;

    /// Total units on one side, active bin included
    fn side_units(&self, radius: u32) -> u128 {
        (0..=radius).map(|k| self.raw_weight(k, radius)).sum()
    }
}

/// Flat profile. The active bin carries a half share on each side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uniform;

impl WeightProfile for Uniform {
    fn name(&self) -> &'static str { "Spot(uniform)" }
    fn raw_weight(&self, distance: u32, radius: u32) -> u128 {
        if distance > radius { return 0; }
        if distance == 0 { 1 } else { 2 }
    }
}

/// Bell profile: w_k = C(2r, r + k), heaviest at the active bin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bell;

impl WeightProfile for Bell {
    fn name(&self) -> &'static str { "Curve(binomial)" }
    fn raw_weight(&self, distance: u32, radius: u32) -> u128 {
        if distance > radius { return 0; }
        binomial(2 * radius, radius + distance)
    }
}

/// Barbell profile: w_k = C(2r, k), the mirror of [`Bell`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barbell;

impl WeightProfile for Barbell {
    fn name(&self) -> &'static str { "BidAsk(barbell)" }
    fn raw_weight(&self, distance: u32, radius: u32) -> u128 {
        if distance > radius { return 0; }
        binomial(2 * radius, distance)
    }
}

/// Exact C(n, k). Each partial product is itself a binomial coefficient, so the
/// division never truncates.
pub fn binomial(n: u32, k: u32) -> u128 {
    if k > n { return 0; }
    let k = k.min(n - k);
    let mut c: u128 = 1;
    for i in 0..k {
        c = c * u128::from(n - i) / u128::from(i + 1);
    }
    c
}
