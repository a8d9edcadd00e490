//! Liquidity distribution calculator: shape → (delta ids, X weights, Y weights)

use crate::error::{DistributionError, RouterError};
use crate::shapes::{Barbell, Bell, Uniform, WeightProfile};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Fixed-point scale of a weight: 10^18 = 100%.
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Bins on each side of the active bin used by the presets.
pub const DEFAULT_RADIUS: u32 = 5;

/// Largest radius the builder accepts (51 bins). Binomial weights for larger
/// radii no longer fit `u128` once scaled by [`PRECISION`].
pub const MAX_RADIUS: u32 = 25;

/// Highest LB bin id (ids are uint24 on chain).
pub const MAX_BIN_ID: u32 = 0xFF_FFFF;

/// Named liquidity shape selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum LiquidityDistribution {
    /// Uniform weight across every bin
    Spot = 0,
    /// Bell curve concentrated around the active bin
    Curve = 1,
    /// Barbell concentrated at the outermost bins
    BidAsk = 2,
}

impl LiquidityDistribution {
    /// Every shape, in tag order.
    pub const ALL: [LiquidityDistribution; 3] = [Self::Spot, Self::Curve, Self::BidAsk];

    /// Weight profile backing this shape.
    pub fn profile(self) -> &'static dyn WeightProfile {
        match self {
            Self::Spot => &Uniform,
            Self::Curve => &Bell,
            Self::BidAsk => &Barbell,
        }
    }

    /// Canonical tag string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "SPOT",
            Self::Curve => "CURVE",
            Self::BidAsk => "BID_ASK",
        }
    }

    /// Human label shown next to the shape picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Spot => "Spot",
            Self::Curve => "Curve",
            Self::BidAsk => "Bid-Ask",
        }
    }
}

impl fmt::Display for LiquidityDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LiquidityDistribution {
    type Err = DistributionError;

    /// Accepts `SPOT`, `CURVE`, `BID_ASK` (also `BID-ASK`, `BID ASK`, `BIDASK`)
    /// in any case, and the numeric tags `0`, `1`, `2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SPOT" | "0" => Ok(Self::Spot),
            "CURVE" | "1" => Ok(Self::Curve),
            "BID_ASK" | "BID-ASK" | "BID ASK" | "BIDASK" | "2" => Ok(Self::BidAsk),
            _ => Err(DistributionError::InvalidDistributionTag(s.to_string())),
        }
    }
}

impl TryFrom<u8> for LiquidityDistribution {
    type Error = DistributionError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Spot),
            1 => Ok(Self::Curve),
            2 => Ok(Self::BidAsk),
            t => Err(DistributionError::InvalidDistributionTag(t.to_string())),
        }
    }
}

/// Three parallel arrays describing how liquidity is spread over bins.
///
/// Index `i` of every array describes the same bin. `delta_ids` are offsets
/// from the pool's active bin; each distribution sums to [`PRECISION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityDistributionParams {
    /// Bin offsets relative to the active bin, strictly increasing
    pub delta_ids: Vec<i32>,
    /// X-token weights (10^18 = 100%)
    #[serde(with = "dec_string::vec")]
    pub distribution_x: Vec<u128>,
    /// Y-token weights (10^18 = 100%)
    #[serde(with = "dec_string::vec")]
    pub distribution_y: Vec<u128>,
}

/// One row of a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinWeight {
    /// Offset from the active bin
    pub delta_id: i32,
    /// X-token weight
    pub x: u128,
    /// Y-token weight
    pub y: u128,
}

impl LiquidityDistributionParams {
    /// Number of bins.
    pub fn len(&self) -> usize { self.delta_ids.len() }

    /// True when no bins are described.
    pub fn is_empty(&self) -> bool { self.delta_ids.is_empty() }

    /// Iterates bins in delta-id order.
    pub fn iter(&self) -> impl Iterator<Item = BinWeight> + '_ {
        self.delta_ids
            .iter()
            .zip(&self.distribution_x)
            .zip(&self.distribution_y)
            .map(|((&delta_id, &x), &y)| BinWeight { delta_id, x, y })
    }

    /// Absolute bin ids for a pool currently at `active_id`.
    pub fn bin_ids(&self, active_id: u32) -> Result<Vec<u32>, RouterError> {
        self.delta_ids
            .iter()
            .map(|&delta_id| {
                let id = i64::from(active_id) + i64::from(delta_id);
                if (0..=i64::from(MAX_BIN_ID)).contains(&id) {
                    Ok(id as u32)
                } else {
                    Err(RouterError::BinOutOfRange { active_id, delta_id })
                }
            })
            .collect()
    }

    /// X weights as percentages. Display only.
    pub fn percentages_x(&self) -> Vec<f64> { to_percentages(&self.distribution_x) }

    /// Y weights as percentages. Display only.
    pub fn percentages_y(&self) -> Vec<f64> { to_percentages(&self.distribution_y) }
}

fn to_percentages(weights: &[u128]) -> Vec<f64> {
    weights.iter().map(|&w| w as f64 / (PRECISION as f64 / 100.0)).collect()
}

/// Builds a distribution for a shape over `2 * radius + 1` bins.
#[derive(Debug, Clone, Copy)]
pub struct DistributionBuilder {
    shape: LiquidityDistribution,
    radius: u32,
}

impl DistributionBuilder {
    /// Starts a builder with [`DEFAULT_RADIUS`].
    pub fn new(shape: LiquidityDistribution) -> Self {
        Self { shape, radius: DEFAULT_RADIUS }
    }

    /// Sets bins per side of the active bin.
    pub fn radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    /// Normalizes the shape's profile to 10^18 per side and mirrors it onto
    /// the Y side. The rounding remainder goes to the outermost bin.
    pub fn build(self) -> Result<LiquidityDistributionParams, DistributionError> {
        let r = self.radius;
        if r == 0 || r > MAX_RADIUS {
            return Err(DistributionError::InvalidRadius { radius: r, max: MAX_RADIUS });
        }
        let side = normalized_side(self.shape.profile(), r)?;

        let n = 2 * r as usize + 1;
        let center = r as usize;
        let delta_ids: Vec<i32> = (-(r as i32)..=r as i32).collect();
        let mut distribution_x = vec![0u128; n];
        let mut distribution_y = vec![0u128; n];
        for (k, &w) in side.iter().enumerate() {
            distribution_x[center + k] = w;
            distribution_y[center - k] = w;
        }

        debug!(
            shape = %self.shape,
            profile = self.shape.profile().name(),
            radius = r,
            center_weight = %side[0],
            edge_weight = %side[center],
            "built liquidity distribution"
        );
        Ok(LiquidityDistributionParams { delta_ids, distribution_x, distribution_y })
    }
}

/// One side's weights indexed by distance from the active bin, summing to PRECISION.
fn normalized_side(profile: &dyn WeightProfile, radius: u32) -> Result<Vec<u128>, DistributionError> {
    let raw: Vec<u128> = (0..=radius).map(|k| profile.raw_weight(k, radius)).collect();
    let total = raw
        .iter()
        .try_fold(0u128, |acc, &w| acc.checked_add(w))
        .ok_or(DistributionError::Overflow)?;
    if total == 0 {
        return Err(DistributionError::Overflow);
    }

    let mut side = Vec::with_capacity(raw.len());
    for w in raw {
        let scaled = w.checked_mul(PRECISION).ok_or(DistributionError::Overflow)?;
        side.push(scaled / total);
    }
    let assigned: u128 = side.iter().sum();
    let remainder = PRECISION - assigned;
    if let Some(edge) = side.last_mut() {
        *edge += remainder;
    }
    Ok(side)
}

static SPOT_UNIFORM: Lazy<LiquidityDistributionParams> = Lazy::new(|| preset(LiquidityDistribution::Spot));
static CURVE: Lazy<LiquidityDistributionParams> = Lazy::new(|| preset(LiquidityDistribution::Curve));
static BID_ASK: Lazy<LiquidityDistributionParams> = Lazy::new(|| preset(LiquidityDistribution::BidAsk));

// DEFAULT_RADIUS is within 1..=MAX_RADIUS.
fn preset(shape: LiquidityDistribution) -> LiquidityDistributionParams {
    DistributionBuilder::new(shape)
        .build()
        .expect("default radius preset is always buildable")
}

/// Returns the shared preset for `distribution`. Callers that need to tweak
/// the arrays must clone first.
pub fn get_liquidity_config(distribution: LiquidityDistribution) -> &'static LiquidityDistributionParams {
    match distribution {
        LiquidityDistribution::Spot => &*SPOT_UNIFORM,
        LiquidityDistribution::Curve => &*CURVE,
        LiquidityDistribution::BidAsk => &*BID_ASK,
    }
}

/// Resolves a free-form tag and returns its preset.
pub fn get_liquidity_config_by_tag(tag: &str) -> Result<&'static LiquidityDistributionParams, DistributionError> {
    let distribution: LiquidityDistribution = tag.parse()?;
    Ok(get_liquidity_config(distribution))
}

/// Serde helpers writing 128-bit integers as decimal strings, so JSON
/// consumers with 53-bit numbers keep full precision.
pub(crate) mod dec_string {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(v)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(D::Error::custom)
    }

    pub mod vec {
        use serde::de::Error as _;
        use serde::ser::SerializeSeq;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(v: &[u128], s: S) -> Result<S::Ok, S::Error> {
            let mut seq = s.serialize_seq(Some(v.len()))?;
            for x in v {
                seq.serialize_element(&x.to_string())?;
            }
            seq.end()
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u128>, D::Error> {
            Vec::<String>::deserialize(d)?
                .iter()
                .map(|s| s.parse().map_err(D::Error::custom))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_preset_matches_known_weights() {
        let p = get_liquidity_config(LiquidityDistribution::Spot);
        assert_eq!(p.delta_ids, (-5..=5).collect::<Vec<i32>>());
        let share = 181_818_181_818_181_818u128;
        let expected_x = vec![
            0, 0, 0, 0, 0,
            90_909_090_909_090_909,
            share, share, share, share,
            share + 1,
        ];
        assert_eq!(p.distribution_x, expected_x);
        let mut expected_y = expected_x.clone();
        expected_y.reverse();
        assert_eq!(p.distribution_y, expected_y);
    }

    #[test]
    fn curve_remainder_lands_on_edge() {
        let p = get_liquidity_config(LiquidityDistribution::Curve);
        assert_eq!(p.distribution_x[5], 394_984_326_018_808_777);
        assert_eq!(p.distribution_x[10], 1_567_398_119_122_257 + 2);
    }

    #[test]
    fn tags_parse_case_insensitively() {
        assert_eq!("spot".parse::<LiquidityDistribution>(), Ok(LiquidityDistribution::Spot));
        assert_eq!("Bid-Ask".parse::<LiquidityDistribution>(), Ok(LiquidityDistribution::BidAsk));
        assert_eq!(" BID_ASK ".parse::<LiquidityDistribution>(), Ok(LiquidityDistribution::BidAsk));
        assert_eq!("1".parse::<LiquidityDistribution>(), Ok(LiquidityDistribution::Curve));
        assert_eq!(LiquidityDistribution::try_from(2u8), Ok(LiquidityDistribution::BidAsk));
        assert_eq!(
            LiquidityDistribution::try_from(7u8),
            Err(DistributionError::InvalidDistributionTag("7".into()))
        );
        for tag in ["s-p-o-t", "C_U_R_V_E", "b i d a s k", "BID__ASK"] {
            assert!(tag.parse::<LiquidityDistribution>().is_err(), "{tag}");
        }
    }

    #[test]
    fn radius_is_bounded() {
        let err = DistributionBuilder::new(LiquidityDistribution::Spot).radius(0).build();
        assert_eq!(err, Err(DistributionError::InvalidRadius { radius: 0, max: MAX_RADIUS }));
        assert!(DistributionBuilder::new(LiquidityDistribution::Curve)
            .radius(MAX_RADIUS + 1)
            .build()
            .is_err());
    }

    #[test]
    fn bin_ids_offset_from_active() {
        let p = DistributionBuilder::new(LiquidityDistribution::Spot).radius(2).build().unwrap();
        assert_eq!(p.bin_ids(8_375_355).unwrap(), vec![8_375_353, 8_375_354, 8_375_355, 8_375_356, 8_375_357]);
        assert_eq!(
            p.bin_ids(1),
            Err(RouterError::BinOutOfRange { active_id: 1, delta_id: -2 })
        );
        assert!(p.bin_ids(MAX_BIN_ID).is_err());
    }

    #[test]
    fn json_uses_router_field_names() {
        let p = DistributionBuilder::new(LiquidityDistribution::Spot).radius(1).build().unwrap();
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["deltaIds"], serde_json::json!([-1, 0, 1]));
        assert_eq!(v["distributionX"][0], "0");
        assert_eq!(v["distributionX"][1], "333333333333333333");
        assert_eq!(v["distributionX"][2], "666666666666666667");
        let back: LiquidityDistributionParams = serde_json::from_value(v).unwrap();
        assert_eq!(back, p);
    }
}
