//! Verification of distribution invariants before they reach a router call

use crate::distribution::{LiquidityDistributionParams, PRECISION};
use anyhow::{anyhow, Result};

/// Verification report for one distribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Number of bins checked
    pub bins: usize,
    /// Exact sum of X weights
    pub sum_x: u128,
    /// Exact sum of Y weights
    pub sum_y: u128,
    /// Whether delta ids are symmetric about zero
    pub symmetric: bool,
    /// Whether Y is the mirror image of X
    pub mirrored: bool,
    /// Whether each side is non-increasing moving away from the active bin
    pub monotone_toward_center: bool,
    /// Whether each side is non-decreasing moving away from the active bin
    pub monotone_toward_edges: bool,
}

/// Hard checks (lengths, ordering, symmetry, exact sums, side placement) fail with an error;
/// shape classification is reported.
pub fn verify_distribution(p: &LiquidityDistributionParams) -> Result<Report> {
    let n = p.delta_ids.len();
    if n == 0 {
        return Err(anyhow!("distribution has no bins"));
    }
    if p.distribution_x.len() != n || p.distribution_y.len() != n {
        return Err(anyhow!(
            "length mismatch: deltaIds={} distributionX={} distributionY={}",
            n,
            p.distribution_x.len(),
            p.distribution_y.len()
        ));
    }
    if let Some(w) = p.delta_ids.windows(2).find(|w| w[0] >= w[1]) {
        return Err(anyhow!("deltaIds not strictly increasing at {} → {}", w[0], w[1]));
    }

    let symmetric = p
        .delta_ids
        .iter()
        .zip(p.delta_ids.iter().rev())
        .all(|(a, b)| i64::from(*a) == -i64::from(*b));
    if !symmetric {
        return Err(anyhow!(
            "deltaIds not symmetric about the active bin: {:?}",
            p.delta_ids
        ));
    }
    if p.delta_ids[n / 2] != 0 {
        return Err(anyhow!("deltaIds have no active bin (0) at the center"));
    }

    let sum_x = checked_sum(&p.distribution_x).ok_or_else(|| anyhow!("distributionX overflows"))?;
    let sum_y = checked_sum(&p.distribution_y).ok_or_else(|| anyhow!("distributionY overflows"))?;
    if sum_x != PRECISION {
        return Err(anyhow!("Σ distributionX = {} ≠ {}", sum_x, PRECISION));
    }
    if sum_y != PRECISION {
        return Err(anyhow!("Σ distributionY = {} ≠ {}", sum_y, PRECISION));
    }

    for b in p.iter() {
        if b.delta_id < 0 && b.x != 0 {
            return Err(anyhow!("X weight {} below the active bin at delta {}", b.x, b.delta_id));
        }
        if b.delta_id > 0 && b.y != 0 {
            return Err(anyhow!("Y weight {} above the active bin at delta {}", b.y, b.delta_id));
        }
    }

    let mirrored = p
        .distribution_x
        .iter()
        .zip(p.distribution_y.iter().rev())
        .all(|(x, y)| x == y);

    // X side read outward from the active bin; Y side read outward is the reverse.
    let x_out: Vec<u128> = p.iter().filter(|b| b.delta_id >= 0).map(|b| b.x).collect();
    let mut y_out: Vec<u128> = p.iter().filter(|b| b.delta_id <= 0).map(|b| b.y).collect();
    y_out.reverse();
    let non_increasing = |s: &[u128]| s.windows(2).all(|w| w[0] >= w[1]);
    let non_decreasing = |s: &[u128]| s.windows(2).all(|w| w[0] <= w[1]);

    Ok(Report {
        bins: n,
        sum_x,
        sum_y,
        symmetric,
        mirrored,
        monotone_toward_center: non_increasing(&x_out) && non_increasing(&y_out),
        monotone_toward_edges: non_decreasing(&x_out) && non_decreasing(&y_out),
    })
}

fn checked_sum(weights: &[u128]) -> Option<u128> {
    weights.iter().try_fold(0u128, |acc, &w| acc.checked_add(w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{get_liquidity_config, LiquidityDistribution};

    #[test]
    fn presets_pass() {
        for shape in LiquidityDistribution::ALL {
            let rep = verify_distribution(get_liquidity_config(shape)).unwrap();
            assert_eq!(rep.bins, 11);
            assert!(rep.symmetric && rep.mirrored);
        }
    }

    #[test]
    fn rejects_short_sum() {
        let mut p = get_liquidity_config(LiquidityDistribution::Spot).clone();
        p.distribution_x[10] -= 1;
        let err = verify_distribution(&p).unwrap_err().to_string();
        assert!(err.contains("distributionX"), "{err}");
    }

    #[test]
    fn rejects_x_below_active_bin() {
        let mut p = get_liquidity_config(LiquidityDistribution::Spot).clone();
        p.distribution_x[0] = 1;
        p.distribution_x[10] -= 1;
        assert!(verify_distribution(&p).is_err());
    }

    #[test]
    fn rejects_unsorted_delta_ids() {
        let mut p = get_liquidity_config(LiquidityDistribution::Curve).clone();
        p.delta_ids.swap(0, 1);
        assert!(verify_distribution(&p).is_err());
    }

    #[test]
    fn rejects_asymmetric_delta_ids() {
        let p = LiquidityDistributionParams {
            delta_ids: vec![0, 1, 2],
            distribution_x: vec![PRECISION / 2, PRECISION / 4, PRECISION / 4],
            distribution_y: vec![PRECISION, 0, 0],
        };
        let err = verify_distribution(&p).unwrap_err().to_string();
        assert!(err.contains("symmetric"), "{err}");
    }

    #[test]
    fn rejects_missing_active_bin() {
        let p = LiquidityDistributionParams {
            delta_ids: vec![-1, 1],
            distribution_x: vec![0, PRECISION],
            distribution_y: vec![PRECISION, 0],
        };
        let err = verify_distribution(&p).unwrap_err().to_string();
        assert!(err.contains("active bin"), "{err}");
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut p = get_liquidity_config(LiquidityDistribution::BidAsk).clone();
        p.distribution_y.pop();
        assert!(verify_distribution(&p).is_err());
    }
}
