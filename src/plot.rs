//! Visualization of distribution weights

use crate::distribution::LiquidityDistributionParams;
use anyhow::Result;
use plotters::prelude::*;

/// Draws X and Y weights per delta id as side-by-side bars (percent of each side)
pub fn plot_distribution(p: &LiquidityDistributionParams, title: &str, out_path: &str) -> Result<()> {
    let root = BitMapBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let pct_x = p.percentages_x();
    let pct_y = p.percentages_y();
    let x_lo = p.delta_ids.first().copied().unwrap_or(0) as f64 - 0.5;
    let x_hi = p.delta_ids.last().copied().unwrap_or(0) as f64 + 0.5;
    let y_max = pct_x.iter().chain(&pct_y).copied().fold(0.0, f64::max).max(1e-12);
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(title, ("sans-serif", 28))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, 0.0..(y_max * 1.05))?;
    chart
        .configure_mesh()
        .x_desc("delta id")
        .y_desc("% of side")
        .draw()?;

    let y_bars = p.delta_ids.iter().zip(&pct_y).map(|(&d, &w)| {
        let d = d as f64;
        Rectangle::new([(d - 0.4, 0.0), (d, w)], RED.mix(0.7).filled())
    });
    chart
        .draw_series(y_bars)?
        .label("Y")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], RED.filled()));

    let x_bars = p.delta_ids.iter().zip(&pct_x).map(|(&d, &w)| {
        let d = d as f64;
        Rectangle::new([(d, 0.0), (d + 0.4, w)], BLUE.mix(0.7).filled())
    });
    chart
        .draw_series(x_bars)?
        .label("X")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BLUE.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
