use lbdist::distribution::{
    DistributionBuilder, LiquidityDistribution, LiquidityDistributionParams, DEFAULT_RADIUS, MAX_RADIUS,
};
use lbdist::plot::plot_distribution;
use lbdist::router::{
    format_units, parse_units, AddLiquidityParams, DepositRequest, PairConfig, Token, ARBITRUM_CHAIN_ID,
    BPS_DENOMINATOR, DEFAULT_BIN_STEP, DEFAULT_DEADLINE_SECS, DEFAULT_ID_SLIPPAGE, DEFAULT_SLIPPAGE_BPS,
    LB_ROUTER_ARBITRUM, USDC_ARBITRUM, WETH_ARBITRUM, validate_address,
};
use lbdist::verifier::verify_distribution;

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "lbdist",
    version,
    about = "Liquidity Book distribution shapes + add-liquidity params"
)]
struct Args {
    /// spot | curve | bid-ask (or 0 / 1 / 2)
    #[arg(long, default_value = "spot")]
    shape: LiquidityDistribution,
    /// Bins on each side of the active bin
    #[arg(long, default_value_t = DEFAULT_RADIUS)]
    radius: u32,

    // Router inputs; add_liquidity.json is written when --active-id is given.
    #[arg(long)]
    active_id: Option<u32>,
    #[arg(long)]
    amount_x: Option<String>,
    #[arg(long)]
    amount_y: Option<String>,
    #[arg(long)]
    to: Option<String>,
    #[arg(long, default_value_t = DEFAULT_BIN_STEP)]
    bin_step: u16,
    #[arg(long, default_value_t = DEFAULT_SLIPPAGE_BPS)]
    slippage_bps: u32,
    #[arg(long, default_value_t = DEFAULT_ID_SLIPPAGE)]
    id_slippage: u32,
    #[arg(long, default_value_t = DEFAULT_DEADLINE_SECS)]
    deadline_secs: u64,

    #[arg(long, default_value = WETH_ARBITRUM)]
    token_x: String,
    #[arg(long, default_value = "ETH")]
    symbol_x: String,
    #[arg(long, default_value_t = 18)]
    decimals_x: u8,
    /// X is paid as native value (addLiquidityNATIVE)
    #[arg(long = "erc20-x", action = clap::ArgAction::SetFalse, default_value_t = true)]
    native_x: bool,
    #[arg(long, default_value = USDC_ARBITRUM)]
    token_y: String,
    #[arg(long, default_value = "USDC")]
    symbol_y: String,
    #[arg(long, default_value_t = 6)]
    decimals_y: u8,

    #[arg(long, default_value = "out")]
    out_dir: String,
    #[arg(long = "no-draw", action = clap::ArgAction::SetFalse, default_value_t = true)]
    draw: bool,
    #[arg(long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Serialize)]
struct Row {
    delta_id: i32,
    distribution_x: String,
    distribution_y: String,
    pct_x: f64,
    pct_y: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DistributionFile<'a> {
    shape: LiquidityDistribution,
    radius: u32,
    #[serde(flatten)]
    params: &'a LiquidityDistributionParams,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouterCallFile<'a> {
    chain_id: u64,
    router: &'a str,
    method: &'a str,
    #[serde(serialize_with = "as_decimal")]
    value: u128,
    params: &'a AddLiquidityParams,
}

fn as_decimal<S: serde::Serializer>(v: &u128, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(v)
}

fn validate_inputs(args: &Args) -> Result<()> {
    if args.radius == 0 || args.radius > MAX_RADIUS {
        return Err(anyhow!("radius must be in 1..={} (got {})", MAX_RADIUS, args.radius));
    }
    if args.slippage_bps > BPS_DENOMINATOR {
        return Err(anyhow!(
            "slippage_bps must be ≤ {} (got {})",
            BPS_DENOMINATOR,
            args.slippage_bps
        ));
    }
    if args.bin_step == 0 {
        return Err(anyhow!("bin_step must be > 0"));
    }
    if args.active_id.is_some() && (args.amount_x.is_none() || args.amount_y.is_none() || args.to.is_none()) {
        return Err(anyhow!("--active-id requires --amount-x, --amount-y and --to"));
    }
    if let Some(to) = &args.to {
        validate_address(to)?;
    }
    validate_address(&args.token_x)?;
    validate_address(&args.token_y)?;
    if args.active_id.is_none() && (args.amount_x.is_some() || args.amount_y.is_some()) {
        warn!("amounts given without --active-id; skipping add_liquidity.json");
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    validate_inputs(&args)?;

    let params = DistributionBuilder::new(args.shape).radius(args.radius).build()?;
    let rep = verify_distribution(&params)?;
    info!(
        shape = %args.shape,
        profile = args.shape.profile().name(),
        bins = rep.bins,
        sum_x = %rep.sum_x,
        sum_y = %rep.sum_y,
        mirrored = rep.mirrored,
        toward_center = rep.monotone_toward_center,
        toward_edges = rep.monotone_toward_edges,
        "distribution verified"
    );

    create_dir_all(&args.out_dir)?;
    write_distribution_csv(&args.out_dir, &params)?;
    write_distribution_json(&args.out_dir, &args, &params)?;
    if args.draw {
        plot_distribution(
            &params,
            &format!("{} liquidity shape", args.shape.label()),
            &format!("{}/weights.png", &args.out_dir),
        )?;
    }

    if let Some(active_id) = args.active_id {
        write_router_call(&args, active_id, &params)?;
    }
    Ok(())
}

fn write_distribution_csv(out_dir: &str, p: &LiquidityDistributionParams) -> Result<()> {
    let file_path = format!("{}/distribution.csv", out_dir);
    let mut wtr = csv::Writer::from_writer(File::create(&file_path)?);
    for (b, (pct_x, pct_y)) in p.iter().zip(p.percentages_x().into_iter().zip(p.percentages_y())) {
        wtr.serialize(Row {
            delta_id: b.delta_id,
            distribution_x: b.x.to_string(),
            distribution_y: b.y.to_string(),
            pct_x,
            pct_y,
        })?;
    }
    wtr.flush()?;
    info!(path = %file_path, "wrote distribution csv");
    Ok(())
}

fn write_distribution_json(out_dir: &str, args: &Args, p: &LiquidityDistributionParams) -> Result<()> {
    let file_path = format!("{}/distribution.json", out_dir);
    let doc = DistributionFile { shape: args.shape, radius: args.radius, params: p };
    serde_json::to_writer_pretty(File::create(&file_path)?, &doc)?;
    info!(path = %file_path, "wrote distribution json");
    Ok(())
}

fn write_router_call(args: &Args, active_id: u32, p: &LiquidityDistributionParams) -> Result<()> {
    let pair = PairConfig {
        token_x: Token {
            address: args.token_x.clone(),
            symbol: args.symbol_x.clone(),
            decimals: args.decimals_x,
            native: args.native_x,
        },
        token_y: Token {
            address: args.token_y.clone(),
            symbol: args.symbol_y.clone(),
            decimals: args.decimals_y,
            native: false,
        },
        bin_step: args.bin_step,
    };
    let amount_x = parse_units(args.amount_x.as_deref().unwrap_or_default(), pair.token_x.decimals)?;
    let amount_y = parse_units(args.amount_y.as_deref().unwrap_or_default(), pair.token_y.decimals)?;
    let recipient = args.to.as_deref().ok_or_else(|| anyhow!("--to is required"))?;
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let call = AddLiquidityParams::new(&DepositRequest {
        pair: &pair,
        amount_x,
        amount_y,
        slippage_bps: args.slippage_bps,
        active_id,
        id_slippage: args.id_slippage,
        recipient,
        deadline: now + args.deadline_secs,
        distribution: p,
    })?;
    let value = call.native_value(&pair);
    let method = if pair.token_x.native || pair.token_y.native {
        "addLiquidityNATIVE"
    } else {
        "addLiquidity"
    };

    let file_path = format!("{}/add_liquidity.json", args.out_dir);
    let doc = RouterCallFile {
        chain_id: ARBITRUM_CHAIN_ID,
        router: LB_ROUTER_ARBITRUM,
        method,
        value,
        params: &call,
    };
    serde_json::to_writer_pretty(File::create(&file_path)?, &doc)?;
    info!(
        path = %file_path,
        method,
        amount_x = %format_units(call.amount_x, pair.token_x.decimals),
        amount_x_min = %format_units(call.amount_x_min, pair.token_x.decimals),
        amount_y = %format_units(call.amount_y, pair.token_y.decimals),
        amount_y_min = %format_units(call.amount_y_min, pair.token_y.decimals),
        deadline = call.deadline,
        "wrote add-liquidity params"
    );
    Ok(())
}
