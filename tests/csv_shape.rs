use lbdist::distribution::{get_liquidity_config, LiquidityDistribution, LiquidityDistributionParams, PRECISION};
use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn out_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lbdist_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn lbdist(args: &[&str]) -> std::process::ExitStatus {
    Command::new(env!("CARGO_BIN_EXE_lbdist"))
        .args(args)
        .status()
        .expect("run lbdist")
}

#[test]
fn csv_has_one_header_and_exact_sums() {
    let out = out_dir("csv");
    let status = lbdist(&["--shape", "curve", "--out-dir", out.to_str().unwrap(), "--no-draw"]);
    assert!(status.success());

    let s = fs::read_to_string(out.join("distribution.csv")).unwrap();
    let header_count = s.lines().filter(|l| l.starts_with("delta_id,")).count();
    assert_eq!(header_count, 1, "CSV must have exactly one header row");
    assert_eq!(
        s.lines().next().unwrap(),
        "delta_id,distribution_x,distribution_y,pct_x,pct_y"
    );

    let rows: Vec<Vec<&str>> = s.lines().skip(1).map(|l| l.split(',').collect()).collect();
    assert_eq!(rows.len(), 11);
    let delta_ids: Vec<i32> = rows.iter().map(|r| r[0].parse().unwrap()).collect();
    assert_eq!(delta_ids, (-5..=5).collect::<Vec<i32>>());
    let sum_x: u128 = rows.iter().map(|r| r[1].parse::<u128>().unwrap()).sum();
    let sum_y: u128 = rows.iter().map(|r| r[2].parse::<u128>().unwrap()).sum();
    assert_eq!(sum_x, PRECISION);
    assert_eq!(sum_y, PRECISION);
    assert!(!out.join("weights.png").exists(), "--no-draw must skip the chart");

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn json_matches_library_preset() {
    let out = out_dir("json");
    let status = lbdist(&["--shape", "bid-ask", "--out-dir", out.to_str().unwrap(), "--no-draw"]);
    assert!(status.success());

    let text = fs::read_to_string(out.join("distribution.json")).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["shape"], "BID_ASK");
    assert_eq!(v["radius"], 5);
    let p: LiquidityDistributionParams = serde_json::from_value(v).unwrap();
    assert_eq!(&p, get_liquidity_config(LiquidityDistribution::BidAsk));

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn router_params_are_written_with_slippage_floors() {
    let out = out_dir("router");
    let status = lbdist(&[
        "--shape",
        "spot",
        "--active-id",
        "8375355",
        "--amount-x",
        "100",
        "--amount-y",
        "10",
        "--to",
        "0xE94bC997f8Ad62f29683BA6dd1cE7d3B8C5fd315",
        "--out-dir",
        out.to_str().unwrap(),
        "--no-draw",
    ]);
    assert!(status.success());

    let text = fs::read_to_string(out.join("add_liquidity.json")).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["method"], "addLiquidityNATIVE");
    assert_eq!(v["value"], "100000000000000000000");
    let params = &v["params"];
    assert_eq!(params["amountXMin"], "99500000000000000000");
    assert_eq!(params["amountYMin"], "9950000");
    assert_eq!(params["binStep"], 15);
    assert_eq!(params["idSlippage"], 5);
    assert_eq!(params["distributionX"][5], "90909090909090909");
    assert_eq!(params["distributionY"][0], "181818181818181819");

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn invalid_inputs_fail() {
    let out = out_dir("invalid");
    let dir = out.to_str().unwrap();
    assert!(!lbdist(&["--shape", "pyramid", "--out-dir", dir, "--no-draw"]).success());
    assert!(!lbdist(&["--radius", "0", "--out-dir", dir, "--no-draw"]).success());
    assert!(!lbdist(&["--active-id", "8375355", "--out-dir", dir, "--no-draw"]).success());
    assert!(!lbdist(&[
        "--active-id",
        "2",
        "--amount-x",
        "1",
        "--amount-y",
        "1",
        "--to",
        "0xE94bC997f8Ad62f29683BA6dd1cE7d3B8C5fd315",
        "--out-dir",
        dir,
        "--no-draw",
    ])
    .success());
    let _ = fs::remove_dir_all(&out);
}

#[test]
fn bad_recipient_fails_before_writing_anything() {
    let out = out_dir("bad_to");
    let status = lbdist(&[
        "--active-id",
        "8375355",
        "--amount-x",
        "1",
        "--amount-y",
        "1",
        "--to",
        "0x1234",
        "--out-dir",
        out.to_str().unwrap(),
        "--no-draw",
    ]);
    assert!(!status.success());
    assert!(!out.join("distribution.csv").exists());
    assert!(!out.join("distribution.json").exists());
    let _ = fs::remove_dir_all(&out);
}
