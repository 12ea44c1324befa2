//! Trade statistics tests

use pretty_assertions::assert_eq;
use rstest::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use trade_relay::{StatsSummary, compute_stats, models::Trade};

use super::helpers::trades_with_profits;

#[test]
fn test_empty_trade_list_is_all_zero() {
    let stats = compute_stats(&[]);
    let summary = stats.summary();

    assert_eq!(
        summary,
        StatsSummary {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate: "0.00".to_string(),
            total_profit: "0.00".to_string(),
            total_loss: "0.00".to_string(),
            net_profit: "0.00".to_string(),
            average_win: "0.00".to_string(),
            average_loss: "0.00".to_string(),
            profit_factor: "0.00".to_string(),
            largest_win: "0.00".to_string(),
            largest_loss: "0.00".to_string(),
        }
    );
    assert_eq!(summary, StatsSummary::default());
}

#[test]
fn test_empty_summary_serializes_every_field() {
    let value = serde_json::to_value(compute_stats(&[]).summary()).unwrap();
    assert_eq!(
        value,
        json!({
            "totalTrades": 0,
            "winningTrades": 0,
            "losingTrades": 0,
            "winRate": "0.00",
            "totalProfit": "0.00",
            "totalLoss": "0.00",
            "netProfit": "0.00",
            "averageWin": "0.00",
            "averageLoss": "0.00",
            "profitFactor": "0.00",
            "largestWin": "0.00",
            "largestLoss": "0.00"
        })
    );
}

#[test]
fn test_reference_example() {
    let trades = trades_with_profits(&[100.0, -40.0, 25.0]);
    let summary = compute_stats(&trades).summary();

    assert_eq!(summary.total_trades, 3);
    assert_eq!(summary.winning_trades, 2);
    assert_eq!(summary.losing_trades, 1);
    assert_eq!(summary.win_rate, "66.67");
    assert_eq!(summary.total_profit, "125.00");
    assert_eq!(summary.total_loss, "40.00");
    assert_eq!(summary.net_profit, "85.00");
    assert_eq!(summary.average_win, "62.50");
    assert_eq!(summary.average_loss, "40.00");
    assert_eq!(summary.profit_factor, "3.13");
    assert_eq!(summary.largest_win, "100.00");
    assert_eq!(summary.largest_loss, "-40.00");
}

#[test]
fn test_numeric_stats_are_exact() {
    let trades = trades_with_profits(&[100.0, -40.0, 25.0]);
    let stats = compute_stats(&trades);

    assert_eq!(stats.total_profit, dec!(125));
    assert_eq!(stats.total_loss, dec!(40));
    assert_eq!(stats.net_profit, dec!(85));
    assert_eq!(stats.average_win, dec!(62.5));
    assert_eq!(stats.profit_factor, dec!(3.125));
    assert_eq!(stats.largest_loss, dec!(-40));
}

#[test]
fn test_breakeven_trades_only_count_towards_total() {
    let trades = trades_with_profits(&[0.0, 10.0, 0.0, -5.0]);
    let stats = compute_stats(&trades);

    assert_eq!(stats.total_trades, 4);
    assert_eq!(stats.winning_trades, 1);
    assert_eq!(stats.losing_trades, 1);
    assert!(stats.winning_trades + stats.losing_trades < stats.total_trades);
    assert_eq!(stats.summary().win_rate, "25.00");
    assert_eq!(stats.net_profit, dec!(5));
}

#[test]
fn test_only_breakeven_trades() {
    let summary = compute_stats(&trades_with_profits(&[0.0, 0.0])).summary();

    assert_eq!(summary.total_trades, 2);
    assert_eq!(summary.winning_trades, 0);
    assert_eq!(summary.losing_trades, 0);
    assert_eq!(summary.win_rate, "0.00");
    assert_eq!(summary.largest_win, "0.00");
    assert_eq!(summary.largest_loss, "0.00");
}

#[rstest]
#[case::all_winners(&[10.0, 20.0, 30.0])]
#[case::single_winner(&[0.01])]
#[case::winners_and_breakeven(&[5.0, 0.0])]
fn test_profit_factor_is_zero_without_losses(#[case] profits: &[f64]) {
    let stats = compute_stats(&trades_with_profits(profits));

    assert_eq!(stats.total_loss, Decimal::ZERO);
    assert_eq!(stats.profit_factor, Decimal::ZERO);
    assert_eq!(stats.summary().profit_factor, "0.00");
}

#[test]
fn test_all_losers() {
    let summary = compute_stats(&trades_with_profits(&[-10.0, -30.5])).summary();

    assert_eq!(summary.win_rate, "0.00");
    assert_eq!(summary.total_profit, "0.00");
    assert_eq!(summary.total_loss, "40.50");
    assert_eq!(summary.net_profit, "-40.50");
    assert_eq!(summary.average_win, "0.00");
    assert_eq!(summary.average_loss, "20.25");
    assert_eq!(summary.profit_factor, "0.00");
    assert_eq!(summary.largest_win, "0.00");
    assert_eq!(summary.largest_loss, "-30.50");
}

#[rstest]
#[case(&[])]
#[case(&[1.5])]
#[case(&[-2.25, 3.75, 0.0, -0.5])]
#[case(&[12.34, -56.78, 90.12, -0.01, 0.0, 7.0])]
#[case(&[-1000.0, 999.99, 0.01])]
fn test_net_profit_identity(#[case] profits: &[f64]) {
    let stats = compute_stats(&trades_with_profits(profits));

    assert_eq!(stats.net_profit, stats.total_profit - stats.total_loss);
    assert!(stats.winning_trades + stats.losing_trades <= stats.total_trades);
    assert!(stats.total_loss >= Decimal::ZERO);
}

#[test]
fn test_compute_stats_is_idempotent() {
    let trades = trades_with_profits(&[3.3, -1.1, 0.0, 8.8]);

    assert_eq!(compute_stats(&trades), compute_stats(&trades));
    assert_eq!(compute_stats(&trades).summary(), compute_stats(&trades).summary());
}

#[test]
fn test_decimal_sums_do_not_drift() {
    // 0.1 + 0.2 is exact in decimal arithmetic
    let stats = compute_stats(&trades_with_profits(&[0.1, 0.2]));
    assert_eq!(stats.total_profit, dec!(0.3));
    assert_eq!(stats.average_win, dec!(0.15));
    assert_eq!(stats.summary().average_win, "0.15");
}

#[test]
fn test_only_profit_is_interpreted() {
    let trades: Vec<Trade> = serde_json::from_value(json!([
        {"ticket": 1, "symbol": "EURUSD", "volume": 1.0, "profit": 50, "swap": -3.0},
        {"ticket": 2, "symbol": "GBPUSD", "volume": 0.5, "profit": -20, "commission": -7.0}
    ]))
    .unwrap();

    let summary = compute_stats(&trades).summary();
    assert_eq!(summary.net_profit, "30.00");
    assert_eq!(summary.profit_factor, "2.50");
}
