//! Trade statistics
//!
//! [`compute_stats`] is a pure function over a trade list producing exact
//! decimal figures in [`TradeStats`]. [`TradeStats::summary`] renders those
//! figures for display as fixed two-decimal text in [`StatsSummary`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::Trade;

/// Decimal places used for every rendered amount and ratio
pub const DISPLAY_DECIMALS: u32 = 2;

/// Exact statistics over a trade list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TradeStats {
    /// All trades, including breakeven ones
    pub total_trades: usize,
    /// Trades with `profit > 0`
    pub winning_trades: usize,
    /// Trades with `profit < 0`
    pub losing_trades: usize,
    /// Winners as a percentage of all trades
    pub win_rate: Decimal,
    /// Sum of winning profits
    pub total_profit: Decimal,
    /// Magnitude of the sum of losing profits
    pub total_loss: Decimal,
    /// Sum of all profits
    pub net_profit: Decimal,
    /// Mean winning profit
    pub average_win: Decimal,
    /// Mean losing magnitude
    pub average_loss: Decimal,
    /// `total_profit / total_loss`, zero when there is no loss
    pub profit_factor: Decimal,
    /// Highest winning profit
    pub largest_win: Decimal,
    /// Most negative losing profit
    pub largest_loss: Decimal,
}

/// Display form of [`TradeStats`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: String,
    pub total_profit: String,
    pub total_loss: String,
    pub net_profit: String,
    pub average_win: String,
    pub average_loss: String,
    pub profit_factor: String,
    pub largest_win: String,
    pub largest_loss: String,
}

impl Default for StatsSummary {
    fn default() -> Self {
        TradeStats::default().summary()
    }
}

/// Compute statistics over `trades`.
///
/// Breakeven trades count towards `total_trades` only. Every ratio whose
/// denominator is zero is reported as zero.
#[must_use]
pub fn compute_stats(trades: &[Trade]) -> TradeStats {
    let mut stats = TradeStats {
        total_trades: trades.len(),
        ..TradeStats::default()
    };

    let mut loss_sum = Decimal::ZERO;
    let mut largest_win: Option<Decimal> = None;
    let mut largest_loss: Option<Decimal> = None;

    for profit in trades.iter().map(Trade::profit) {
        stats.net_profit = stats.net_profit.saturating_add(profit);

        if profit > Decimal::ZERO {
            stats.winning_trades += 1;
            stats.total_profit = stats.total_profit.saturating_add(profit);
            largest_win = Some(largest_win.map_or(profit, |best| best.max(profit)));
        } else if profit < Decimal::ZERO {
            stats.losing_trades += 1;
            loss_sum = loss_sum.saturating_add(profit);
            largest_loss = Some(largest_loss.map_or(profit, |worst| worst.min(profit)));
        }
    }

    stats.total_loss = loss_sum.abs();
    stats.win_rate = ratio(
        Decimal::from(stats.winning_trades).saturating_mul(Decimal::ONE_HUNDRED),
        Decimal::from(stats.total_trades),
    );
    stats.average_win = ratio(stats.total_profit, Decimal::from(stats.winning_trades));
    stats.average_loss = ratio(stats.total_loss, Decimal::from(stats.losing_trades));
    stats.profit_factor = ratio(stats.total_profit, stats.total_loss);
    stats.largest_win = largest_win.unwrap_or_default();
    stats.largest_loss = largest_loss.unwrap_or_default();

    stats
}

/// Zero-safe division. Quotients beyond decimal range saturate.
fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or_else(|| {
        if numerator.is_sign_negative() == denominator.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

/// Render a value with exactly two decimals, rounding half away from zero
#[must_use]
pub fn format_decimal(value: Decimal) -> String {
    let mut rounded =
        value.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        // drop the sign of a negative value that rounded to zero
        rounded = Decimal::ZERO;
    }
    rounded.rescale(DISPLAY_DECIMALS);
    rounded.to_string()
}

impl TradeStats {
    /// Display form with every amount and ratio as two-decimal text
    #[must_use]
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            total_trades: self.total_trades,
            winning_trades: self.winning_trades,
            losing_trades: self.losing_trades,
            win_rate: format_decimal(self.win_rate),
            total_profit: format_decimal(self.total_profit),
            total_loss: format_decimal(self.total_loss),
            net_profit: format_decimal(self.net_profit),
            average_win: format_decimal(self.average_win),
            average_loss: format_decimal(self.average_loss),
            profit_factor: format_decimal(self.profit_factor),
            largest_win: format_decimal(self.largest_win),
            largest_loss: format_decimal(self.largest_loss),
        }
    }
}
