//! Piecewise tier curves mapping raw portfolio metrics to [0, 1].
//!
//! Every curve takes its breakpoints from [`TierThresholds`]; with the default
//! profile they reproduce the reference tiers exactly.

use crate::config::TierThresholds;

/// Score an expected total return (CAGR + dividend yield).
///
/// Peaks at 1.0 on the target, declines gently to 0.95 at the excellent mark
/// (and stays there), and falls off linearly below target down to 0 at a zero
/// return. Negative returns floor at 0.1.
pub fn score_total_return(total_return: f64, t: &TierThresholds) -> f64 {
    let target = t.total_return_target;
    let excellent = t.total_return_excellent;
    let floor = t.total_return_floor;

    if total_return >= excellent {
        0.95
    } else if total_return >= target {
        1.0 - (total_return - target) / (excellent - target) * 0.05
    } else if total_return >= floor {
        0.5 + (total_return - floor) / (target - floor) * 0.5
    } else if total_return >= 0.0 {
        total_return / floor * 0.5
    } else {
        0.1
    }
}

/// Score an annualized volatility; lower is better.
pub fn score_volatility(vol: f64, t: &TierThresholds) -> f64 {
    if vol <= t.volatility_low {
        1.0
    } else if vol <= t.volatility_mid {
        1.0 - (vol - t.volatility_low) / (t.volatility_mid - t.volatility_low) * 0.3
    } else if vol <= t.volatility_high {
        0.7 - (vol - t.volatility_mid) / (t.volatility_high - t.volatility_mid) * 0.4
    } else {
        (0.3 - (vol - t.volatility_high)).max(0.1)
    }
}

/// Score a maximum drawdown; the sign is ignored, smaller is better.
pub fn score_drawdown(drawdown: f64, t: &TierThresholds) -> f64 {
    let dd = drawdown.abs();
    if dd <= t.drawdown_low {
        1.0
    } else if dd <= t.drawdown_mid {
        1.0 - (dd - t.drawdown_low) / (t.drawdown_mid - t.drawdown_low) * 0.2
    } else if dd <= t.drawdown_high {
        0.8 - (dd - t.drawdown_mid) / (t.drawdown_high - t.drawdown_mid) * 0.2
    } else {
        (0.6 - (dd - t.drawdown_high) * 2.0).max(0.1)
    }
}

/// Score a Sharpe ratio; negative Sharpe scores zero.
pub fn score_sharpe(sharpe: f64, t: &TierThresholds) -> f64 {
    if sharpe >= t.sharpe_excellent {
        1.0
    } else if sharpe >= t.sharpe_good {
        0.7 + (sharpe - t.sharpe_good) / (t.sharpe_excellent - t.sharpe_good) * 0.3
    } else if sharpe >= t.sharpe_fair {
        0.4 + (sharpe - t.sharpe_fair) / (t.sharpe_good - t.sharpe_fair) * 0.3
    } else if sharpe >= 0.0 {
        sharpe / t.sharpe_fair * 0.4
    } else {
        0.0
    }
}

/// Map an average allocation deviation to a score: 0 deviation is 1.0,
/// `scale` or more is 0.0, linear in between.
#[inline]
pub fn score_deviation(avg_deviation: f64, scale: f64) -> f64 {
    (1.0 - avg_deviation / scale).max(0.0)
}
