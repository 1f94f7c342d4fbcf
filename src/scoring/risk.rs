//! Risk-Adjusted Metrics: Sharpe, inverse volatility, drawdown.

use super::{NEUTRAL, tiers};
use crate::config::ScoringConfig;
use crate::context::PortfolioContext;

/// Weighted blend of the Sharpe, volatility and drawdown tiers.
pub fn risk_adjusted_score(ctx: &PortfolioContext, cfg: &ScoringConfig) -> f64 {
    if ctx.is_degenerate() {
        return NEUTRAL;
    }
    let w = &cfg.risk;
    sharpe_score(ctx, cfg) * w.sharpe
        + volatility_score(ctx, cfg) * w.volatility
        + drawdown_score(ctx, cfg) * w.drawdown
}

/// Value-weighted Sharpe ratio through the Sharpe tiers.
pub fn sharpe_score(ctx: &PortfolioContext, cfg: &ScoringConfig) -> f64 {
    ctx.weighted_metric(|m| m.sharpe)
        .map_or(NEUTRAL, |s| tiers::score_sharpe(s, &cfg.thresholds))
}

/// Value-weighted volatility through the volatility tiers (lower is better).
/// Non-positive volatilities are treated as unknown.
pub fn volatility_score(ctx: &PortfolioContext, cfg: &ScoringConfig) -> f64 {
    ctx.weighted_metric(|m| m.volatility.filter(|v| *v > 0.0))
        .map_or(NEUTRAL, |v| tiers::score_volatility(v, &cfg.thresholds))
}

/// Value-weighted absolute drawdown through the drawdown tiers.
pub fn drawdown_score(ctx: &PortfolioContext, cfg: &ScoringConfig) -> f64 {
    ctx.weighted_metric(|m| m.max_drawdown.map(f64::abs))
        .map_or(NEUTRAL, |d| tiers::score_drawdown(d, &cfg.thresholds))
}
