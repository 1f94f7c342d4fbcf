//! Portfolio Quality: expected total return, long-term promise, stability.

use super::{NEUTRAL, tiers};
use crate::config::ScoringConfig;
use crate::context::PortfolioContext;

/// CAGR estimate per unit of quality score when a security has no CAGR.
const QUALITY_TO_CAGR: f64 = 0.15;

/// Weighted blend of total return, long-term promise and stability.
pub fn portfolio_quality_score(ctx: &PortfolioContext, cfg: &ScoringConfig) -> f64 {
    if ctx.is_degenerate() {
        return NEUTRAL;
    }
    let w = &cfg.quality;
    total_return_score(ctx, cfg) * w.total_return
        + long_term_promise_score(ctx) * w.long_term_promise
        + stability_score(ctx, cfg) * w.stability
}

/// Value-weighted expected return (growth + dividend) run through the return curve.
///
/// Growth is the security's CAGR, or `0.15 * quality_score` when only a
/// quality score is known. Neutral if no position carries any of the three.
pub fn total_return_score(ctx: &PortfolioContext, cfg: &ScoringConfig) -> f64 {
    let mut total_return = 0.0;
    let mut seen = false;

    for (isin, weight) in ctx.weighted_positions() {
        let Some(m) = ctx.metrics_for(isin) else {
            continue;
        };
        let growth = m
            .cagr
            .or_else(|| m.quality_score.map(|q| q * QUALITY_TO_CAGR));
        if let Some(g) = growth {
            total_return += g * weight;
            seen = true;
        }
        if let Some(d) = m.dividend_yield {
            total_return += d * weight;
            seen = true;
        }
    }

    if !seen {
        return NEUTRAL;
    }
    tiers::score_total_return(total_return, &cfg.thresholds)
}

/// Value-weighted quality score.
pub fn long_term_promise_score(ctx: &PortfolioContext) -> f64 {
    ctx.weighted_metric(|m| m.quality_score).unwrap_or(NEUTRAL)
}

/// 60% volatility tier, 40% drawdown tier; each neutral when unknown.
pub fn stability_score(ctx: &PortfolioContext, cfg: &ScoringConfig) -> f64 {
    let t = &cfg.thresholds;
    let vol = ctx
        .weighted_metric(|m| m.volatility.filter(|v| *v > 0.0))
        .map_or(NEUTRAL, |v| tiers::score_volatility(v, t));
    let dd = ctx
        .weighted_metric(|m| m.max_drawdown.map(f64::abs))
        .map_or(NEUTRAL, |d| tiers::score_drawdown(d, t));
    vol * 0.6 + dd * 0.4
}
