//! Diversification & Alignment: geography fit, industry fit, optimizer fit.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::{NEUTRAL, tiers};
use crate::config::ScoringConfig;
use crate::context::{PortfolioContext, SecurityMetrics};
use crate::tags::fan_out;

/// Weighted blend of geography, industry and optimizer alignment.
pub fn diversification_score(ctx: &PortfolioContext, cfg: &ScoringConfig) -> f64 {
    if ctx.is_degenerate() {
        return NEUTRAL;
    }
    let w = &cfg.diversification;
    geography_score(ctx, cfg) * w.geography
        + industry_score(ctx, cfg) * w.industry
        + optimizer_alignment_score(ctx, cfg) * w.optimizer
}

/// Fit of the actual geography allocation to the geography targets.
pub fn geography_score(ctx: &PortfolioContext, cfg: &ScoringConfig) -> f64 {
    category_alignment(
        ctx,
        &ctx.geography_weights,
        |m| &m.geographies,
        cfg.thresholds.deviation_scale,
    )
}

/// Fit of the actual industry allocation to the industry targets.
pub fn industry_score(ctx: &PortfolioContext, cfg: &ScoringConfig) -> f64 {
    category_alignment(
        ctx,
        &ctx.industry_weights,
        |m| &m.industries,
        cfg.thresholds.deviation_scale,
    )
}

/// Fit of per-ISIN weights to the optimizer's target weights (no fan-out).
pub fn optimizer_alignment_score(ctx: &PortfolioContext, cfg: &ScoringConfig) -> f64 {
    if ctx.is_degenerate() || ctx.optimizer_target_weights.is_empty() {
        return NEUTRAL;
    }
    let deviations = ctx.optimizer_target_weights.iter().map(|(isin, target)| {
        let current = ctx.positions.get(isin).copied().unwrap_or(0.0) / ctx.total_value;
        (current - target).abs()
    });
    let avg = mean(deviations);
    tiers::score_deviation(avg, cfg.thresholds.optimizer_deviation_scale)
}

/// Allocation per category, with each position's value split equally across
/// its tags (untagged positions land in `OTHER`).
pub fn category_allocation<'a, F>(ctx: &'a PortfolioContext, tags_of: F) -> FxHashMap<&'a str, f64>
where
    F: Fn(&'a SecurityMetrics) -> &'a Vec<String>,
{
    let mut values: FxHashMap<&'a str, f64> = FxHashMap::default();
    for (isin, value) in &ctx.positions {
        let tags: &[String] = match ctx.metrics.get(isin) {
            Some(m) => tags_of(m),
            None => &[],
        };
        fan_out(tags, *value, |tag, share| {
            *values.entry(tag).or_insert(0.0) += share;
        });
    }
    values
}

fn category_alignment<'a, F>(
    ctx: &'a PortfolioContext,
    targets: &BTreeMap<String, f64>,
    tags_of: F,
    scale: f64,
) -> f64
where
    F: Fn(&'a SecurityMetrics) -> &'a Vec<String>,
{
    if ctx.is_degenerate() || targets.is_empty() {
        return NEUTRAL;
    }
    let tagged = ctx.metrics.values().any(|m| !tags_of(m).is_empty());
    if !tagged {
        return NEUTRAL;
    }

    let allocation = category_allocation(ctx, tags_of);
    let deviations = targets.iter().map(|(category, target)| {
        let current = allocation.get(category.as_str()).copied().unwrap_or(0.0) / ctx.total_value;
        (current - target).abs()
    });
    tiers::score_deviation(mean(deviations), scale)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}
