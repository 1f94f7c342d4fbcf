//! End-State Improvement: how far a sequence moves the portfolio.

use super::{NEUTRAL, diversification_score, portfolio_quality_score, risk_adjusted_score};
use crate::config::ScoringConfig;
use crate::context::PortfolioContext;

/// Average change in diversification, risk and quality from `start` to `end`,
/// mapped from [-1, 1] onto [0, 1]. No change scores exactly 0.5.
pub fn end_state_improvement_score(
    start: &PortfolioContext,
    end: &PortfolioContext,
    cfg: &ScoringConfig,
) -> f64 {
    if start.is_degenerate() || end.is_degenerate() {
        return NEUTRAL;
    }

    let div = diversification_score(end, cfg) - diversification_score(start, cfg);
    let risk = risk_adjusted_score(end, cfg) - risk_adjusted_score(start, cfg);
    let quality = portfolio_quality_score(end, cfg) - portfolio_quality_score(start, cfg);

    let avg = (div + risk + quality) / 3.0;
    if !avg.is_finite() {
        return NEUTRAL;
    }
    (0.5 + avg * 0.5).clamp(0.0, 1.0)
}
