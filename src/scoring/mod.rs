//! Component scorers: pure maps from portfolio snapshots to [0, 1].
//!
//! Every scorer returns [`NEUTRAL`] when its inputs are missing or the
//! snapshot is degenerate, so partial metadata never aborts an evaluation.
//!
//! | Component | Inputs | Sub-scores |
//! |-----------|--------|------------|
//! | Portfolio Quality | end state | total return, long-term promise, stability |
//! | Diversification & Alignment | end state | geography, industry, optimizer |
//! | Risk-Adjusted Metrics | end state | Sharpe, volatility, drawdown |
//! | End-State Improvement | start and end | average delta of the three above |

mod diversification;
mod improvement;
mod quality;
mod risk;
pub mod tiers;

pub use diversification::{
    category_allocation, diversification_score, geography_score, industry_score,
    optimizer_alignment_score,
};
pub use improvement::end_state_improvement_score;
pub use quality::{
    long_term_promise_score, portfolio_quality_score, stability_score, total_return_score,
};
pub use risk::{drawdown_score, risk_adjusted_score, sharpe_score, volatility_score};

use serde::Serialize;

use crate::config::ScoringConfig;
use crate::context::PortfolioContext;

/// Score used whenever the data needed for a sub-score is absent.
pub const NEUTRAL: f64 = 0.5;

/// The three single-snapshot component scores.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ComponentScores {
    pub quality: f64,
    pub diversification: f64,
    pub risk: f64,
}

impl ComponentScores {
    /// Score one snapshot.
    pub fn of(ctx: &PortfolioContext, cfg: &ScoringConfig) -> Self {
        Self {
            quality: portfolio_quality_score(ctx, cfg),
            diversification: diversification_score(ctx, cfg),
            risk: risk_adjusted_score(ctx, cfg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_portfolio_is_neutral_everywhere() {
        let cfg = ScoringConfig::default();
        for ctx in [PortfolioContext::new(0.0), PortfolioContext::new(-10.0)] {
            let s = ComponentScores::of(&ctx, &cfg);
            assert_eq!(s.quality, NEUTRAL);
            assert_eq!(s.diversification, NEUTRAL);
            assert_eq!(s.risk, NEUTRAL);
        }
    }
}
