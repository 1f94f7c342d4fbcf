//! End-state objective function used to rank candidate sequences.
//!
//! The score depends only on the start snapshot, the end snapshot and the
//! sequence's transaction cost. Action priority, reasons and sequence length
//! have no influence: two sequences that reach the same end state at the same
//! cost score identically.

use serde::Serialize;

use crate::action::ActionCandidate;
use crate::config::{ComponentWeights, ScoringConfig};
use crate::context::PortfolioContext;
use crate::cost_model::CostModel;
use crate::regime::regime_weights;
use crate::scoring::{ComponentScores, end_state_improvement_score};

/// Every intermediate value behind an end-state score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EndStateBreakdown {
    /// Component scores of the end state.
    pub components: ComponentScores,
    /// Improvement from start to end.
    pub improvement: f64,
    /// Regime-adjusted weights that combined the components.
    pub weights: ComponentWeights,
    /// Weighted sum before the cost penalty.
    pub raw_score: f64,
    pub transaction_cost: f64,
    /// Amount subtracted for costs.
    pub cost_penalty: f64,
    /// Final score in [0, 1].
    pub score: f64,
}

/// Score an end state with the cost of the sequence that reached it.
///
/// Equivalent to [`evaluate_end_state_breakdown`]`(..).score`.
pub fn evaluate_end_state(
    start: &PortfolioContext,
    end: &PortfolioContext,
    sequence: &[ActionCandidate],
    fixed_fee: f64,
    variable_pct: f64,
    cost_penalty_factor: f64,
    cfg: &ScoringConfig,
) -> f64 {
    evaluate_end_state_breakdown(
        start,
        end,
        sequence,
        &CostModel::new(fixed_fee, variable_pct),
        cost_penalty_factor,
        cfg,
    )
    .score
}

/// Score an end state and return the full breakdown.
///
/// 1. Weights come from the end state's regime score.
/// 2. Quality, diversification and risk score the end state; improvement
///    compares start and end.
/// 3. A penalty of `cost / end.total_value * cost_penalty_factor` is
///    subtracted when the factor is positive and the end state is not
///    degenerate.
/// 4. The result is clamped to [0, 1].
pub fn evaluate_end_state_breakdown(
    start: &PortfolioContext,
    end: &PortfolioContext,
    sequence: &[ActionCandidate],
    cost_model: &CostModel,
    cost_penalty_factor: f64,
    cfg: &ScoringConfig,
) -> EndStateBreakdown {
    score_with_cost(
        start,
        end,
        cost_model.sequence_cost(sequence),
        cost_penalty_factor,
        cfg,
    )
}

/// Score an end state against an already computed transaction cost.
///
/// Used when the caller has priced the sequence itself; the result equals
/// [`evaluate_end_state_breakdown`] for a sequence of that cost.
pub fn score_with_cost(
    start: &PortfolioContext,
    end: &PortfolioContext,
    transaction_cost: f64,
    cost_penalty_factor: f64,
    cfg: &ScoringConfig,
) -> EndStateBreakdown {
    let weights = regime_weights(end.market_regime_score, cfg);
    let components = ComponentScores::of(end, cfg);
    let improvement = end_state_improvement_score(start, end, cfg);

    let raw_score = components.quality * weights.quality
        + components.diversification * weights.diversification
        + components.risk * weights.risk
        + improvement * weights.improvement;

    let mut score = raw_score;
    let mut cost_penalty = 0.0;
    if cost_penalty_factor > 0.0 && end.total_value > 0.0 {
        cost_penalty = transaction_cost / end.total_value * cost_penalty_factor;
        score = (score - cost_penalty).max(0.0);
    }

    EndStateBreakdown {
        components,
        improvement,
        weights,
        raw_score,
        transaction_cost,
        cost_penalty,
        score: clamp_unit(score),
    }
}

/// Clamp to [0, 1]; NaN collapses to 0.
#[inline]
fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}
