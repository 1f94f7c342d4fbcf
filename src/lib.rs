//! # nanoscore
//!
//! Deterministic end-state scoring for portfolio rebalancing sequences.
//!
//! A planner proposes sequences of buy/sell actions. Each sequence is
//! simulated to an end state, and the end state is scored on four
//! components whose weights adapt to the market regime:
//!
//! | Component | Base weight |
//! |-----------|-------------|
//! | **Portfolio Quality** | 35% |
//! | **Diversification & Alignment** | 30% |
//! | **Risk-Adjusted Metrics** | 25% |
//! | **End-State Improvement** | 10% |
//!
//! Transaction costs are subtracted as a penalty. Scores are always in
//! [0, 1]; missing metadata yields neutral sub-scores (0.5) instead of errors.
//!
//! ## Quick Start
//!
//! ```
//! use nanoscore::{
//!     ActionCandidate, EvaluationContext, PortfolioContext, SecurityMetrics, Side,
//!     ValueSimulator, evaluate_sequence,
//! };
//!
//! let start = PortfolioContext::new(10_000.0)
//!     .with_position("IE00B4L5Y983", 6_000.0)
//!     .with_metrics(
//!         "IE00B4L5Y983",
//!         SecurityMetrics::default().with_cagr(0.09).with_sharpe(1.1),
//!     );
//! let ctx = EvaluationContext::new(start, 4_000.0).with_cost_penalty(1.0);
//!
//! let seq = [ActionCandidate::new(Side::Buy, "IE00B4L5Y983", "IWDA", 20, 90.0)];
//! let result = evaluate_sequence(&seq, &ctx, &ValueSimulator);
//!
//! assert!(result.feasible);
//! assert!((0.0..=1.0).contains(&result.score));
//! assert_eq!(result.end_cash_eur, 2_200.0);
//! ```
//!
//! ## Transaction Costs
//!
//! ```
//! use nanoscore::{ActionCandidate, Side, transaction_cost};
//!
//! let seq = [
//!     ActionCandidate::new(Side::Buy, "A", "A", 10, 100.0),
//!     ActionCandidate::new(Side::Sell, "B", "B", 5, 100.0),
//! ];
//! // 2 x 2.00 EUR fixed + (0.2% fee + 0.1% spread + 0.15% slippage) of 1500 EUR
//! assert!((transaction_cost(&seq, 2.0, 0.002) - 10.75).abs() < 1e-9);
//! ```
//!
//! ## Feature flags
//!
//! - `parallel`: evaluate sequence batches on the rayon thread pool.

mod action;
pub mod config;
mod context;
mod cost_model;
mod error;
mod evaluator;
mod regime;
pub mod scoring;
mod sequence;
mod side;
mod tags;

// Re-export public API
pub use action::{ActionCandidate, sequence_key};
pub use config::{
    ComponentWeights, DiversificationWeights, QualityWeights, RegimeConfig, RiskWeights,
    ScoringConfig, TierThresholds,
};
pub use context::{PortfolioContext, SecurityMetrics};
pub use cost_model::{CostModel, transaction_cost, transaction_cost_enhanced};
pub use error::{ConfigError, Result};
pub use evaluator::{
    EndStateBreakdown, evaluate_end_state, evaluate_end_state_breakdown, score_with_cost,
};
pub use regime::{MarketRegime, regime_weights};
pub use scoring::{ComponentScores, NEUTRAL};
pub use sequence::{
    EvaluationContext, SequenceEvaluationResult, Simulator, ValueSimulator, best_sequence,
    check_sequence_feasibility, evaluate_batch, evaluate_sequence,
};
pub use side::{ParseSideError, Side};
pub use tags::{OTHER_CATEGORY, parse_category_tags};
