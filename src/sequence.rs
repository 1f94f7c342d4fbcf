//! Sequence evaluation: feasibility, simulation, cost, end-state score.
//!
//! The planner hands every leaf sequence to [`evaluate_sequence`] and ranks
//! the results by `score`. Simulation is delegated to a [`Simulator`];
//! [`ValueSimulator`] is a value-based reference implementation.

use std::cmp::Ordering;

use log::{debug, trace};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::action::ActionCandidate;
use crate::config::ScoringConfig;
use crate::context::{PortfolioContext, SecurityMetrics};
use crate::cost_model::CostModel;
use crate::evaluator::score_with_cost;

/// Rounding slack when comparing a sell against the held position value (EUR).
const HOLDING_SLACK_EUR: f64 = 0.01;

/// Everything needed to evaluate sequences from one starting state.
#[derive(Clone, Debug, Serialize)]
pub struct EvaluationContext {
    /// State before any action executes.
    pub portfolio_context: PortfolioContext,
    pub available_cash_eur: f64,
    /// Metadata for securities not yet held, keyed by ISIN. Copied into the
    /// end state when a sequence buys into them.
    pub security_metadata: FxHashMap<String, SecurityMetrics>,
    /// Fixed fee per trade (EUR).
    pub transaction_cost_fixed: f64,
    /// Variable fee as a fraction of trade value.
    pub transaction_cost_percent: f64,
    /// Multiplier on `cost / end_value` subtracted from the score (0 disables).
    pub cost_penalty_factor: f64,
    pub scoring_config: ScoringConfig,
}

impl EvaluationContext {
    /// Context with the default fees (2.00 EUR + 0.2%), no cost penalty and
    /// the default scoring profile.
    pub fn new(portfolio_context: PortfolioContext, available_cash_eur: f64) -> Self {
        Self {
            portfolio_context,
            available_cash_eur,
            security_metadata: FxHashMap::default(),
            transaction_cost_fixed: 2.0,
            transaction_cost_percent: 0.002,
            cost_penalty_factor: 0.0,
            scoring_config: ScoringConfig::default(),
        }
    }

    pub fn with_costs(mut self, fixed: f64, percent: f64) -> Self {
        self.transaction_cost_fixed = fixed;
        self.transaction_cost_percent = percent;
        self
    }

    pub fn with_security_metadata(mut self, isin: impl Into<String>, metrics: SecurityMetrics) -> Self {
        self.security_metadata.insert(isin.into(), metrics);
        self
    }

    pub fn with_cost_penalty(mut self, factor: f64) -> Self {
        self.cost_penalty_factor = factor;
        self
    }

    pub fn with_scoring_config(mut self, cfg: ScoringConfig) -> Self {
        self.scoring_config = cfg;
        self
    }

    /// Cost model implied by the configured fees.
    pub fn cost_model(&self) -> CostModel {
        CostModel::new(self.transaction_cost_fixed, self.transaction_cost_percent)
    }
}

/// Produces the end state of executing a sequence.
pub trait Simulator {
    /// Return `(end_portfolio, end_cash_eur)`.
    fn simulate(
        &self,
        sequence: &[ActionCandidate],
        ctx: &EvaluationContext,
    ) -> (PortfolioContext, f64);
}

impl<F> Simulator for F
where
    F: Fn(&[ActionCandidate], &EvaluationContext) -> (PortfolioContext, f64),
{
    fn simulate(
        &self,
        sequence: &[ActionCandidate],
        ctx: &EvaluationContext,
    ) -> (PortfolioContext, f64) {
        self(sequence, ctx)
    }
}

/// Moves value between positions and cash at the candidates' EUR values.
///
/// Sells reduce the position (dropping it once it reaches zero) and add cash.
/// Buys the remaining cash cannot cover are skipped. Total value is
/// unchanged: trading converts between cash and holdings. A buy into a
/// security with no metrics in the start state picks them up from
/// [`EvaluationContext::security_metadata`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueSimulator;

impl Simulator for ValueSimulator {
    fn simulate(
        &self,
        sequence: &[ActionCandidate],
        ctx: &EvaluationContext,
    ) -> (PortfolioContext, f64) {
        let mut end = ctx.portfolio_context.clone();
        let mut cash = ctx.available_cash_eur;

        for action in sequence {
            let value = action.value_eur.abs();
            if action.is_sell() {
                let held = end.positions.get(&action.isin).copied().unwrap_or(0.0);
                let remaining = (held - value).max(0.0);
                if remaining > 0.0 {
                    end.positions.insert(action.isin.clone(), remaining);
                } else {
                    end.positions.remove(&action.isin);
                }
                cash += value;
            } else {
                if value > cash {
                    continue;
                }
                *end.positions.entry(action.isin.clone()).or_insert(0.0) += value;
                cash -= value;
                if let Some(meta) = ctx.security_metadata.get(&action.isin) {
                    end.metrics
                        .entry(action.isin.clone())
                        .or_insert_with(|| meta.clone());
                }
            }
        }

        (end, cash)
    }
}

/// Cash and holdings check, walking the sequence in order.
///
/// A buy needs its value in running cash; a sell needs at least its value
/// held in the position. Sell proceeds become available to later buys.
pub fn check_sequence_feasibility(
    sequence: &[ActionCandidate],
    available_cash_eur: f64,
    ctx: &PortfolioContext,
) -> bool {
    let mut cash = available_cash_eur;
    let mut held = ctx.positions.clone();

    for action in sequence {
        let value = action.value_eur.abs();
        if action.is_buy() {
            if value > cash {
                return false;
            }
            cash -= value;
            *held.entry(action.isin.clone()).or_insert(0.0) += value;
        } else {
            let position = held.get(&action.isin).copied().unwrap_or(0.0);
            if position + HOLDING_SLACK_EUR < value {
                return false;
            }
            held.insert(action.isin.clone(), (position - value).max(0.0));
            cash += value;
        }
    }
    true
}

/// Verdict for one sequence.
#[derive(Clone, Debug, Serialize)]
pub struct SequenceEvaluationResult {
    pub sequence: Vec<ActionCandidate>,
    /// End-state score in [0, 1]; exactly 0 when infeasible.
    pub score: f64,
    pub end_cash_eur: f64,
    pub end_portfolio: PortfolioContext,
    pub transaction_costs: f64,
    pub feasible: bool,
}

/// Evaluate one sequence: feasibility, then simulation, cost and scoring.
///
/// Infeasible sequences short-circuit to a zero score without simulating or
/// scoring; their end state is the start state.
pub fn evaluate_sequence<S>(
    sequence: &[ActionCandidate],
    ctx: &EvaluationContext,
    simulator: &S,
) -> SequenceEvaluationResult
where
    S: Simulator + ?Sized,
{
    let transaction_costs = ctx.cost_model().sequence_cost(sequence);

    if !check_sequence_feasibility(sequence, ctx.available_cash_eur, &ctx.portfolio_context) {
        debug!(
            "Infeasible sequence ({} actions, cash {:.2} EUR)",
            sequence.len(),
            ctx.available_cash_eur
        );
        return SequenceEvaluationResult {
            sequence: sequence.to_vec(),
            score: 0.0,
            end_cash_eur: ctx.available_cash_eur,
            end_portfolio: ctx.portfolio_context.clone(),
            transaction_costs,
            feasible: false,
        };
    }

    let (end_portfolio, end_cash_eur) = simulator.simulate(sequence, ctx);
    let score = score_with_cost(
        &ctx.portfolio_context,
        &end_portfolio,
        transaction_costs,
        ctx.cost_penalty_factor,
        &ctx.scoring_config,
    )
    .score;
    trace!("Sequence scored {score:.6} ({} actions)", sequence.len());

    SequenceEvaluationResult {
        sequence: sequence.to_vec(),
        score,
        end_cash_eur,
        end_portfolio,
        transaction_costs,
        feasible: true,
    }
}

/// Evaluate many sequences from the same starting state.
///
/// Results are returned in input order. With the `parallel` feature the
/// sequences are evaluated on the rayon thread pool.
pub fn evaluate_batch<S>(
    sequences: &[Vec<ActionCandidate>],
    ctx: &EvaluationContext,
    simulator: &S,
) -> Vec<SequenceEvaluationResult>
where
    S: Simulator + Sync + ?Sized,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        sequences
            .par_iter()
            .map(|seq| evaluate_sequence(seq, ctx, simulator))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        sequences
            .iter()
            .map(|seq| evaluate_sequence(seq, ctx, simulator))
            .collect()
    }
}

/// Pick the best feasible result.
///
/// Highest score wins; equal scores prefer the lower transaction cost, then
/// the earlier result, so the choice is deterministic.
pub fn best_sequence(results: &[SequenceEvaluationResult]) -> Option<&SequenceEvaluationResult> {
    results
        .iter()
        .filter(|r| r.feasible)
        .reduce(|best, r| match rank(r, best) {
            Ordering::Greater => r,
            _ => best,
        })
}

fn rank(a: &SequenceEvaluationResult, b: &SequenceEvaluationResult) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| b.transaction_costs.total_cmp(&a.transaction_costs))
}
