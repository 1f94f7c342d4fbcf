//! Transaction cost modeling.

use serde::{Deserialize, Serialize};

use crate::action::ActionCandidate;

/// Default bid/ask spread cost as a fraction of trade value (0.1%).
pub const DEFAULT_SPREAD_PCT: f64 = 0.001;
/// Default slippage as a fraction of trade value (0.15%).
pub const DEFAULT_SLIPPAGE_PCT: f64 = 0.0015;

/// Models the cost of executing a sequence of trades.
///
/// Each trade pays `fixed_fee` plus a set of percentages of its absolute EUR
/// value. The sign of `value_eur` is ignored.
///
/// ```
/// use nanoscore::{ActionCandidate, CostModel, Side};
///
/// let model = CostModel::new(2.0, 0.002);
/// let buy = ActionCandidate::new(Side::Buy, "US0378331005", "AAPL", 10, 100.0);
/// // 2.00 + 1000 * (0.002 + 0.001 + 0.0015)
/// assert!((model.sequence_cost(&[buy]) - 6.5).abs() < 1e-9);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Fixed fee per trade (EUR).
    pub fixed_fee: f64,
    /// Broker commission as a fraction of trade value.
    pub variable_pct: f64,
    pub spread_pct: f64,
    pub slippage_pct: f64,
    /// Market impact as a fraction of trade value.
    pub impact_pct: f64,
}

impl CostModel {
    /// Broker fees plus default spread and slippage, no market impact.
    pub fn new(fixed_fee: f64, variable_pct: f64) -> Self {
        Self {
            fixed_fee,
            variable_pct,
            spread_pct: DEFAULT_SPREAD_PCT,
            slippage_pct: DEFAULT_SLIPPAGE_PCT,
            impact_pct: 0.0,
        }
    }

    /// A zero-cost model (no fees, no spread, no slippage).
    pub fn zero() -> Self {
        Self {
            fixed_fee: 0.0,
            variable_pct: 0.0,
            spread_pct: 0.0,
            slippage_pct: 0.0,
            impact_pct: 0.0,
        }
    }

    /// Sum of all percentage components.
    #[inline]
    pub fn total_pct(&self) -> f64 {
        self.variable_pct + self.spread_pct + self.slippage_pct + self.impact_pct
    }

    /// Cost of one trade with the given EUR value.
    #[inline]
    pub fn trade_cost(&self, value_eur: f64) -> f64 {
        self.fixed_fee + value_eur.abs() * self.total_pct()
    }

    /// Total cost of a sequence. Empty sequences cost nothing.
    pub fn sequence_cost(&self, sequence: &[ActionCandidate]) -> f64 {
        sequence.iter().map(|a| self.trade_cost(a.value_eur)).sum()
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::zero()
    }
}

/// Cost of a sequence with default spread and slippage and no market impact.
pub fn transaction_cost(sequence: &[ActionCandidate], fixed_fee: f64, variable_pct: f64) -> f64 {
    CostModel::new(fixed_fee, variable_pct).sequence_cost(sequence)
}

/// Cost of a sequence with every component spelled out.
pub fn transaction_cost_enhanced(
    sequence: &[ActionCandidate],
    fixed_fee: f64,
    variable_pct: f64,
    spread_pct: f64,
    slippage_pct: f64,
    impact_pct: f64,
) -> f64 {
    CostModel {
        fixed_fee,
        variable_pct,
        spread_pct,
        slippage_pct,
        impact_pct,
    }
    .sequence_cost(sequence)
}
