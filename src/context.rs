//! Portfolio state snapshots consumed by the scorers.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::tags::{parse_category_tags, serde_tags};

/// Per-security metrics. Every field is optional: an absent metric means
/// "unknown" and scores neutrally, it never reads as zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityMetrics {
    /// Compound annual growth rate (0.12 = 12%).
    pub cagr: Option<f64>,
    pub dividend_yield: Option<f64>,
    /// Annualized volatility.
    pub volatility: Option<f64>,
    /// Maximum drawdown; sign is ignored.
    pub max_drawdown: Option<f64>,
    pub sharpe: Option<f64>,
    /// Quality score in [0, 1].
    pub quality_score: Option<f64>,
    /// Parsed geography tags (empty = untagged).
    #[serde(with = "serde_tags")]
    pub geographies: Vec<String>,
    /// Parsed industry tags (empty = untagged).
    #[serde(with = "serde_tags")]
    pub industries: Vec<String>,
}

impl SecurityMetrics {
    pub fn with_cagr(mut self, cagr: f64) -> Self {
        self.cagr = Some(cagr);
        self
    }

    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = Some(dividend_yield);
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    pub fn with_max_drawdown(mut self, max_drawdown: f64) -> Self {
        self.max_drawdown = Some(max_drawdown);
        self
    }

    pub fn with_sharpe(mut self, sharpe: f64) -> Self {
        self.sharpe = Some(sharpe);
        self
    }

    pub fn with_quality_score(mut self, quality_score: f64) -> Self {
        self.quality_score = Some(quality_score);
        self
    }

    /// Set geographies from comma-separated text.
    pub fn with_geography(mut self, raw: &str) -> Self {
        self.geographies = parse_category_tags(raw);
        self
    }

    /// Set industries from comma-separated text.
    pub fn with_industry(mut self, raw: &str) -> Self {
        self.industries = parse_category_tags(raw);
        self
    }
}

/// Snapshot of a portfolio: the "start" state handed to the planner or an
/// "end" state produced by simulating a sequence.
///
/// Positions and target maps are ordered so that value-weighted sums are
/// reproducible bit-for-bit regardless of how the snapshot was assembled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioContext {
    /// Total portfolio value in EUR (cash included). `<= 0` is degenerate.
    pub total_value: f64,
    /// ISIN -> position value in EUR.
    pub positions: BTreeMap<String, f64>,
    /// ISIN -> metrics. Missing entries score neutrally.
    pub metrics: FxHashMap<String, SecurityMetrics>,
    /// Geography -> target weight (sums to ~1.0).
    pub geography_weights: BTreeMap<String, f64>,
    /// Industry -> target weight (sums to ~1.0).
    pub industry_weights: BTreeMap<String, f64>,
    /// ISIN -> optimizer target weight (sums to ~1.0).
    pub optimizer_target_weights: BTreeMap<String, f64>,
    /// Market regime in [-1, 1]; negative is bearish.
    pub market_regime_score: f64,
}

impl PortfolioContext {
    /// Create an empty context with the given total value.
    pub fn new(total_value: f64) -> Self {
        Self {
            total_value,
            ..Self::default()
        }
    }

    /// Builder-style position setter.
    pub fn with_position(mut self, isin: impl Into<String>, value: f64) -> Self {
        self.positions.insert(isin.into(), value);
        self
    }

    /// Builder-style metrics setter.
    pub fn with_metrics(mut self, isin: impl Into<String>, metrics: SecurityMetrics) -> Self {
        self.metrics.insert(isin.into(), metrics);
        self
    }

    pub fn with_geography_weight(mut self, geography: impl Into<String>, weight: f64) -> Self {
        self.geography_weights.insert(geography.into(), weight);
        self
    }

    pub fn with_industry_weight(mut self, industry: impl Into<String>, weight: f64) -> Self {
        self.industry_weights.insert(industry.into(), weight);
        self
    }

    pub fn with_optimizer_target(mut self, isin: impl Into<String>, weight: f64) -> Self {
        self.optimizer_target_weights.insert(isin.into(), weight);
        self
    }

    pub fn with_regime_score(mut self, score: f64) -> Self {
        self.market_regime_score = score;
        self
    }

    /// True if the snapshot cannot be scored (non-positive total value).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.total_value.is_nan() || self.total_value <= 0.0
    }

    /// Metrics for an ISIN, if any were supplied.
    #[inline]
    pub fn metrics_for(&self, isin: &str) -> Option<&SecurityMetrics> {
        self.metrics.get(isin)
    }

    /// Iterator over `(isin, value / total_value)` for every position.
    ///
    /// Yields nothing for a degenerate context.
    pub fn weighted_positions(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        let total = self.total_value;
        self.positions
            .iter()
            .filter(move |_| total > 0.0)
            .map(move |(isin, value)| (isin.as_str(), value / total))
    }

    /// Value-weighted average of one optional metric.
    ///
    /// Returns `None` when no position carries the metric. Positions without
    /// it contribute nothing (the sum is not re-normalized).
    pub fn weighted_metric<F>(&self, pick: F) -> Option<f64>
    where
        F: Fn(&SecurityMetrics) -> Option<f64>,
    {
        let mut sum = 0.0;
        let mut seen = false;
        for (isin, weight) in self.weighted_positions() {
            if let Some(v) = self.metrics_for(isin).and_then(&pick) {
                sum += v * weight;
                seen = true;
            }
        }
        seen.then_some(sum)
    }
}
