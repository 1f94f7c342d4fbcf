//! Scoring profile: component weights, tier thresholds and regime shifts.
//!
//! A [`ScoringConfig`] is built once per temperament profile and passed by
//! reference into every evaluation. [`ScoringConfig::default`] is the default
//! profile; a TOML file only needs to name the values it overrides.
//!
//! ```
//! use nanoscore::ScoringConfig;
//!
//! let cfg = ScoringConfig::from_toml_str(
//!     r#"
//! [regime]
//! bull_threshold = 0.4
//! "#,
//! )
//! .unwrap();
//! assert_eq!(cfg.regime.bull_threshold, 0.4);
//! assert_eq!(cfg.weights.quality, 0.35);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Top-level weights of the four end-state components. Must sum to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentWeights {
    pub quality: f64,
    pub diversification: f64,
    pub risk: f64,
    pub improvement: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            quality: 0.35,
            diversification: 0.30,
            risk: 0.25,
            improvement: 0.10,
        }
    }
}

impl ComponentWeights {
    pub fn sum(&self) -> f64 {
        self.quality + self.diversification + self.risk + self.improvement
    }
}

/// Portfolio Quality sub-weights.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    pub total_return: f64,
    pub long_term_promise: f64,
    pub stability: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            total_return: 0.40,
            long_term_promise: 0.35,
            stability: 0.25,
        }
    }
}

/// Diversification & Alignment sub-weights.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversificationWeights {
    pub geography: f64,
    pub industry: f64,
    pub optimizer: f64,
}

impl Default for DiversificationWeights {
    fn default() -> Self {
        Self {
            geography: 0.35,
            industry: 0.30,
            optimizer: 0.35,
        }
    }
}

/// Risk-Adjusted Metrics sub-weights.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub sharpe: f64,
    pub volatility: f64,
    pub drawdown: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            sharpe: 0.40,
            volatility: 0.35,
            drawdown: 0.25,
        }
    }
}

/// Breakpoints of the piecewise tier curves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Optimal expected total return (CAGR + dividend yield).
    pub total_return_target: f64,
    /// Return at and above which the score is capped.
    pub total_return_excellent: f64,
    /// Lower edge of the "positive but below target" band.
    pub total_return_floor: f64,
    pub volatility_low: f64,
    pub volatility_mid: f64,
    pub volatility_high: f64,
    pub drawdown_low: f64,
    pub drawdown_mid: f64,
    pub drawdown_high: f64,
    pub sharpe_fair: f64,
    pub sharpe_good: f64,
    pub sharpe_excellent: f64,
    /// Average geography/industry deviation that scores zero.
    pub deviation_scale: f64,
    /// Average optimizer-weight deviation that scores zero.
    pub optimizer_deviation_scale: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            total_return_target: 0.11,
            total_return_excellent: 0.20,
            total_return_floor: 0.05,
            volatility_low: 0.15,
            volatility_mid: 0.25,
            volatility_high: 0.40,
            drawdown_low: 0.10,
            drawdown_mid: 0.20,
            drawdown_high: 0.30,
            sharpe_fair: 0.5,
            sharpe_good: 1.0,
            sharpe_excellent: 2.0,
            deviation_scale: 0.30,
            optimizer_deviation_scale: 0.20,
        }
    }
}

/// Regime thresholds and the maximum weight shifts applied at the extremes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    pub bull_threshold: f64,
    pub bear_threshold: f64,
    pub bull_quality_shift: f64,
    pub bull_risk_shift: f64,
    pub bear_risk_shift: f64,
    pub bear_diversification_shift: f64,
    pub bear_quality_shift: f64,
    pub bear_improvement_shift: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            bull_threshold: 0.3,
            bear_threshold: -0.3,
            bull_quality_shift: 0.03,
            bull_risk_shift: 0.03,
            bear_risk_shift: 0.08,
            bear_diversification_shift: 0.02,
            bear_quality_shift: 0.05,
            bear_improvement_shift: 0.05,
        }
    }
}

/// A complete scoring profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ComponentWeights,
    pub quality: QualityWeights,
    pub diversification: DiversificationWeights,
    pub risk: RiskWeights,
    pub thresholds: TierThresholds,
    pub regime: RegimeConfig,
}

impl ScoringConfig {
    /// Load and validate a profile from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a profile from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: ScoringConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check weight sums, threshold ordering and regime bounds.
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        check_weights(
            "weights",
            &[w.quality, w.diversification, w.risk, w.improvement],
        )?;
        let q = &self.quality;
        check_weights(
            "quality",
            &[q.total_return, q.long_term_promise, q.stability],
        )?;
        let d = &self.diversification;
        check_weights("diversification", &[d.geography, d.industry, d.optimizer])?;
        let r = &self.risk;
        check_weights("risk", &[r.sharpe, r.volatility, r.drawdown])?;

        let t = &self.thresholds;
        check_ascending(
            "total_return",
            &[t.total_return_floor, t.total_return_target, t.total_return_excellent],
        )?;
        check_ascending(
            "volatility",
            &[t.volatility_low, t.volatility_mid, t.volatility_high],
        )?;
        check_ascending("drawdown", &[t.drawdown_low, t.drawdown_mid, t.drawdown_high])?;
        check_ascending("sharpe", &[t.sharpe_fair, t.sharpe_good, t.sharpe_excellent])?;
        for (name, scale) in [
            ("deviation_scale", t.deviation_scale),
            ("optimizer_deviation_scale", t.optimizer_deviation_scale),
        ] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be > 0 and finite, got {scale}"
                )));
            }
        }

        let g = &self.regime;
        if !g.bull_threshold.is_finite() || !(0.0..1.0).contains(&g.bull_threshold) {
            return Err(ConfigError::Invalid(format!(
                "bull_threshold must be in [0, 1), got {}",
                g.bull_threshold
            )));
        }
        if !g.bear_threshold.is_finite() || g.bear_threshold <= -1.0 || g.bear_threshold > 0.0 {
            return Err(ConfigError::Invalid(format!(
                "bear_threshold must be in (-1, 0], got {}",
                g.bear_threshold
            )));
        }
        for shift in [
            g.bull_quality_shift,
            g.bull_risk_shift,
            g.bear_risk_shift,
            g.bear_diversification_shift,
            g.bear_quality_shift,
            g.bear_improvement_shift,
        ] {
            if !shift.is_finite() || shift < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "regime shifts must be >= 0 and finite, got {shift}"
                )));
            }
        }
        Ok(())
    }
}

fn check_weights(group: &str, weights: &[f64]) -> Result<()> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(ConfigError::Invalid(format!(
            "{group} weights must be >= 0 and finite, got {weights:?}"
        )));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::Invalid(format!(
            "{group} weights must sum to 1.0, got {sum}"
        )));
    }
    Ok(())
}

fn check_ascending(group: &str, breakpoints: &[f64]) -> Result<()> {
    let ordered = breakpoints.iter().all(|b| b.is_finite() && *b >= 0.0)
        && breakpoints.windows(2).all(|w| w[0] < w[1]);
    if !ordered {
        return Err(ConfigError::Invalid(format!(
            "{group} thresholds must be non-negative and strictly ascending, got {breakpoints:?}"
        )));
    }
    Ok(())
}
