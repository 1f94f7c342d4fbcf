//! Regime-adaptive component weights.
//!
//! The base weights come from the scoring profile. In a bull market quality
//! gains at the expense of risk; in a bear market risk and diversification
//! gain at the expense of quality and improvement. Shifts scale linearly from
//! zero at the threshold to their full size at the extreme (`±1`).

use serde::Serialize;

use crate::config::{ComponentWeights, ScoringConfig};

/// Market regime bucket for a score and a pair of thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MarketRegime {
    Bull,
    Neutral,
    Bear,
}

impl MarketRegime {
    /// Classify a regime score (clamped to [-1, 1]) against the profile's thresholds.
    pub fn classify(score: f64, cfg: &ScoringConfig) -> Self {
        let score = clamp_score(score);
        if score > cfg.regime.bull_threshold {
            MarketRegime::Bull
        } else if score < cfg.regime.bear_threshold {
            MarketRegime::Bear
        } else {
            MarketRegime::Neutral
        }
    }
}

impl std::fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketRegime::Bull => write!(f, "bull"),
            MarketRegime::Neutral => write!(f, "neutral"),
            MarketRegime::Bear => write!(f, "bear"),
        }
    }
}

/// Clamp to [-1, 1]; NaN reads as neutral (0).
fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(-1.0, 1.0)
    }
}

/// Component weights for a regime score under the given profile.
///
/// ```
/// use nanoscore::{ScoringConfig, regime_weights};
///
/// let cfg = ScoringConfig::default();
/// assert_eq!(regime_weights(0.0, &cfg), cfg.weights);
/// let bull = regime_weights(0.8, &cfg);
/// assert!(bull.quality > cfg.weights.quality);
/// assert!(bull.risk < cfg.weights.risk);
/// ```
pub fn regime_weights(regime_score: f64, cfg: &ScoringConfig) -> ComponentWeights {
    let score = clamp_score(regime_score);
    let base = cfg.weights;
    let r = &cfg.regime;
    let mut w = base;

    match MarketRegime::classify(score, cfg) {
        MarketRegime::Bull => {
            let f = (score - r.bull_threshold) / (1.0 - r.bull_threshold);
            w.quality = base.quality + r.bull_quality_shift * f;
            w.risk = base.risk - r.bull_risk_shift * f;
        }
        MarketRegime::Bear => {
            let f = (r.bear_threshold - score) / (r.bear_threshold + 1.0);
            w.risk = base.risk + r.bear_risk_shift * f;
            w.diversification = base.diversification + r.bear_diversification_shift * f;
            w.quality = base.quality - r.bear_quality_shift * f;
            w.improvement = base.improvement - r.bear_improvement_shift * f;
        }
        MarketRegime::Neutral => {}
    }
    w
}
