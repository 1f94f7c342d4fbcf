//! Working state of one planning pass.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A current holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub isin: String,
    pub symbol: String,
    /// Shares held (fractional shares allowed).
    pub quantity: f64,
}

impl Position {
    pub fn new(isin: impl Into<String>, symbol: impl Into<String>, quantity: f64) -> Self {
        Self {
            isin: isin.into(),
            symbol: symbol.into(),
            quantity,
        }
    }
}

pub(crate) fn enabled() -> bool {
    true
}

/// Holdings, trading switches and cooloff sets for one planning pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityContext {
    #[serde(default)]
    pub positions: Vec<Position>,
    /// Global buy switch.
    #[serde(default = "enabled")]
    pub allow_buy: bool,
    /// Global sell switch.
    #[serde(default = "enabled")]
    pub allow_sell: bool,
    /// ISINs sold within the cooloff window.
    #[serde(default)]
    pub recently_sold_isins: FxHashSet<String>,
    /// ISINs bought within the cooloff window.
    #[serde(default)]
    pub recently_bought_isins: FxHashSet<String>,
    #[serde(default)]
    pub ineligible_isins: FxHashSet<String>,
    #[serde(default)]
    pub available_cash_eur: f64,
    #[serde(default)]
    pub transaction_cost_fixed: f64,
    #[serde(default)]
    pub transaction_cost_percent: f64,
}

impl OpportunityContext {
    /// Empty context with both global switches on and default fees.
    pub fn new(available_cash_eur: f64) -> Self {
        Self {
            positions: Vec::new(),
            allow_buy: true,
            allow_sell: true,
            recently_sold_isins: FxHashSet::default(),
            recently_bought_isins: FxHashSet::default(),
            ineligible_isins: FxHashSet::default(),
            available_cash_eur,
            transaction_cost_fixed: 2.0,
            transaction_cost_percent: 0.002,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.positions.push(position);
        self
    }

    pub fn with_allow_buy(mut self, allow: bool) -> Self {
        self.allow_buy = allow;
        self
    }

    pub fn with_allow_sell(mut self, allow: bool) -> Self {
        self.allow_sell = allow;
        self
    }

    pub fn with_recently_sold(mut self, isin: impl Into<String>) -> Self {
        self.recently_sold_isins.insert(isin.into());
        self
    }

    pub fn with_recently_bought(mut self, isin: impl Into<String>) -> Self {
        self.recently_bought_isins.insert(isin.into());
        self
    }

    pub fn with_ineligible(mut self, isin: impl Into<String>) -> Self {
        self.ineligible_isins.insert(isin.into());
        self
    }

    /// Holding for a security: ISIN match first, then symbol.
    pub fn position_for(&self, isin: &str, symbol: &str) -> Option<&Position> {
        let by_isin = (!isin.is_empty())
            .then(|| self.positions.iter().find(|p| p.isin == isin))
            .flatten();
        by_isin.or_else(|| {
            if symbol.is_empty() {
                None
            } else {
                self.positions.iter().find(|p| p.symbol == symbol)
            }
        })
    }
}
