//! Candidate trades proposed by the opportunity generator.

use serde::{Deserialize, Serialize};

use crate::side::Side;

/// One proposed trade.
///
/// `value_eur` always mirrors `quantity * price`; use [`ActionCandidate::set_quantity`]
/// rather than writing `quantity` directly so the two never drift apart.
/// `priority` and `reason` are advisory and never influence scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionCandidate {
    pub side: Side,
    pub isin: String,
    pub symbol: String,
    pub name: String,
    /// Shares to trade (lot-aligned once the constraint enforcer has run).
    pub quantity: i64,
    /// Price per share in the trade currency.
    pub price: f64,
    /// Trade value in EUR.
    pub value_eur: f64,
    pub currency: String,
    /// Generator priority in [0, 1].
    #[serde(default)]
    pub priority: f64,
    #[serde(default)]
    pub reason: String,
}

impl ActionCandidate {
    /// Create a candidate with `value_eur = quantity * price`.
    pub fn new(
        side: Side,
        isin: impl Into<String>,
        symbol: impl Into<String>,
        quantity: i64,
        price: f64,
    ) -> Self {
        Self {
            side,
            isin: isin.into(),
            symbol: symbol.into(),
            name: String::new(),
            quantity,
            price,
            value_eur: quantity as f64 * price,
            currency: "EUR".into(),
            priority: 0.0,
            reason: String::new(),
        }
    }

    /// Builder-style name setter.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder-style priority setter.
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    /// Builder-style reason setter.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Builder-style value override, for trades whose EUR value differs from
    /// `quantity * price` (foreign-currency listings).
    pub fn with_value_eur(mut self, value_eur: f64) -> Self {
        self.value_eur = value_eur;
        self
    }

    #[inline]
    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    #[inline]
    pub fn is_sell(&self) -> bool {
        self.side == Side::Sell
    }

    /// Replace the quantity and recompute `value_eur` from `price`.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.value_eur = quantity as f64 * self.price;
    }
}

/// Order-dependent signature of a sequence: `SIDE:SYMBOL:QTY` joined by `|`.
///
/// Two sequences share a key only if they trade the same symbols, on the same
/// sides, in the same quantities and order.
pub fn sequence_key(sequence: &[ActionCandidate]) -> String {
    sequence
        .iter()
        .map(|a| format!("{}:{}:{}", a.side, a.symbol, a.quantity))
        .collect::<Vec<_>>()
        .join("|")
}
