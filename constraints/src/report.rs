//! Filter report types.

use nanoscore::ActionCandidate;
use serde::{Serialize, Serializer};

/// Why an action was removed. The first failing check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum FilterReason {
    #[error("missing ISIN")]
    MissingIsin,
    #[error("allow_sell=false (global)")]
    GlobalSellDisabled,
    #[error("allow_buy=false (global)")]
    GlobalBuyDisabled,
    #[error("recently sold (cooloff)")]
    RecentlySold,
    #[error("recently bought (cooloff)")]
    RecentlyBought,
    #[error("ineligible")]
    Ineligible,
    #[error("security not found")]
    SecurityNotFound,
    #[error("allow_sell=false")]
    SellNotAllowed,
    #[error("allow_buy=false")]
    BuyNotAllowed,
    #[error("no position found")]
    NoPositionFound,
    #[error("invalid price")]
    InvalidPrice,
    #[error("quantity below minimum lot size")]
    BelowMinimumLot,
}

impl Serialize for FilterReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An action the enforcer removed, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredAction {
    pub action: ActionCandidate,
    pub reason: FilterReason,
}

impl std::fmt::Display for FilteredAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} x{}: {}",
            self.action.side, self.action.symbol, self.action.quantity, self.reason
        )
    }
}

/// Outcome of one enforcement pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnforcementReport {
    pub validated: Vec<ActionCandidate>,
    pub filtered: Vec<FilteredAction>,
}

impl EnforcementReport {
    /// Number of input actions this report accounts for.
    pub fn len(&self) -> usize {
        self.validated.len() + self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split into `(validated, filtered)`.
    pub fn into_parts(self) -> (Vec<ActionCandidate>, Vec<FilteredAction>) {
        (self.validated, self.filtered)
    }
}

impl std::fmt::Display for EnforcementReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "CONSTRAINTS: {} validated, {} filtered",
            self.validated.len(),
            self.filtered.len()
        )?;
        for filtered in &self.filtered {
            writeln!(f, "  [FILTERED] {filtered}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoscore::Side;

    #[test]
    fn reason_strings() {
        assert_eq!(FilterReason::GlobalSellDisabled.to_string(), "allow_sell=false (global)");
        assert_eq!(FilterReason::SellNotAllowed.to_string(), "allow_sell=false");
        assert_eq!(
            FilterReason::BelowMinimumLot.to_string(),
            "quantity below minimum lot size"
        );
    }

    #[test]
    fn report_display() {
        let report = EnforcementReport {
            validated: vec![],
            filtered: vec![FilteredAction {
                action: ActionCandidate::new(Side::Sell, "X", "BYD.285.AS", 13, 36.0),
                reason: FilterReason::SellNotAllowed,
            }],
        };
        let text = report.to_string();
        assert!(text.contains("0 validated, 1 filtered"));
        assert!(text.contains("SELL BYD.285.AS x13: allow_sell=false"));
        assert_eq!(report.len(), 1);
    }
}
