//! Security catalog and lookup.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::context::enabled;

/// Trading rules for one security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    pub isin: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "enabled")]
    pub allow_buy: bool,
    #[serde(default = "enabled")]
    pub allow_sell: bool,
    /// Minimum tradeable lot. `<= 0` disables rounding.
    #[serde(default)]
    pub min_lot: i64,
}

impl Security {
    /// Tradeable both ways with no lot constraint.
    pub fn new(isin: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            isin: isin.into(),
            symbol: symbol.into(),
            name: String::new(),
            allow_buy: true,
            allow_sell: true,
            min_lot: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
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

    pub fn with_min_lot(mut self, min_lot: i64) -> Self {
        self.min_lot = min_lot;
        self
    }
}

/// Resolves a security by symbol and ISIN.
///
/// Implementations must be read-only snapshots; the enforcer may be called
/// from many threads at once.
pub trait SecurityLookup {
    fn lookup(&self, symbol: &str, isin: &str) -> Option<Security>;
}

impl<F> SecurityLookup for F
where
    F: Fn(&str, &str) -> Option<Security>,
{
    fn lookup(&self, symbol: &str, isin: &str) -> Option<Security> {
        self(symbol, isin)
    }
}

/// In-memory catalog keyed by ISIN, with a symbol index.
#[derive(Debug, Clone, Default)]
pub struct SecurityCatalog {
    by_isin: FxHashMap<String, Security>,
    isin_by_symbol: FxHashMap<String, String>,
}

impl SecurityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a security.
    ///
    /// Replacing an ISIN under a new symbol drops the old symbol from the index.
    pub fn insert(&mut self, security: Security) {
        if let Some(old) = self.by_isin.get(&security.isin) {
            if old.symbol != security.symbol
                && self.isin_by_symbol.get(&old.symbol) == Some(&security.isin)
            {
                self.isin_by_symbol.remove(&old.symbol);
            }
        }
        if !security.symbol.is_empty() {
            self.isin_by_symbol
                .insert(security.symbol.clone(), security.isin.clone());
        }
        self.by_isin.insert(security.isin.clone(), security);
    }

    pub fn len(&self) -> usize {
        self.by_isin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_isin.is_empty()
    }

    pub fn get_by_isin(&self, isin: &str) -> Option<&Security> {
        self.by_isin.get(isin)
    }

    pub fn get_by_symbol(&self, symbol: &str) -> Option<&Security> {
        self.isin_by_symbol
            .get(symbol)
            .and_then(|isin| self.by_isin.get(isin))
    }
}

impl FromIterator<Security> for SecurityCatalog {
    fn from_iter<I: IntoIterator<Item = Security>>(iter: I) -> Self {
        let mut catalog = SecurityCatalog::new();
        for security in iter {
            catalog.insert(security);
        }
        catalog
    }
}

impl SecurityLookup for SecurityCatalog {
    /// ISIN first, symbol as fallback.
    fn lookup(&self, symbol: &str, isin: &str) -> Option<Security> {
        let by_isin = if isin.is_empty() {
            None
        } else {
            self.get_by_isin(isin)
        };
        by_isin
            .or_else(|| self.get_by_symbol(symbol))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SecurityCatalog {
        [
            Security::new("KYG1170T1067", "BYD.285.AS").with_min_lot(500),
            Security::new("US1234567890", "TEST.US"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn isin_preferred() {
        let c = catalog();
        let s = c.lookup("TEST.US", "KYG1170T1067").unwrap();
        assert_eq!(s.symbol, "BYD.285.AS");
    }

    #[test]
    fn symbol_fallback() {
        let c = catalog();
        assert_eq!(c.lookup("TEST.US", "").unwrap().isin, "US1234567890");
        assert_eq!(c.lookup("TEST.US", "XX0000000000").unwrap().isin, "US1234567890");
        assert!(c.lookup("UNKNOWN.US", "US0000000000").is_none());
    }

    #[test]
    fn reinsert_under_new_symbol_drops_old_index() {
        let mut c = catalog();
        c.insert(Security::new("US1234567890", "RENAMED.US"));
        assert_eq!(c.len(), 2);
        assert!(c.get_by_symbol("TEST.US").is_none());
        assert!(c.lookup("TEST.US", "").is_none());
        assert_eq!(c.get_by_symbol("RENAMED.US").unwrap().isin, "US1234567890");
    }

    #[test]
    fn reinsert_keeps_symbol_claimed_by_other_isin() {
        let mut c = catalog();
        // TEST.US moves to a new ISIN, then the old ISIN is renamed.
        c.insert(Security::new("US0000000001", "TEST.US"));
        c.insert(Security::new("US1234567890", "OLD.US"));
        assert_eq!(c.get_by_symbol("TEST.US").unwrap().isin, "US0000000001");
        assert_eq!(c.get_by_symbol("OLD.US").unwrap().isin, "US1234567890");
    }

    #[test]
    fn omitted_trade_flags_default_to_allowed() {
        let s: Security = toml::from_str(
            r#"
            isin = "US1"
            symbol = "A"
            min_lot = 1
            "#,
        )
        .unwrap();
        assert!(s.allow_buy);
        assert!(s.allow_sell);
        assert_eq!(s.name, "");

        let s: Security = toml::from_str(
            r#"
            isin = "US2"
            symbol = "B"
            allow_buy = false
            "#,
        )
        .unwrap();
        assert!(!s.allow_buy);
        assert!(s.allow_sell);
        assert_eq!(s.min_lot, 0);
    }

    #[test]
    fn closure_lookup() {
        let lookup = |symbol: &str, _isin: &str| -> Option<Security> {
            (symbol == "A").then(|| Security::new("A1", "A"))
        };
        assert!(lookup.lookup("A", "").is_some());
        assert!(lookup.lookup("B", "").is_none());
    }
}
