//! Individual constraint check implementations.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. ISIN present
//! 2. Global buy/sell switch
//! 3. Cooloff
//! 4. Eligibility
//! 5. Security lookup
//! 6. Per-security buy/sell flag
//! 7. Max-sell percentage clamp (sells only)
//! 8. Lot-size rounding
//!
//! Steps 1-6 never mutate the action; 7 and 8 may shrink (or, for a
//! below-lot quantity, round up) its quantity.

use nanoscore::{ActionCandidate, Side};

use crate::context::OpportunityContext;
use crate::report::FilterReason;
use crate::security::{Security, SecurityLookup};

/// Steps 1-6. Returns the resolved security on success.
pub fn pre_checks<L: SecurityLookup + ?Sized>(
    action: &ActionCandidate,
    ctx: &OpportunityContext,
    lookup: &L,
) -> Result<Security, FilterReason> {
    check_isin(action)?;
    check_global_switch(action, ctx)?;
    check_cooloff(action, ctx)?;
    check_eligibility(action, ctx)?;
    let security = lookup
        .lookup(&action.symbol, &action.isin)
        .ok_or(FilterReason::SecurityNotFound)?;
    check_security_flag(action, &security)?;
    Ok(security)
}

pub fn check_isin(action: &ActionCandidate) -> Result<(), FilterReason> {
    if action.isin.is_empty() {
        return Err(FilterReason::MissingIsin);
    }
    Ok(())
}

pub fn check_global_switch(
    action: &ActionCandidate,
    ctx: &OpportunityContext,
) -> Result<(), FilterReason> {
    match action.side {
        Side::Sell if !ctx.allow_sell => Err(FilterReason::GlobalSellDisabled),
        Side::Buy if !ctx.allow_buy => Err(FilterReason::GlobalBuyDisabled),
        _ => Ok(()),
    }
}

pub fn check_cooloff(action: &ActionCandidate, ctx: &OpportunityContext) -> Result<(), FilterReason> {
    match action.side {
        Side::Sell if ctx.recently_sold_isins.contains(&action.isin) => {
            Err(FilterReason::RecentlySold)
        }
        Side::Buy if ctx.recently_bought_isins.contains(&action.isin) => {
            Err(FilterReason::RecentlyBought)
        }
        _ => Ok(()),
    }
}

pub fn check_eligibility(
    action: &ActionCandidate,
    ctx: &OpportunityContext,
) -> Result<(), FilterReason> {
    if ctx.ineligible_isins.contains(&action.isin) {
        return Err(FilterReason::Ineligible);
    }
    Ok(())
}

pub fn check_security_flag(action: &ActionCandidate, security: &Security) -> Result<(), FilterReason> {
    match action.side {
        Side::Sell if !security.allow_sell => Err(FilterReason::SellNotAllowed),
        Side::Buy if !security.allow_buy => Err(FilterReason::BuyNotAllowed),
        _ => Ok(()),
    }
}

/// Step 7: clamp a sell to `floor(position.quantity * pct)`.
///
/// Returns `true` if the quantity was reduced. Buys pass through untouched.
pub fn clamp_max_sell(
    action: &mut ActionCandidate,
    ctx: &OpportunityContext,
    pct: f64,
) -> Result<bool, FilterReason> {
    if action.side != Side::Sell {
        return Ok(false);
    }
    let position = ctx
        .position_for(&action.isin, &action.symbol)
        .ok_or(FilterReason::NoPositionFound)?;

    let max_qty = (position.quantity * pct).floor() as i64;
    if action.quantity <= max_qty {
        return Ok(false);
    }
    if !valid_price(action.price) {
        return Err(FilterReason::InvalidPrice);
    }
    action.set_quantity(max_qty);
    Ok(true)
}

/// Step 8: align the quantity to the security's lot.
///
/// Returns `true` if the quantity changed.
pub fn apply_lot_size(action: &mut ActionCandidate, min_lot: i64) -> Result<bool, FilterReason> {
    let rounded =
        round_to_lot_size(action.quantity, min_lot).ok_or(FilterReason::BelowMinimumLot)?;
    if rounded == action.quantity {
        return Ok(false);
    }
    if !valid_price(action.price) {
        return Err(FilterReason::InvalidPrice);
    }
    action.set_quantity(rounded);
    Ok(true)
}

/// Round `quantity` to a multiple of `lot`.
///
/// Floors to the nearest multiple if that is at least one lot, otherwise
/// rounds up. `None` means no multiple of at least one lot is reachable
/// (non-positive quantities). A `lot <= 0` leaves the quantity unchanged.
///
/// ```
/// use nanoscore_constraints::checks::round_to_lot_size;
///
/// assert_eq!(round_to_lot_size(1200, 500), Some(1000));
/// assert_eq!(round_to_lot_size(13, 500), Some(500));
/// assert_eq!(round_to_lot_size(13, 0), Some(13));
/// ```
pub fn round_to_lot_size(quantity: i64, lot: i64) -> Option<i64> {
    if lot <= 0 {
        return Some(quantity);
    }
    let lots = quantity.div_euclid(lot);
    let floored = lots.checked_mul(lot)?;
    if floored >= lot {
        return Some(floored);
    }
    let ceiled = if floored == quantity {
        floored
    } else {
        lots.checked_add(1)?.checked_mul(lot)?
    };
    (ceiled >= lot).then_some(ceiled)
}

#[inline]
fn valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Position;

    #[test]
    fn lot_rounding_table() {
        let cases = [
            (1200, 500, 1000),
            (13, 500, 500),
            (500, 500, 500),
            (1500, 500, 1500),
            (13, 0, 13),
            (13, -1, 13),
            (100, 500, 500),
            (499, 500, 500),
            (501, 500, 500),
        ];
        for (qty, lot, expected) in cases {
            assert_eq!(
                round_to_lot_size(qty, lot),
                Some(expected),
                "quantity={qty}, lot={lot}"
            );
        }
    }

    #[test]
    fn non_positive_quantity_has_no_lot() {
        assert_eq!(round_to_lot_size(0, 500), None);
        assert_eq!(round_to_lot_size(-5, 500), None);
        assert_eq!(round_to_lot_size(-5, 0), Some(-5));
    }

    #[test]
    fn huge_quantity_does_not_overflow() {
        assert_eq!(round_to_lot_size(i64::MAX, 1), Some(i64::MAX));
        assert!(round_to_lot_size(i64::MAX, 7).is_some());
    }

    #[test]
    fn clamp_sell_recomputes_value() {
        let ctx = OpportunityContext::new(0.0)
            .with_position(Position::new("GR1234567890", "PPA.GR", 888.8));
        let mut action = ActionCandidate::new(Side::Sell, "GR1234567890", "PPA.GR", 441, 10.0);
        assert_eq!(clamp_max_sell(&mut action, &ctx, 0.28), Ok(true));
        assert_eq!(action.quantity, 248);
        assert_eq!(action.value_eur, 2480.0);
    }

    #[test]
    fn clamp_with_bad_price_filters() {
        let ctx = OpportunityContext::new(0.0)
            .with_position(Position::new("GR1234567890", "PPA.GR", 888.8));
        let mut action = ActionCandidate::new(Side::Sell, "GR1234567890", "PPA.GR", 441, 0.0);
        assert_eq!(
            clamp_max_sell(&mut action, &ctx, 0.28),
            Err(FilterReason::InvalidPrice)
        );
    }

    #[test]
    fn lot_change_needs_price() {
        let mut action = ActionCandidate::new(Side::Buy, "X", "X", 13, -1.0);
        assert_eq!(apply_lot_size(&mut action, 500), Err(FilterReason::InvalidPrice));

        // Unchanged quantity never looks at the price
        let mut action = ActionCandidate::new(Side::Buy, "X", "X", 500, -1.0);
        assert_eq!(apply_lot_size(&mut action, 500), Ok(false));
    }

    #[test]
    fn cooloff_is_side_specific() {
        let ctx = OpportunityContext::new(0.0).with_recently_sold("X");
        let sell = ActionCandidate::new(Side::Sell, "X", "X", 1, 1.0);
        let buy = ActionCandidate::new(Side::Buy, "X", "X", 1, 1.0);
        assert_eq!(check_cooloff(&sell, &ctx), Err(FilterReason::RecentlySold));
        assert_eq!(check_cooloff(&buy, &ctx), Ok(()));
    }
}
