//! Constraint enforcer for nanoscore.
//!
//! Turns raw candidate actions into ones that are actually executable:
//! global and per-security trading flags, cooloff windows, eligibility,
//! max-sell percentage and lot-size rounding. Violations remove the action
//! with a [`FilterReason`]; the only soft adjustments are the max-sell clamp
//! and lot rounding.

pub mod checks;
pub mod config;
pub mod context;
pub mod report;
pub mod security;

pub use config::PlannerConfiguration;
pub use context::{OpportunityContext, Position};
pub use report::{EnforcementReport, FilterReason, FilteredAction};
pub use security::{Security, SecurityCatalog, SecurityLookup};

use log::debug;
use nanoscore::ActionCandidate;

/// Validates and adjusts candidate actions against trading rules.
#[derive(Debug, Clone)]
pub struct Enforcer<L> {
    lookup: L,
}

impl<L: SecurityLookup> Enforcer<L> {
    /// Create an enforcer backed by the given security lookup.
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Access the security lookup.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Enforce every constraint on a batch of actions.
    ///
    /// Every input action ends up in exactly one of the two outputs, in
    /// input order. Validated actions may carry an adjusted quantity and
    /// value.
    pub fn enforce_constraints(
        &self,
        actions: &[ActionCandidate],
        ctx: &OpportunityContext,
        config: &PlannerConfiguration,
    ) -> (Vec<ActionCandidate>, Vec<FilteredAction>) {
        self.enforce(actions, ctx, config).into_parts()
    }

    /// Like [`Enforcer::enforce_constraints`], returned as a report.
    pub fn enforce(
        &self,
        actions: &[ActionCandidate],
        ctx: &OpportunityContext,
        config: &PlannerConfiguration,
    ) -> EnforcementReport {
        let mut report = EnforcementReport {
            validated: Vec::with_capacity(actions.len()),
            filtered: Vec::new(),
        };

        for action in actions {
            match self.enforce_one(action, ctx, config) {
                Ok(adjusted) => report.validated.push(adjusted),
                Err(reason) => {
                    debug!(
                        "Filtered {} {} x{}: {}",
                        action.side, action.symbol, action.quantity, reason
                    );
                    report.filtered.push(FilteredAction {
                        action: action.clone(),
                        reason,
                    });
                }
            }
        }

        debug!(
            "Constraint enforcement: {} validated, {} filtered",
            report.validated.len(),
            report.filtered.len()
        );
        report
    }

    /// Steps 1-6 only, without adjusting the action. Used to prune
    /// candidates during search.
    pub fn is_feasible(
        &self,
        action: &ActionCandidate,
        ctx: &OpportunityContext,
    ) -> Result<(), FilterReason> {
        checks::pre_checks(action, ctx, &self.lookup).map(|_| ())
    }

    fn enforce_one(
        &self,
        action: &ActionCandidate,
        ctx: &OpportunityContext,
        config: &PlannerConfiguration,
    ) -> Result<ActionCandidate, FilterReason> {
        let security = checks::pre_checks(action, ctx, &self.lookup)?;
        let mut adjusted = action.clone();

        // Clamp runs before lot rounding; a round-up can exceed the cap again.
        if let Some(pct) = config.sell_cap() {
            let requested = adjusted.quantity;
            if checks::clamp_max_sell(&mut adjusted, ctx, pct)? {
                debug!(
                    "Clamped {} sell from {} to {} ({:.0}% cap)",
                    adjusted.symbol,
                    requested,
                    adjusted.quantity,
                    pct * 100.0
                );
            }
        }

        let before = adjusted.quantity;
        if checks::apply_lot_size(&mut adjusted, security.min_lot)? {
            debug!(
                "Rounded {} from {} to {} (lot {})",
                adjusted.symbol, before, adjusted.quantity, security.min_lot
            );
        }

        Ok(adjusted)
    }
}
