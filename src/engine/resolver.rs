//! Scope resolution: find the most specific fee schedule for a charge.

use chrono::{DateTime, Utc};

use super::error::ResolveError;
use crate::model::{ChargeContext, FeeSchedule, ScopeTarget};

/// Resolve the fee schedule that governs a charge.
///
/// Scopes are tried in strict precedence ORDER > CATEGORY > EVENT > VENDOR >
/// ROLE > GLOBAL. The first scope for which the context supplies a ref and an
/// active schedule exists wins; otherwise resolution falls through to the
/// single active GLOBAL schedule. For a fixed context, schedule snapshot and
/// `now` the result is always the same.
pub fn resolve<'a>(
    context: &ChargeContext,
    schedules: &'a [FeeSchedule],
    now: DateTime<Utc>,
) -> Result<&'a FeeSchedule, ResolveError> {
    let candidates = [
        context.order_id.map(ScopeTarget::Order),
        context.category_id.map(ScopeTarget::Category),
        context.event_id.map(ScopeTarget::Event),
        context.vendor_id.map(ScopeTarget::Vendor),
        context.role.map(ScopeTarget::Role),
        Some(ScopeTarget::Global),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|target| active_for(target, schedules, now))
        .ok_or(ResolveError::NoScheduleFound)
}

/// The active schedule for one target.
///
/// At most one version per target should be active at a time; if several are,
/// the highest version wins, then the latest `active_from`.
fn active_for<'a>(
    target: ScopeTarget,
    schedules: &'a [FeeSchedule],
    now: DateTime<Utc>,
) -> Option<&'a FeeSchedule> {
    schedules
        .iter()
        .filter(|s| s.target == target && s.is_active_at(now))
        .max_by_key(|s| (s.version, s.active_from))
}
