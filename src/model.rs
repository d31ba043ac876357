//! Core domain types for the fee resolution engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Cents;

/// Order identifier.
pub type OrderId = u64;

/// Vendor identifier.
pub type VendorId = u64;

/// Event identifier.
pub type EventId = u64;

/// Listing category identifier.
pub type CategoryId = u64;

/// Platform user identifier.
pub type UserId = u64;

/// Fee schedule identifier.
pub type ScheduleId = u32;

/// Marketplace role a fee schedule can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Buyer,
    Vendor,
    Organizer,
}

/// What a fee schedule applies to: a single scope plus its reference.
///
/// Collapsing `scope` and `scopeRefId` into one enum makes "ref required
/// unless GLOBAL" unrepresentable rather than a runtime check. Serializes to
/// the `{scope, scopeRefId}` pair the admin API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "scopeRefId", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeTarget {
    Global,
    Role(Role),
    Vendor(VendorId),
    Event(EventId),
    Category(CategoryId),
    Order(OrderId),
}

/// A versioned fee schedule for one scope target.
///
/// Prior versions are retained for audit and never mutated; at most one
/// version per target is active at a given instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    pub id: ScheduleId,
    pub name: String,
    #[serde(flatten)]
    pub target: ScopeTarget,
    /// Take rate in basis points (0..=10000). Absent means no percentage fee.
    #[serde(default)]
    pub take_rate_bps: Option<u16>,
    /// Minimum absolute fee. May exceed gross on tiny transactions.
    #[serde(default)]
    pub fee_floor_cents: Option<Cents>,
    /// Maximum absolute fee.
    #[serde(default)]
    pub fee_cap_cents: Option<Cents>,
    /// Start of the active window, inclusive. Absent means open at the start.
    #[serde(default)]
    pub active_from: Option<DateTime<Utc>>,
    /// End of the active window, exclusive. Absent means open-ended.
    #[serde(default)]
    pub active_to: Option<DateTime<Utc>>,
    /// Monotonically increasing per target.
    pub version: u32,
}

impl FeeSchedule {
    /// Whether `now` falls within `[active_from, active_to)`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if self.active_from.is_some_and(|from| now < from) {
            return false;
        }
        !self.active_to.is_some_and(|to| now >= to)
    }
}

/// What a promotional code discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppliesTo {
    PlatformFee,
    Subscription,
    Event,
}

/// A promotional discount code.
///
/// Exactly one of `percent_off_bps` / `amount_off_cents` is set; records
/// violating that are rejected at use time as ambiguous. `current_uses` is a
/// monotonic counter owned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    /// Unique, case-insensitive; stored uppercase.
    pub code: String,
    pub applies_to: AppliesTo,
    #[serde(default)]
    pub percent_off_bps: Option<u16>,
    #[serde(default)]
    pub amount_off_cents: Option<Cents>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_redemptions: Option<u32>,
    #[serde(default)]
    pub current_uses: u32,
    #[serde(default)]
    pub audience_tag: Option<String>,
}

impl PromoCode {
    /// Whether `now` falls within `[starts_at, ends_at)`.
    pub fn in_window(&self, now: DateTime<Utc>) -> bool {
        if self.starts_at.is_some_and(|from| now < from) {
            return false;
        }
        !self.ends_at.is_some_and(|to| now >= to)
    }

    /// Whether the redemption cap has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.max_redemptions
            .is_some_and(|max| self.current_uses >= max)
    }
}

/// Ledger entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    OrderFee,
    ProcessingFee,
    EventFee,
    SubscriptionFee,
    Payout,
    Refund,
    DisputeHold,
    DisputeWin,
    DisputeLoss,
    Adjustment,
    PromoApplied,
    TaxCollected,
}

/// An append-only ledger record; immutable once created.
///
/// Corrections are modeled as new offsetting `ADJUSTMENT` entries, never as
/// updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Positive = platform credit/revenue, negative = platform debit/expense.
    pub amount_cents: Cents,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub event_id: Option<EventId>,
    #[serde(default)]
    pub payout_id: Option<Uuid>,
    #[serde(default)]
    pub stripe_charge_id: Option<String>,
    pub currency: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub created_by_id: Option<UserId>,
}

/// The optional references a transaction supplies for scope resolution.
///
/// An explicit struct rather than a loose map: each predicate field is typed
/// and independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeContext {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub event_id: Option<EventId>,
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn global_schedule() -> FeeSchedule {
        FeeSchedule {
            id: 1,
            name: "global".to_string(),
            target: ScopeTarget::Global,
            take_rate_bps: Some(500),
            fee_floor_cents: None,
            fee_cap_cents: None,
            active_from: None,
            active_to: None,
            version: 1,
        }
    }

    #[test]
    fn scope_target_serializes_as_scope_ref_pair() {
        let json = serde_json::to_value(ScopeTarget::Order(42)).unwrap();
        assert_eq!(json, serde_json::json!({"scope": "ORDER", "scopeRefId": 42}));

        let json = serde_json::to_value(ScopeTarget::Global).unwrap();
        assert_eq!(json, serde_json::json!({"scope": "GLOBAL"}));

        let json = serde_json::to_value(ScopeTarget::Role(Role::Vendor)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"scope": "ROLE", "scopeRefId": "VENDOR"})
        );
    }

    #[test]
    fn schedule_window_is_half_open() {
        let schedule = FeeSchedule {
            active_from: Some(at(100)),
            active_to: Some(at(200)),
            ..global_schedule()
        };

        assert!(!schedule.is_active_at(at(99)));
        assert!(schedule.is_active_at(at(100))); // inclusive start
        assert!(schedule.is_active_at(at(199)));
        assert!(!schedule.is_active_at(at(200))); // exclusive end
    }

    #[test]
    fn schedule_open_ended_window() {
        let schedule = global_schedule();
        assert!(schedule.is_active_at(at(0)));
        assert!(schedule.is_active_at(at(4_000_000_000)));
    }

    #[test]
    fn promo_window_is_half_open() {
        let promo = PromoCode {
            code: "LAUNCH20".to_string(),
            applies_to: AppliesTo::PlatformFee,
            percent_off_bps: Some(2000),
            amount_off_cents: None,
            starts_at: Some(at(100)),
            ends_at: Some(at(200)),
            max_redemptions: None,
            current_uses: 0,
            audience_tag: None,
        };

        assert!(!promo.in_window(at(99)));
        assert!(promo.in_window(at(100)));
        assert!(!promo.in_window(at(200)));
    }

    #[test]
    fn promo_exhaustion() {
        let mut promo = PromoCode {
            code: "CAPPED".to_string(),
            applies_to: AppliesTo::PlatformFee,
            percent_off_bps: None,
            amount_off_cents: Some(Cents::new(100)),
            starts_at: None,
            ends_at: None,
            max_redemptions: Some(2),
            current_uses: 1,
            audience_tag: None,
        };

        assert!(!promo.is_exhausted());
        promo.current_uses = 2;
        assert!(promo.is_exhausted());

        // no cap means never exhausted
        promo.max_redemptions = None;
        assert!(!promo.is_exhausted());
    }
}
