//! Ledger entry construction.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::Cents;
use crate::model::{ChargeContext, EntryType, LedgerEntry};

/// Ledger currency. Single-currency platform for now.
const CURRENCY: &str = "USD";

/// Build the ledger entries for a completed charge.
///
/// Always one positive entry for the gross fee; when a discount was granted,
/// a second linked entry of type `PROMO_APPLIED` with the negated discount.
/// The two are never pre-netted: summing entries of either type over a period
/// independently reconstructs total platform revenue and total promo cost.
/// Both entries share `occurred_at` and the charge's order/event refs.
pub fn build_entries(
    context: &ChargeContext,
    entry_type: EntryType,
    fee_cents: Cents,
    discount_cents: Cents,
    occurred_at: DateTime<Utc>,
    promo_code: Option<&str>,
) -> (LedgerEntry, Option<LedgerEntry>) {
    let fee_entry = LedgerEntry {
        id: Uuid::new_v4(),
        occurred_at,
        entry_type,
        amount_cents: fee_cents,
        user_id: context.vendor_id,
        order_id: context.order_id,
        event_id: context.event_id,
        payout_id: None,
        stripe_charge_id: None,
        currency: CURRENCY.to_string(),
        metadata: BTreeMap::new(),
        created_by_id: None,
    };

    let promo_entry = discount_cents.is_positive().then(|| {
        let mut metadata = BTreeMap::new();
        if let Some(code) = promo_code {
            metadata.insert("promoCode".to_string(), code.to_string());
        }
        LedgerEntry {
            id: Uuid::new_v4(),
            occurred_at,
            entry_type: EntryType::PromoApplied,
            amount_cents: -discount_cents,
            user_id: context.vendor_id,
            order_id: context.order_id,
            event_id: context.event_id,
            payout_id: None,
            stripe_charge_id: None,
            currency: CURRENCY.to_string(),
            metadata,
            created_by_id: None,
        }
    });

    (fee_entry, promo_entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn context() -> ChargeContext {
        ChargeContext {
            order_id: Some(42),
            event_id: Some(7),
            vendor_id: Some(9),
            ..Default::default()
        }
    }

    #[test]
    fn fee_only_builds_single_entry() {
        let (fee, promo) = build_entries(
            &context(),
            EntryType::OrderFee,
            Cents::new(1_000),
            Cents::ZERO,
            at(100),
            None,
        );

        assert!(promo.is_none());
        assert_eq!(fee.entry_type, EntryType::OrderFee);
        assert_eq!(fee.amount_cents, Cents::new(1_000));
        assert_eq!(fee.order_id, Some(42));
        assert_eq!(fee.event_id, Some(7));
        assert_eq!(fee.user_id, Some(9));
        assert_eq!(fee.currency, "USD");
    }

    #[test]
    fn discount_builds_linked_promo_entry() {
        let (fee, promo) = build_entries(
            &context(),
            EntryType::OrderFee,
            Cents::new(1_000),
            Cents::new(200),
            at(100),
            Some("LAUNCH20"),
        );
        let promo = promo.unwrap();

        assert_eq!(promo.entry_type, EntryType::PromoApplied);
        assert_eq!(promo.amount_cents, Cents::new(-200));
        assert_eq!(promo.metadata.get("promoCode").unwrap(), "LAUNCH20");

        // linked: same instant and refs, distinct ids
        assert_eq!(promo.occurred_at, fee.occurred_at);
        assert_eq!(promo.order_id, fee.order_id);
        assert_eq!(promo.event_id, fee.event_id);
        assert_ne!(promo.id, fee.id);
    }

    #[test]
    fn entries_sum_to_net_fee() {
        let (fee, promo) = build_entries(
            &context(),
            EntryType::OrderFee,
            Cents::new(1_000),
            Cents::new(200),
            at(100),
            Some("LAUNCH20"),
        );

        let net = fee.amount_cents + promo.unwrap().amount_cents;
        assert_eq!(net, Cents::new(800));
    }
}
