//! Promotional discount application.

use chrono::{DateTime, Utc};

use super::error::PromoError;
use crate::Cents;
use crate::model::PromoCode;

/// Why an otherwise valid promo was not applied.
///
/// Rejections are normal outcomes, not errors: the fee passes through
/// unchanged and no partial discount is ever applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// `now` is outside the promo's redemption window.
    Expired,
    /// The redemption cap has been reached.
    Exhausted,
}

/// Result of stacking a promo onto a computed fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromoOutcome {
    pub final_fee_cents: Cents,
    pub discount_cents: Cents,
    pub rejection: Option<Rejection>,
}

impl PromoOutcome {
    fn rejected(fee_cents: Cents, reason: Rejection) -> Self {
        Self {
            final_fee_cents: fee_cents,
            discount_cents: Cents::ZERO,
            rejection: Some(reason),
        }
    }
}

/// Apply a promo to a computed fee.
///
/// Eligibility is checked before any discount math; a rejected promo leaves
/// the fee untouched. Exactly one discount mechanism is ever honored: a
/// record carrying both (or neither) field is malformed and fails fast
/// instead of being guessed at.
pub fn apply_promo(
    fee_cents: Cents,
    promo: &PromoCode,
    now: DateTime<Utc>,
) -> Result<PromoOutcome, PromoError> {
    if !promo.in_window(now) {
        return Ok(PromoOutcome::rejected(fee_cents, Rejection::Expired));
    }
    if promo.is_exhausted() {
        return Ok(PromoOutcome::rejected(fee_cents, Rejection::Exhausted));
    }

    let discount_cents = match (promo.percent_off_bps, promo.amount_off_cents) {
        (Some(_), Some(_)) => {
            return Err(PromoError::AmbiguousDiscount(promo.code.clone()));
        }
        (None, None) => {
            return Err(PromoError::MissingDiscount(promo.code.clone()));
        }
        (Some(bps), None) => fee_cents.mul_bps_half_up(bps),
        // a fixed discount never pushes the fee negative
        (None, Some(amount)) => amount.min(fee_cents),
    };

    Ok(PromoOutcome {
        final_fee_cents: fee_cents - discount_cents,
        discount_cents,
        rejection: None,
    })
}
