//! Fee computation: take rate, floor and cap.

use crate::Cents;
use crate::model::FeeSchedule;

/// Compute the platform fee for a gross amount under a resolved schedule.
///
/// The percentage part rounds half-up and never rounds down to zero while
/// both the rate and the gross are nonzero (minimum 1 cent). The floor is
/// applied before the cap, so when a schedule carries a cap below its floor
/// the cap wins. Floors and caps may exceed the gross amount; a minimum fee
/// larger than a tiny transaction is part of the minimum-fee model, not a
/// bug to clamp away.
pub fn compute_fee(gross_cents: Cents, schedule: &FeeSchedule) -> Cents {
    let mut fee = match schedule.take_rate_bps {
        Some(bps) => {
            let raw = gross_cents.mul_bps_half_up(bps);
            if raw == Cents::ZERO && bps > 0 && gross_cents.is_positive() {
                Cents::new(1)
            } else {
                raw
            }
        }
        None => Cents::ZERO,
    };

    if let Some(floor) = schedule.fee_floor_cents {
        fee = fee.max(floor);
    }
    if let Some(cap) = schedule.fee_cap_cents {
        fee = fee.min(cap);
    }
    fee
}
