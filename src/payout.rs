//! Vendor payouts and their status state machine.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::Cents;
use crate::model::UserId;

/// Payout status.
///
/// Linear progression `PENDING -> IN_TRANSIT -> PAID`; `CANCELED` is
/// reachable from `PENDING`, `FAILED` from `PENDING` or `IN_TRANSIT`.
/// `PAID`, `CANCELED` and `FAILED` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutStatus {
    Pending,
    InTransit,
    Paid,
    Canceled,
    Failed,
}

impl PayoutStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Canceled | Self::Failed)
    }

    fn allows(self, to: PayoutStatus) -> bool {
        use PayoutStatus::*;
        matches!(
            (self, to),
            (Pending, InTransit) | (Pending, Canceled) | (Pending, Failed)
                | (InTransit, Paid)
                | (InTransit, Failed)
        )
    }
}

/// Illegal payout status change; surfaced to the operator, never retried
/// automatically.
#[derive(Debug, Error)]
#[error("invalid payout transition {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: PayoutStatus,
    pub to: PayoutStatus,
}

/// A payout to a vendor's account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: Uuid,
    pub user_id: UserId,
    pub gross_cents: Cents,
    pub fee_cents: Cents,
    /// Always `gross_cents - fee_cents`; enforced at construction.
    pub net_cents: Cents,
    pub status: PayoutStatus,
}

impl Payout {
    /// Create a pending payout. `net_cents` is derived, never supplied.
    pub fn new(user_id: UserId, gross_cents: Cents, fee_cents: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            gross_cents,
            fee_cents,
            net_cents: gross_cents - fee_cents,
            status: PayoutStatus::Pending,
        }
    }

    /// Move the payout to a new status if the transition is legal.
    pub fn transition(&mut self, to: PayoutStatus) -> Result<(), InvalidTransition> {
        if !self.status.allows(to) {
            return Err(InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
