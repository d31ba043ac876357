//! Charge processing engine.
//!
//! Pipes each charge through schedule resolution, fee computation, promo
//! stacking and ledger entry construction, in that order. Each stage is a
//! pure function; the engine owns a consistent snapshot of schedules and
//! promos plus the resulting ledger. Also supports an async stream of
//! charges.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::Cents;
use crate::model::{
    ChargeContext, EntryType, FeeSchedule, LedgerEntry, PromoCode, ScheduleId,
};

mod error;
pub use error::{EngineError, PromoError, ResolveError};

mod resolver;
pub use resolver::resolve;

mod fee;
pub use fee::compute_fee;

mod promo;
pub use promo::{PromoOutcome, Rejection, apply_promo};

mod ledger;
pub use ledger::build_entries;

/// A single fee charge to process.
///
/// `occurred_at` doubles as the resolution clock; the engine never reads
/// wall time itself.
#[derive(Debug, Clone)]
pub struct Charge {
    pub context: ChargeContext,
    pub gross_cents: Cents,
    pub entry_type: EntryType,
    pub promo_code: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Summary of a successfully processed charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeReceipt {
    pub schedule_id: ScheduleId,
    pub fee_cents: Cents,
    pub discount_cents: Cents,
    pub final_fee_cents: Cents,
    /// Set when a promo was supplied but ineligible; the fee stands in full.
    pub rejection: Option<Rejection>,
}

/// The charge processing engine.
///
/// Holds the schedule/promo snapshot taken by the caller and the append-only
/// ledger. Entries are only appended after every stage of a charge succeeds;
/// a failed charge writes nothing.
pub struct Engine {
    schedules: Vec<FeeSchedule>,
    /// Promos keyed by uppercase code (codes are case-insensitive).
    promos: HashMap<String, PromoCode>,
    ledger: Vec<LedgerEntry>,
}

/// Public API
impl Engine {
    pub fn new(schedules: Vec<FeeSchedule>, promos: Vec<PromoCode>) -> Self {
        let promos = promos
            .into_iter()
            .map(|mut p| {
                p.code = p.code.to_uppercase();
                (p.code.clone(), p)
            })
            .collect();
        Self {
            schedules,
            promos,
            ledger: Vec::new(),
        }
    }

    /// Run the engine over a stream of charges.
    ///
    /// Per-charge failures are logged and skipped; the stream keeps going.
    pub async fn run(&mut self, mut stream: impl Stream<Item = Charge> + Unpin) {
        while let Some(charge) = stream.next().await {
            let _ = self.apply(charge);
        }
    }

    /// The ledger accumulated so far, in append order.
    pub fn ledger(&self) -> &[LedgerEntry] {
        self.ledger.as_slice()
    }

    /// Sum of all ledger entries of one type.
    ///
    /// Because fee and promo entries are never netted, this independently
    /// reconstructs gross revenue or gross promo cost over the ledger.
    pub fn total_by_type(&self, entry_type: EntryType) -> Cents {
        self.ledger
            .iter()
            .filter(|e| e.entry_type == entry_type)
            .fold(Cents::ZERO, |acc, e| acc + e.amount_cents)
    }

    /// Look up a promo by (case-insensitive) code.
    pub fn promo(&self, code: &str) -> Option<&PromoCode> {
        self.promos.get(&code.to_uppercase())
    }

    /// Process one charge end to end.
    pub fn apply(&mut self, charge: Charge) -> Result<ChargeReceipt, EngineError> {
        let result = self.apply_charge(&charge);
        Self::log_result(&charge, &result);
        result
    }
}

/// Private API
impl Engine {
    fn apply_charge(&mut self, charge: &Charge) -> Result<ChargeReceipt, EngineError> {
        let schedule = resolve(&charge.context, &self.schedules, charge.occurred_at)?;
        let schedule_id = schedule.id;
        let fee_cents = compute_fee(charge.gross_cents, schedule);

        // unknown codes are a store-lookup miss, not an engine error
        let promo = match &charge.promo_code {
            Some(code) => {
                let promo = self.promos.get(&code.to_uppercase());
                if promo.is_none() {
                    warn!(code = %code, "unknown promo code, charging full fee");
                }
                promo
            }
            None => None,
        };

        let outcome = match promo {
            Some(p) => apply_promo(fee_cents, p, charge.occurred_at)?,
            None => PromoOutcome {
                final_fee_cents: fee_cents,
                discount_cents: Cents::ZERO,
                rejection: None,
            },
        };

        let applied_code = promo
            .filter(|_| outcome.rejection.is_none())
            .map(|p| p.code.clone());

        let (fee_entry, promo_entry) = build_entries(
            &charge.context,
            charge.entry_type,
            fee_cents,
            outcome.discount_cents,
            charge.occurred_at,
            applied_code.as_deref(),
        );
        self.ledger.push(fee_entry);
        if let Some(entry) = promo_entry {
            self.ledger.push(entry);
        }

        // redeemed only once the whole charge has gone through
        if let Some(code) = applied_code
            && let Some(p) = self.promos.get_mut(&code)
        {
            p.current_uses += 1;
        }

        Ok(ChargeReceipt {
            schedule_id,
            fee_cents,
            discount_cents: outcome.discount_cents,
            final_fee_cents: outcome.final_fee_cents,
            rejection: outcome.rejection,
        })
    }

    /// Small helper to log `apply` results
    fn log_result(charge: &Charge, result: &Result<ChargeReceipt, EngineError>) {
        match result {
            Ok(receipt) => match receipt.rejection {
                None => info!(
                    gross = %charge.gross_cents,
                    fee = %receipt.fee_cents,
                    discount = %receipt.discount_cents,
                    schedule = receipt.schedule_id,
                    "charge applied"
                ),
                Some(reason) => info!(
                    gross = %charge.gross_cents,
                    fee = %receipt.fee_cents,
                    reason = ?reason,
                    "charge applied, promo rejected"
                ),
            },
            Err(e) => info!(
                gross = %charge.gross_cents,
                reason = %e,
                "charge skipped"
            ),
        }
    }
}
