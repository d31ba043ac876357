//! Catalog loading: the schedule/promo snapshot the binary feeds the engine.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::Cents;
use crate::model::{FeeSchedule, PromoCode, ScheduleId};

/// Errors that can occur when loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("schedule {id}: take rate {bps} bps exceeds 10000")]
    TakeRateOutOfRange { id: ScheduleId, bps: u16 },

    #[error("schedule {id}: negative floor or cap")]
    NegativeBound { id: ScheduleId },

    #[error("promo '{code}': percent off {bps} bps exceeds 10000")]
    PercentOutOfRange { code: String, bps: u16 },

    #[error("promo '{code}': negative amount off")]
    NegativeAmountOff { code: String },

    #[error("duplicate promo code '{0}'")]
    DuplicatePromo(String),
}

/// A consistent snapshot of fee schedules and promo codes.
///
/// Promo codes are uppercased on load; lookups are case-insensitive. Note
/// that "exactly one discount field" is deliberately NOT enforced here: the
/// engine defends against ambiguous records at use time, and the loader
/// mirrors the store, which has historically let them through.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub schedules: Vec<FeeSchedule>,
    #[serde(default)]
    pub promos: Vec<PromoCode>,
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        let mut catalog: Catalog = serde_json::from_str(&raw)?;
        catalog.validate_schedules()?;
        catalog.normalize_promos()?;
        Ok(catalog)
    }

    fn validate_schedules(&self) -> Result<(), CatalogError> {
        for schedule in &self.schedules {
            if let Some(bps) = schedule.take_rate_bps
                && bps > 10_000
            {
                return Err(CatalogError::TakeRateOutOfRange {
                    id: schedule.id,
                    bps,
                });
            }
            let negative = |bound: Option<Cents>| bound.is_some_and(|b| b < Cents::ZERO);
            if negative(schedule.fee_floor_cents) || negative(schedule.fee_cap_cents) {
                return Err(CatalogError::NegativeBound { id: schedule.id });
            }
        }
        Ok(())
    }

    fn normalize_promos(&mut self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for promo in &mut self.promos {
            promo.code = promo.code.to_uppercase();
            if !seen.insert(promo.code.clone()) {
                return Err(CatalogError::DuplicatePromo(promo.code.clone()));
            }
            if let Some(bps) = promo.percent_off_bps
                && bps > 10_000
            {
                return Err(CatalogError::PercentOutOfRange {
                    code: promo.code.clone(),
                    bps,
                });
            }
            if promo.amount_off_cents.is_some_and(|a| a < Cents::ZERO) {
                return Err(CatalogError::NegativeAmountOff {
                    code: promo.code.clone(),
                });
            }
        }
        Ok(())
    }
}
