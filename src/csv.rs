use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::Charge;
use crate::model::{
    CategoryId, ChargeContext, EntryType, EventId, LedgerEntry, OrderId, Role, VendorId,
};
use crate::money::Cents;

/// Errors that can occur when parsing csv charge rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized charge type '{charge_type}'")]
    UnrecognizedType { line: usize, charge_type: String },

    #[error("line {line}: unrecognized role '{role}'")]
    UnrecognizedRole { line: usize, role: String },

    #[error("line {line}: invalid timestamp '{value}'")]
    InvalidTimestamp { line: usize, value: String },

    #[error("line {line}: negative gross amount {gross}")]
    NegativeGross { line: usize, gross: i64 },
}

#[derive(Debug, Deserialize)]
struct ChargeRow {
    r#type: String,
    gross: i64,
    order: Option<OrderId>,
    category: Option<CategoryId>,
    event: Option<EventId>,
    vendor: Option<VendorId>,
    role: Option<String>,
    promo: Option<String>,
    occurred_at: String,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    r#type: EntryType,
    amount: String,
    order: Option<OrderId>,
    event: Option<EventId>,
    promo: Option<String>,
    currency: String,
}

/// Only fee-bearing entry types can arrive as charges; the remaining ledger
/// types are produced by payouts, webhooks and adjustments elsewhere.
fn parse_charge_type(value: &str) -> Option<EntryType> {
    match value {
        "ORDER_FEE" => Some(EntryType::OrderFee),
        "PROCESSING_FEE" => Some(EntryType::ProcessingFee),
        "EVENT_FEE" => Some(EntryType::EventFee),
        "SUBSCRIPTION_FEE" => Some(EntryType::SubscriptionFee),
        _ => None,
    }
}

fn parse_role(value: &str) -> Option<Role> {
    match value {
        "BUYER" => Some(Role::Buyer),
        "VENDOR" => Some(Role::Vendor),
        "ORGANIZER" => Some(Role::Organizer),
        _ => None,
    }
}

/// Read charges from a csv file
pub fn read_charges(path: impl AsRef<Path>) -> impl Iterator<Item = Result<Charge, CsvError>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .expect("failed to open csv file");

    reader
        .into_deserialize::<ChargeRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;

            let entry_type =
                parse_charge_type(&row.r#type).ok_or_else(|| CsvError::UnrecognizedType {
                    line,
                    charge_type: row.r#type.clone(),
                })?;

            // fee math is only defined for non-negative grosses; refunds and
            // corrections enter the ledger through other entry types
            if row.gross < 0 {
                return Err(CsvError::NegativeGross {
                    line,
                    gross: row.gross,
                });
            }

            let role = match &row.role {
                Some(value) => Some(parse_role(value).ok_or_else(|| {
                    CsvError::UnrecognizedRole {
                        line,
                        role: value.clone(),
                    }
                })?),
                None => None,
            };

            let occurred_at = DateTime::parse_from_rfc3339(&row.occurred_at)
                .map_err(|_| CsvError::InvalidTimestamp {
                    line,
                    value: row.occurred_at.clone(),
                })?
                .with_timezone(&Utc);

            Ok(Charge {
                context: ChargeContext {
                    order_id: row.order,
                    category_id: row.category,
                    event_id: row.event,
                    vendor_id: row.vendor,
                    role,
                },
                gross_cents: Cents::new(row.gross),
                entry_type,
                promo_code: row.promo,
                occurred_at,
            })
        })
}

/// write ledger entries to stdout in csv format
pub fn write_ledger(entries: &[LedgerEntry]) {
    let stdout = io::stdout();
    let mut writer = csv::Writer::from_writer(stdout.lock());

    for entry in entries {
        let row = OutputRow {
            r#type: entry.entry_type,
            amount: entry.amount_cents.to_string(),
            order: entry.order_id,
            event: entry.event_id,
            promo: entry.metadata.get("promoCode").cloned(),
            currency: entry.currency.clone(),
        };
        writer.serialize(&row).expect("failed to write csv row");
    }

    writer.flush().expect("failed to flush csv writer");
}
