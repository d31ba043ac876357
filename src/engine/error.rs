//! Error types for charge processing.

use thiserror::Error;

use crate::payout::InvalidTransition;

/// Top-level error returned by [`Engine::apply`](super::Engine::apply).
///
/// All variants are recoverable per charge: they abort that charge only and
/// never leave partial ledger writes behind.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("schedule resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("promo application failed: {0}")]
    Promo(#[from] PromoError),

    #[error("{0}")]
    Payout(#[from] InvalidTransition),
}

/// Error during fee schedule resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No schedule matched, not even GLOBAL. A configuration error; the
    /// caller must refuse the charge rather than default to a zero fee.
    #[error("no applicable fee schedule, not even GLOBAL")]
    NoScheduleFound,
}

/// Error during promo application.
///
/// Expired/exhausted promos are not errors; they are reported through
/// [`PromoOutcome`](super::PromoOutcome).
#[derive(Debug, Error)]
pub enum PromoError {
    /// Both `percentOffBps` and `amountOffCents` are set. The store should
    /// reject such records at creation; the engine fails fast rather than
    /// guess which field wins.
    #[error("promo '{0}' sets both percent and fixed discounts")]
    AmbiguousDiscount(String),

    /// Neither discount field is set.
    #[error("promo '{0}' sets no discount")]
    MissingDiscount(String),
}
