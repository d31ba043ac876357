pub mod catalog;
pub mod csv;
pub mod engine;
pub mod model;
pub mod money;
pub mod payout;

pub use engine::{Charge, ChargeReceipt, Engine};
pub use money::Cents;
pub use payout::{Payout, PayoutStatus};
