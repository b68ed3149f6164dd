//! Payout module - weekly quota/laundering payout computation.

mod payout_calculator;
mod payout_model;

pub use payout_calculator::compute_payout;
pub use payout_model::{PayoutBreakdown, PayoutConfig};
