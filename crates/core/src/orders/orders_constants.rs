/// Canonical order status strings as stored in the database.
pub const ORDER_STATUS_PENDING: &str = "PENDING";
pub const ORDER_STATUS_FINALIZED: &str = "FINALIZED";
pub const ORDER_STATUS_CANCELLED: &str = "CANCELLED";

/// How long an in-progress order draft survives without being placed.
pub const ORDER_DRAFT_TTL_SECS: u64 = 15 * 60;
