/// Canonical resource type strings as stored in the ledger.
pub const RESOURCE_TYPE_DIRTY_MONEY: &str = "DIRTY_MONEY";
pub const RESOURCE_TYPE_BATTERY: &str = "BATTERY";
pub const RESOURCE_TYPE_CIRCUIT_BOARD: &str = "CIRCUIT_BOARD";

/// Sanity ceiling for a single recorded farm quantity.
pub const MAX_FARM_QUANTITY: i64 = 1_000_000_000;
