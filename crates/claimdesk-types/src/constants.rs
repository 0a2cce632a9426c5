//! System-wide constants for the ClaimDesk venue.

/// Price granularity unit. Every price must be a non-zero multiple of this
/// value, which forces all prices onto a coarse grid and rejects dust and
/// precision-mismatch pricing.
pub const PRICE_UNIT: u128 = 1_000_000_000_000_000_000;

/// Fee denominator: fees are expressed in basis points (1/10000).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Maximum fee rate, per side (100%).
pub const MAX_FEE_BPS: u16 = 10_000;

/// Maximum number of settlement orders the ledger will ever hold.
///
/// Order ids are a dense arena index; creation past this bound is rejected
/// outright rather than wrapping or truncating.
pub const ORDER_CAPACITY: u64 = 6_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "ClaimDesk";
