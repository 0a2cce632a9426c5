//! Venue configuration: fees, fulfillment window, trading policies.
//!
//! All of these are written by the external admin capability and read by
//! the engine. They are plain data — authorization lives in the engine's
//! admin gate, not here.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    AccountId, CollectionId, PaymentAsset, Result, VenueError,
    constants::MAX_FEE_BPS,
};

/// Which trading semantics a collection is approved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollectionPolicy {
    /// Not tradeable on the venue.
    #[default]
    NotApproved,
    /// Single-unit tokens: one owner per token, quantity is always 1.
    SingleUnitApproved,
    /// Multi-unit tokens: per-holder balances, arbitrary quantities.
    MultiUnitApproved,
}

impl CollectionPolicy {
    #[must_use]
    pub fn is_approved(self) -> bool {
        self != Self::NotApproved
    }
}

/// Fee rates in basis points plus the recipient of routed fees.
///
/// Fees apply only at final resolution (delivery or forfeiture), never at
/// escrow time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub buyer_fee_bps: u16,
    pub seller_fee_bps: u16,
    pub recipient: AccountId,
}

impl FeeConfig {
    /// Zero fees routed to `recipient`.
    #[must_use]
    pub fn free(recipient: AccountId) -> Self {
        Self {
            buyer_fee_bps: 0,
            seller_fee_bps: 0,
            recipient,
        }
    }

    /// Reject rates above 10000 bps (100%).
    pub fn validate(&self) -> Result<()> {
        for bps in [self.buyer_fee_bps, self.seller_fee_bps] {
            if bps > MAX_FEE_BPS {
                return Err(VenueError::FeeRateTooHigh { bps });
            }
        }
        Ok(())
    }
}

/// The global interval during which delivery and forfeiture are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentWindow {
    pub start: DateTime<Utc>,
    pub duration_secs: i64,
}

impl FulfillmentWindow {
    #[must_use]
    pub fn new(start: DateTime<Utc>, duration_secs: i64) -> Self {
        Self {
            start,
            duration_secs,
        }
    }

    /// End of the window (inclusive).
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::seconds(self.duration_secs)
    }

    /// Whether `now` falls within `[start, start + duration]`.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        now >= self.start && now <= self.end()
    }
}

/// The venue's whole mutable configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Account authorized for configuration writes.
    pub admin: AccountId,
    pub fees: FeeConfig,
    /// `None` until the admin configures it. Once set it can be updated
    /// but never cleared — reversal legality depends on it having never
    /// been configured.
    pub window: Option<FulfillmentWindow>,
    /// Per-collection trading policy. Absent collections are `NotApproved`.
    pub policies: HashMap<CollectionId, CollectionPolicy>,
    /// Payment assets trades may settle in.
    pub payment_allowlist: HashSet<PaymentAsset>,
    /// Global suspend flag. While set, maker/taker/fulfillment entry
    /// points reject; reversal requires it.
    pub suspended: bool,
}

impl VenueConfig {
    /// Fresh configuration with zero fees routed to the admin.
    #[must_use]
    pub fn new(admin: AccountId) -> Self {
        Self {
            admin,
            fees: FeeConfig::free(admin),
            window: None,
            policies: HashMap::new(),
            payment_allowlist: HashSet::new(),
            suspended: false,
        }
    }

    /// Policy of a collection; `NotApproved` when never configured.
    #[must_use]
    pub fn policy(&self, collection: CollectionId) -> CollectionPolicy {
        self.policies.get(&collection).copied().unwrap_or_default()
    }

    /// Whether a payment asset is allow-listed.
    #[must_use]
    pub fn payment_allowed(&self, asset: &str) -> bool {
        self.payment_allowlist.contains(asset)
    }
}
