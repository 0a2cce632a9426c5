//! Maker offer types: sell listings and collection-wide bids.
//!
//! Listings and bids share one stored shape ([`Offer`]); they differ only in
//! their key. A stored offer with `quantity == 0` is considered absent —
//! the offer book enforces this by deleting depleted entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetKey, CollectionId, PaymentAsset, TokenId};

/// A standing maker offer awaiting a counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Units offered. Always > 0 while stored.
    pub quantity: u64,
    /// Price per unit, on the protocol price grid.
    pub price_per_unit: u128,
    /// Advisory deadline: the offer fails validation once `now >= expires_at`.
    pub expires_at: DateTime<Utc>,
    /// Fungible asset the trade settles in.
    pub payment_asset: PaymentAsset,
}

impl Offer {
    /// Whether the offer has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Notional value of `quantity` units at this offer's price.
    ///
    /// Returns `None` on overflow.
    #[must_use]
    pub fn notional(&self, quantity: u64) -> Option<u128> {
        self.price_per_unit.checked_mul(u128::from(quantity))
    }
}

/// Key of a sell listing: one listing per (asset, maker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingKey {
    pub collection: CollectionId,
    pub token: TokenId,
    pub maker: AccountId,
}

impl ListingKey {
    #[must_use]
    pub fn new(collection: CollectionId, token: TokenId, maker: AccountId) -> Self {
        Self {
            collection,
            token,
            maker,
        }
    }

    /// The asset this listing offers.
    #[must_use]
    pub fn asset(&self) -> AssetKey {
        AssetKey::new(self.collection, self.token)
    }
}

/// Key of a collection-wide bid: one bid per (collection, bidder).
///
/// Collection bids apply to any token in the collection and are only
/// meaningful for single-unit collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BidKey {
    pub collection: CollectionId,
    pub bidder: AccountId,
}

impl BidKey {
    #[must_use]
    pub fn new(collection: CollectionId, bidder: AccountId) -> Self {
        Self { collection, bidder }
    }
}
