//! Batchable venue actions.
//!
//! Callers submit an ordered sequence of these in one invocation; the
//! venue applies them strictly in order and aborts the whole batch on the
//! first failure. The caller identity is supplied once per batch and
//! applies to every element.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use claimdesk_types::{AccountId, CollectionId, PaymentAsset, TokenId};

/// One maker or taker operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VenueAction {
    /// Create or overwrite the caller's listing for an asset.
    UpsertListing {
        collection: CollectionId,
        token: TokenId,
        quantity: u64,
        price_per_unit: u128,
        expires_at: DateTime<Utc>,
        payment_asset: PaymentAsset,
    },
    /// Remove the caller's listing, if any. Idempotent.
    CancelListing {
        collection: CollectionId,
        token: TokenId,
    },
    /// Create or overwrite the caller's collection-wide bid. Only legal
    /// for single-unit collections.
    UpsertCollectionBid {
        collection: CollectionId,
        quantity: u64,
        price_per_unit: u128,
        expires_at: DateTime<Utc>,
        payment_asset: PaymentAsset,
    },
    /// Remove the caller's collection bid, if any. Idempotent.
    CancelCollectionBid { collection: CollectionId },
    /// Sell into a stored bid. The caller is the seller; the quoted price
    /// must equal the stored one exactly.
    AcceptBid {
        collection: CollectionId,
        token: TokenId,
        bidder: AccountId,
        quantity: u64,
        price_per_unit: u128,
        payment_asset: PaymentAsset,
    },
    /// Buy from a stored listing. The caller is the buyer; the stored
    /// price may not exceed `max_price_per_unit`.
    BuyListing {
        collection: CollectionId,
        token: TokenId,
        owner: AccountId,
        quantity: u64,
        max_price_per_unit: u128,
        payment_asset: PaymentAsset,
    },
}

impl VenueAction {
    /// Short tag for log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpsertListing { .. } => "UPSERT_LISTING",
            Self::CancelListing { .. } => "CANCEL_LISTING",
            Self::UpsertCollectionBid { .. } => "UPSERT_COLLECTION_BID",
            Self::CancelCollectionBid { .. } => "CANCEL_COLLECTION_BID",
            Self::AcceptBid { .. } => "ACCEPT_BID",
            Self::BuyListing { .. } => "BUY_LISTING",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kinds() {
        let action = VenueAction::CancelCollectionBid {
            collection: CollectionId::new(),
        };
        assert_eq!(action.kind(), "CANCEL_COLLECTION_BID");
    }

    #[test]
    fn action_serde_roundtrip() {
        let action = VenueAction::BuyListing {
            collection: CollectionId::new(),
            token: TokenId(3),
            owner: AccountId::new(),
            quantity: 2,
            max_price_per_unit: 2_000_000_000_000_000_000,
            payment_asset: "USDC".to_string(),
        };
        let json = serde_json::to_string(&action).unwrap();
        let back: VenueAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}
