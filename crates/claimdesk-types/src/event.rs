//! Venue events — the audit trail of significant state transitions.
//!
//! Events are recorded into the venue's in-state log as operations commit.
//! Because the log lives inside the venue state, a failed batch rolls its
//! events back along with everything else.

use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetKey, CollectionId, OrderId, PaymentAsset, TokenId};

/// A state transition worth surfacing to indexers and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VenueEvent {
    /// A new listing was stored.
    Listed {
        collection: CollectionId,
        token: TokenId,
        maker: AccountId,
        quantity: u64,
        price_per_unit: u128,
    },
    /// An existing listing was overwritten.
    ListingUpdated {
        collection: CollectionId,
        token: TokenId,
        maker: AccountId,
        quantity: u64,
        price_per_unit: u128,
    },
    /// A live listing was cancelled.
    ListingCanceled {
        collection: CollectionId,
        token: TokenId,
        maker: AccountId,
    },
    /// A new collection bid was stored.
    BidPlaced {
        collection: CollectionId,
        bidder: AccountId,
        quantity: u64,
        price_per_unit: u128,
    },
    /// An existing collection bid was overwritten.
    BidUpdated {
        collection: CollectionId,
        bidder: AccountId,
        quantity: u64,
        price_per_unit: u128,
    },
    /// A live collection bid was cancelled.
    BidCanceled {
        collection: CollectionId,
        bidder: AccountId,
    },
    /// A seller accepted a collection bid; both escrow legs are in custody.
    BidAccepted {
        order_id: OrderId,
        collection: CollectionId,
        token: TokenId,
        bidder: AccountId,
        seller: AccountId,
        quantity: u64,
        price_per_unit: u128,
        payment_asset: PaymentAsset,
    },
    /// A buyer bought from a listing; both escrow legs are in custody.
    ItemSold {
        order_id: OrderId,
        collection: CollectionId,
        token: TokenId,
        buyer: AccountId,
        seller: AccountId,
        quantity: u64,
        price_per_unit: u128,
        payment_asset: PaymentAsset,
    },
    /// The real asset was delivered and the order resolved.
    OrderDelivered {
        order_id: OrderId,
        real_asset: AssetKey,
        buyer_fee: u128,
        seller_fee: u128,
    },
    /// The seller's collateral was forfeited to the buyer.
    OrderForfeited {
        order_id: OrderId,
        buyer_fee: u128,
        seller_fee: u128,
    },
    /// The order was unwound in full, no fees.
    OrderReversed { order_id: OrderId },
    /// The admin published a placeholder→real mapping.
    GenesisMapped {
        placeholder: AssetKey,
        real: AssetKey,
    },
}

impl VenueEvent {
    /// Short tag for log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Listed { .. } => "LISTED",
            Self::ListingUpdated { .. } => "LISTING_UPDATED",
            Self::ListingCanceled { .. } => "LISTING_CANCELED",
            Self::BidPlaced { .. } => "BID_PLACED",
            Self::BidUpdated { .. } => "BID_UPDATED",
            Self::BidCanceled { .. } => "BID_CANCELED",
            Self::BidAccepted { .. } => "BID_ACCEPTED",
            Self::ItemSold { .. } => "ITEM_SOLD",
            Self::OrderDelivered { .. } => "ORDER_DELIVERED",
            Self::OrderForfeited { .. } => "ORDER_FORFEITED",
            Self::OrderReversed { .. } => "ORDER_REVERSED",
            Self::GenesisMapped { .. } => "GENESIS_MAPPED",
        }
    }
}
