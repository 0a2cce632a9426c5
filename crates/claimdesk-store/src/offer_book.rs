//! Maker offer storage: CRUD plus atomic depletion.
//!
//! The book never stores a zero-quantity offer: depletion deletes a fully
//! consumed entry, so "present" and "quantity > 0" are the same predicate.

use std::collections::HashMap;

use claimdesk_types::{BidKey, ListingKey, Offer, Result, VenueError};

/// Holds all open maker offers.
#[derive(Debug, Clone, Default)]
pub struct OfferBook {
    listings: HashMap<ListingKey, Offer>,
    bids: HashMap<BidKey, Offer>,
}

impl OfferBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------

    /// Store a listing, overwriting any prior one under the same key.
    ///
    /// Returns `true` if a live listing already existed (update), `false`
    /// if this is a fresh listing. The offer's quantity must be > 0.
    pub fn upsert_listing(&mut self, key: ListingKey, offer: Offer) -> Result<bool> {
        if offer.quantity == 0 {
            return Err(VenueError::ZeroQuantity);
        }
        Ok(self.listings.insert(key, offer).is_some())
    }

    /// Look up a live listing.
    #[must_use]
    pub fn listing(&self, key: &ListingKey) -> Option<&Offer> {
        self.listings.get(key)
    }

    /// Remove a listing if present. Returns whether one existed.
    pub fn remove_listing(&mut self, key: &ListingKey) -> bool {
        self.listings.remove(key).is_some()
    }

    /// Atomically consume `quantity` units from a listing: decrement, or
    /// delete the entry when fully consumed.
    ///
    /// The caller must have validated `quantity` against the stored offer;
    /// the stored quantity never goes negative.
    pub fn deplete_listing(&mut self, key: &ListingKey, quantity: u64) -> Result<()> {
        let offer = self
            .listings
            .get_mut(key)
            .ok_or(VenueError::ListingNotFound {
                collection: key.collection,
                token: key.token,
            })?;
        if quantity > offer.quantity {
            return Err(VenueError::InsufficientOfferQuantity {
                requested: quantity,
                available: offer.quantity,
            });
        }
        offer.quantity -= quantity;
        let remaining = offer.quantity;
        if remaining == 0 {
            self.listings.remove(key);
        }
        tracing::debug!(
            collection = %key.collection,
            token = %key.token,
            maker = %key.maker,
            consumed = quantity,
            remaining,
            "Listing depleted"
        );
        Ok(())
    }

    /// Number of live listings.
    #[must_use]
    pub fn listing_count(&self) -> usize {
        self.listings.len()
    }

    // ------------------------------------------------------------------
    // Collection bids
    // ------------------------------------------------------------------

    /// Store a collection bid, overwriting any prior one under the same key.
    ///
    /// Returns `true` if a live bid already existed.
    pub fn upsert_bid(&mut self, key: BidKey, offer: Offer) -> Result<bool> {
        if offer.quantity == 0 {
            return Err(VenueError::ZeroQuantity);
        }
        Ok(self.bids.insert(key, offer).is_some())
    }

    /// Look up a live collection bid.
    #[must_use]
    pub fn bid(&self, key: &BidKey) -> Option<&Offer> {
        self.bids.get(key)
    }

    /// Remove a bid if present. Returns whether one existed.
    pub fn remove_bid(&mut self, key: &BidKey) -> bool {
        self.bids.remove(key).is_some()
    }

    /// Atomically consume `quantity` units from a bid, mirroring
    /// [`Self::deplete_listing`].
    pub fn deplete_bid(&mut self, key: &BidKey, quantity: u64) -> Result<()> {
        let offer = self.bids.get_mut(key).ok_or(VenueError::BidNotFound {
            collection: key.collection,
        })?;
        if quantity > offer.quantity {
            return Err(VenueError::InsufficientOfferQuantity {
                requested: quantity,
                available: offer.quantity,
            });
        }
        offer.quantity -= quantity;
        let remaining = offer.quantity;
        if remaining == 0 {
            self.bids.remove(key);
        }
        tracing::debug!(
            collection = %key.collection,
            bidder = %key.bidder,
            consumed = quantity,
            remaining,
            "Bid depleted"
        );
        Ok(())
    }

    /// Number of live collection bids.
    #[must_use]
    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }
}
