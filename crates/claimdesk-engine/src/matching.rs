//! Maker offer maintenance and taker matching & escrow.
//!
//! Taker flows deplete the maker offer *before* any value moves: once the
//! offer is consumed there is no window in which the same units can be
//! matched twice, regardless of call ordering. Escrow then pulls the
//! price from the buyer and equal-value collateral from the seller into
//! custody, and records the settlement order — exactly one per trade.

use chrono::{DateTime, Utc};
use claimdesk_store::validation;
use claimdesk_types::{
    AccountId, AssetKey, BidKey, CollectionId, CollectionPolicy, ListingKey, Offer,
    PaymentAsset, Result, TokenId, VenueError, VenueEvent,
};

use crate::action::VenueAction;
use crate::venue::VenueState;

/// Apply one batch element on behalf of `caller`.
pub(crate) fn apply_action(
    state: &mut VenueState,
    custody: AccountId,
    caller: AccountId,
    action: VenueAction,
    now: DateTime<Utc>,
) -> Result<()> {
    match action {
        VenueAction::UpsertListing {
            collection,
            token,
            quantity,
            price_per_unit,
            expires_at,
            payment_asset,
        } => upsert_listing(
            state,
            caller,
            collection,
            token,
            quantity,
            price_per_unit,
            expires_at,
            payment_asset,
            now,
        ),
        VenueAction::CancelListing { collection, token } => {
            cancel_listing(state, caller, collection, token);
            Ok(())
        }
        VenueAction::UpsertCollectionBid {
            collection,
            quantity,
            price_per_unit,
            expires_at,
            payment_asset,
        } => upsert_collection_bid(
            state,
            custody,
            caller,
            collection,
            quantity,
            price_per_unit,
            expires_at,
            payment_asset,
            now,
        ),
        VenueAction::CancelCollectionBid { collection } => {
            cancel_collection_bid(state, caller, collection);
            Ok(())
        }
        VenueAction::AcceptBid {
            collection,
            token,
            bidder,
            quantity,
            price_per_unit,
            payment_asset,
        } => accept_bid(
            state,
            custody,
            caller,
            collection,
            token,
            bidder,
            quantity,
            price_per_unit,
            &payment_asset,
            now,
        ),
        VenueAction::BuyListing {
            collection,
            token,
            owner,
            quantity,
            max_price_per_unit,
            payment_asset,
        } => buy_listing(
            state,
            custody,
            caller,
            collection,
            token,
            owner,
            quantity,
            max_price_per_unit,
            &payment_asset,
            now,
        ),
    }
}

// ---------------------------------------------------------------------------
// Maker operations
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn upsert_listing(
    state: &mut VenueState,
    maker: AccountId,
    collection: CollectionId,
    token: TokenId,
    quantity: u64,
    price_per_unit: u128,
    expires_at: DateTime<Utc>,
    payment_asset: PaymentAsset,
    now: DateTime<Utc>,
) -> Result<()> {
    if quantity == 0 {
        return Err(VenueError::ZeroQuantity);
    }
    validation::check_expiry(expires_at, now)?;
    validation::check_price(price_per_unit)?;
    validation::check_payment_asset(&state.config, &payment_asset)?;
    let asset = AssetKey::new(collection, token);
    validation::check_tradeability(
        &state.config,
        &state.inventory,
        state.ledger.committed(),
        &asset,
        maker,
        quantity,
    )?;

    let key = ListingKey::new(collection, token, maker);
    let existed = state.offers.upsert_listing(
        key,
        Offer {
            quantity,
            price_per_unit,
            expires_at,
            payment_asset,
        },
    )?;
    state.events.push(if existed {
        VenueEvent::ListingUpdated {
            collection,
            token,
            maker,
            quantity,
            price_per_unit,
        }
    } else {
        VenueEvent::Listed {
            collection,
            token,
            maker,
            quantity,
            price_per_unit,
        }
    });
    Ok(())
}

fn cancel_listing(
    state: &mut VenueState,
    maker: AccountId,
    collection: CollectionId,
    token: TokenId,
) {
    let key = ListingKey::new(collection, token, maker);
    if state.offers.remove_listing(&key) {
        state.events.push(VenueEvent::ListingCanceled {
            collection,
            token,
            maker,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn upsert_collection_bid(
    state: &mut VenueState,
    custody: AccountId,
    bidder: AccountId,
    collection: CollectionId,
    quantity: u64,
    price_per_unit: u128,
    expires_at: DateTime<Utc>,
    payment_asset: PaymentAsset,
    now: DateTime<Utc>,
) -> Result<()> {
    if quantity == 0 {
        return Err(VenueError::ZeroQuantity);
    }
    validation::check_expiry(expires_at, now)?;
    validation::check_price(price_per_unit)?;
    match state.config.policy(collection) {
        CollectionPolicy::SingleUnitApproved => {}
        CollectionPolicy::NotApproved => {
            return Err(VenueError::CollectionNotApproved(collection));
        }
        // Multi-unit collections have no collection-level semantics.
        CollectionPolicy::MultiUnitApproved => {
            return Err(VenueError::CollectionBidNotSupported { collection });
        }
    }
    let total = price_per_unit
        .checked_mul(u128::from(quantity))
        .ok_or(VenueError::AmountOverflow)?;
    validation::check_solvency(
        &state.config,
        &state.bank,
        custody,
        bidder,
        &payment_asset,
        total,
    )?;

    let key = BidKey::new(collection, bidder);
    let existed = state.offers.upsert_bid(
        key,
        Offer {
            quantity,
            price_per_unit,
            expires_at,
            payment_asset,
        },
    )?;
    state.events.push(if existed {
        VenueEvent::BidUpdated {
            collection,
            bidder,
            quantity,
            price_per_unit,
        }
    } else {
        VenueEvent::BidPlaced {
            collection,
            bidder,
            quantity,
            price_per_unit,
        }
    });
    Ok(())
}

fn cancel_collection_bid(state: &mut VenueState, bidder: AccountId, collection: CollectionId) {
    let key = BidKey::new(collection, bidder);
    if state.offers.remove_bid(&key) {
        state
            .events
            .push(VenueEvent::BidCanceled { collection, bidder });
    }
}

// ---------------------------------------------------------------------------
// Taker operations
// ---------------------------------------------------------------------------

/// Sell into a stored collection bid.
///
/// The stored price must equal the quoted one exactly — a bidder lowering
/// their price between quote and acceptance cannot fill at the stale
/// price, and vice versa.
#[allow(clippy::too_many_arguments)]
fn accept_bid(
    state: &mut VenueState,
    custody: AccountId,
    seller: AccountId,
    collection: CollectionId,
    token: TokenId,
    bidder: AccountId,
    quantity: u64,
    price_per_unit: u128,
    payment_asset: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    if seller == bidder {
        return Err(VenueError::SelfTrade);
    }
    if quantity == 0 {
        return Err(VenueError::ZeroQuantity);
    }
    validation::check_payment_asset(&state.config, payment_asset)?;

    let key = BidKey::new(collection, bidder);
    let stored = state
        .offers
        .bid(&key)
        // A bid in a different payment asset is not the bid described.
        .filter(|offer| offer.payment_asset == payment_asset)
        .ok_or(VenueError::BidNotFound { collection })?;
    if stored.quantity < quantity {
        return Err(VenueError::InsufficientOfferQuantity {
            requested: quantity,
            available: stored.quantity,
        });
    }
    if stored.price_per_unit != price_per_unit {
        return Err(VenueError::PriceMismatch {
            quoted: price_per_unit,
            stored: stored.price_per_unit,
        });
    }
    if stored.is_expired(now) {
        return Err(VenueError::OfferExpired);
    }

    // Deplete before any value moves: the consumed units can never be
    // matched a second time.
    state.offers.deplete_bid(&key, quantity)?;

    let asset = AssetKey::new(collection, token);
    validation::check_tradeability(
        &state.config,
        &state.inventory,
        state.ledger.committed(),
        &asset,
        seller,
        quantity,
    )?;

    let order_id = escrow_and_record(
        state,
        custody,
        asset,
        price_per_unit,
        quantity,
        bidder,
        seller,
        payment_asset,
        now,
    )?;

    state.events.push(VenueEvent::BidAccepted {
        order_id,
        collection,
        token,
        bidder,
        seller,
        quantity,
        price_per_unit,
        payment_asset: payment_asset.to_string(),
    });
    Ok(())
}

/// Buy from a stored listing.
///
/// The stored price may not exceed the taker's ceiling — a seller raising
/// the price between quote and purchase cannot fill above what the buyer
/// agreed to pay.
#[allow(clippy::too_many_arguments)]
fn buy_listing(
    state: &mut VenueState,
    custody: AccountId,
    buyer: AccountId,
    collection: CollectionId,
    token: TokenId,
    owner: AccountId,
    quantity: u64,
    max_price_per_unit: u128,
    payment_asset: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    if buyer == owner {
        return Err(VenueError::SelfTrade);
    }
    if quantity == 0 {
        return Err(VenueError::ZeroQuantity);
    }

    let key = ListingKey::new(collection, token, owner);
    let stored = state
        .offers
        .listing(&key)
        .filter(|offer| offer.payment_asset == payment_asset)
        .ok_or(VenueError::ListingNotFound { collection, token })?;
    if stored.quantity < quantity {
        return Err(VenueError::InsufficientOfferQuantity {
            requested: quantity,
            available: stored.quantity,
        });
    }
    if stored.price_per_unit > max_price_per_unit {
        return Err(VenueError::PriceAboveLimit {
            stored: stored.price_per_unit,
            limit: max_price_per_unit,
        });
    }
    if stored.is_expired(now) {
        return Err(VenueError::OfferExpired);
    }
    let price_per_unit = stored.price_per_unit;

    state.offers.deplete_listing(&key, quantity)?;

    // The listing owner is still the seller of record.
    let asset = AssetKey::new(collection, token);
    validation::check_tradeability(
        &state.config,
        &state.inventory,
        state.ledger.committed(),
        &asset,
        owner,
        quantity,
    )?;

    let order_id = escrow_and_record(
        state,
        custody,
        asset,
        price_per_unit,
        quantity,
        buyer,
        owner,
        payment_asset,
        now,
    )?;

    state.events.push(VenueEvent::ItemSold {
        order_id,
        collection,
        token,
        buyer,
        seller: owner,
        quantity,
        price_per_unit,
        payment_asset: payment_asset.to_string(),
    });
    Ok(())
}

/// Pull both escrow legs into custody and record the settlement order.
///
/// The buyer pays the notional; the seller posts matching collateral —
/// skin-in-the-game substituting for the not-yet-deliverable asset.
#[allow(clippy::too_many_arguments)]
fn escrow_and_record(
    state: &mut VenueState,
    custody: AccountId,
    asset: AssetKey,
    price_per_unit: u128,
    quantity: u64,
    buyer: AccountId,
    seller: AccountId,
    payment_asset: &str,
    now: DateTime<Utc>,
) -> Result<claimdesk_types::OrderId> {
    let total = price_per_unit
        .checked_mul(u128::from(quantity))
        .ok_or(VenueError::AmountOverflow)?;

    state
        .bank
        .transfer_from(custody, payment_asset, buyer, custody, total)?;
    state
        .bank
        .transfer_from(custody, payment_asset, seller, custody, total)?;

    let order_id = state.ledger.create(
        asset,
        price_per_unit,
        quantity,
        buyer,
        seller,
        payment_asset.to_string(),
        payment_asset.to_string(),
        now,
    )?;

    tracing::info!(
        order = %order_id,
        asset = %asset,
        buyer = %buyer,
        seller = %seller,
        quantity,
        price = price_per_unit,
        escrowed = total,
        "Trade escrowed"
    );
    Ok(order_id)
}
