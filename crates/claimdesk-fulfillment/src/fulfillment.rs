//! One-shot fulfillment transitions: deliver, forfeit, revert.
//!
//! Every transition requires the caller-supplied [`OrderDescriptor`] to
//! match the stored record field-for-field, flips the order's status
//! *before* any external asset movement, and disburses custody exactly
//! once. Window gating and the suspend flag make deliver/forfeit and
//! revert mutually exclusive: the former need a configured window and a
//! running venue, the latter needs a suspended venue whose window was
//! never configured.

use chrono::{DateTime, Utc};
use claimdesk_store::{AssetInventory, ValueBank};
use claimdesk_types::{
    AccountId, AssetKey, OrderDescriptor, OrderStatus, Result, VenueConfig, VenueError,
};

use crate::{FeeSplit, GenesisMap, OrderLedger, fees::split_fees};

/// Everything a fulfillment transition touches, borrowed from the venue.
pub struct FulfillmentContext<'a> {
    pub ledger: &'a mut OrderLedger,
    pub genesis: &'a GenesisMap,
    pub bank: &'a mut ValueBank,
    pub inventory: &'a mut AssetInventory,
    pub config: &'a VenueConfig,
    /// The venue's escrow custody account.
    pub custody: AccountId,
}

/// Outcome of a successful delivery, for event emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub real_asset: AssetKey,
    pub fees: FeeSplit,
}

fn check_window_open(config: &VenueConfig, now: DateTime<Utc>) -> Result<()> {
    if config.suspended {
        return Err(VenueError::VenueSuspended);
    }
    let window = config.window.ok_or(VenueError::WindowNotConfigured)?;
    if !window.contains(now) {
        return Err(VenueError::OutsideFulfillmentWindow);
    }
    Ok(())
}

/// Deliver the real asset: only the recorded buyer or seller may call,
/// inside the fulfillment window, once the placeholder is genesis-mapped.
///
/// Marks the order `Delivered`, rewrites its asset identity to the real
/// asset, routes both fees to the recipient, pays the seller the buyer's
/// net payment, returns the seller's net collateral, and moves the real
/// asset from seller to buyer.
pub fn deliver(
    ctx: &mut FulfillmentContext<'_>,
    caller: AccountId,
    desc: &OrderDescriptor,
    now: DateTime<Utc>,
) -> Result<DeliveryOutcome> {
    check_window_open(ctx.config, now)?;

    let order = ctx.ledger.require_open(desc)?;
    if caller != order.buyer && caller != order.seller {
        return Err(VenueError::NotCounterparty(order.id));
    }
    let placeholder = order.asset();
    let real_asset = ctx
        .genesis
        .resolve(&placeholder)
        .ok_or(VenueError::GenesisNotMapped(placeholder))?;

    let total = order.total_needed().ok_or(VenueError::AmountOverflow)?;
    let fees = split_fees(total, &ctx.config.fees)?;
    let (buyer, seller, quantity) = (order.buyer, order.seller, order.quantity);

    // One-shot transition before any asset movement.
    ctx.ledger
        .resolve(desc.id, OrderStatus::Delivered, Some(real_asset))?;

    let recipient = ctx.config.fees.recipient;
    ctx.bank
        .transfer(&desc.payment_asset, ctx.custody, recipient, fees.buyer_fee)?;
    ctx.bank.transfer(
        &desc.collateral_asset,
        ctx.custody,
        recipient,
        fees.seller_fee,
    )?;
    ctx.bank.transfer(
        &desc.payment_asset,
        ctx.custody,
        seller,
        fees.buyer_net(total),
    )?;
    ctx.bank.transfer(
        &desc.collateral_asset,
        ctx.custody,
        seller,
        fees.seller_net(total),
    )?;
    ctx.inventory.transfer(&real_asset, seller, buyer, quantity)?;

    tracing::info!(
        order = %desc.id,
        real = %real_asset,
        total,
        buyer_fee = fees.buyer_fee,
        seller_fee = fees.seller_fee,
        "Order delivered"
    );
    Ok(DeliveryOutcome { real_asset, fees })
}

/// Forfeit the seller's collateral to the buyer. Callable by anyone while
/// the fulfillment window is open.
///
/// The buyer receives both their net-of-fee refund and the seller's
/// net-of-fee collateral; the recipient receives both fees; the seller
/// receives nothing.
pub fn forfeit(
    ctx: &mut FulfillmentContext<'_>,
    desc: &OrderDescriptor,
    now: DateTime<Utc>,
) -> Result<FeeSplit> {
    check_window_open(ctx.config, now)?;

    let order = ctx.ledger.require_open(desc)?;
    let total = order.total_needed().ok_or(VenueError::AmountOverflow)?;
    let fees = split_fees(total, &ctx.config.fees)?;
    let buyer = order.buyer;

    ctx.ledger.resolve(desc.id, OrderStatus::Forfeited, None)?;

    let recipient = ctx.config.fees.recipient;
    ctx.bank
        .transfer(&desc.payment_asset, ctx.custody, recipient, fees.buyer_fee)?;
    ctx.bank.transfer(
        &desc.collateral_asset,
        ctx.custody,
        recipient,
        fees.seller_fee,
    )?;
    ctx.bank.transfer(
        &desc.payment_asset,
        ctx.custody,
        buyer,
        fees.buyer_net(total),
    )?;
    ctx.bank.transfer(
        &desc.collateral_asset,
        ctx.custody,
        buyer,
        fees.seller_net(total),
    )?;

    tracing::info!(
        order = %desc.id,
        total,
        buyer_fee = fees.buyer_fee,
        seller_fee = fees.seller_fee,
        "Order forfeited"
    );
    Ok(fees)
}

/// Unwind an order in full: payment back to the buyer, collateral back to
/// the seller, no fees. Callable by anyone, but only while the venue is
/// suspended and a fulfillment window was never configured — a pure state
/// gate, independent of the clock.
pub fn revert(ctx: &mut FulfillmentContext<'_>, desc: &OrderDescriptor) -> Result<()> {
    if !ctx.config.suspended {
        return Err(VenueError::VenueNotSuspended);
    }
    if ctx.config.window.is_some() {
        return Err(VenueError::ReversalBarredByWindow);
    }

    let order = ctx.ledger.require_open(desc)?;
    let total = order.total_needed().ok_or(VenueError::AmountOverflow)?;
    let (buyer, seller) = (order.buyer, order.seller);

    ctx.ledger.resolve(desc.id, OrderStatus::Reversed, None)?;

    ctx.bank
        .transfer(&desc.payment_asset, ctx.custody, buyer, total)?;
    ctx.bank
        .transfer(&desc.collateral_asset, ctx.custody, seller, total)?;

    tracing::info!(order = %desc.id, total, "Order reversed");
    Ok(())
}
