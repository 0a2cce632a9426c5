//! Settlement order types.
//!
//! A [`SettlementOrder`] is created the moment a taker action succeeds and
//! both escrow legs are in custody. It is never deleted — the ledger keeps
//! it as an audit record after its one-shot terminal transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetKey, CollectionId, OrderId, PaymentAsset, TokenId};

/// Lifecycle status of a settlement order. All transitions out of `Open`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Escrowed, awaiting delivery, forfeiture, or reversal.
    Open,
    /// Real asset delivered to the buyer; funds and collateral disbursed.
    Delivered,
    /// Venue aborted before any fulfillment window: both legs refunded.
    Reversed,
    /// Seller failed to deliver: collateral awarded to the buyer.
    Forfeited,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Reversed => write!(f, "REVERSED"),
            Self::Forfeited => write!(f, "FORFEITED"),
        }
    }
}

/// An escrowed trade awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOrder {
    /// Dense sequence id, assigned at creation.
    pub id: OrderId,
    pub status: OrderStatus,
    /// Asset identity. Holds the placeholder until delivery rewrites it to
    /// the genesis-mapped real asset.
    pub collection: CollectionId,
    pub token: TokenId,
    pub price_per_unit: u128,
    pub quantity: u64,
    pub buyer: AccountId,
    pub seller: AccountId,
    /// Asset the buyer's payment was escrowed in.
    pub payment_asset: PaymentAsset,
    /// Asset the seller's collateral was escrowed in.
    pub collateral_asset: PaymentAsset,
    pub created_at: DateTime<Utc>,
}

impl SettlementOrder {
    /// The asset currently recorded on the order.
    #[must_use]
    pub fn asset(&self) -> AssetKey {
        AssetKey::new(self.collection, self.token)
    }

    /// Notional escrowed on each side: `price_per_unit × quantity`.
    ///
    /// Returns `None` on overflow. Creation already validated the product,
    /// so `None` never occurs for a stored order.
    #[must_use]
    pub fn total_needed(&self) -> Option<u128> {
        self.price_per_unit.checked_mul(u128::from(self.quantity))
    }

    /// Exact structural match against a caller-supplied descriptor.
    ///
    /// Every fulfillment call must present a replay-proof snapshot of the
    /// order rather than trusting the id alone.
    #[must_use]
    pub fn matches(&self, desc: &OrderDescriptor) -> bool {
        self.id == desc.id
            && self.collection == desc.collection
            && self.token == desc.token
            && self.price_per_unit == desc.price_per_unit
            && self.quantity == desc.quantity
            && self.buyer == desc.buyer
            && self.seller == desc.seller
            && self.payment_asset == desc.payment_asset
            && self.collateral_asset == desc.collateral_asset
    }
}

/// Caller-supplied description of an order, required to match the stored
/// record field-for-field before any fulfillment transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDescriptor {
    pub id: OrderId,
    pub collection: CollectionId,
    pub token: TokenId,
    pub price_per_unit: u128,
    pub quantity: u64,
    pub buyer: AccountId,
    pub seller: AccountId,
    pub payment_asset: PaymentAsset,
    pub collateral_asset: PaymentAsset,
}

impl OrderDescriptor {
    /// Descriptor snapshotting a stored order.
    #[must_use]
    pub fn of(order: &SettlementOrder) -> Self {
        Self {
            id: order.id,
            collection: order.collection,
            token: order.token,
            price_per_unit: order.price_per_unit,
            quantity: order.quantity,
            buyer: order.buyer,
            seller: order.seller,
            payment_asset: order.payment_asset.clone(),
            collateral_asset: order.collateral_asset.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_order() -> SettlementOrder {
        SettlementOrder {
            id: OrderId(0),
            status: OrderStatus::Open,
            collection: CollectionId::new(),
            token: TokenId(1),
            price_per_unit: 2_000_000_000_000_000_000,
            quantity: 2,
            buyer: AccountId::new(),
            seller: AccountId::new(),
            payment_asset: "USDC".to_string(),
            collateral_asset: "USDC".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn total_needed_is_price_times_quantity() {
        let order = make_order();
        assert_eq!(order.total_needed(), Some(4_000_000_000_000_000_000));
    }

    #[test]
    fn descriptor_of_matches() {
        let order = make_order();
        assert!(order.matches(&OrderDescriptor::of(&order)));
    }

    #[test]
    fn mismatched_descriptor_rejected() {
        let order = make_order();
        let mut desc = OrderDescriptor::of(&order);
        desc.quantity = 3;
        assert!(!order.matches(&desc));

        let mut desc = OrderDescriptor::of(&order);
        desc.buyer = AccountId::new();
        assert!(!order.matches(&desc));

        let mut desc = OrderDescriptor::of(&order);
        desc.payment_asset = "DAI".to_string();
        assert!(!order.matches(&desc));
    }

    #[test]
    fn status_display() {
        assert_eq!(format!("{}", OrderStatus::Open), "OPEN");
        assert_eq!(format!("{}", OrderStatus::Forfeited), "FORFEITED");
    }

    #[test]
    fn order_serde_roundtrip() {
        let order = make_order();
        let json = serde_json::to_string(&order).unwrap();
        let back: SettlementOrder = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }
}
