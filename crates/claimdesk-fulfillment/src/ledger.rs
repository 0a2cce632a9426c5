//! Append-only settlement order ledger.
//!
//! Orders live in a dense arena: the id of an order is its index in the
//! vector, assigned monotonically at creation. The ledger also owns the
//! asset-committed set — a placeholder bound to an order once can never be
//! sold again, so entries are set at creation and never cleared.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use claimdesk_types::{
    AccountId, AssetKey, OrderDescriptor, OrderId, OrderStatus, PaymentAsset, Result,
    SettlementOrder, VenueError, constants::ORDER_CAPACITY,
};

/// The venue's order arena plus the asset-committed marker set.
#[derive(Debug, Clone, Default)]
pub struct OrderLedger {
    orders: Vec<SettlementOrder>,
    committed: HashSet<AssetKey>,
}

impl OrderLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly escrowed trade as an `Open` order.
    ///
    /// Assigns the next dense id, binds the asset to the order (the
    /// committed marker), and stores the record.
    ///
    /// # Errors
    /// - `OrderCapacityExhausted` once the id space is used up
    /// - `AssetAlreadyCommitted` if the asset is already bound to an order
    /// - `AmountOverflow` if `price_per_unit × quantity` overflows
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        asset: AssetKey,
        price_per_unit: u128,
        quantity: u64,
        buyer: AccountId,
        seller: AccountId,
        payment_asset: PaymentAsset,
        collateral_asset: PaymentAsset,
        now: DateTime<Utc>,
    ) -> Result<OrderId> {
        if self.orders.len() as u64 >= ORDER_CAPACITY {
            return Err(VenueError::OrderCapacityExhausted {
                capacity: ORDER_CAPACITY,
            });
        }
        if self.committed.contains(&asset) {
            return Err(VenueError::AssetAlreadyCommitted(asset));
        }
        if price_per_unit.checked_mul(u128::from(quantity)).is_none() {
            return Err(VenueError::AmountOverflow);
        }

        let id = OrderId(self.orders.len() as u64);
        self.committed.insert(asset);
        self.orders.push(SettlementOrder {
            id,
            status: OrderStatus::Open,
            collection: asset.collection,
            token: asset.token,
            price_per_unit,
            quantity,
            buyer,
            seller,
            payment_asset,
            collateral_asset,
            created_at: now,
        });

        tracing::debug!(order = %id, asset = %asset, "Settlement order created");
        Ok(id)
    }

    /// Look up an order by id.
    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&SettlementOrder> {
        self.orders.get(id.index())
    }

    /// Find the `Open` order exactly matching a caller-supplied descriptor.
    ///
    /// # Errors
    /// - `OrderNotFound` if the id is unknown
    /// - `OrderNotOpen` if the order already resolved
    /// - `OrderMismatch` if any descriptor field differs from the record
    pub fn require_open(&self, desc: &OrderDescriptor) -> Result<&SettlementOrder> {
        let order = self
            .get(desc.id)
            .ok_or(VenueError::OrderNotFound(desc.id))?;
        if order.status != OrderStatus::Open {
            return Err(VenueError::OrderNotOpen {
                id: order.id,
                status: order.status,
            });
        }
        if !order.matches(desc) {
            return Err(VenueError::OrderMismatch(desc.id));
        }
        Ok(order)
    }

    /// Apply the one-shot terminal transition to an `Open` order.
    ///
    /// For deliveries, `rewrite_asset` carries the genesis-mapped real
    /// identity that replaces the placeholder on the record.
    pub(crate) fn resolve(
        &mut self,
        id: OrderId,
        status: OrderStatus,
        rewrite_asset: Option<AssetKey>,
    ) -> Result<()> {
        let order = self
            .orders
            .get_mut(id.index())
            .ok_or(VenueError::OrderNotFound(id))?;
        if order.status != OrderStatus::Open {
            return Err(VenueError::OrderNotOpen {
                id,
                status: order.status,
            });
        }
        order.status = status;
        if let Some(real) = rewrite_asset {
            order.collection = real.collection;
            order.token = real.token;
        }
        Ok(())
    }

    /// Whether an asset is bound to a settlement order.
    #[must_use]
    pub fn is_committed(&self, asset: &AssetKey) -> bool {
        self.committed.contains(asset)
    }

    /// The full committed set, for validation predicates.
    #[must_use]
    pub fn committed(&self) -> &HashSet<AssetKey> {
        &self.committed
    }

    /// Number of orders ever created.
    #[must_use]
    pub fn count(&self) -> usize {
        self.orders.len()
    }

    /// Iterate all orders in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SettlementOrder> {
        self.orders.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimdesk_types::{CollectionId, TokenId};

    fn create_one(ledger: &mut OrderLedger, token: u64) -> OrderId {
        ledger
            .create(
                AssetKey::new(CollectionId::new(), TokenId(token)),
                2_000_000_000_000_000_000,
                2,
                AccountId::new(),
                AccountId::new(),
                "USDC".to_string(),
                "USDC".to_string(),
                Utc::now(),
            )
            .unwrap()
    }

    #[test]
    fn ids_are_dense_and_monotonic() {
        let mut ledger = OrderLedger::new();
        assert_eq!(create_one(&mut ledger, 1), OrderId(0));
        assert_eq!(create_one(&mut ledger, 2), OrderId(1));
        assert_eq!(create_one(&mut ledger, 3), OrderId(2));
        assert_eq!(ledger.count(), 3);
    }

    #[test]
    fn creation_commits_the_asset() {
        let mut ledger = OrderLedger::new();
        let asset = AssetKey::new(CollectionId::new(), TokenId(7));
        ledger
            .create(
                asset,
                2_000_000_000_000_000_000,
                1,
                AccountId::new(),
                AccountId::new(),
                "USDC".to_string(),
                "USDC".to_string(),
                Utc::now(),
            )
            .unwrap();
        assert!(ledger.is_committed(&asset));

        let err = ledger
            .create(
                asset,
                2_000_000_000_000_000_000,
                1,
                AccountId::new(),
                AccountId::new(),
                "USDC".to_string(),
                "USDC".to_string(),
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(err, VenueError::AssetAlreadyCommitted(asset));
    }

    #[test]
    fn overflow_rejected_at_creation() {
        let mut ledger = OrderLedger::new();
        let err = ledger
            .create(
                AssetKey::new(CollectionId::new(), TokenId(1)),
                u128::MAX,
                2,
                AccountId::new(),
                AccountId::new(),
                "USDC".to_string(),
                "USDC".to_string(),
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(err, VenueError::AmountOverflow);
    }

    #[test]
    fn require_open_enforces_exact_match() {
        let mut ledger = OrderLedger::new();
        let id = create_one(&mut ledger, 1);
        let order = ledger.get(id).unwrap().clone();
        let desc = OrderDescriptor::of(&order);
        assert!(ledger.require_open(&desc).is_ok());

        let mut tampered = desc.clone();
        tampered.price_per_unit += 1;
        assert_eq!(
            ledger.require_open(&tampered).unwrap_err(),
            VenueError::OrderMismatch(id)
        );

        let mut unknown = desc.clone();
        unknown.id = OrderId(99);
        assert_eq!(
            ledger.require_open(&unknown).unwrap_err(),
            VenueError::OrderNotFound(OrderId(99))
        );
    }

    #[test]
    fn resolve_is_one_shot() {
        let mut ledger = OrderLedger::new();
        let id = create_one(&mut ledger, 1);
        ledger.resolve(id, OrderStatus::Forfeited, None).unwrap();
        assert_eq!(ledger.get(id).unwrap().status, OrderStatus::Forfeited);

        let err = ledger.resolve(id, OrderStatus::Delivered, None).unwrap_err();
        assert_eq!(
            err,
            VenueError::OrderNotOpen {
                id,
                status: OrderStatus::Forfeited
            }
        );
    }

    #[test]
    fn resolve_rewrites_asset_identity() {
        let mut ledger = OrderLedger::new();
        let id = create_one(&mut ledger, 1);
        let real = AssetKey::new(CollectionId::new(), TokenId(500));
        ledger
            .resolve(id, OrderStatus::Delivered, Some(real))
            .unwrap();
        let order = ledger.get(id).unwrap();
        assert_eq!(order.asset(), real);
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut ledger = OrderLedger::new();
        let collection = CollectionId::new();
        let (buyer, seller) = (AccountId::new(), AccountId::new());
        for token in 0..ORDER_CAPACITY {
            ledger
                .create(
                    AssetKey::new(collection, TokenId(token)),
                    2_000_000_000_000_000_000,
                    1,
                    buyer,
                    seller,
                    "USDC".to_string(),
                    "USDC".to_string(),
                    Utc::now(),
                )
                .unwrap();
        }
        let err = ledger
            .create(
                AssetKey::new(collection, TokenId(ORDER_CAPACITY)),
                2_000_000_000_000_000_000,
                1,
                buyer,
                seller,
                "USDC".to_string(),
                "USDC".to_string(),
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            VenueError::OrderCapacityExhausted {
                capacity: ORDER_CAPACITY
            }
        );
    }

    #[test]
    fn commitment_survives_resolution() {
        let mut ledger = OrderLedger::new();
        let asset = AssetKey::new(CollectionId::new(), TokenId(7));
        let id = ledger
            .create(
                asset,
                2_000_000_000_000_000_000,
                1,
                AccountId::new(),
                AccountId::new(),
                "USDC".to_string(),
                "USDC".to_string(),
                Utc::now(),
            )
            .unwrap();
        ledger.resolve(id, OrderStatus::Reversed, None).unwrap();
        // The marker is never cleared: one-shot commitment is permanent.
        assert!(ledger.is_committed(&asset));
    }
}
