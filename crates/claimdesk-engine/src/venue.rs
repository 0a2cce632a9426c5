//! The venue facade: one mutable entry point over the whole engine.
//!
//! All mutating operations pass through [`Venue::guarded`], which rejects
//! reentrant calls and snapshots the entire state before applying the
//! operation, restoring it on any failure. A batch of actions therefore
//! commits all-or-nothing, events included.

use chrono::{DateTime, Utc};
use claimdesk_fulfillment::{
    DeliveryOutcome, FeeSplit, FulfillmentContext, GenesisMap, OrderLedger,
};
use claimdesk_store::{AssetInventory, OfferBook, ValueBank};
use claimdesk_types::{
    AccountId, AssetKey, CollectionId, CollectionPolicy, FeeConfig, FulfillmentWindow,
    OrderDescriptor, PaymentAsset, Result, VenueConfig, VenueError, VenueEvent,
};

use crate::action::VenueAction;
use crate::matching;

/// Everything the venue owns. Cloneable wholesale so the guard can
/// snapshot and restore it.
#[derive(Debug, Clone)]
pub(crate) struct VenueState {
    pub(crate) offers: OfferBook,
    pub(crate) bank: ValueBank,
    pub(crate) inventory: AssetInventory,
    pub(crate) ledger: OrderLedger,
    pub(crate) genesis: GenesisMap,
    pub(crate) config: VenueConfig,
    pub(crate) events: Vec<VenueEvent>,
}

/// The single mutable handle over the venue.
#[derive(Debug)]
pub struct Venue {
    state: VenueState,
    custody: AccountId,
    entered: bool,
}

impl Venue {
    /// Fresh venue with an empty book, bank, and ledger.
    ///
    /// `custody` is the dedicated escrow account; it must not be used as
    /// a trading account.
    #[must_use]
    pub fn new(admin: AccountId, custody: AccountId) -> Self {
        Self {
            state: VenueState {
                offers: OfferBook::new(),
                bank: ValueBank::new(),
                inventory: AssetInventory::new(),
                ledger: OrderLedger::new(),
                genesis: GenesisMap::new(),
                config: VenueConfig::new(admin),
                events: Vec::new(),
            },
            custody,
            entered: false,
        }
    }

    /// Run one mutating operation under the reentrancy and rollback guard.
    ///
    /// On failure the pre-call snapshot is restored wholesale, so no
    /// partial effect — balances, offers, orders, or events — survives.
    fn guarded<T>(
        &mut self,
        f: impl FnOnce(&mut VenueState, AccountId) -> Result<T>,
    ) -> Result<T> {
        if self.entered {
            return Err(VenueError::ReentrancyBlocked);
        }
        self.entered = true;
        let snapshot = self.state.clone();
        let outcome = f(&mut self.state, self.custody);
        if outcome.is_err() {
            tracing::warn!("Operation failed, snapshot restored");
            self.state = snapshot;
        }
        self.entered = false;
        outcome
    }

    /// Test hook: mark an operation as already in flight, as a host
    /// calling back into the venue from inside one would.
    #[cfg(test)]
    fn begin_entry(&mut self) {
        self.entered = true;
    }

    // =====================================================================
    // Maker / taker entry point
    // =====================================================================

    /// Apply a batch of actions on behalf of `caller`, strictly in order,
    /// all-or-nothing.
    pub fn execute(
        &mut self,
        caller: AccountId,
        actions: Vec<VenueAction>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.guarded(|state, custody| {
            if state.config.suspended {
                return Err(VenueError::VenueSuspended);
            }
            for action in actions {
                tracing::debug!(caller = %caller, action = action.kind(), "Applying action");
                matching::apply_action(state, custody, caller, action, now)?;
            }
            Ok(())
        })
    }

    // =====================================================================
    // Fulfillment entry points
    // =====================================================================

    /// Deliver the real asset for an open order. Buyer or seller only,
    /// inside the fulfillment window.
    pub fn deliver(
        &mut self,
        caller: AccountId,
        desc: &OrderDescriptor,
        now: DateTime<Utc>,
    ) -> Result<DeliveryOutcome> {
        self.guarded(|state, custody| {
            let mut ctx = FulfillmentContext {
                ledger: &mut state.ledger,
                genesis: &state.genesis,
                bank: &mut state.bank,
                inventory: &mut state.inventory,
                config: &state.config,
                custody,
            };
            let outcome = claimdesk_fulfillment::deliver(&mut ctx, caller, desc, now)?;
            state.events.push(VenueEvent::OrderDelivered {
                order_id: desc.id,
                real_asset: outcome.real_asset,
                buyer_fee: outcome.fees.buyer_fee,
                seller_fee: outcome.fees.seller_fee,
            });
            Ok(outcome)
        })
    }

    /// Forfeit the seller's collateral to the buyer. Callable by anyone
    /// while the fulfillment window is open.
    pub fn forfeit(
        &mut self,
        desc: &OrderDescriptor,
        now: DateTime<Utc>,
    ) -> Result<FeeSplit> {
        self.guarded(|state, custody| {
            let mut ctx = FulfillmentContext {
                ledger: &mut state.ledger,
                genesis: &state.genesis,
                bank: &mut state.bank,
                inventory: &mut state.inventory,
                config: &state.config,
                custody,
            };
            let fees = claimdesk_fulfillment::forfeit(&mut ctx, desc, now)?;
            state.events.push(VenueEvent::OrderForfeited {
                order_id: desc.id,
                buyer_fee: fees.buyer_fee,
                seller_fee: fees.seller_fee,
            });
            Ok(fees)
        })
    }

    /// Unwind an open order in full. Callable by anyone, but only while
    /// the venue is suspended and no window was ever configured.
    pub fn revert(&mut self, desc: &OrderDescriptor) -> Result<()> {
        self.guarded(|state, custody| {
            let mut ctx = FulfillmentContext {
                ledger: &mut state.ledger,
                genesis: &state.genesis,
                bank: &mut state.bank,
                inventory: &mut state.inventory,
                config: &state.config,
                custody,
            };
            claimdesk_fulfillment::revert(&mut ctx, desc)?;
            state
                .events
                .push(VenueEvent::OrderReversed { order_id: desc.id });
            Ok(())
        })
    }

    // =====================================================================
    // Admin gate
    // =====================================================================

    fn require_admin(&self, caller: AccountId) -> Result<()> {
        if caller != self.state.config.admin {
            return Err(VenueError::NotAdmin);
        }
        Ok(())
    }

    /// Replace the fee configuration. Rates above 100% are rejected.
    pub fn set_fees(&mut self, caller: AccountId, fees: FeeConfig) -> Result<()> {
        self.require_admin(caller)?;
        fees.validate()?;
        tracing::info!(
            buyer_bps = fees.buyer_fee_bps,
            seller_bps = fees.seller_fee_bps,
            recipient = %fees.recipient,
            "Fee configuration updated"
        );
        self.state.config.fees = fees;
        Ok(())
    }

    /// Configure or update the fulfillment window. There is deliberately
    /// no way to clear it: reversal legality depends on the window having
    /// never been configured.
    pub fn set_window(&mut self, caller: AccountId, window: FulfillmentWindow) -> Result<()> {
        self.require_admin(caller)?;
        tracing::info!(start = %window.start, duration_secs = window.duration_secs, "Fulfillment window set");
        self.state.config.window = Some(window);
        Ok(())
    }

    /// Set a collection's trading policy.
    pub fn set_collection_policy(
        &mut self,
        caller: AccountId,
        collection: CollectionId,
        policy: CollectionPolicy,
    ) -> Result<()> {
        self.require_admin(caller)?;
        self.state.config.policies.insert(collection, policy);
        Ok(())
    }

    /// Add a payment asset to the allowlist.
    pub fn allow_payment_asset(&mut self, caller: AccountId, asset: PaymentAsset) -> Result<()> {
        self.require_admin(caller)?;
        self.state.config.payment_allowlist.insert(asset);
        Ok(())
    }

    /// Remove a payment asset from the allowlist. Existing escrowed orders
    /// in the asset still settle.
    pub fn disallow_payment_asset(&mut self, caller: AccountId, asset: &str) -> Result<()> {
        self.require_admin(caller)?;
        self.state.config.payment_allowlist.remove(asset);
        Ok(())
    }

    /// Flip the global suspend flag.
    pub fn set_suspended(&mut self, caller: AccountId, suspended: bool) -> Result<()> {
        self.require_admin(caller)?;
        tracing::warn!(suspended, "Venue suspension flag changed");
        self.state.config.suspended = suspended;
        Ok(())
    }

    /// Publish the placeholder→real genesis mapping for an asset.
    pub fn publish_genesis(
        &mut self,
        caller: AccountId,
        placeholder: AssetKey,
        real: AssetKey,
    ) -> Result<()> {
        self.require_admin(caller)?;
        self.guarded(|state, _custody| {
            state.genesis.publish(placeholder, real)?;
            state
                .events
                .push(VenueEvent::GenesisMapped { placeholder, real });
            Ok(())
        })
    }

    // =====================================================================
    // Inspection / host integration
    // =====================================================================

    #[must_use]
    pub fn custody(&self) -> AccountId {
        self.custody
    }

    #[must_use]
    pub fn offers(&self) -> &OfferBook {
        &self.state.offers
    }

    #[must_use]
    pub fn bank(&self) -> &ValueBank {
        &self.state.bank
    }

    /// Mutable bank access for the host to credit deposits and approvals.
    pub fn bank_mut(&mut self) -> &mut ValueBank {
        &mut self.state.bank
    }

    #[must_use]
    pub fn inventory(&self) -> &AssetInventory {
        &self.state.inventory
    }

    /// Mutable inventory access for the host to register and mint assets.
    pub fn inventory_mut(&mut self) -> &mut AssetInventory {
        &mut self.state.inventory
    }

    #[must_use]
    pub fn ledger(&self) -> &OrderLedger {
        &self.state.ledger
    }

    #[must_use]
    pub fn genesis(&self) -> &GenesisMap {
        &self.state.genesis
    }

    #[must_use]
    pub fn config(&self) -> &VenueConfig {
        &self.state.config
    }

    /// Events recorded so far, in commit order.
    #[must_use]
    pub fn events(&self) -> &[VenueEvent] {
        &self.state.events
    }

    /// Drain the event log, handing the recorded events to the host.
    pub fn take_events(&mut self) -> Vec<VenueEvent> {
        std::mem::take(&mut self.state.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use claimdesk_store::AssetKind;
    use claimdesk_types::{TokenId, constants::PRICE_UNIT};

    const USDC: &str = "USDC";
    const PRICE: u128 = 2 * PRICE_UNIT;

    struct Fixture {
        venue: Venue,
        admin: AccountId,
        seller: AccountId,
        buyer: AccountId,
        collection: CollectionId,
        now: DateTime<Utc>,
    }

    impl Fixture {
        fn new() -> Self {
            let admin = AccountId::new();
            let custody = AccountId::new();
            let seller = AccountId::new();
            let buyer = AccountId::new();
            let collection = CollectionId::new();
            let now = Utc::now();

            let mut venue = Venue::new(admin, custody);
            venue.allow_payment_asset(admin, USDC.to_string()).unwrap();
            venue
                .set_collection_policy(admin, collection, CollectionPolicy::SingleUnitApproved)
                .unwrap();
            venue
                .inventory_mut()
                .register_collection(collection, AssetKind::SingleUnit);
            venue.inventory_mut().mint_single(collection, TokenId(1), seller);

            for account in [seller, buyer] {
                venue.bank_mut().deposit(account, USDC, 100 * PRICE_UNIT);
                venue.bank_mut().approve(account, custody, USDC, 100 * PRICE_UNIT);
            }

            Self {
                venue,
                admin,
                seller,
                buyer,
                collection,
                now,
            }
        }

        fn listing(&self) -> VenueAction {
            VenueAction::UpsertListing {
                collection: self.collection,
                token: TokenId(1),
                quantity: 1,
                price_per_unit: PRICE,
                expires_at: self.now + Duration::hours(1),
                payment_asset: USDC.to_string(),
            }
        }
    }

    #[test]
    fn batch_rolls_back_wholesale_on_failure() {
        let mut fx = Fixture::new();
        let bad = VenueAction::UpsertListing {
            collection: fx.collection,
            token: TokenId(1),
            quantity: 1,
            price_per_unit: PRICE + 1, // off-grid
            expires_at: fx.now + Duration::hours(1),
            payment_asset: USDC.to_string(),
        };
        let err = fx
            .venue
            .execute(fx.seller, vec![fx.listing(), bad], fx.now)
            .unwrap_err();
        assert!(matches!(err, VenueError::PriceOffGrid { .. }));
        // The valid first element rolled back with the batch, events included.
        assert_eq!(fx.venue.offers().listing_count(), 0);
        assert!(fx.venue.events().is_empty());
    }

    #[test]
    fn successful_batch_commits_in_order() {
        let mut fx = Fixture::new();
        fx.venue
            .execute(fx.seller, vec![fx.listing()], fx.now)
            .unwrap();
        fx.venue
            .execute(
                fx.buyer,
                vec![VenueAction::BuyListing {
                    collection: fx.collection,
                    token: TokenId(1),
                    owner: fx.seller,
                    quantity: 1,
                    max_price_per_unit: PRICE,
                    payment_asset: USDC.to_string(),
                }],
                fx.now,
            )
            .unwrap();

        assert_eq!(fx.venue.ledger().count(), 1);
        let kinds: Vec<_> = fx.venue.events().iter().map(VenueEvent::kind).collect();
        assert_eq!(kinds, vec!["LISTED", "ITEM_SOLD"]);
        // Both escrow legs sit in custody.
        assert_eq!(
            fx.venue.bank().balance_of(fx.venue.custody(), USDC),
            2 * PRICE
        );
    }

    #[test]
    fn reentrant_call_is_blocked() {
        let mut fx = Fixture::new();
        fx.venue.begin_entry();
        let err = fx
            .venue
            .execute(fx.seller, vec![fx.listing()], fx.now)
            .unwrap_err();
        assert_eq!(err, VenueError::ReentrancyBlocked);
        // Rejected before any effect, events included.
        assert_eq!(fx.venue.offers().listing_count(), 0);
        assert!(fx.venue.events().is_empty());
    }

    #[test]
    fn suspension_rejects_execution() {
        let mut fx = Fixture::new();
        fx.venue.set_suspended(fx.admin, true).unwrap();
        let err = fx
            .venue
            .execute(fx.seller, vec![fx.listing()], fx.now)
            .unwrap_err();
        assert_eq!(err, VenueError::VenueSuspended);
    }

    #[test]
    fn admin_gate_rejects_others() {
        let mut fx = Fixture::new();
        let outsider = AccountId::new();
        assert_eq!(
            fx.venue.set_suspended(outsider, true).unwrap_err(),
            VenueError::NotAdmin
        );
        assert_eq!(
            fx.venue
                .set_fees(outsider, FeeConfig::free(outsider))
                .unwrap_err(),
            VenueError::NotAdmin
        );
        assert_eq!(
            fx.venue
                .publish_genesis(
                    outsider,
                    AssetKey::new(fx.collection, TokenId(1)),
                    AssetKey::new(fx.collection, TokenId(1)),
                )
                .unwrap_err(),
            VenueError::NotAdmin
        );
    }

    #[test]
    fn fee_rates_validated_at_the_gate() {
        let mut fx = Fixture::new();
        let bad = FeeConfig {
            buyer_fee_bps: 10_001,
            seller_fee_bps: 0,
            recipient: fx.admin,
        };
        assert_eq!(
            fx.venue.set_fees(fx.admin, bad).unwrap_err(),
            VenueError::FeeRateTooHigh { bps: 10_001 }
        );
    }

    #[test]
    fn genesis_publication_emits_event_once() {
        let mut fx = Fixture::new();
        let placeholder = AssetKey::new(fx.collection, TokenId(1));
        let real = AssetKey::new(CollectionId::new(), TokenId(1));
        fx.venue.publish_genesis(fx.admin, placeholder, real).unwrap();
        assert_eq!(fx.venue.genesis().resolve(&placeholder), Some(real));

        let err = fx
            .venue
            .publish_genesis(fx.admin, placeholder, real)
            .unwrap_err();
        assert_eq!(err, VenueError::GenesisAlreadyMapped(placeholder));
        // The failed second publish left no event behind.
        let mapped: Vec<_> = fx
            .venue
            .events()
            .iter()
            .filter(|event| event.kind() == "GENESIS_MAPPED")
            .collect();
        assert_eq!(mapped.len(), 1);
    }

    #[test]
    fn cancel_of_absent_listing_is_silent() {
        let mut fx = Fixture::new();
        fx.venue
            .execute(
                fx.seller,
                vec![VenueAction::CancelListing {
                    collection: fx.collection,
                    token: TokenId(1),
                }],
                fx.now,
            )
            .unwrap();
        assert!(fx.venue.events().is_empty());
    }
}
