//! Claim-token inventory standing in for the external asset ownership and
//! transfer capability.
//!
//! Two asset kinds exist, mirroring the two approved collection policies:
//! single-unit collections track one owner per token, multi-unit
//! collections track a balance per (token, holder).

use std::collections::HashMap;

use claimdesk_types::{AccountId, AssetKey, CollectionId, Result, TokenId, VenueError};

/// Asset-kind semantics of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// One owner per token; quantities are always 1.
    SingleUnit,
    /// Per-holder balances; arbitrary quantities.
    MultiUnit,
}

/// Holdings across all registered collections.
#[derive(Debug, Clone, Default)]
pub struct AssetInventory {
    kinds: HashMap<CollectionId, AssetKind>,
    owners: HashMap<AssetKey, AccountId>,
    balances: HashMap<(AssetKey, AccountId), u64>,
}

impl AssetInventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection's asset kind. Later registrations overwrite.
    pub fn register_collection(&mut self, collection: CollectionId, kind: AssetKind) {
        self.kinds.insert(collection, kind);
    }

    /// Kind of a collection, if registered.
    #[must_use]
    pub fn kind_of(&self, collection: CollectionId) -> Option<AssetKind> {
        self.kinds.get(&collection).copied()
    }

    /// Mint a single-unit token to `owner`.
    pub fn mint_single(&mut self, collection: CollectionId, token: TokenId, owner: AccountId) {
        self.kinds.entry(collection).or_insert(AssetKind::SingleUnit);
        self.owners.insert(AssetKey::new(collection, token), owner);
    }

    /// Mint `quantity` units of a multi-unit token to `holder`.
    pub fn mint_multi(
        &mut self,
        collection: CollectionId,
        token: TokenId,
        holder: AccountId,
        quantity: u64,
    ) {
        self.kinds.entry(collection).or_insert(AssetKind::MultiUnit);
        *self
            .balances
            .entry((AssetKey::new(collection, token), holder))
            .or_default() += quantity;
    }

    /// Current owner of a single-unit token.
    #[must_use]
    pub fn owner_of(&self, asset: &AssetKey) -> Option<AccountId> {
        self.owners.get(asset).copied()
    }

    /// Units of `asset` held by `holder`. For single-unit tokens this is
    /// 1 for the owner and 0 for everyone else.
    #[must_use]
    pub fn balance_of(&self, asset: &AssetKey, holder: AccountId) -> u64 {
        match self.kinds.get(&asset.collection) {
            Some(AssetKind::SingleUnit) => u64::from(self.owner_of(asset) == Some(holder)),
            Some(AssetKind::MultiUnit) => self
                .balances
                .get(&(*asset, holder))
                .copied()
                .unwrap_or(0),
            None => 0,
        }
    }

    /// Whether `holder` holds at least `quantity` units of `asset`.
    #[must_use]
    pub fn holds(&self, asset: &AssetKey, holder: AccountId, quantity: u64) -> bool {
        self.balance_of(asset, holder) >= quantity
    }

    /// Move `quantity` units of `asset` from `from` to `to`.
    ///
    /// # Errors
    /// Returns `AssetNotHeld` if `from` does not hold enough units, or if
    /// a single-unit transfer has `quantity != 1`.
    pub fn transfer(
        &mut self,
        asset: &AssetKey,
        from: AccountId,
        to: AccountId,
        quantity: u64,
    ) -> Result<()> {
        match self.kinds.get(&asset.collection) {
            Some(AssetKind::SingleUnit) => {
                if quantity != 1 {
                    return Err(VenueError::WrongQuantityForSingleUnit { quantity });
                }
                if self.owner_of(asset) != Some(from) {
                    return Err(VenueError::AssetNotHeld {
                        asset: *asset,
                        needed: 1,
                        held: 0,
                    });
                }
                self.owners.insert(*asset, to);
                Ok(())
            }
            Some(AssetKind::MultiUnit) => {
                let held = self.balance_of(asset, from);
                if held < quantity {
                    return Err(VenueError::AssetNotHeld {
                        asset: *asset,
                        needed: quantity,
                        held,
                    });
                }
                if quantity == 0 {
                    return Ok(());
                }
                *self.balances.entry((*asset, from)).or_default() -= quantity;
                *self.balances.entry((*asset, to)).or_default() += quantity;
                Ok(())
            }
            None => Err(VenueError::AssetNotHeld {
                asset: *asset,
                needed: quantity,
                held: 0,
            }),
        }
    }
}
