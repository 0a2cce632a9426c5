//! Shared validation predicates.
//!
//! Pure checks used by every mutating venue operation. Each raises a
//! distinct error kind and never mutates state.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use claimdesk_types::{
    AccountId, AssetKey, CollectionPolicy, Result, VenueConfig, VenueError,
    constants::PRICE_UNIT,
};

use crate::{AssetInventory, ValueBank};

/// An offer's expiration must be strictly in the future at call time.
pub fn check_expiry(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if expires_at <= now {
        return Err(VenueError::ExpiryNotInFuture);
    }
    Ok(())
}

/// Prices sit on a coarse grid: at least one unit, and an exact multiple
/// of the unit.
pub fn check_price(price_per_unit: u128) -> Result<()> {
    if price_per_unit < PRICE_UNIT {
        return Err(VenueError::PriceBelowMinimum {
            price: price_per_unit,
            minimum: PRICE_UNIT,
        });
    }
    if price_per_unit % PRICE_UNIT != 0 {
        return Err(VenueError::PriceOffGrid {
            price: price_per_unit,
            unit: PRICE_UNIT,
        });
    }
    Ok(())
}

/// The payment asset must be on the venue allow-list.
pub fn check_payment_asset(config: &VenueConfig, asset: &str) -> Result<()> {
    if !config.payment_allowed(asset) {
        return Err(VenueError::PaymentAssetNotAllowed(asset.to_string()));
    }
    Ok(())
}

/// Whether `seller` may put `quantity` units of `asset` up for sale.
///
/// The collection needs an approved policy, the asset must not already be
/// bound to a settlement order, and the seller must hold what they offer:
/// exactly the token for single-unit collections (with quantity 1), at
/// least `quantity` units for multi-unit collections.
pub fn check_tradeability(
    config: &VenueConfig,
    inventory: &AssetInventory,
    committed: &HashSet<AssetKey>,
    asset: &AssetKey,
    seller: AccountId,
    quantity: u64,
) -> Result<()> {
    let policy = config.policy(asset.collection);
    if !policy.is_approved() {
        return Err(VenueError::CollectionNotApproved(asset.collection));
    }
    if committed.contains(asset) {
        return Err(VenueError::AssetAlreadyCommitted(*asset));
    }
    match policy {
        CollectionPolicy::NotApproved => {
            return Err(VenueError::CollectionNotApproved(asset.collection));
        }
        CollectionPolicy::SingleUnitApproved => {
            if quantity != 1 {
                return Err(VenueError::WrongQuantityForSingleUnit { quantity });
            }
            if !inventory.holds(asset, seller, 1) {
                return Err(VenueError::AssetNotHeld {
                    asset: *asset,
                    needed: 1,
                    held: 0,
                });
            }
        }
        CollectionPolicy::MultiUnitApproved => {
            let held = inventory.balance_of(asset, seller);
            if held < quantity {
                return Err(VenueError::AssetNotHeld {
                    asset: *asset,
                    needed: quantity,
                    held,
                });
            }
        }
    }
    Ok(())
}

/// Whether `payer` can fund `total` of `asset` through the custody
/// account: allow-listed asset, sufficient allowance, sufficient balance.
pub fn check_solvency(
    config: &VenueConfig,
    bank: &ValueBank,
    custody: AccountId,
    payer: AccountId,
    asset: &str,
    total: u128,
) -> Result<()> {
    check_payment_asset(config, asset)?;
    let approved = bank.allowance(payer, custody, asset);
    if approved < total {
        return Err(VenueError::InsufficientAllowance {
            asset: asset.to_string(),
            needed: total,
            approved,
        });
    }
    let available = bank.balance_of(payer, asset);
    if available < total {
        return Err(VenueError::InsufficientFunds {
            asset: asset.to_string(),
            needed: total,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use claimdesk_types::{CollectionId, TokenId};

    #[test]
    fn expiry_must_be_strictly_future() {
        let now = Utc::now();
        assert!(check_expiry(now + Duration::seconds(1), now).is_ok());
        assert_eq!(
            check_expiry(now, now).unwrap_err(),
            VenueError::ExpiryNotInFuture
        );
        assert!(check_expiry(now - Duration::seconds(1), now).is_err());
    }

    #[test]
    fn price_grid() {
        assert!(check_price(PRICE_UNIT).is_ok());
        assert!(check_price(3 * PRICE_UNIT).is_ok());
        assert_eq!(
            check_price(PRICE_UNIT - 1).unwrap_err(),
            VenueError::PriceBelowMinimum {
                price: PRICE_UNIT - 1,
                minimum: PRICE_UNIT
            }
        );
        assert_eq!(
            check_price(PRICE_UNIT + 1).unwrap_err(),
            VenueError::PriceOffGrid {
                price: PRICE_UNIT + 1,
                unit: PRICE_UNIT
            }
        );
        assert!(check_price(0).is_err());
    }

    fn approved_config(collection: CollectionId, policy: CollectionPolicy) -> VenueConfig {
        let mut config = VenueConfig::new(AccountId::new());
        config.policies.insert(collection, policy);
        config.payment_allowlist.insert("USDC".to_string());
        config
    }

    #[test]
    fn tradeability_unapproved_collection() {
        let col = CollectionId::new();
        let config = VenueConfig::new(AccountId::new());
        let inv = AssetInventory::new();
        let err = check_tradeability(
            &config,
            &inv,
            &HashSet::new(),
            &AssetKey::new(col, TokenId(1)),
            AccountId::new(),
            1,
        )
        .unwrap_err();
        assert_eq!(err, VenueError::CollectionNotApproved(col));
    }

    #[test]
    fn tradeability_committed_asset() {
        let col = CollectionId::new();
        let seller = AccountId::new();
        let config = approved_config(col, CollectionPolicy::SingleUnitApproved);
        let mut inv = AssetInventory::new();
        inv.mint_single(col, TokenId(1), seller);

        let asset = AssetKey::new(col, TokenId(1));
        let committed: HashSet<AssetKey> = [asset].into_iter().collect();
        let err =
            check_tradeability(&config, &inv, &committed, &asset, seller, 1).unwrap_err();
        assert_eq!(err, VenueError::AssetAlreadyCommitted(asset));
    }

    #[test]
    fn tradeability_single_unit_rules() {
        let col = CollectionId::new();
        let seller = AccountId::new();
        let config = approved_config(col, CollectionPolicy::SingleUnitApproved);
        let mut inv = AssetInventory::new();
        inv.mint_single(col, TokenId(1), seller);
        let asset = AssetKey::new(col, TokenId(1));
        let none = HashSet::new();

        assert!(check_tradeability(&config, &inv, &none, &asset, seller, 1).is_ok());
        assert_eq!(
            check_tradeability(&config, &inv, &none, &asset, seller, 2).unwrap_err(),
            VenueError::WrongQuantityForSingleUnit { quantity: 2 }
        );
        let stranger = AccountId::new();
        assert!(matches!(
            check_tradeability(&config, &inv, &none, &asset, stranger, 1).unwrap_err(),
            VenueError::AssetNotHeld { .. }
        ));
    }

    #[test]
    fn tradeability_multi_unit_balance() {
        let col = CollectionId::new();
        let seller = AccountId::new();
        let config = approved_config(col, CollectionPolicy::MultiUnitApproved);
        let mut inv = AssetInventory::new();
        inv.mint_multi(col, TokenId(3), seller, 5);
        let asset = AssetKey::new(col, TokenId(3));
        let none = HashSet::new();

        assert!(check_tradeability(&config, &inv, &none, &asset, seller, 5).is_ok());
        assert_eq!(
            check_tradeability(&config, &inv, &none, &asset, seller, 6).unwrap_err(),
            VenueError::AssetNotHeld {
                asset,
                needed: 6,
                held: 5
            }
        );
    }

    #[test]
    fn solvency_checks_allowlist_allowance_balance() {
        let col = CollectionId::new();
        let config = approved_config(col, CollectionPolicy::SingleUnitApproved);
        let mut bank = ValueBank::new();
        let custody = AccountId::new();
        let payer = AccountId::new();

        assert_eq!(
            check_solvency(&config, &bank, custody, payer, "DAI", 10).unwrap_err(),
            VenueError::PaymentAssetNotAllowed("DAI".to_string())
        );

        assert!(matches!(
            check_solvency(&config, &bank, custody, payer, "USDC", 10).unwrap_err(),
            VenueError::InsufficientAllowance { .. }
        ));

        bank.approve(payer, custody, "USDC", 100);
        assert!(matches!(
            check_solvency(&config, &bank, custody, payer, "USDC", 10).unwrap_err(),
            VenueError::InsufficientFunds { .. }
        ));

        bank.deposit(payer, "USDC", 10);
        assert!(check_solvency(&config, &bank, custody, payer, "USDC", 10).is_ok());
    }
}
