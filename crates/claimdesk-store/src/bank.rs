//! Fungible value ledger standing in for the external value-transfer
//! capability.
//!
//! Accounts hold per-asset balances and may grant a spender (in practice,
//! the venue's custody account) an allowance. Escrow pulls are
//! `transfer_from` calls that consume allowance; disbursements are plain
//! custody-to-account transfers. A zero amount is always a no-op, never an
//! error.

use std::collections::HashMap;

use claimdesk_types::{AccountId, PaymentAsset, Result, VenueError};

/// Balances and allowances per (account, asset).
#[derive(Debug, Clone, Default)]
pub struct ValueBank {
    balances: HashMap<(AccountId, PaymentAsset), u128>,
    /// (owner, spender, asset) → spendable amount.
    allowances: HashMap<(AccountId, AccountId, PaymentAsset), u128>,
}

impl ValueBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account. Creates the balance entry if absent.
    pub fn deposit(&mut self, account: AccountId, asset: &str, amount: u128) {
        if amount == 0 {
            return;
        }
        *self
            .balances
            .entry((account, asset.to_string()))
            .or_default() += amount;
    }

    /// Balance of an (account, asset) pair.
    #[must_use]
    pub fn balance_of(&self, account: AccountId, asset: &str) -> u128 {
        self.balances
            .get(&(account, asset.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Grant `spender` the right to pull up to `amount` of `asset` from
    /// `owner`. Overwrites any prior allowance.
    pub fn approve(&mut self, owner: AccountId, spender: AccountId, asset: &str, amount: u128) {
        self.allowances
            .insert((owner, spender, asset.to_string()), amount);
    }

    /// Remaining allowance granted by `owner` to `spender`.
    #[must_use]
    pub fn allowance(&self, owner: AccountId, spender: AccountId, asset: &str) -> u128 {
        self.allowances
            .get(&(owner, spender, asset.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Move value directly between accounts.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `from` cannot cover `amount`.
    pub fn transfer(
        &mut self,
        asset: &str,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let available = self.balance_of(from, asset);
        if available < amount {
            return Err(VenueError::InsufficientFunds {
                asset: asset.to_string(),
                needed: amount,
                available,
            });
        }
        *self
            .balances
            .entry((from, asset.to_string()))
            .or_default() -= amount;
        *self.balances.entry((to, asset.to_string())).or_default() += amount;
        Ok(())
    }

    /// Pull value from `from` on behalf of `spender`, consuming allowance.
    ///
    /// # Errors
    /// - `InsufficientAllowance` if `spender` was not approved for `amount`
    /// - `InsufficientFunds` if `from` cannot cover `amount`
    pub fn transfer_from(
        &mut self,
        spender: AccountId,
        asset: &str,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let approved = self.allowance(from, spender, asset);
        if approved < amount {
            return Err(VenueError::InsufficientAllowance {
                asset: asset.to_string(),
                needed: amount,
                approved,
            });
        }
        self.transfer(asset, from, to, amount)?;
        // Only burn allowance once the transfer went through.
        self.allowances
            .insert((from, spender, asset.to_string()), approved - amount);
        tracing::debug!(asset, from = %from, to = %to, amount, "Allowance pull");
        Ok(())
    }

    /// Sum of all balances of `asset` across accounts. Used by supply
    /// conservation checks in tests.
    #[must_use]
    pub fn total_supply(&self, asset: &str) -> u128 {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, amount)| amount)
            .sum()
    }
}
