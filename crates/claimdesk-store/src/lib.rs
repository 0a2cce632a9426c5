//! # claimdesk-store
//!
//! **Offer store and custody plane**: maker offer CRUD, the fungible value
//! bank, the claim-token inventory, and the shared validation predicates
//! used by every mutating venue operation.
//!
//! ## Architecture
//!
//! 1. **OfferBook**: sell listings keyed by (asset, maker) and
//!    collection-wide bids keyed by (collection, bidder)
//! 2. **ValueBank**: balances and custody allowances per (account, asset)
//! 3. **AssetInventory**: single-unit and multi-unit claim holdings
//! 4. **validation**: pure predicates — timing, price grid, tradeability,
//!    solvency
//!
//! The bank and inventory stand in for the external asset-transfer and
//! ownership capabilities at the venue boundary; all of their state is
//! inspectable without side effects.

pub mod bank;
pub mod inventory;
pub mod offer_book;
pub mod validation;

pub use bank::ValueBank;
pub use inventory::{AssetInventory, AssetKind};
pub use offer_book::OfferBook;
