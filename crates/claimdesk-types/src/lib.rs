//! # claimdesk-types
//!
//! Shared types, errors, and configuration for the **ClaimDesk** OTC venue.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`CollectionId`], [`TokenId`], [`AssetKey`], [`OrderId`]
//! - **Offer model**: [`Offer`], [`ListingKey`], [`BidKey`]
//! - **Order model**: [`SettlementOrder`], [`OrderStatus`], [`OrderDescriptor`]
//! - **Event model**: [`VenueEvent`]
//! - **Configuration**: [`VenueConfig`], [`FeeConfig`], [`FulfillmentWindow`], [`CollectionPolicy`]
//! - **Errors**: [`VenueError`] with `CD_ERR_` prefix codes
//! - **Constants**: price grid, fee bounds, ledger capacity

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod offer;
pub mod order;

// Re-export all primary types at crate root for ergonomic imports:
//   use claimdesk_types::{Offer, SettlementOrder, VenueError, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use offer::*;
pub use order::*;

// Constants are accessed via `claimdesk_types::constants::FOO`
// (not re-exported to avoid name collisions).
