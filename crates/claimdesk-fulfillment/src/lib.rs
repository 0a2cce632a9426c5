//! # claimdesk-fulfillment
//!
//! **Resolution plane**: the append-only order ledger, the placeholder→real
//! genesis map, fee arithmetic, and the one-shot fulfillment state machine.
//!
//! ## Architecture
//!
//! An escrowed trade enters the ledger as an `Open` [`SettlementOrder`]
//! and leaves it exactly once:
//!
//! 1. **deliver** — window open, genesis mapped: real asset to the buyer,
//!    net payment and net collateral to the seller, fees routed
//! 2. **forfeit** — window open: buyer receives net refund *and* the
//!    seller's net collateral, fees routed
//! 3. **revert** — venue suspended and no window ever configured: full
//!    refunds both ways, no fees
//!
//! Orders are never deleted; resolved records stay as an audit trail.
//!
//! [`SettlementOrder`]: claimdesk_types::SettlementOrder

pub mod fees;
pub mod fulfillment;
pub mod genesis;
pub mod ledger;

pub use fees::FeeSplit;
pub use fulfillment::{DeliveryOutcome, FulfillmentContext, deliver, forfeit, revert};
pub use genesis::GenesisMap;
pub use ledger::OrderLedger;
