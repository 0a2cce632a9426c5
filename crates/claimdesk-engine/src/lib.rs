//! # claimdesk-engine
//!
//! **Venue plane**: the single mutable entry point over the whole venue
//! state — maker offer maintenance, taker matching and escrow, batch
//! execution, fulfillment, and the admin gate.
//!
//! ## Execution model
//!
//! Every mutating operation runs to completion with exclusive access to
//! all shared state (`&mut Venue`), and goes through one guard that:
//!
//! 1. rejects reentrant calls outright
//! 2. snapshots the state, applies the operation, and restores the
//!    snapshot on any failure — so no partial effect ever surfaces,
//!    including within a batch
//!
//! ## Order flow
//!
//! ```text
//! execute(maker ops)  → OfferBook
//! execute(taker ops)  → deplete offer → escrow both legs → OrderLedger
//! deliver / forfeit / revert → one-shot resolution, custody disbursed
//! ```

pub mod action;
pub mod matching;
pub mod venue;

pub use action::VenueAction;
pub use venue::Venue;
