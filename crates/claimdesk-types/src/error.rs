//! Error types for the ClaimDesk venue.
//!
//! All errors use the `CD_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Offer store errors
//! - 2xx: Policy / tradeability errors
//! - 3xx: Economic errors
//! - 4xx: Matching / escrow errors
//! - 5xx: Order state errors
//! - 6xx: Timing / window errors
//! - 7xx: Authorization errors
//! - 9xx: General / internal errors
//!
//! Every failure is synchronous and non-retryable by the engine itself;
//! callers resubmit after resolving the reported condition.

use thiserror::Error;

use crate::{AssetKey, CollectionId, OrderId, OrderStatus, PaymentAsset, TokenId};

/// Central error enum for all ClaimDesk operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VenueError {
    // =================================================================
    // Offer Store Errors (1xx)
    // =================================================================
    /// No live listing under the given key.
    #[error("CD_ERR_100: Listing not found: {collection} {token}")]
    ListingNotFound {
        collection: CollectionId,
        token: TokenId,
    },

    /// No live collection bid under the given key.
    #[error("CD_ERR_101: Collection bid not found: {collection}")]
    BidNotFound { collection: CollectionId },

    /// Offers must carry a quantity greater than zero.
    #[error("CD_ERR_102: Offer quantity must be greater than zero")]
    ZeroQuantity,

    /// Collection-wide bids only exist for single-unit collections.
    #[error("CD_ERR_103: Collection bids are not supported for {collection}")]
    CollectionBidNotSupported { collection: CollectionId },

    // =================================================================
    // Policy / Tradeability Errors (2xx)
    // =================================================================
    /// The collection has no approved trading policy.
    #[error("CD_ERR_200: Collection not approved for trading: {0}")]
    CollectionNotApproved(CollectionId),

    /// The asset is already bound to a settlement order.
    #[error("CD_ERR_201: Asset already committed to a settlement order: {0}")]
    AssetAlreadyCommitted(AssetKey),

    /// Single-unit collections trade in quantities of exactly one.
    #[error("CD_ERR_202: Single-unit asset requires quantity 1, got {quantity}")]
    WrongQuantityForSingleUnit { quantity: u64 },

    /// The seller does not hold enough of the offered asset.
    #[error("CD_ERR_203: Asset not held: {asset} need {needed}, hold {held}")]
    AssetNotHeld {
        asset: AssetKey,
        needed: u64,
        held: u64,
    },

    /// The payment asset is not on the allow-list.
    #[error("CD_ERR_204: Payment asset not allowed: {0}")]
    PaymentAssetNotAllowed(PaymentAsset),

    // =================================================================
    // Economic Errors (3xx)
    // =================================================================
    /// Price below the protocol minimum unit.
    #[error("CD_ERR_300: Price {price} below minimum {minimum}")]
    PriceBelowMinimum { price: u128, minimum: u128 },

    /// Price is not an exact multiple of the grid unit.
    #[error("CD_ERR_301: Price {price} is not a multiple of {unit}")]
    PriceOffGrid { price: u128, unit: u128 },

    /// The offer's advisory deadline has passed.
    #[error("CD_ERR_302: Offer expired")]
    OfferExpired,

    /// An offer's expiration must be strictly in the future.
    #[error("CD_ERR_303: Expiration is not in the future")]
    ExpiryNotInFuture,

    /// Accepting a bid requires the stored price to equal the quoted one.
    #[error("CD_ERR_304: Price mismatch: quoted {quoted}, stored {stored}")]
    PriceMismatch { quoted: u128, stored: u128 },

    /// Buying a listing is capped by the taker's max price.
    #[error("CD_ERR_305: Listing price {stored} exceeds limit {limit}")]
    PriceAboveLimit { stored: u128, limit: u128 },

    /// Requested more units than the offer holds.
    #[error("CD_ERR_306: Insufficient offer quantity: requested {requested}, available {available}")]
    InsufficientOfferQuantity { requested: u64, available: u64 },

    /// Not enough balance to cover a transfer.
    #[error("CD_ERR_307: Insufficient {asset} balance: need {needed}, have {available}")]
    InsufficientFunds {
        asset: PaymentAsset,
        needed: u128,
        available: u128,
    },

    /// Not enough spendable allowance granted to custody.
    #[error("CD_ERR_308: Insufficient {asset} allowance: need {needed}, approved {approved}")]
    InsufficientAllowance {
        asset: PaymentAsset,
        needed: u128,
        approved: u128,
    },

    /// `price × quantity` does not fit in the amount type.
    #[error("CD_ERR_309: Amount overflow")]
    AmountOverflow,

    // =================================================================
    // Matching / Escrow Errors (4xx)
    // =================================================================
    /// A taker may not consume their own offer.
    #[error("CD_ERR_400: Taker and maker are the same account")]
    SelfTrade,

    /// A mutating entry point was re-entered while one was in flight.
    #[error("CD_ERR_401: Reentrant call blocked")]
    ReentrancyBlocked,

    // =================================================================
    // Order State Errors (5xx)
    // =================================================================
    /// No settlement order under this id.
    #[error("CD_ERR_500: Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order already left the `Open` state.
    #[error("CD_ERR_501: Order {id} is {status}, not OPEN")]
    OrderNotOpen { id: OrderId, status: OrderStatus },

    /// The supplied descriptor does not match the stored record exactly.
    #[error("CD_ERR_502: Order description does not match stored record: {0}")]
    OrderMismatch(OrderId),

    /// The dense order id space is exhausted.
    #[error("CD_ERR_503: Order ledger capacity exhausted ({capacity})")]
    OrderCapacityExhausted { capacity: u64 },

    /// The placeholder has no genesis mapping yet: not deliverable.
    #[error("CD_ERR_504: No genesis mapping for placeholder {0}")]
    GenesisNotMapped(AssetKey),

    /// Genesis mappings are write-once per placeholder.
    #[error("CD_ERR_505: Genesis mapping already published for {0}")]
    GenesisAlreadyMapped(AssetKey),

    // =================================================================
    // Timing / Window Errors (6xx)
    // =================================================================
    /// Delivery/forfeiture require a configured fulfillment window.
    #[error("CD_ERR_600: Fulfillment window not configured")]
    WindowNotConfigured,

    /// The call fell outside the fulfillment window.
    #[error("CD_ERR_601: Outside the fulfillment window")]
    OutsideFulfillmentWindow,

    /// The venue is suspended; maker/taker/fulfillment calls reject.
    #[error("CD_ERR_602: Venue is suspended")]
    VenueSuspended,

    /// Reversal requires the venue to be suspended.
    #[error("CD_ERR_603: Venue is not suspended")]
    VenueNotSuspended,

    /// Reversal is barred once a fulfillment window was ever configured.
    #[error("CD_ERR_604: Reversal barred: a fulfillment window was configured")]
    ReversalBarredByWindow,

    // =================================================================
    // Authorization Errors (7xx)
    // =================================================================
    /// Caller is not the configured admin account.
    #[error("CD_ERR_700: Caller is not the venue admin")]
    NotAdmin,

    /// Only the recorded buyer or seller may deliver.
    #[error("CD_ERR_701: Caller is not a counterparty of order {0}")]
    NotCounterparty(OrderId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CD_ERR_900: Internal error: {0}")]
    Internal(String),

    /// A fee rate exceeded 10000 basis points.
    #[error("CD_ERR_901: Fee rate too high: {bps} bps")]
    FeeRateTooHigh { bps: u16 },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, VenueError>;
