//! Fee arithmetic.
//!
//! Fees are taken only at final resolution, in basis points of the order's
//! notional (`price × quantity`), with integer truncation: the division
//! rounds down, so the residual accrues to the paying party, never the
//! recipient. Each side's fee is independently capped at the notional.

use claimdesk_types::{FeeConfig, Result, VenueError, constants::BPS_DENOMINATOR};

/// Both sides' fees for one resolved order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub buyer_fee: u128,
    pub seller_fee: u128,
}

impl FeeSplit {
    /// What the seller's counterparty leg pays out net of the buyer fee.
    #[must_use]
    pub fn buyer_net(&self, total: u128) -> u128 {
        total - self.buyer_fee
    }

    /// What the collateral leg pays out net of the seller fee.
    #[must_use]
    pub fn seller_net(&self, total: u128) -> u128 {
        total - self.seller_fee
    }

    /// Total routed to the fee recipient.
    #[must_use]
    pub fn recipient_total(&self) -> u128 {
        self.buyer_fee + self.seller_fee
    }
}

/// Split `total` into buyer-side and seller-side fees.
///
/// `fee = total × bps / 10_000`, truncating, capped at `total`.
///
/// # Errors
/// Returns `AmountOverflow` if `total × bps` exceeds `u128`.
pub fn split_fees(total: u128, fees: &FeeConfig) -> Result<FeeSplit> {
    let one_side = |bps: u16| -> Result<u128> {
        let raw = total
            .checked_mul(u128::from(bps))
            .ok_or(VenueError::AmountOverflow)?
            / BPS_DENOMINATOR;
        Ok(raw.min(total))
    };
    Ok(FeeSplit {
        buyer_fee: one_side(fees.buyer_fee_bps)?,
        seller_fee: one_side(fees.seller_fee_bps)?,
    })
}
