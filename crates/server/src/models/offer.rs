//! Discount offer model and redemption rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use clove_core::OfferId;

/// Why an offer cannot be applied to an order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OfferRejection {
    #[error("offer is not active")]
    Inactive,
    #[error("offer has expired")]
    Expired,
    #[error("offer has no redemptions left")]
    Exhausted,
    #[error("order subtotal below offer minimum")]
    BelowMinimum,
}

/// A discount code.
///
/// Exactly one of `percent_off` / `amount_off` is set (enforced by a table
/// check constraint; `percent_off` wins if both appear). `used_count` is the
/// redemption counter incremented inside the order transaction.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Offer {
    pub id: OfferId,
    pub code: String,
    pub description: Option<String>,
    pub percent_off: Option<Decimal>,
    pub amount_off: Option<Decimal>,
    pub min_order_total: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Offer {
    /// Check redeemability against the current time and an order subtotal.
    ///
    /// # Errors
    ///
    /// Returns the first applicable [`OfferRejection`].
    pub fn check_redeemable(&self, subtotal: Decimal, now: DateTime<Utc>) -> Result<(), OfferRejection> {
        if !self.active {
            return Err(OfferRejection::Inactive);
        }
        if let Some(expires_at) = self.expires_at
            && now >= expires_at
        {
            return Err(OfferRejection::Expired);
        }
        if let Some(max_uses) = self.max_uses
            && self.used_count >= max_uses
        {
            return Err(OfferRejection::Exhausted);
        }
        if let Some(min) = self.min_order_total
            && subtotal < min
        {
            return Err(OfferRejection::BelowMinimum);
        }
        Ok(())
    }

    /// Discount amount for a given subtotal, clamped to the subtotal.
    ///
    /// Does not re-check redeemability; call [`Self::check_redeemable`] first.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        let raw = if let Some(percent) = self.percent_off {
            (subtotal * percent / Decimal::ONE_HUNDRED).round_dp(2)
        } else {
            self.amount_off.unwrap_or(Decimal::ZERO)
        };
        raw.min(subtotal).max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn offer() -> Offer {
        Offer {
            id: OfferId::new(1),
            code: "WELCOME10".into(),
            description: None,
            percent_off: Some(Decimal::new(10, 0)),
            amount_off: None,
            min_order_total: Some(Decimal::new(500, 0)),
            max_uses: Some(100),
            used_count: 0,
            active: true,
            expires_at: Some(Utc::now() + Duration::days(30)),
        }
    }

    #[test]
    fn test_redeemable_happy_path() {
        assert!(offer().check_redeemable(Decimal::new(1000, 0), Utc::now()).is_ok());
    }

    #[test]
    fn test_inactive_rejected() {
        let mut o = offer();
        o.active = false;
        assert_eq!(
            o.check_redeemable(Decimal::new(1000, 0), Utc::now()),
            Err(OfferRejection::Inactive)
        );
    }

    #[test]
    fn test_expired_rejected() {
        let mut o = offer();
        o.expires_at = Some(Utc::now() - Duration::hours(1));
        assert_eq!(
            o.check_redeemable(Decimal::new(1000, 0), Utc::now()),
            Err(OfferRejection::Expired)
        );
    }

    #[test]
    fn test_exhausted_rejected() {
        let mut o = offer();
        o.used_count = 100;
        assert_eq!(
            o.check_redeemable(Decimal::new(1000, 0), Utc::now()),
            Err(OfferRejection::Exhausted)
        );
    }

    #[test]
    fn test_below_minimum_rejected() {
        assert_eq!(
            offer().check_redeemable(Decimal::new(499, 0), Utc::now()),
            Err(OfferRejection::BelowMinimum)
        );
    }

    #[test]
    fn test_percent_discount() {
        // 10% of 1000.00
        assert_eq!(
            offer().discount_for(Decimal::new(1000, 0)),
            Decimal::new(100, 0)
        );
    }

    #[test]
    fn test_flat_discount_clamped_to_subtotal() {
        let o = Offer {
            percent_off: None,
            amount_off: Some(Decimal::new(500, 0)),
            ..offer()
        };
        assert_eq!(o.discount_for(Decimal::new(300, 0)), Decimal::new(300, 0));
    }
}
