//! Site settings singleton.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Store-wide settings, persisted as a single row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SiteSettings {
    pub store_name: String,
    pub support_email: String,
    pub announcement: Option<String>,
    pub cod_enabled: bool,
    pub shipping_fee: Decimal,
    pub free_shipping_threshold: Option<Decimal>,
    pub updated_at: DateTime<Utc>,
}

impl SiteSettings {
    /// Shipping fee for an order of the given subtotal.
    #[must_use]
    pub fn shipping_fee_for(&self, subtotal: Decimal) -> Decimal {
        match self.free_shipping_threshold {
            Some(threshold) if subtotal >= threshold => Decimal::ZERO,
            _ => self.shipping_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(fee: i64, threshold: Option<i64>) -> SiteSettings {
        SiteSettings {
            store_name: "Clove".into(),
            support_email: "support@example.com".into(),
            announcement: None,
            cod_enabled: true,
            shipping_fee: Decimal::new(fee, 2),
            free_shipping_threshold: threshold.map(|t| Decimal::new(t, 2)),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_flat_fee_without_threshold() {
        assert_eq!(
            settings(4900, None).shipping_fee_for(Decimal::new(100_000, 2)),
            Decimal::new(4900, 2)
        );
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let s = settings(4900, Some(50_000));
        assert_eq!(s.shipping_fee_for(Decimal::new(50_000, 2)), Decimal::ZERO);
        assert_eq!(
            s.shipping_fee_for(Decimal::new(49_999, 2)),
            Decimal::new(4900, 2)
        );
    }
}
