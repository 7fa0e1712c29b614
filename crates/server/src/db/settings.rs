//! Site settings repository (singleton row).

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::SiteSettings;

const SETTINGS_COLUMNS: &str = "store_name, support_email, announcement, cod_enabled, \
     shipping_fee, free_shipping_threshold, updated_at";

/// Partial settings update. `None` leaves a field untouched; clearing the
/// nullable fields goes through the dedicated flags.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsUpdate {
    pub store_name: Option<String>,
    pub support_email: Option<String>,
    pub announcement: Option<String>,
    #[serde(default)]
    pub clear_announcement: bool,
    pub cod_enabled: Option<bool>,
    pub shipping_fee: Option<Decimal>,
    pub free_shipping_threshold: Option<Decimal>,
    #[serde(default)]
    pub clear_free_shipping_threshold: bool,
}

/// Repository for the store-wide settings row.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the settings row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the seeded singleton row
    /// is missing.
    pub async fn get(&self) -> Result<SiteSettings, RepositoryError> {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM site_settings WHERE singleton");
        sqlx::query_as::<_, SiteSettings>(&sql)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption("site_settings singleton row missing".to_string())
            })
    }

    /// Apply a partial update to the settings row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the singleton row is
    /// missing.
    pub async fn update(&self, update: &SettingsUpdate) -> Result<SiteSettings, RepositoryError> {
        let sql = format!(
            "UPDATE site_settings
             SET store_name = COALESCE($1, store_name),
                 support_email = COALESCE($2, support_email),
                 announcement = CASE WHEN $4 THEN NULL ELSE COALESCE($3, announcement) END,
                 cod_enabled = COALESCE($5, cod_enabled),
                 shipping_fee = COALESCE($6, shipping_fee),
                 free_shipping_threshold = CASE WHEN $8 THEN NULL
                                                ELSE COALESCE($7, free_shipping_threshold) END,
                 updated_at = now()
             WHERE singleton
             RETURNING {SETTINGS_COLUMNS}"
        );
        sqlx::query_as::<_, SiteSettings>(&sql)
            .bind(&update.store_name)
            .bind(&update.support_email)
            .bind(&update.announcement)
            .bind(update.clear_announcement)
            .bind(update.cod_enabled)
            .bind(update.shipping_fee)
            .bind(update.free_shipping_threshold)
            .bind(update.clear_free_shipping_threshold)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption("site_settings singleton row missing".to_string())
            })
    }
}
