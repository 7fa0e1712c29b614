//! Staff account management commands.
//!
//! # Usage
//!
//! ```bash
//! clove-cli staff create -e ops@example.com -n "Ops Person" -r worker -p 'a strong password'
//! ```
//!
//! # Environment Variables
//!
//! - `CLOVE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use clove_core::{Email, StaffId, StaffRole};

/// Minimum password length, matching the server's registration rule.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from staff management commands.
#[derive(Debug, Error)]
pub enum StaffError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: set CLOVE_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] clove_core::EmailError),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Email already registered.
    #[error("Staff account already exists with email: {0}")]
    AccountExists(String),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Create a new staff account.
///
/// # Errors
///
/// Returns `StaffError` for an invalid email, weak password, duplicate
/// account, or database failure.
pub async fn create(
    email: &str,
    name: &str,
    role: StaffRole,
    password: &str,
) -> Result<StaffId, StaffError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(StaffError::WeakPassword);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| StaffError::PasswordHash)?
        .to_string();

    let database_url = std::env::var("CLOVE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| StaffError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating staff account: {} ({})", email.as_str(), role);

    let id: StaffId = sqlx::query_scalar::<_, StaffId>(
        "INSERT INTO staff (email, name, password_hash, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(email.as_str())
    .bind(name)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
        {
            return StaffError::AccountExists(email.as_str().to_string());
        }
        StaffError::Database(e)
    })?;

    Ok(id)
}
