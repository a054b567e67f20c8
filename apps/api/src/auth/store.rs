//! Credential Store: user records keyed by email, behind a swappable trait.
//!
//! Default: `InMemoryCredentialStore` (process lifetime, no persistence).
//! With `DATABASE_URL`: `PgCredentialStore` over the `users` table.
//!
//! `AppState` holds an `Arc<dyn CredentialStore>`, chosen at startup via config.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::password::PasswordHash;
use crate::auth::validation::{NewUser, EMAIL_EXISTS, INVALID_CREDENTIALS};
use crate::errors::AppError;
use crate::models::user::{UserRecord, UserRow};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Inputs are expected to have passed form validation already.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fails with an `email` field error if the address is taken. The
    /// uniqueness check and the insert happen atomically.
    async fn register(&self, user: NewUser) -> Result<UserRecord, AppError>;

    /// Unknown email and wrong password fail identically.
    async fn verify(&self, email: &str, password: &str) -> Result<UserRecord, AppError>;

    fn backend(&self) -> &'static str;
}

fn new_record(user: NewUser) -> UserRecord {
    UserRecord {
        id: Uuid::new_v4(),
        password_hash: PasswordHash::new(&user.password),
        full_name: user.full_name,
        email: user.email,
        created_at: Utc::now(),
    }
}

/// Unknown emails still pay for one hash verification.
fn check_password(record: Option<UserRecord>, password: &str) -> Result<UserRecord, AppError> {
    match record {
        Some(record) if record.password_hash.verify(password) => Ok(record),
        Some(_) => Err(AppError::field("email", INVALID_CREDENTIALS)),
        None => {
            PasswordHash::dummy().verify(password);
            Err(AppError::field("email", INVALID_CREDENTIALS))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// InMemoryCredentialStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn register(&self, user: NewUser) -> Result<UserRecord, AppError> {
        // Hash outside the lock; only check-then-insert is serialized.
        let record = new_record(user);

        let mut users = self.users.write().await;
        if users.contains_key(&record.email) {
            return Err(AppError::field("email", EMAIL_EXISTS));
        }
        users.insert(record.email.clone(), record.clone());
        Ok(record)
    }

    async fn verify(&self, email: &str, password: &str) -> Result<UserRecord, AppError> {
        let record = self.users.read().await.get(email).cloned();
        check_password(record, password)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PgCredentialStore
// ────────────────────────────────────────────────────────────────────────────

/// Relies on the `UNIQUE (email)` constraint for atomic registration.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn register(&self, user: NewUser) -> Result<UserRecord, AppError> {
        let record = new_record(user);

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (id, full_name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(record.id)
        .bind(&record.full_name)
        .bind(&record.email)
        .bind(record.password_hash.encode())
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() == 0 {
            return Err(AppError::field("email", EMAIL_EXISTS));
        }
        Ok(record)
    }

    async fn verify(&self, email: &str, password: &str) -> Result<UserRecord, AppError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, full_name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let record = row.map(UserRecord::try_from).transpose()?;
        check_password(record, password)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
