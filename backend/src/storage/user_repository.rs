use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::models::{DomainUser, ProviderTag};
use crate::storage::connection::DbConnection;
use crate::storage::traits::UserStorage;

/// SQLite-backed user repository
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    /// Create a repository on top of an open connection
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Map a `users` row back into a domain user
    fn row_to_user(row: &SqliteRow) -> Result<DomainUser> {
        let provider: String = row.get("provider");

        Ok(DomainUser {
            id: row.get("id"),
            provider: provider
                .parse::<ProviderTag>()
                .with_context(|| format!("Stored user has unknown provider '{}'", provider))?,
            external_id: row.get("external_id"),
            display_name: row.get("display_name"),
            email: row.get("email"),
            avatar_url: row.get("avatar_url"),
            locale: row.get("locale"),
            created_at: parse_timestamp(row.get("created_at"), "created_at")?,
            updated_at: parse_timestamp(row.get("updated_at"), "updated_at")?,
            last_login_at: parse_timestamp(row.get("last_login_at"), "last_login_at")?,
        })
    }
}

/// Parse an RFC 3339 column value as UTC
fn parse_timestamp(value: String, column: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(&value)
        .with_context(|| format!("Failed to parse {} '{}'", column, value))?;
    Ok(parsed.with_timezone(&Utc))
}

#[async_trait]
impl UserStorage for UserRepository {
    /// Insert a user unless its provider identity is already linked
    async fn store_user(&self, user: &DomainUser) -> Result<bool> {
        // An already linked identity keeps its existing row
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, provider, external_id, display_name, email, avatar_url, locale,
                created_at, updated_at, last_login_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (provider, external_id) DO NOTHING
            "#,
        )
        .bind(&user.id)
        .bind(user.provider.as_str())
        .bind(&user.external_id)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(&user.avatar_url)
        .bind(&user.locale)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .bind(user.last_login_at.to_rfc3339())
        .execute(self.db.pool())
        .await
        .with_context(|| format!("Failed to store user {}", user.id))?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a user by ID
    async fn get_user(&self, user_id: &str) -> Result<Option<DomainUser>> {
        let row = sqlx::query(
            r#"
            SELECT id, provider, external_id, display_name, email, avatar_url, locale,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Get the user linked to a provider account
    async fn find_by_provider_identity(
        &self,
        provider: ProviderTag,
        external_id: &str,
    ) -> Result<Option<DomainUser>> {
        let row = sqlx::query(
            r#"
            SELECT id, provider, external_id, display_name, email, avatar_url, locale,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE provider = ? AND external_id = ?
            "#,
        )
        .bind(provider.as_str())
        .bind(external_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// List all users ordered by display name
    async fn list_users(&self) -> Result<Vec<DomainUser>> {
        let rows = sqlx::query(
            r#"
            SELECT id, provider, external_id, display_name, email, avatar_url, locale,
                   created_at, updated_at, last_login_at
            FROM users
            ORDER BY display_name ASC, created_at ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_user).collect()
    }

    /// Update profile fields and login timestamps of a user
    async fn update_user(&self, user: &DomainUser) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET display_name = ?, email = ?, avatar_url = ?, locale = ?,
                updated_at = ?, last_login_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(&user.avatar_url)
        .bind(&user.locale)
        .bind(user.updated_at.to_rfc3339())
        .bind(user.last_login_at.to_rfc3339())
        .bind(&user.id)
        .execute(self.db.pool())
        .await?;

        // Nothing updated means the user was never stored
        if result.rows_affected() == 0 {
            return Err(anyhow::anyhow!("User not found: {}", user.id));
        }
        Ok(())
    }
}
