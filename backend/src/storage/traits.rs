//! # Storage Traits
//!
//! Storage abstraction used by the account service, so the domain layer does
//! not depend on SQLite directly.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{DomainUser, ProviderTag};

/// Persistence operations for user accounts
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Store a new user
    /// Returns false, storing nothing, when the provider identity is already linked
    async fn store_user(&self, user: &DomainUser) -> Result<bool>;

    /// Retrieve a user by its internal ID
    async fn get_user(&self, user_id: &str) -> Result<Option<DomainUser>>;

    /// Retrieve the user linked to a provider account
    async fn find_by_provider_identity(
        &self,
        provider: ProviderTag,
        external_id: &str,
    ) -> Result<Option<DomainUser>>;

    /// List all users ordered by display name
    async fn list_users(&self) -> Result<Vec<DomainUser>>;

    /// Update profile fields and timestamps of an existing user
    async fn update_user(&self, user: &DomainUser) -> Result<()>;
}
