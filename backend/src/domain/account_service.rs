use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::identity_normalizer::IdentityNormalizer;
use crate::domain::models::{
    CanonicalIdentity, DomainUser, LoginError, LoginOutcome, ProviderTag, RawAttributes,
};
use crate::storage::UserStorage;

/// Service that logs users in through identity providers and provisions accounts
#[derive(Clone)]
pub struct AccountService {
    storage: Arc<dyn UserStorage>,
    normalizer: IdentityNormalizer,
    enabled_providers: Vec<ProviderTag>,
}

impl AccountService {
    pub fn new(storage: Arc<dyn UserStorage>, enabled_providers: Vec<ProviderTag>) -> Self {
        Self {
            storage,
            normalizer: IdentityNormalizer::new(),
            enabled_providers,
        }
    }

    /// Log in with a provider's user-info payload, creating the account on first login
    pub async fn login(
        &self,
        provider: &str,
        attributes: &RawAttributes,
    ) -> Result<LoginOutcome, LoginError> {
        info!("Login attempt via provider '{}'", provider);

        let tag = provider
            .parse::<ProviderTag>()
            .inspect_err(|e| warn!("Rejected login: {}", e))?;
        if !self.enabled_providers.contains(&tag) {
            warn!("Rejected login: provider {} is disabled", tag);
            return Err(LoginError::ProviderDisabled(tag));
        }

        let identity = self
            .normalizer
            .normalize_provider(tag, attributes)
            .inspect_err(|e| warn!("Rejected login: {}", e))?;
        let now = Utc::now();

        if let Some(user) = self
            .storage
            .find_by_provider_identity(tag, &identity.external_id)
            .await?
        {
            return self.refresh_existing(user, identity, now).await;
        }

        let user = DomainUser::provision(tag, identity.clone(), now);
        if self.storage.store_user(&user).await? {
            info!("Provisioned user {} ({}) via {}", user.id, user.display_name, tag);
            return Ok(LoginOutcome { user, created: true });
        }

        // Another login linked this identity between the lookup and the insert
        debug!("Identity {}:{} was provisioned concurrently", tag, identity.external_id);
        let existing = self
            .storage
            .find_by_provider_identity(tag, &identity.external_id)
            .await?
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "User for {}:{} vanished after a conflicting insert",
                    tag,
                    identity.external_id
                )
            })?;
        self.refresh_existing(existing, identity, now).await
    }

    /// Apply the fresh profile to an already linked user
    async fn refresh_existing(
        &self,
        mut user: DomainUser,
        identity: CanonicalIdentity,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, LoginError> {
        user.refresh_profile(identity, now);
        self.storage.update_user(&user).await?;

        info!("User {} logged in via {}", user.id, user.provider);
        Ok(LoginOutcome { user, created: false })
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: &str) -> Result<Option<DomainUser>> {
        let user = self.storage.get_user(user_id).await?;

        if user.is_none() {
            warn!("User not found: {}", user_id);
        }

        Ok(user)
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<DomainUser>> {
        let users = self.storage.list_users().await?;
        info!("Found {} users", users.len());
        Ok(users)
    }

    pub fn enabled_providers(&self) -> &[ProviderTag] {
        &self.enabled_providers
    }
}
