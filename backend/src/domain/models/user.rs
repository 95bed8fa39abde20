use chrono::{DateTime, Utc};

use super::identity::{CanonicalIdentity, IdentityError, ProviderTag};

/// A finance tracker account linked to one identity provider account
#[derive(Debug, Clone, PartialEq)]
pub struct DomainUser {
    pub id: String,
    pub provider: ProviderTag,
    pub external_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub locale: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl DomainUser {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Build a fresh account from a normalized identity
    pub fn provision(provider: ProviderTag, identity: CanonicalIdentity, now: DateTime<Utc>) -> Self {
        Self {
            id: Self::generate_id(),
            provider,
            external_id: identity.external_id,
            display_name: identity.display_name,
            email: identity.email,
            avatar_url: identity.avatar_url,
            locale: identity.locale,
            created_at: now,
            updated_at: now,
            last_login_at: now,
        }
    }

    /// Overwrite profile fields with what the provider disclosed on this login
    pub fn refresh_profile(&mut self, identity: CanonicalIdentity, now: DateTime<Utc>) {
        self.display_name = identity.display_name;
        self.email = identity.email;
        self.avatar_url = identity.avatar_url;
        self.locale = identity.locale;
        self.updated_at = now;
        self.last_login_at = now;
    }
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub user: DomainUser,
    pub created: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("Identity provider {0} is disabled")]
    ProviderDisabled(ProviderTag),
    #[error("Account storage failed: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl LoginError {
    /// Whether the failure stems from the login request rather than the server
    pub fn is_client_error(&self) -> bool {
        match self {
            LoginError::Identity(_) | LoginError::ProviderDisabled(_) => true,
            LoginError::Storage(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: &str) -> CanonicalIdentity {
        CanonicalIdentity {
            external_id: "123".to_string(),
            display_name: name.to_string(),
            email: Some("ada@example.com".to_string()),
            avatar_url: None,
            locale: Some("en".to_string()),
        }
    }

    #[test]
    fn test_provision_copies_identity() {
        let now = Utc::now();
        let user = DomainUser::provision(ProviderTag::Google, identity("Ada Lovelace"), now);

        assert!(!user.id.is_empty());
        assert_eq!(user.provider, ProviderTag::Google);
        assert_eq!(user.external_id, "123");
        assert_eq!(user.display_name, "Ada Lovelace");
        assert_eq!(user.locale.as_deref(), Some("en"));
        assert_eq!(user.created_at, now);
        assert_eq!(user.last_login_at, now);
    }

    #[test]
    fn test_refresh_profile_keeps_identity_and_creation_time() {
        let created = Utc::now();
        let mut user = DomainUser::provision(ProviderTag::Google, identity("Ada"), created);
        let id = user.id.clone();

        let later = created + chrono::Duration::minutes(5);
        let mut updated = identity("Ada Lovelace");
        updated.email = None;
        user.refresh_profile(updated, later);

        assert_eq!(user.id, id);
        assert_eq!(user.display_name, "Ada Lovelace");
        assert_eq!(user.email, None);
        assert_eq!(user.created_at, created);
        assert_eq!(user.updated_at, later);
        assert_eq!(user.last_login_at, later);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(LoginError::from(IdentityError::UnsupportedProvider("FACEBOOK".into())).is_client_error());
        assert!(LoginError::ProviderDisabled(ProviderTag::Vk).is_client_error());
        assert!(!LoginError::from(anyhow::anyhow!("disk full")).is_client_error());
    }
}
