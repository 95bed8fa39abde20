use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Attribute bag returned by a provider's user-info endpoint, kept verbatim
pub type RawAttributes = serde_json::Map<String, serde_json::Value>;

/// Identity providers a user can log in with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTag {
    Google,
    Vk,
}

impl ProviderTag {
    pub const ALL: [ProviderTag; 2] = [ProviderTag::Google, ProviderTag::Vk];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTag::Google => "google",
            ProviderTag::Vk => "vk",
        }
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderTag {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(ProviderTag::Google),
            "vk" => Ok(ProviderTag::Vk),
            _ => Err(IdentityError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// Provider-agnostic profile of an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalIdentity {
    pub external_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("Unsupported identity provider: {0}")]
    UnsupportedProvider(String),
    #[error("{provider} user info is missing required attribute '{attribute}'")]
    MissingAttribute {
        provider: ProviderTag,
        attribute: &'static str,
    },
}
