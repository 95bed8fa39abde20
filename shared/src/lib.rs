use serde::{Deserialize, Serialize};

/// Public view of a user account provisioned through an identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    /// Lowercase provider tag ("google", "vk")
    pub provider: String,
    /// Identifier of the user at the identity provider
    pub external_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub locale: Option<String>,
    /// RFC 3339 timestamps
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    /// True when this login provisioned a new account
    pub created: bool,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderListResponse {
    pub providers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_serializes_absent_fields_as_null() {
        let response = LoginResponse {
            user: UserProfile {
                id: "u1".to_string(),
                provider: "vk".to_string(),
                external_id: "456".to_string(),
                display_name: "Ada Lovelace".to_string(),
                email: None,
                avatar_url: None,
                locale: None,
                created_at: "2025-06-14T10:30:00+00:00".to_string(),
                updated_at: "2025-06-14T10:30:00+00:00".to_string(),
                last_login_at: "2025-06-14T10:30:00+00:00".to_string(),
            },
            created: true,
            success_message: "Account created".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["locale"], serde_json::Value::Null);
        assert_eq!(json["user"]["provider"], "vk");
        assert_eq!(json["created"], true);
    }
}
