use crate::domain::models::{DomainUser, LoginOutcome, ProviderTag};
use shared::{LoginResponse, ProviderListResponse, UserListResponse, UserProfile};

/// Mapper from domain users to shared DTOs
pub struct UserMapper;

impl UserMapper {
    pub fn to_dto(domain: DomainUser) -> UserProfile {
        UserProfile {
            id: domain.id,
            provider: domain.provider.to_string(),
            external_id: domain.external_id,
            display_name: domain.display_name,
            email: domain.email,
            avatar_url: domain.avatar_url,
            locale: domain.locale,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
            last_login_at: domain.last_login_at.to_rfc3339(),
        }
    }

    pub fn to_login_dto(outcome: LoginOutcome) -> LoginResponse {
        let success_message = if outcome.created {
            "Account created".to_string()
        } else {
            "Logged in".to_string()
        };

        LoginResponse {
            user: Self::to_dto(outcome.user),
            created: outcome.created,
            success_message,
        }
    }

    pub fn to_user_list_dto(users: Vec<DomainUser>) -> UserListResponse {
        UserListResponse {
            users: users.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_provider_list_dto(providers: &[ProviderTag]) -> ProviderListResponse {
        ProviderListResponse {
            providers: providers.iter().map(|p| p.to_string()).collect(),
        }
    }
}
