//! # Finance Tracker Backend
//!
//! Login side of the personal finance tracker: provider user-info payloads are
//! normalized into a canonical identity and matched to (or provisioned as)
//! finance tracker accounts.
//!
//! ```text
//! CLI (main.rs)
//!     ↓
//! IO Layer (DTO mappers)
//!     ↓
//! Domain Layer (identity normalizer, account service)
//!     ↓
//! Storage Layer (SQLite)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::AccountService;
use crate::storage::{DbConnection, UserRepository};

/// Application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    let enabled_providers = config.enabled_providers()?;

    info!("Setting up database at {}", config.database_url);
    let db_conn = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain model with providers {:?}", enabled_providers);
    let account_service =
        AccountService::new(Arc::new(UserRepository::new(db_conn)), enabled_providers);

    Ok(AppState { account_service })
}
