//! # Domain Module
//!
//! Login and account logic of the finance tracker.
//!
//! - **identity_normalizer**: maps provider user-info payloads to a canonical identity
//! - **account_service**: finds or provisions the account behind a login
//! - **models**: provider tags, canonical identity, users and their errors

pub mod account_service;
pub mod identity_normalizer;
pub mod models;

pub use account_service::*;
pub use identity_normalizer::*;
