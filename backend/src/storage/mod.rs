//! # Storage Module
//!
//! Persistence for user accounts. The domain layer talks to [`UserStorage`];
//! the SQLite implementation lives in [`user_repository`] on top of the
//! shared [`DbConnection`] pool.

pub mod connection;
pub mod traits;
pub mod user_repository;

pub use connection::{DbConnection, DEFAULT_DATABASE_URL};
pub use traits::UserStorage;
pub use user_repository::UserRepository;
