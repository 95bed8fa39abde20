//! # IO Module
//!
//! Conversion between domain models and the DTOs of the `shared` crate.

pub mod mappers;
