//! # admissions-core
//!
//! Core crate for Admissions Desk. Contains configuration schemas,
//! typed identifiers, the notification trait, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other Admissions Desk crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
