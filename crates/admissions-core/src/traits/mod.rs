//! Core traits defined in `admissions-core` and implemented by other crates.

pub mod notifier;

pub use notifier::Notifier;
