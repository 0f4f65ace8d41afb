//! # admissions-client
//!
//! Access to the admissions backend. The [`DirectoryApi`] trait is the seam
//! services depend on; [`HttpDirectoryApi`] implements it over HTTP with
//! cookie-based session credentials.

pub mod api;
pub mod http;

pub use api::DirectoryApi;
pub use http::HttpDirectoryApi;
