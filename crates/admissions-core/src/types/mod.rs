//! Core type definitions used across the Admissions Desk workspace.

pub mod id;
pub mod notice;

pub use id::*;
pub use notice::{Notice, NoticeLevel};
