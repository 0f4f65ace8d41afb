//! # admissions-entity
//!
//! Domain models for Admissions Desk. Every struct in this crate mirrors
//! a JSON shape exchanged with the admissions backend (camelCase on the
//! wire) or a domain value object. The [`field::value`] module is the only
//! place stored strings become typed values.

pub mod directory;
pub mod field;
pub mod record;
