//! Shared helpers.

pub mod formatting;
