//! Data models for the storefront.
//!
//! Field names match the columns of the hosted `cars` table.

mod listing;

pub use listing::*;
