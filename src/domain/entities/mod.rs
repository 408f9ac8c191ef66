//! Core domain entities.
//!
//! - [`UrlMapping`] - An original URL and the short identifier assigned to it
//! - [`AllocationCounter`] - The durable sequence identifiers are drawn from
//!
//! Creation inputs use separate structs (`NewUrlMapping`), following the
//! "New Type" pattern used throughout the crate.

pub mod counter;
pub mod url_mapping;

pub use counter::{AllocationCounter, SHORT_URL_COUNTER};
pub use url_mapping::{NewUrlMapping, UrlMapping};
