//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::allocator::Allocator`] - Create-or-fetch of short identifiers
//! - [`services::resolver::Resolver`] - Short identifier lookups

pub mod services;
