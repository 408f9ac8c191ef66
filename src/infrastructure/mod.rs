//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Resolver cache (Redis and no-op implementations)
//! - [`memory`] - In-memory stores for development and tests
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod memory;
pub mod persistence;
