//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain store traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgCounterRepository`] - Allocation counters
//! - [`PgMappingRepository`] - URL mappings

pub mod pg_counter_repository;
pub mod pg_error;
pub mod pg_mapping_repository;

pub use pg_counter_repository::PgCounterRepository;
pub use pg_error::map_sqlx_error;
pub use pg_mapping_repository::PgMappingRepository;
