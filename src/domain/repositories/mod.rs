//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the two durable stores the allocator is built on.
//! Implementations live in `crate::infrastructure`; mock implementations are
//! generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`CounterRepository`] - Named sequences with atomic increment
//! - [`MappingRepository`] - Append-only URL ⇄ short id mappings
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod counter_repository;
pub mod mapping_repository;
pub mod store_error;

pub use counter_repository::CounterRepository;
pub use mapping_repository::MappingRepository;
pub use store_error::{StoreError, UniqueField};

#[cfg(test)]
pub use counter_repository::MockCounterRepository;
#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
