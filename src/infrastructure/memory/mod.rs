//! Process-local store implementations.
//!
//! Used by the `memory` storage backend and by tests that exercise the
//! allocator without a database.

pub mod memory_counter_repository;
pub mod memory_mapping_repository;

pub use memory_counter_repository::InMemoryCounterRepository;
pub use memory_mapping_repository::InMemoryMappingRepository;
