//! Business logic services for the application layer.

pub mod allocator;
pub mod resolver;

pub use allocator::{Allocator, MAX_ALLOCATION_ATTEMPTS};
pub use resolver::Resolver;
