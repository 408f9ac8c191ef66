//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{Allocator, Resolver};
use crate::domain::repositories::{CounterRepository, MappingRepository};
use crate::infrastructure::cache::CacheService;
use crate::utils::url_validator::UrlValidator;

/// Allocator over whichever storage backend is configured.
pub type SharedAllocator = Allocator<dyn CounterRepository, dyn MappingRepository>;
/// Resolver over whichever storage backend is configured.
pub type SharedResolver = Resolver<dyn MappingRepository>;

#[derive(Clone)]
pub struct AppState {
    pub allocator: Arc<SharedAllocator>,
    pub resolver: Arc<SharedResolver>,
    pub cache: Arc<dyn CacheService>,
    pub url_validator: Arc<UrlValidator>,
}

impl AppState {
    /// Wires the allocator and resolver onto one pair of stores.
    pub fn new(
        counters: Arc<dyn CounterRepository>,
        mappings: Arc<dyn MappingRepository>,
        cache: Arc<dyn CacheService>,
        url_validator: UrlValidator,
    ) -> Self {
        Self {
            allocator: Arc::new(Allocator::new(counters, mappings.clone())),
            resolver: Arc::new(Resolver::new(mappings, cache.clone())),
            cache,
            url_validator: Arc::new(url_validator),
        }
    }
}
