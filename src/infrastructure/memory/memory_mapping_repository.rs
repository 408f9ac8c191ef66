//! Process-local implementation of the mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::{MappingRepository, StoreError, UniqueField};

/// In-memory mappings indexed by both keys.
///
/// `insert` holds the `by_original` entry lock while it claims the
/// `by_short` entry, so both uniqueness checks and both writes happen as one
/// step. Locks are always taken in that order.
#[derive(Debug, Default)]
pub struct InMemoryMappingRepository {
    by_original: DashMap<String, UrlMapping>,
    by_short: DashMap<i64, UrlMapping>,
}

impl InMemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn find_by_original(&self, original: &str) -> Result<Option<UrlMapping>, StoreError> {
        Ok(self.by_original.get(original).map(|m| m.clone()))
    }

    async fn find_by_short(&self, short: i64) -> Result<Option<UrlMapping>, StoreError> {
        Ok(self.by_short.get(&short).map(|m| m.clone()))
    }

    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, StoreError> {
        let original_slot = match self.by_original.entry(new_mapping.original.clone()) {
            Entry::Occupied(_) => return Err(StoreError::DuplicateKey(UniqueField::Original)),
            Entry::Vacant(slot) => slot,
        };
        let short_slot = match self.by_short.entry(new_mapping.short) {
            Entry::Occupied(_) => return Err(StoreError::DuplicateKey(UniqueField::Short)),
            Entry::Vacant(slot) => slot,
        };

        let mapping = UrlMapping::new(new_mapping.original, new_mapping.short, Utc::now());
        short_slot.insert(mapping.clone());
        original_slot.insert(mapping.clone());

        Ok(mapping)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.by_short.len() as i64)
    }
}
