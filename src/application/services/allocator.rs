//! Short identifier allocation.

use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::domain::entities::{AllocationCounter, NewUrlMapping, SHORT_URL_COUNTER, UrlMapping};
use crate::domain::repositories::{CounterRepository, MappingRepository, StoreError, UniqueField};
use crate::error::AppError;

/// Attempts made with fresh identifiers before a creation request fails.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 5;

/// Assigns sequential short identifiers to distinct URLs.
///
/// The counter store is the only source of new identifiers: every candidate
/// comes from an atomic durable increment, never from process memory, so any
/// number of allocators may share the same stores. The baseline read at
/// startup only gates readiness.
///
/// # Accepted skew
///
/// An identifier consumed by the counter whose mapping insert then fails is
/// never reused. Such gaps waste identifiers but cannot cause collisions, and
/// nothing attempts to fill them.
pub struct Allocator<C, M>
where
    C: CounterRepository + ?Sized,
    M: MappingRepository + ?Sized,
{
    counters: Arc<C>,
    mappings: Arc<M>,
    counter_name: String,
    baseline: OnceLock<i64>,
}

impl<C, M> Allocator<C, M>
where
    C: CounterRepository + ?Sized,
    M: MappingRepository + ?Sized,
{
    /// Creates an allocator drawing from the [`SHORT_URL_COUNTER`] counter.
    ///
    /// The allocator rejects creation requests until [`Self::initialize`]
    /// succeeds.
    pub fn new(counters: Arc<C>, mappings: Arc<M>) -> Self {
        Self {
            counters,
            mappings,
            counter_name: SHORT_URL_COUNTER.to_string(),
            baseline: OnceLock::new(),
        }
    }

    /// Reads the counter, creating it if absent, and marks the allocator ready.
    ///
    /// Calling this again after success returns the recorded baseline without
    /// touching the store.
    ///
    /// # Errors
    ///
    /// Returns the store error if the counter cannot be read or created.
    pub async fn initialize(&self) -> Result<i64, StoreError> {
        if let Some(baseline) = self.baseline.get() {
            return Ok(*baseline);
        }

        let seq = self.counters.get_or_init(&self.counter_name).await?;
        let baseline = *self.baseline.get_or_init(|| seq);
        info!(counter = %self.counter_name, baseline, "Allocation counter ready");

        Ok(baseline)
    }

    /// Returns true once the counter baseline has been established.
    pub fn is_ready(&self) -> bool {
        self.baseline.get().is_some()
    }

    /// Counter value observed at initialization, if any.
    pub fn baseline(&self) -> Option<i64> {
        self.baseline.get().copied()
    }

    /// Reads the durable counter without modifying it.
    ///
    /// # Errors
    ///
    /// Returns the store error if the counter cannot be read.
    pub async fn counter(&self) -> Result<Option<AllocationCounter>, StoreError> {
        self.counters.find(&self.counter_name).await
    }

    /// Returns the mapping for `url`, allocating a new identifier if needed.
    ///
    /// `url` must already be validated. Repeated calls with the same URL
    /// return the same mapping and never consume an identifier.
    ///
    /// # Flow
    ///
    /// 1. Reject with [`AppError::ServiceUnavailable`] before initialization
    /// 2. Return the existing mapping if `url` is already mapped
    /// 3. Draw a candidate from the counter's atomic increment
    /// 4. Insert the mapping:
    ///    - duplicate `original`: a concurrent request mapped `url` first, so
    ///      its mapping is re-read and returned
    ///    - duplicate `short`: retry from step 3 with a fresh candidate
    ///
    /// # Errors
    ///
    /// - [`AppError::ServiceUnavailable`] if the allocator is not initialized
    /// - [`AppError::AllocationConflict`] after [`MAX_ALLOCATION_ATTEMPTS`]
    ///   colliding candidates
    /// - [`AppError::Store`] on any other store failure
    pub async fn get_or_create(&self, url: &str) -> Result<UrlMapping, AppError> {
        if !self.is_ready() {
            return Err(AppError::ServiceUnavailable);
        }

        if let Some(existing) = self.mappings.find_by_original(url).await? {
            debug!(short = existing.short, "URL already mapped");
            return Ok(existing);
        }

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let candidate = self.next_candidate().await?;

            match self.mappings.insert(NewUrlMapping::new(url, candidate)).await {
                Ok(mapping) => {
                    metrics::counter!("shorturl_allocations_total").increment(1);
                    info!(short = mapping.short, "Allocated short URL");
                    return Ok(mapping);
                }
                Err(StoreError::DuplicateKey(UniqueField::Original)) => {
                    metrics::counter!("shorturl_allocation_races_total").increment(1);
                    debug!(
                        wasted = candidate,
                        "Lost insert race for URL, returning winner's mapping"
                    );
                    return self.mappings.find_by_original(url).await?.ok_or_else(|| {
                        AppError::Store(StoreError::Query(
                            "mapping missing after duplicate key on original".to_string(),
                        ))
                    });
                }
                Err(StoreError::DuplicateKey(UniqueField::Short)) => {
                    metrics::counter!("shorturl_allocation_conflicts_total").increment(1);
                    warn!(
                        candidate,
                        attempt, "Candidate identifier already mapped, counter behind mappings"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::AllocationConflict {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    /// The identifier handed out is the counter value before the increment.
    async fn next_candidate(&self) -> Result<i64, StoreError> {
        let seq = self.counters.increment_and_fetch(&self.counter_name).await?;
        Ok(seq - 1)
    }
}
