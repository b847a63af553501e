//! Per-User Projection Cache
//!
//! Caches resolved capability projections per user using `DashMap` for
//! lock-free concurrent access. Projections are built lazily on first
//! request and invalidated when grants or role assignments change.
//!
//! Two generation counters guard every entry: a global one bumped whenever
//! a role's grants change (any number of users may be affected) and a
//! per-user one bumped when that user's role changes. A projection built
//! from data loaded before either bump is never stored.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use gw_common::CapabilityProjection;

/// Cache tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Upper bound on staleness for edits made outside this process.
    pub max_age: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age: Duration::from_secs(300),
        }
    }
}

/// Generations observed before loading a user's permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    index: u64,
    user: u64,
}

/// Cached projection paired with the generations it was built at.
struct CachedProjection {
    projection: Arc<CapabilityProjection>,
    generation: Generation,
    cached_at: Instant,
}

/// Thread-safe cache of per-user capability projections.
pub struct ProjectionCache {
    entries: DashMap<i32, CachedProjection>,
    index_generation: AtomicU64,
    /// Per-user generation counters. Incremented on role reassignment so
    /// in-flight builds from stale data are discarded on insert. A user
    /// without an entry is at generation 0.
    user_generations: DashMap<i32, AtomicU64>,
    max_age: Duration,
}

impl Default for ProjectionCache {
    fn default() -> Self {
        Self::new(CacheSettings::default().max_age)
    }
}

impl ProjectionCache {
    #[must_use]
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            index_generation: AtomicU64::new(0),
            user_generations: DashMap::new(),
            max_age,
        }
    }

    /// Capture the current generations. Call before reading from the store.
    #[must_use]
    pub fn generation(&self, user_id: i32) -> Generation {
        Generation {
            index: self.index_generation.load(Ordering::Acquire),
            user: self
                .user_generations
                .get(&user_id)
                .map_or(0, |g| g.load(Ordering::Acquire)),
        }
    }

    /// Cached projection for a user, if it is still current.
    ///
    /// Entries built at an older generation or older than the maximum age
    /// are evicted and reported as a miss.
    #[must_use]
    pub fn get(&self, user_id: i32) -> Option<Arc<CapabilityProjection>> {
        let current = self.generation(user_id);
        {
            // Guard must drop before `remove` below
            let entry = self.entries.get(&user_id)?;
            if entry.generation == current && entry.cached_at.elapsed() < self.max_age {
                return Some(Arc::clone(&entry.projection));
            }
        }

        tracing::debug!(user_id, "Evicting stale capability projection");
        self.entries.remove(&user_id);
        None
    }

    /// Store a projection built from data read at `observed`.
    ///
    /// Returns `false` without storing when an invalidation happened since
    /// `observed` was captured.
    pub fn insert(
        &self,
        user_id: i32,
        observed: Generation,
        projection: Arc<CapabilityProjection>,
    ) -> bool {
        if self.generation(user_id) != observed {
            tracing::debug!(user_id, "Discarding projection built from stale data");
            return false;
        }
        self.entries.insert(
            user_id,
            CachedProjection {
                projection,
                generation: observed,
                cached_at: Instant::now(),
            },
        );
        true
    }

    /// Drop every cached projection.
    ///
    /// Increments the global generation so in-flight builds from stale data
    /// will not overwrite the invalidation.
    pub fn invalidate_all(&self) {
        self.index_generation.fetch_add(1, Ordering::Release);
        self.entries.clear();
    }

    /// Drop one user's cached projection.
    pub fn invalidate_user(&self, user_id: i32) {
        self.user_generations
            .entry(user_id)
            .or_default()
            .fetch_add(1, Ordering::Release);
        self.entries.remove(&user_id);
    }

    /// Number of cached projections, current or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
