//! Keyed query cache with per-entry revalidation windows.
//!
//! Wraps a loader under a key made of ordered string labels. With a
//! revalidation window the first result is kept until the window elapses and
//! the next call loads again; without one every call loads. Concurrent
//! callers of the same key share one load, and failed loads are not cached.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;

/// Ordered labels identifying a cached query, e.g. `["/", "getMostPopularProducts"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<String>);

impl CacheKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Clone)]
struct Entry<V> {
    value: V,
    revalidate: Duration,
}

/// Expires each entry after the window it was stored with.
struct RevalidateAfter;

impl<V> Expiry<CacheKey, Entry<V>> for RevalidateAfter {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &Entry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.revalidate)
    }
}

/// Memoizes query results of type `V` by [`CacheKey`].
#[derive(Clone)]
pub struct QueryCache<V> {
    inner: Cache<CacheKey, Entry<V>>,
}

impl<V> fmt::Debug for QueryCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

impl<V> QueryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// `max_capacity` is clamped to at least one entry; a zero-capacity
    /// cache would evict every value as soon as it is stored.
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity.max(1))
                .expire_after(RevalidateAfter)
                .build(),
        }
    }

    /// Return the cached value for `key`, or run `load` and cache its result
    /// for `revalidate`. `None` disables caching for this call.
    pub async fn get_or_load<E, F, Fut>(
        &self,
        key: &CacheKey,
        revalidate: Option<Duration>,
        load: F,
    ) -> Result<V, E>
    where
        E: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let Some(revalidate) = revalidate else {
            tracing::debug!(key = %key, "query cache bypassed");
            return load().await;
        };

        let mut loaded = false;
        let entry = self
            .inner
            .try_get_with(key.clone(), async {
                loaded = true;
                let value = load().await?;
                Ok::<_, E>(Entry { value, revalidate })
            })
            .await
            .map_err(|err: Arc<E>| Arc::try_unwrap(err).unwrap_or_else(|shared| (*shared).clone()))?;

        if loaded {
            tracing::debug!(key = %key, revalidate_secs = revalidate.as_secs(), "query cache miss");
        } else {
            tracing::debug!(key = %key, "query cache hit");
        }

        Ok(entry.value)
    }
}
