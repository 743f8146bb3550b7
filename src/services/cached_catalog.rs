use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{BookRow, MoodTag},
    services::catalog::CatalogStore,
};

/// Read-through Redis cache in front of another catalog store
///
/// Cached reads may lag behind the underlying store by up to `ttl` seconds.
pub struct CachedCatalogStore {
    inner: Arc<dyn CatalogStore>,
    cache: Cache,
    ttl: u64,
}

impl CachedCatalogStore {
    pub fn new(inner: Arc<dyn CatalogStore>, cache: Cache, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait::async_trait]
impl CatalogStore for CachedCatalogStore {
    async fn list_active_books(&self) -> AppResult<Vec<BookRow>> {
        cached!(
            self.cache,
            CacheKey::ActiveBooks,
            self.ttl,
            self.inner.list_active_books()
        )
    }

    async fn list_mood_tags(&self) -> AppResult<Vec<MoodTag>> {
        cached!(
            self.cache,
            CacheKey::MoodTags,
            self.ttl,
            self.inner.list_mood_tags()
        )
    }

    fn name(&self) -> &'static str {
        "redis-cached"
    }
}
