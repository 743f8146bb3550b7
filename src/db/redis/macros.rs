/// Read-through caching against a [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues the result for a background write with `$ttl` seconds
/// and returns it. Errors from either side are propagated with `?`.
///
/// # Example
/// ```rust,ignore
/// async fn list_active_books(&self) -> AppResult<Vec<BookRow>> {
///     cached!(self.cache, CacheKey::ActiveBooks, self.ttl, self.inner.list_active_books())
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await? {
            tracing::debug!(key = %key, "Cache hit");
            Ok(cached)
        } else {
            tracing::debug!(key = %key, "Cache miss");
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
