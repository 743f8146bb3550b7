pub mod cached_catalog;
pub mod catalog;
pub mod recommendations;
pub mod statistics;

pub use cached_catalog::CachedCatalogStore;
pub use catalog::{load_snapshot, CatalogSnapshot, CatalogStore, InMemoryCatalog, TagNameResolver};
pub use recommendations::{recommend, DEFAULT_MAX_RECOMMENDATIONS};
pub use statistics::CatalogStatistics;
