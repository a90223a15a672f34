pub mod cache;

pub use cache::Cache;
pub use cache::CacheKey;
