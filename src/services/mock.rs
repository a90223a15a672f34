use std::path::{Path, PathBuf};

use tracing::instrument;

use super::{
    validate_data_directory, validate_user, Recommendation, RecommendationService,
    RecommendationSource, ServiceKind, SharedCache,
};
use crate::{
    db::CacheKey,
    error::AppResult,
    models::{Item, User},
};

/// Number of items served per request
const RECOMMENDATION_COUNT: usize = 5;

/// Serves recommendations from a fixed in-process catalog
///
/// Every user gets the first five catalog items; preferred genres are not
/// consulted yet. Results are cached by user name only.
pub struct MockService {
    data_directory: PathBuf,
    catalog: Vec<Item>,
    cache: SharedCache,
}

impl MockService {
    pub fn new(data_directory: impl Into<PathBuf>, cache: SharedCache) -> AppResult<Self> {
        Self::with_catalog(data_directory, default_catalog()?, cache)
    }

    pub fn with_catalog(
        data_directory: impl Into<PathBuf>,
        catalog: Vec<Item>,
        cache: SharedCache,
    ) -> AppResult<Self> {
        let data_directory = data_directory.into();
        validate_data_directory(&data_directory)?;

        Ok(Self {
            data_directory,
            catalog,
            cache,
        })
    }

    pub fn catalog(&self) -> &[Item] {
        &self.catalog
    }

    pub fn data_directory(&self) -> &Path {
        &self.data_directory
    }
}

impl RecommendationService for MockService {
    #[instrument(skip_all, fields(user = %user.name()))]
    fn recommend(&self, user: &User) -> AppResult<Recommendation> {
        validate_user(user)?;

        let key = CacheKey::Mock {
            name: user.name().to_string(),
        }
        .to_string();

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(cache_key = %key, "Cache hit");
            tracing::info!(count = cached.len(), "Returning cached mock recommendations");
            return Ok(Recommendation::new(cached, RecommendationSource::Cache));
        }

        let count = RECOMMENDATION_COUNT.min(self.catalog.len());
        let items: Vec<Item> = self.catalog[..count].to_vec();

        self.cache.put(key, items.clone())?;

        tracing::info!(count = items.len(), "Generated mock recommendations (no file I/O)");

        Ok(Recommendation::new(items, RecommendationSource::Catalog))
    }

    fn kind(&self) -> ServiceKind {
        ServiceKind::Mock
    }

    fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("Cache cleared");
    }
}

fn default_catalog() -> AppResult<Vec<Item>> {
    let entries: [(i64, &str, &str, &str); 12] = [
        (1, "The Dark Knight", "Batman fights Joker in Gotham", "Action"),
        (2, "Mad Max: Fury Road", "Post-apocalyptic chase", "Action"),
        (3, "John Wick", "Assassin seeks revenge", "Action"),
        (4, "Inception", "Dreams within dreams", "Science Fiction"),
        (5, "The Matrix", "Reality is simulation", "Science Fiction"),
        (6, "Interstellar", "Space exploration", "Science Fiction"),
        (7, "The Grand Budapest Hotel", "Quirky hotel adventure", "Comedy"),
        (8, "Superbad", "Teenage party comedy", "Comedy"),
        (9, "The Shawshank Redemption", "Prison drama", "Drama"),
        (10, "Forrest Gump", "Life story of simple man", "Drama"),
        (11, "The Shining", "Haunted hotel horror", "Horror"),
        (12, "Get Out", "Psychological horror", "Horror"),
    ];

    entries
        .into_iter()
        .map(|(id, title, description, genre)| {
            Ok(Item::new(id, title)?
                .with_description(description)
                .with_genres(vec![genre.to_string()]))
        })
        .collect()
}
