use crate::{
    config::ServiceSettings,
    error::{AppError, AppResult},
    models::{Genre, Item, User},
    services::{
        HybridService, MockService, Recommendation, RecommendationService, ServiceKind,
        SharedCache,
    },
};

const NO_USER: &str = "No user set. Call create_user() or set_current_user() first.";

/// Coordinates the current user and the active recommendation service
///
/// This is the only surface the presentation layer talks to. Calls are
/// blocking; a responsive caller runs them off its interactive thread.
pub struct AppController {
    current_user: Option<User>,
    service: Box<dyn RecommendationService>,
    settings: ServiceSettings,
    cache: SharedCache,
}

impl AppController {
    pub fn new(settings: ServiceSettings, kind: ServiceKind, cache: SharedCache) -> AppResult<Self> {
        let service = build_service(kind, &settings, &cache)?;
        tracing::info!(service = %kind, "Controller started");
        Ok(Self::with_service(settings, cache, service))
    }

    /// Creates a controller around an already constructed service
    pub fn with_service(
        settings: ServiceSettings,
        cache: SharedCache,
        service: Box<dyn RecommendationService>,
    ) -> Self {
        Self {
            current_user: None,
            service,
            settings,
            cache,
        }
    }

    pub fn create_user(&mut self, name: &str, age: i64) -> AppResult<&User> {
        let user = User::new(name, age)?;
        tracing::info!(user = %user.name(), "Created user");
        Ok(&*self.current_user.insert(user))
    }

    pub fn set_current_user(&mut self, user: User) {
        tracing::info!(user = %user.name(), "Set current user");
        self.current_user = Some(user);
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn has_current_user(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn clear_current_user(&mut self) {
        self.current_user = None;
        tracing::info!("Cleared current user");
    }

    fn require_user(&self) -> AppResult<&User> {
        self.current_user
            .as_ref()
            .ok_or_else(|| AppError::IllegalState(NO_USER.to_string()))
    }

    fn require_user_mut(&mut self) -> AppResult<&mut User> {
        self.current_user
            .as_mut()
            .ok_or_else(|| AppError::IllegalState(NO_USER.to_string()))
    }

    pub fn add_genre_to_current_user(&mut self, genre: Genre) -> AppResult<()> {
        let user = self.require_user_mut()?;
        user.add_genre(genre);
        tracing::info!(user = %user.name(), genre = %genre, "Added genre");
        Ok(())
    }

    pub fn add_genres_to_current_user(&mut self, genres: &[Genre]) -> AppResult<()> {
        let user = self.require_user_mut()?;
        user.add_genres(genres.iter().copied());
        tracing::info!(user = %user.name(), count = genres.len(), "Added genres");
        Ok(())
    }

    /// Recommendations for the current user, with their provenance
    pub fn recommend_for_current_user(&self) -> AppResult<Recommendation> {
        let user = self.require_user()?;

        if user.preferred_genres().is_empty() {
            tracing::warn!(
                user = %user.name(),
                "User has no preferred genres, recommendations may not be personalized"
            );
        }

        tracing::info!(user = %user.name(), service = %self.active_kind(), "Getting recommendations");
        let recommendation = self.service.recommend(user)?;
        tracing::info!(count = recommendation.items.len(), "Retrieved recommendations");

        Ok(recommendation)
    }

    pub fn get_recommendations_for_current_user(&self) -> AppResult<Vec<Item>> {
        self.recommend_for_current_user().map(|r| r.items)
    }

    pub fn get_recommendations(&self, user: &User) -> AppResult<Vec<Item>> {
        self.service.get_recommendations(user)
    }

    /// Swaps the active service, releasing the old one first
    ///
    /// Requesting the kind that is already active does nothing.
    pub fn set_active_service(&mut self, kind: ServiceKind) -> AppResult<()> {
        if self.active_kind() == kind {
            return Ok(());
        }

        if let Err(e) = self.service.close() {
            tracing::error!(error = %e, "Failed to close {} service", self.active_kind());
        }

        self.service = build_service(kind, &self.settings, &self.cache)?;
        tracing::info!(service = %kind, "Switched service");
        Ok(())
    }

    pub fn active_kind(&self) -> ServiceKind {
        self.service.kind()
    }

    /// "Mock" or "Hybrid"
    pub fn service_type_name(&self) -> String {
        self.active_kind().to_string()
    }

    pub fn clear_cache(&self) {
        self.service.clear_cache();
    }
}

fn build_service(
    kind: ServiceKind,
    settings: &ServiceSettings,
    cache: &SharedCache,
) -> AppResult<Box<dyn RecommendationService>> {
    Ok(match kind {
        ServiceKind::Mock => Box::new(MockService::new(
            settings.data_directory.clone(),
            SharedCache::clone(cache),
        )?),
        ServiceKind::Hybrid => Box::new(HybridService::new(settings, SharedCache::clone(cache))?),
    })
}
