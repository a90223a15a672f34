//! Bridge to the out-of-process recommendation engine
//!
//! A request is a strictly sequential exchange: write `input.json`, run the
//! engine, read `output.json`. The two file paths are shared by every request
//! on an instance, so exchanges are serialized behind a lock.

use std::{
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use tracing::instrument;
use uuid::Uuid;

use super::{
    validate_data_directory, validate_user, ExchangeStep, Recommendation, RecommendationService,
    RecommendationSource, ServiceKind, SharedCache,
};
use crate::{
    config::ServiceSettings,
    db::CacheKey,
    error::{AppError, AppResult},
    models::{Item, User},
};

pub mod engine;
pub mod protocol;

use engine::EngineLocator;
use protocol::{EngineRequest, EngineResponse, INPUT_FILE_NAME, OUTPUT_FILE_NAME};

type StepResult<T> = Result<T, (ExchangeStep, AppError)>;

trait AtStep<T> {
    fn at(self, step: ExchangeStep) -> StepResult<T>;
}

impl<T> AtStep<T> for AppResult<T> {
    fn at(self, step: ExchangeStep) -> StepResult<T> {
        self.map_err(|e| (step, e))
    }
}

pub struct HybridService {
    data_directory: PathBuf,
    input_path: PathBuf,
    output_path: PathBuf,
    locator: EngineLocator,
    cache: SharedCache,
    exchange_lock: Mutex<()>,
}

impl HybridService {
    pub fn new(settings: &ServiceSettings, cache: SharedCache) -> AppResult<Self> {
        validate_data_directory(&settings.data_directory)?;
        let data_directory = settings.data_directory.clone();

        Ok(Self {
            input_path: data_directory.join(INPUT_FILE_NAME),
            output_path: data_directory.join(OUTPUT_FILE_NAME),
            data_directory,
            locator: EngineLocator::new(settings.engine_paths.clone()),
            cache,
            exchange_lock: Mutex::new(()),
        })
    }

    pub fn data_directory(&self) -> &Path {
        &self.data_directory
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn locator(&self) -> &EngineLocator {
        &self.locator
    }

    /// Runs one request through the engine
    fn exchange(&self, user: &User) -> StepResult<(Vec<Item>, RecommendationSource)> {
        let request = EngineRequest::recommendations_for(user);
        protocol::write_json(&self.input_path, &request).at(ExchangeStep::WriteRequest)?;
        tracing::info!(path = %self.input_path.display(), "Wrote request file");

        let executable = self
            .locator
            .locate(&self.data_directory)
            .at(ExchangeStep::InvokeEngine)?;
        engine::run(&executable).at(ExchangeStep::InvokeEngine)?;

        let source = if self.output_path.exists() {
            RecommendationSource::Engine
        } else {
            tracing::warn!(
                path = %self.output_path.display(),
                "Engine left no output file, serving placeholder recommendations"
            );
            protocol::write_json(&self.output_path, &EngineResponse::fallback())
                .at(ExchangeStep::ReadResponse)?;
            RecommendationSource::Fallback
        };

        let items = protocol::read_response(&self.output_path)
            .and_then(EngineResponse::into_items)
            .at(ExchangeStep::ReadResponse)?;
        tracing::info!(path = %self.output_path.display(), "Read response file");

        Ok((items, source))
    }
}

impl RecommendationService for HybridService {
    #[instrument(skip_all, fields(user = %user.name()))]
    fn recommend(&self, user: &User) -> AppResult<Recommendation> {
        validate_user(user)?;

        let key = CacheKey::Hybrid {
            name: user.name().to_string(),
            age: user.age(),
        }
        .to_string();

        if let Some(cached) = self.cache.get(&key) {
            tracing::info!(count = cached.len(), "Returning cached recommendations");
            return Ok(Recommendation::new(cached, RecommendationSource::Cache));
        }

        let exchange_id = Uuid::new_v4();
        let span = tracing::info_span!("engine_exchange", %exchange_id);
        let _entered = span.enter();
        let _exclusive = self
            .exchange_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let (items, source) = match self.exchange(user) {
            Ok(result) => result,
            Err((step, e)) => {
                tracing::error!(step = %step, error = %e, "Failed to generate recommendations");
                return Ok(Recommendation::degraded(step, e.to_string()));
            }
        };

        if let Err(e) = self.cache.put(key, items.clone()) {
            tracing::error!(error = %e, "Failed to cache recommendations");
            return Ok(Recommendation::degraded(
                ExchangeStep::CacheResult,
                e.to_string(),
            ));
        }

        tracing::info!(count = items.len(), source = ?source, "Generated recommendations");
        Ok(Recommendation::new(items, source))
    }

    fn kind(&self) -> ServiceKind {
        ServiceKind::Hybrid
    }

    fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("Cache cleared");
    }

    /// Waits for any in-flight exchange; file handles never outlive one
    fn close(&mut self) -> AppResult<()> {
        let _exclusive = self
            .exchange_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        tracing::info!(data_directory = %self.data_directory.display(), "Hybrid service closed");
        Ok(())
    }
}
