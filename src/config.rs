use std::path::PathBuf;

use serde::Deserialize;

use crate::services::ServiceKind;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory shared with the engine, holding `input.json` and `output.json`
    #[serde(default = "default_data_directory")]
    pub data_directory: String,

    /// Ordered candidate engine executables, comma separated in the environment.
    ///
    /// `{data_dir}` expands to the data directory and `{exe_suffix}` to the
    /// platform executable suffix. The first existing path wins.
    #[serde(default = "default_engine_paths")]
    pub engine_paths: Vec<String>,

    /// Maximum cached recommendation lists before the whole cache is evicted
    #[serde(default)]
    pub cache_max_size: Option<usize>,

    /// Service variant active at startup
    #[serde(default)]
    pub default_service: ServiceKind,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// The part of [`Config`] needed to construct recommendation services
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub data_directory: PathBuf,
    pub engine_paths: Vec<String>,
}

impl ServiceSettings {
    pub fn new(data_directory: impl Into<PathBuf>) -> Self {
        Self {
            data_directory: data_directory.into(),
            engine_paths: default_engine_paths(),
        }
    }

    pub fn with_engine_paths(mut self, engine_paths: Vec<String>) -> Self {
        self.engine_paths = engine_paths;
        self
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::new(default_data_directory())
    }
}

fn default_data_directory() -> String {
    "../shared".to_string()
}

pub fn default_engine_paths() -> Vec<String> {
    vec![
        "../cpp/build/Debug/crossai-engine.exe".to_string(),
        "../cpp/build/Release/crossai-engine.exe".to_string(),
        "../cpp/build/crossai-engine".to_string(),
    ]
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            data_directory: PathBuf::from(&self.data_directory),
            engine_paths: self.engine_paths.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config: Config = envy::from_iter(vars(&[])).unwrap();
        assert_eq!(config.data_directory, "../shared");
        assert_eq!(config.engine_paths, default_engine_paths());
        assert_eq!(config.cache_max_size, None);
        assert_eq!(config.default_service, ServiceKind::Mock);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_engine_paths_are_comma_separated() {
        let config: Config = envy::from_iter(vars(&[
            ("ENGINE_PATHS", "/opt/engine,{data_dir}/engine{exe_suffix}"),
            ("DEFAULT_SERVICE", "hybrid"),
            ("CACHE_MAX_SIZE", "16"),
        ]))
        .unwrap();

        assert_eq!(
            config.engine_paths,
            vec!["/opt/engine", "{data_dir}/engine{exe_suffix}"]
        );
        assert_eq!(config.default_service, ServiceKind::Hybrid);
        assert_eq!(config.cache_max_size, Some(16));
    }

    #[test]
    fn test_service_settings_projection() {
        let config: Config = envy::from_iter(vars(&[("DATA_DIRECTORY", "/tmp/shared")])).unwrap();
        let settings = config.service_settings();
        assert_eq!(settings.data_directory, PathBuf::from("/tmp/shared"));
        assert_eq!(settings.engine_paths, config.engine_paths);
    }
}
