// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub remote: RemoteConfig,
    pub pipeline: PipelineConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_base_url: String,
    pub branch: String,
    pub user_agent: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    pub show_progress: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub suffix: String,
    pub extract_dir_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    pub api_base_url: String,
    pub api_key_env: String,
    pub model: String,
    pub vector_store_name: String,
    pub prompt_preamble: String,
}

impl Config {
    /// Layers an optional TOML file and `GIT_SOURCEZIP__*` variables over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        builder = builder.add_source(config::File::from(path).required(false));

        builder = builder.add_source(
            config::Environment::with_prefix("GIT_SOURCEZIP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            remote: RemoteConfig {
                base_url: "https://github.com".to_string(),
                api_base_url: "https://api.github.com".to_string(),
                branch: "main".to_string(),
                user_agent: format!("git_sourcezip/{}", env!("CARGO_PKG_VERSION")),
                timeout_secs: None,
                show_progress: true,
            },
            pipeline: PipelineConfig {
                suffix: ".py".to_string(),
                extract_dir_name: "py_files".to_string(),
            },
            analysis: AnalysisConfig {
                api_base_url: "https://api.openai.com/v1".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                model: "gpt-4o-mini".to_string(),
                vector_store_name: "knowledge_base".to_string(),
                prompt_preamble: "Considering you are a Senior Business Analyst and you are \
                    analyzing the available documentation for the application. Propose \
                    meaningful changes for this page:"
                    .to_string(),
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.remote.branch.trim().is_empty() {
            return Err(PipelineError::Config("branch must not be empty".to_string()));
        }

        if self.remote.timeout_secs == Some(0) {
            return Err(PipelineError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        let dir_name = self.pipeline.extract_dir_name.trim();
        if dir_name.is_empty() || dir_name.contains(['/', '\\']) || dir_name == ".." {
            return Err(PipelineError::Config(format!(
                "extract_dir_name must be a single directory name, got '{}'",
                self.pipeline.extract_dir_name
            )));
        }

        Ok(())
    }
}
