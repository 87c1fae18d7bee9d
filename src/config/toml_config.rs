use crate::adapters::search::GOOGLE_CUSTOM_SEARCH_ENDPOINT;
use crate::adapters::supabase::DEFAULT_TABLE;
use crate::core::pipeline::MAX_SEARCH_RESULTS;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, RoadmapError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_OUTPUT_PATH: &str = "./roadmaps";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "roadmap".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    pub engine_id: String,
    pub max_results: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Local,
    Supabase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub r#type: StorageKind,
    pub path: Option<String>,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
    pub timeout_seconds: Option<u64>,
}

fn default_search_endpoint() -> String {
    GOOGLE_CUSTOM_SEARCH_ENDPOINT.to_string()
}

impl TomlConfig {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a TOML string, substituting `${VAR}` references first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RoadmapError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Build from the environment: GOOGLE_API_KEY, SEARCH_ENGINE_ID and, when
    /// SUPABASE_URL is set, the Supabase store. Otherwise records go to
    /// ROADMAP_OUTPUT_PATH on local disk.
    pub fn from_env() -> Result<Self> {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let search = SearchConfig {
            endpoint: env("SEARCH_ENDPOINT").unwrap_or_else(default_search_endpoint),
            api_key: env("GOOGLE_API_KEY").unwrap_or_default(),
            engine_id: env("SEARCH_ENGINE_ID").unwrap_or_default(),
            max_results: None,
            timeout_seconds: None,
        };

        let storage = match env("SUPABASE_URL") {
            Some(url) => StorageConfig {
                r#type: StorageKind::Supabase,
                path: None,
                url: Some(url),
                api_key: env("SUPABASE_ANON_KEY"),
                table: env("SUPABASE_TABLE"),
                timeout_seconds: None,
            },
            None => StorageConfig {
                r#type: StorageKind::Local,
                path: env("ROADMAP_OUTPUT_PATH"),
                url: None,
                api_key: None,
                table: None,
                timeout_seconds: None,
            },
        };

        Ok(Self {
            pipeline: PipelineConfig::default(),
            search,
            storage,
        })
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RoadmapError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn output_path(&self) -> &str {
        self.storage.path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    pub fn table(&self) -> &str {
        self.storage.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_url("search.endpoint", &self.search.endpoint)?;
        validation::validate_secret("search.api_key", &self.search.api_key)?;
        validation::validate_secret("search.engine_id", &self.search.engine_id)?;

        if let Some(max_results) = self.search.max_results {
            validation::validate_range("search.max_results", max_results, 1, MAX_SEARCH_RESULTS)?;
        }
        if let Some(timeout) = self.search.timeout_seconds {
            validation::validate_range("search.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(timeout) = self.storage.timeout_seconds {
            validation::validate_range("storage.timeout_seconds", timeout, 1, 300)?;
        }

        match self.storage.r#type {
            StorageKind::Local => {
                validation::validate_path("storage.path", self.output_path())?;
            }
            StorageKind::Supabase => {
                let url = validation::validate_required_field("storage.url", &self.storage.url)?;
                validation::validate_url("storage.url", url)?;
                let key =
                    validation::validate_required_field("storage.api_key", &self.storage.api_key)?;
                validation::validate_secret("storage.api_key", key)?;
                validation::validate_non_empty_string("storage.table", self.table())?;
            }
        }

        tracing::debug!(
            "Configuration valid (search key: {}, storage: {:?})",
            if self.search.api_key.is_empty() { "not set" } else { "set" },
            self.storage.r#type
        );
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn search_endpoint(&self) -> &str {
        &self.search.endpoint
    }

    fn search_api_key(&self) -> &str {
        &self.search.api_key
    }

    fn search_engine_id(&self) -> &str {
        &self.search.engine_id
    }

    fn max_results(&self) -> usize {
        self.search.max_results.unwrap_or(MAX_SEARCH_RESULTS)
    }

    fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn persist_timeout(&self) -> Duration {
        Duration::from_secs(self.storage.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_local_config() {
        let toml_content = r#"
[pipeline]
name = "career-roadmaps"

[search]
api_key = "key-123"
engine_id = "cx-456"
max_results = 5
timeout_seconds = 3

[storage]
type = "local"
path = "./test-output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "career-roadmaps");
        assert_eq!(config.search.endpoint, GOOGLE_CUSTOM_SEARCH_ENDPOINT);
        assert_eq!(config.max_results(), 5);
        assert_eq!(config.search_timeout(), Duration::from_secs(3));
        assert_eq!(config.persist_timeout(), Duration::from_secs(10));
        assert_eq!(config.storage.r#type, StorageKind::Local);
        assert_eq!(config.output_path(), "./test-output");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ROADMAP_TEST_SUPABASE_KEY", "anon-secret");

        let toml_content = r#"
[search]
api_key = "k"
engine_id = "cx"

[storage]
type = "supabase"
url = "https://project.supabase.co"
api_key = "${ROADMAP_TEST_SUPABASE_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.api_key.as_deref(), Some("anon-secret"));
        assert_eq!(config.table(), "user_roadmaps");
        assert!(config.validate().is_ok());

        std::env::remove_var("ROADMAP_TEST_SUPABASE_KEY");
    }

    #[test]
    fn test_unset_secret_fails_validation() {
        let toml_content = r#"
[search]
api_key = "${ROADMAP_TEST_UNSET_VARIABLE}"
engine_id = "cx"

[storage]
type = "local"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, RoadmapError::MissingConfigError { ref field } if field == "search.api_key"));
    }

    #[test]
    fn test_supabase_requires_url() {
        let toml_content = r#"
[search]
api_key = "k"
engine_id = "cx"

[storage]
type = "supabase"
api_key = "anon"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_results_above_provider_limit_rejected() {
        let toml_content = r#"
[search]
api_key = "k"
engine_id = "cx"
max_results = 25

[storage]
type = "local"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[search]
endpoint = "http://localhost:9000/search"
api_key = "k"
engine_id = "cx"

[storage]
type = "local"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
        assert_eq!(config.search_endpoint(), "http://localhost:9000/search");
        assert_eq!(config.output_path(), "./roadmaps");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[search\napi_key = ").unwrap_err();
        assert!(matches!(err, RoadmapError::ConfigError { .. }));
    }
}
