use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the EnglishPod transcript tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Description parsing settings
    pub parser: ParserConfig,

    /// Description library layout and batch settings
    pub library: LibraryConfig,

    /// Pronunciation enrichment settings
    pub pronunciation: PronunciationConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Token that marks the first line as the episode title
    pub title_marker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory holding captured description HTML files
    pub descriptions_dir: PathBuf,

    /// Directory that receives per-level folders
    pub levels_dir: PathBuf,

    /// File extension of captured descriptions
    pub extension: String,

    /// Maximum number of concurrent parse workers
    pub max_workers: usize,

    /// Expected video numbers per folder, for the status report
    #[serde(default = "default_status_folders")]
    pub status_folders: Vec<FolderExpectation>,
}

/// Folder under `levels_dir` expected to hold `count` videos numbered from `start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderExpectation {
    pub name: String,
    pub start: u32,
    pub count: u32,
}

impl FolderExpectation {
    pub fn new(name: &str, start: u32, count: u32) -> Self {
        Self {
            name: name.to_string(),
            start,
            count,
        }
    }
}

fn default_status_folders() -> Vec<FolderExpectation> {
    vec![
        FolderExpectation::new("Episode_01", 1, 100),
        FolderExpectation::new("Episode_02", 101, 39),
        FolderExpectation::new("Episode_03", 140, 63),
        FolderExpectation::new("Elementary", 1, 41),
        FolderExpectation::new("Intermediate", 1, 37),
        FolderExpectation::new("Upper_Intermediate", 1, 13),
        FolderExpectation::new("Advanced", 1, 9),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PronunciationConfig {
    /// Dictionary endpoint; the cleaned word is appended as a path segment
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Retries for network failures (HTTP error statuses are not retried)
    pub max_retries: u32,

    /// Delay between lookups in milliseconds
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base output directory
    pub base_dir: PathBuf,

    /// Records file name inside the output directory
    pub records_file: String,

    /// Also write a TypeScript episodes module
    pub typescript: bool,

    /// Log level
    pub log_level: String,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_paths = ["englishpod.toml", "config/englishpod.toml"];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&config_str)?)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(workers) = std::env::var("ENGLISHPOD_WORKERS") {
            config.library.max_workers = workers
                .parse()
                .map_err(|_| Error::Configuration(format!("invalid ENGLISHPOD_WORKERS: {}", workers)))?;
        }

        if let Ok(dir) = std::env::var("ENGLISHPOD_DESCRIPTIONS_DIR") {
            config.library.descriptions_dir = PathBuf::from(dir);
        }

        if let Ok(output_dir) = std::env::var("ENGLISHPOD_OUTPUT_DIR") {
            config.output.base_dir = PathBuf::from(output_dir);
        }

        if let Ok(endpoint) = std::env::var("ENGLISHPOD_DICTIONARY_ENDPOINT") {
            config.pronunciation.endpoint = endpoint;
        }

        if let Ok(log_level) = std::env::var("ENGLISHPOD_LOG_LEVEL") {
            config.output.log_level = log_level;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.library.max_workers == 0 {
            return Err(Error::Configuration("max_workers must be greater than 0".to_string()));
        }

        if self.parser.title_marker.trim().is_empty() {
            return Err(Error::Configuration("title_marker must not be empty".to_string()));
        }

        if let Some(folder) = self.library.status_folders.iter().find(|f| f.count == 0) {
            return Err(Error::Configuration(format!(
                "status folder {} expects no videos",
                folder.name
            )));
        }

        if !self.pronunciation.endpoint.starts_with("http://")
            && !self.pronunciation.endpoint.starts_with("https://")
        {
            return Err(Error::Configuration(format!(
                "pronunciation endpoint must be an http(s) URL: {}",
                self.pronunciation.endpoint
            )));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "EnglishPod Configuration:\n\
            - Title Marker: {}\n\
            - Descriptions Directory: {}\n\
            - Workers: {}\n\
            - Output Directory: {}\n\
            - TypeScript Export: {}\n\
            - Dictionary Endpoint: {}",
            self.parser.title_marker,
            self.library.descriptions_dir.display(),
            self.library.max_workers,
            self.output.base_dir.display(),
            self.output.typescript,
            self.pronunciation.endpoint
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parser: ParserConfig {
                title_marker: "EnglishPod".to_string(),
            },
            library: LibraryConfig {
                descriptions_dir: PathBuf::from("audio_source"),
                levels_dir: PathBuf::from("youtube_descriptions"),
                extension: "html".to_string(),
                max_workers: num_cpus::get().min(8),
                status_folders: default_status_folders(),
            },
            pronunciation: PronunciationConfig {
                endpoint: "https://api.dictionaryapi.dev/api/v2/entries/en".to_string(),
                timeout_seconds: 5,
                max_retries: 2,
                delay_ms: 500,
            },
            output: OutputConfig {
                base_dir: PathBuf::from("./output"),
                records_file: "episodes.json".to_string(),
                typescript: false,
                log_level: "info".to_string(),
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.library.max_workers = workers;
        self
    }

    pub fn with_title_marker(mut self, marker: &str) -> Self {
        self.config.parser.title_marker = marker.to_string();
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.config.output.base_dir = dir;
        self
    }

    pub fn with_dictionary_endpoint(mut self, endpoint: &str) -> Self {
        self.config.pronunciation.endpoint = endpoint.to_string();
        self
    }

    pub fn with_lookup_delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.pronunciation.delay_ms = delay_ms;
        self
    }

    pub fn enable_typescript(mut self, enable: bool) -> Self {
        self.config.output.typescript = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
