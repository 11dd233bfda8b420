#[cfg(test)]
use std::cell::RefCell;
#[cfg(not(test))]
use std::sync::OnceLock;
use std::time::Duration;

use eyre::Result;
use serde::{Deserialize, Serialize};

use super::constants::{
    API_PREFIX, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
    LOG_FILE_PATH, PAGE_SIZE,
};
use super::defaults::*;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    #[serde(default)]
    pub file: LogFile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    #[serde(default = "log_file_path")]
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "endpoint")]
    pub endpoint: String,

    #[serde(default = "api_prefix")]
    pub api_prefix: String,

    #[serde(default)]
    pub timeout_secs: Option<u16>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "temperature")]
    pub temperature: f32,

    #[serde(default = "top_p")]
    pub top_p: f32,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default)]
    pub system_prompt: Option<String>,

    #[serde(default = "page_size")]
    pub page_size: usize,
}

#[cfg(not(test))]
static CONFIG: OnceLock<Configuration> = OnceLock::new();

// Per-thread configuration for tests
#[cfg(test)]
thread_local! {
    static TEST_CONFIG: RefCell<&'static Configuration> =
        RefCell::new(Box::leak(Box::new(Configuration::default())));
}

impl Configuration {
    #[cfg(not(test))]
    pub fn instance() -> &'static Configuration {
        CONFIG.get_or_init(Configuration::default)
    }

    #[cfg(not(test))]
    pub fn init(config: Configuration) -> Result<()> {
        CONFIG
            .set(config)
            .map_err(|_| eyre::eyre!("configuration is already initialized"))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn instance() -> &'static Configuration {
        TEST_CONFIG.with(|config| *config.borrow())
    }

    #[cfg(test)]
    pub fn init(config: Configuration) -> Result<()> {
        TEST_CONFIG.with(|test_config| {
            *test_config.borrow_mut() = Box::leak(Box::new(config));
        });
        Ok(())
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(|secs| Duration::from_secs(secs as u64))
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            file: LogFile::default(),
            filters: None,
        }
    }
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            path: LOG_FILE_PATH.to_string(),
            append: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_prefix: API_PREFIX.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: None,
            system_prompt: None,
            page_size: PAGE_SIZE,
        }
    }
}
