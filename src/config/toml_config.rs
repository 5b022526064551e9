use crate::core::ConfigProvider;
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_TABLE_PATH: &str = "data/erlang_b_table.csv";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub erlang: ErlangConfig,
    pub explanation: ExplanationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ErlangConfig {
    pub table_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplanationConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ErlangConfig {
    fn default() -> Self {
        Self {
            table_path: DEFAULT_TABLE_PATH.to_string(),
        }
    }
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn env_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CalcError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CalcError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// Falls back to `GOOGLE_API_KEY` when the file does not provide a usable key.
    pub fn resolve_api_key(&mut self) {
        if self.api_key().is_none() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                if !key.trim().is_empty() {
                    self.explanation.api_key = Some(key);
                }
            }
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("erlang.table_path", &self.erlang.table_path)?;
        validation::validate_file_extension("erlang.table_path", &self.erlang.table_path, &["csv"])?;
        validation::validate_url("explanation.endpoint", &self.explanation.endpoint)?;
        validation::validate_non_empty_string("explanation.model", &self.explanation.model)?;
        validation::validate_range(
            "explanation.timeout_seconds",
            self.explanation.timeout_seconds,
            1,
            300,
        )?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(CalcError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("Unsupported level. Valid levels: {}", valid_levels.join(", ")),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn erlang_table_path(&self) -> &str {
        &self.erlang.table_path
    }

    fn explanation_enabled(&self) -> bool {
        self.explanation.enabled
    }

    fn explanation_endpoint(&self) -> &str {
        &self.explanation.endpoint
    }

    fn explanation_model(&self) -> &str {
        &self.explanation.model
    }

    fn api_key(&self) -> Option<&str> {
        // 未替換的 ${VAR} 視為沒有設定
        self.explanation
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !env_placeholder().is_match(key))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.explanation.timeout_seconds)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
