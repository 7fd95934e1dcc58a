use crate::config::settings::Settings;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub symptoms: SymptomsConfig,
    #[serde(default)]
    pub quotes: QuotesConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymptomsConfig {
    pub endpoint: Option<String>,
    pub form_action: Option<String>,
    pub debounce_ms: Option<u64>,
    pub catalog_csv: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotesConfig {
    pub endpoint: Option<String>,
    pub image_timeout_seconds: Option<u64>,
    pub avatar_template: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${QUOTES_URL})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 套用在預設值上
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(endpoint) = &self.symptoms.endpoint {
            settings.symptoms_endpoint = endpoint.clone();
        }
        if let Some(action) = &self.symptoms.form_action {
            settings.form_action = action.clone();
        }
        if let Some(ms) = self.symptoms.debounce_ms {
            settings.search_debounce = std::time::Duration::from_millis(ms);
        }
        if let Some(csv) = &self.symptoms.catalog_csv {
            settings.catalog_csv = Some(csv.clone());
        }
        if let Some(endpoint) = &self.quotes.endpoint {
            settings.quotes_endpoint = endpoint.clone();
        }
        if let Some(secs) = self.quotes.image_timeout_seconds {
            settings.image_timeout = std::time::Duration::from_secs(secs);
        }
        if let Some(template) = &self.quotes.avatar_template {
            settings.avatar_template = template.clone();
        }
        if let Some(secs) = self.http.timeout_seconds {
            settings.request_timeout = std::time::Duration::from_secs(secs);
        }
    }

    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();
        self.apply_to(&mut settings);
        settings
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_settings().validate()
    }
}
