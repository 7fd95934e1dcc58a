use crate::core::avatar::{DEFAULT_AVATAR_TEMPLATE, DEFAULT_IMAGE_TIMEOUT, INITIALS_PLACEHOLDER};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_form_action, validate_path, validate_placeholder, validate_positive_number,
    validate_range, validate_url, Validate,
};
use std::time::Duration;

pub const DEFAULT_SYMPTOMS_ENDPOINT: &str = "http://127.0.0.1:5000";
pub const DEFAULT_QUOTES_ENDPOINT: &str = "http://127.0.0.1:5001";
pub const DEFAULT_FORM_ACTION: &str = "/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// 合併預設值、TOML 與命令列參數後的最終設定
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub symptoms_endpoint: String,
    pub form_action: String,
    pub quotes_endpoint: String,
    pub request_timeout: Duration,
    pub image_timeout: Duration,
    pub search_debounce: Duration,
    pub avatar_template: String,
    pub catalog_csv: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            symptoms_endpoint: DEFAULT_SYMPTOMS_ENDPOINT.to_string(),
            form_action: DEFAULT_FORM_ACTION.to_string(),
            quotes_endpoint: DEFAULT_QUOTES_ENDPOINT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            avatar_template: DEFAULT_AVATAR_TEMPLATE.to_string(),
            catalog_csv: None,
        }
    }
}

impl ConfigProvider for Settings {
    fn symptoms_endpoint(&self) -> &str {
        &self.symptoms_endpoint
    }

    fn form_action(&self) -> &str {
        &self.form_action
    }

    fn quotes_endpoint(&self) -> &str {
        &self.quotes_endpoint
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn image_timeout(&self) -> Duration {
        self.image_timeout
    }

    fn search_debounce(&self) -> Duration {
        self.search_debounce
    }

    fn avatar_template(&self) -> &str {
        &self.avatar_template
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("symptoms.endpoint", &self.symptoms_endpoint)?;
        validate_form_action("symptoms.form_action", &self.form_action)?;
        validate_range(
            "symptoms.debounce_ms",
            self.search_debounce.as_millis() as u64,
            0,
            5_000,
        )?;
        if let Some(csv) = &self.catalog_csv {
            validate_path("symptoms.catalog_csv", csv)?;
        }

        validate_url("quotes.endpoint", &self.quotes_endpoint)?;
        validate_positive_number(
            "quotes.image_timeout_seconds",
            self.image_timeout.as_secs(),
            1,
        )?;
        validate_placeholder(
            "quotes.avatar_template",
            &self.avatar_template,
            INITIALS_PLACEHOLDER,
        )?;
        validate_url(
            "quotes.avatar_template",
            &self.avatar_template.replace(INITIALS_PLACEHOLDER, "AB"),
        )?;

        validate_positive_number("http.timeout_seconds", self.request_timeout.as_secs(), 1)?;
        Ok(())
    }
}
