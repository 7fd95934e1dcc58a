use crate::config::settings::Settings;
use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "sq")]
#[command(about = "Terminal client for the symptom checker and the quote guessing game")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub symptoms_endpoint: Option<String>,

    #[arg(long)]
    pub quotes_endpoint: Option<String>,

    #[arg(long, help = "Search the symptom names of a local training CSV instead of /search")]
    pub catalog_csv: Option<String>,

    #[arg(long, help = "HTTP request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Search the symptom catalog (empty query lists everything)
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Select the given symptoms and submit them for analysis
    Diagnose {
        #[arg(required = true)]
        symptoms: Vec<String>,
        #[arg(long, help = "Write the result page to this file")]
        output: Option<PathBuf>,
    },
    /// Interactive symptom selection
    Select,
    /// Ask the quote service to (re)load its quotes
    LoadQuotes,
    /// Play the quote guessing game
    Play,
}

impl CliConfig {
    /// 預設值 ← 設定檔 ← 命令列參數
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading config file {}", path.display());
            TomlConfig::from_file(path)?.apply_to(&mut settings);
        }

        if let Some(endpoint) = &self.symptoms_endpoint {
            settings.symptoms_endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &self.quotes_endpoint {
            settings.quotes_endpoint = endpoint.clone();
        }
        if let Some(csv) = &self.catalog_csv {
            settings.catalog_csv = Some(csv.clone());
        }
        if let Some(secs) = self.timeout {
            settings.request_timeout = Duration::from_secs(secs);
        }

        Ok(settings)
    }
}
