pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{HttpImageProbe, HttpQuoteService, HttpSymptomService};
pub use config::{Settings, TomlConfig};
pub use core::avatar::ImageResolver;
pub use core::catalog::StaticCatalog;
pub use core::controller::GameController;
pub use core::symptoms::{SymptomSelector, SymptomSet};
pub use utils::error::{AppError, Result};
