pub mod avatar;
pub mod catalog;
pub mod controller;
pub mod game;
pub mod symptoms;
pub mod timer;

pub use crate::domain::model::{AnalysisPage, AuthorImage, Hint, HintTier, LoadSummary, Quote};
pub use crate::domain::ports::{
    AnalysisBackend, ConfigProvider, ImageProbe, QuoteService, SymptomCatalog,
};
pub use crate::utils::error::Result;
