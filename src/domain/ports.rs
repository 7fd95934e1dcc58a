use crate::domain::model::{AnalysisPage, HintTier, LoadSummary, Quote};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 症狀目錄：依關鍵字回傳症狀名稱
#[async_trait]
pub trait SymptomCatalog: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: SymptomCatalog + ?Sized> SymptomCatalog for Box<T> {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        (**self).search(query).await
    }
}

/// 接收 `symptoms` 表單的分析後端
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn submit(&self, symptoms: &[String]) -> Result<AnalysisPage>;
}

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn load_quotes(&self) -> Result<LoadSummary>;
    async fn new_game(&self) -> Result<Quote>;
    async fn check_answer(&self, answer: &str, author: &str) -> Result<bool>;
    async fn get_hint(&self, tier: HintTier, author: &str, bio_link: &str) -> Result<String>;
    async fn get_image(&self, author: &str) -> Result<String>;
}

/// 確認圖片網址真的載得到
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn symptoms_endpoint(&self) -> &str;
    fn form_action(&self) -> &str;
    fn quotes_endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn image_timeout(&self) -> Duration;
    fn search_debounce(&self) -> Duration;
    fn avatar_template(&self) -> &str;
}
