use crate::core::symptoms::SYMPTOM_FIELD;
use crate::core::{
    AnalysisBackend, AnalysisPage, ConfigProvider, HintTier, ImageProbe, LoadSummary, Quote,
    QuoteService, SymptomCatalog,
};
use crate::domain::model::{
    CheckAnswerReply, CheckAnswerRequest, HintReply, ImageReply, LoadQuotesReply, NewGameReply,
};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// 把路徑接在 endpoint 後面，保留 endpoint 原本的路徑前綴
pub fn endpoint_url(base: &str, path: &str) -> Result<Url> {
    let mut base = Url::parse(base)?;
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

async fn read_json<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
    let status = response.status();
    tracing::debug!("{} responded with {}", endpoint, status);
    if !status.is_success() {
        return Err(AppError::HttpStatusError {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn unsuccessful(endpoint: &str, error: Option<String>) -> AppError {
    AppError::ServiceError {
        endpoint: endpoint.to_string(),
        message: error.unwrap_or_else(|| "request was not successful".to_string()),
    }
}

fn missing(endpoint: &str, field: &str) -> AppError {
    AppError::ServiceError {
        endpoint: endpoint.to_string(),
        message: format!("reply is missing '{}'", field),
    }
}

/// 症狀目錄與分析表單（同一個服務）
#[derive(Debug, Clone)]
pub struct HttpSymptomService {
    client: Client,
    endpoint: String,
    form_action: String,
}

impl HttpSymptomService {
    pub fn new(client: Client, endpoint: impl Into<String>, form_action: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            form_action: form_action.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self::new(
            build_client(config.request_timeout())?,
            config.symptoms_endpoint(),
            config.form_action(),
        ))
    }
}

#[async_trait]
impl SymptomCatalog for HttpSymptomService {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let url = endpoint_url(&self.endpoint, "/search")?;
        tracing::debug!("GET {} query='{}'", url, query);
        let response = self
            .client
            .get(url)
            .query(&[("query", query)])
            .send()
            .await?;
        read_json("/search", response).await
    }
}

#[async_trait]
impl AnalysisBackend for HttpSymptomService {
    async fn submit(&self, symptoms: &[String]) -> Result<AnalysisPage> {
        let url = endpoint_url(&self.endpoint, &self.form_action)?;
        let fields: Vec<(&str, &str)> = symptoms
            .iter()
            .map(|s| (SYMPTOM_FIELD, s.as_str()))
            .collect();
        tracing::debug!("POST {} with {} symptoms", url, fields.len());

        let response = self.client.post(url).form(&fields).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatusError {
                endpoint: self.form_action.clone(),
                status: status.as_u16(),
            });
        }
        Ok(AnalysisPage {
            status: status.as_u16(),
            body: response.text().await?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpQuoteService {
    client: Client,
    endpoint: String,
}

impl HttpQuoteService {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self::new(
            build_client(config.request_timeout())?,
            config.quotes_endpoint(),
        ))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = endpoint_url(&self.endpoint, path)?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;
        read_json(path, response).await
    }
}

#[async_trait]
impl QuoteService for HttpQuoteService {
    async fn load_quotes(&self) -> Result<LoadSummary> {
        const PATH: &str = "/api/load-quotes";
        let reply: LoadQuotesReply = self.get(PATH, &[]).await?;
        if !reply.success {
            return Err(unsuccessful(PATH, reply.error));
        }
        Ok(LoadSummary {
            message: reply.message.unwrap_or_default(),
            count: reply.count.unwrap_or(0),
        })
    }

    async fn new_game(&self) -> Result<Quote> {
        const PATH: &str = "/api/new-game";
        let reply: NewGameReply = self.get(PATH, &[]).await?;
        if !reply.success {
            return Err(unsuccessful(PATH, reply.error));
        }
        reply.quote.ok_or_else(|| missing(PATH, "quote"))
    }

    async fn check_answer(&self, answer: &str, author: &str) -> Result<bool> {
        const PATH: &str = "/api/check-answer";
        let url = endpoint_url(&self.endpoint, PATH)?;
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(&CheckAnswerRequest { answer, author })
            .send()
            .await?;
        let reply: CheckAnswerReply = read_json(PATH, response).await?;
        if !reply.success {
            return Err(unsuccessful(PATH, reply.error));
        }
        reply.correct.ok_or_else(|| missing(PATH, "correct"))
    }

    async fn get_hint(&self, tier: HintTier, author: &str, bio_link: &str) -> Result<String> {
        const PATH: &str = "/api/get-hint";
        let reply: HintReply = self
            .get(
                PATH,
                &[("type", tier.as_str()), ("author", author), ("bio_link", bio_link)],
            )
            .await?;
        if !reply.success {
            return Err(unsuccessful(PATH, reply.error));
        }
        reply.hint.ok_or_else(|| missing(PATH, "hint"))
    }

    async fn get_image(&self, author: &str) -> Result<String> {
        const PATH: &str = "/api/get-image";
        let reply: ImageReply = self.get(PATH, &[("author", author)]).await?;
        if !reply.success {
            return Err(unsuccessful(PATH, reply.error));
        }
        Ok(reply.image_url.unwrap_or_default())
    }
}

/// 實際下載圖片，確認狀態碼與 content-type
#[derive(Debug, Clone)]
pub struct HttpImageProbe {
    client: Client,
}

impl HttpImageProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn probe(&self, url: &str) -> Result<()> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatusError {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if let Some(content_type) = content_type {
            if !content_type.starts_with("image/") {
                return Err(AppError::ServiceError {
                    endpoint: url.to_string(),
                    message: format!("expected an image, got {}", content_type),
                });
            }
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Loaded image {} ({} bytes)", url, bytes.len());
        Ok(())
    }
}
