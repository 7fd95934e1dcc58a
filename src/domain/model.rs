use serde::{Deserialize, Serialize};
use std::fmt;

/// 一則待猜的名言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
    #[serde(default)]
    pub bio_link: String,
}

/// 提示層級，依固定順序揭露
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintTier {
    Birth,
    FirstName,
    LastName,
}

impl HintTier {
    pub const ORDER: [HintTier; 3] = [HintTier::Birth, HintTier::FirstName, HintTier::LastName];

    /// 剩餘次數降到這個值時揭露此層提示
    pub fn threshold(self) -> u8 {
        match self {
            HintTier::Birth => 3,
            HintTier::FirstName => 2,
            HintTier::LastName => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HintTier::Birth => "birth",
            HintTier::FirstName => "first_name",
            HintTier::LastName => "last_name",
        }
    }
}

impl fmt::Display for HintTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub tier: HintTier,
    pub text: String,
}

/// 作者圖片的來源
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AuthorImage {
    Remote(String),
    Initials(String),
}

impl AuthorImage {
    pub fn url(&self) -> &str {
        match self {
            AuthorImage::Remote(url) | AuthorImage::Initials(url) => url,
        }
    }
}

/// 表單送出後伺服器渲染的結果頁
#[derive(Debug, Clone)]
pub struct AnalysisPage {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub message: String,
    pub count: u64,
}

// 以下為 quote 服務的 JSON 格式

#[derive(Debug, Clone, Deserialize)]
pub struct LoadQuotesReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGameReply {
    pub success: bool,
    #[serde(default)]
    pub quote: Option<Quote>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckAnswerRequest<'a> {
    pub answer: &'a str,
    pub author: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckAnswerReply {
    pub success: bool,
    #[serde(default)]
    pub correct: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HintReply {
    pub success: bool,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageReply {
    pub success: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
