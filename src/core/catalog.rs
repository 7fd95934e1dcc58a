use crate::core::SymptomCatalog;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use std::path::Path;

/// 本地症狀目錄，搜尋規則與遠端 `/search` 相同
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    symptoms: Vec<String>,
}

impl StaticCatalog {
    pub fn new(symptoms: Vec<String>) -> Self {
        Self { symptoms }
    }

    /// 從訓練資料的 CSV 標頭建立目錄，最後一欄（prognosis）不是症狀
    pub fn from_training_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers()?.clone();

        let columns: Vec<&str> = headers.iter().collect();
        let Some((_label, features)) = columns.split_last() else {
            return Err(AppError::ConfigError {
                message: "catalog CSV has no header row".to_string(),
            });
        };

        let symptoms: Vec<String> = features
            .iter()
            .filter(|c| !c.trim().is_empty())
            .map(|c| display_name(c))
            .collect();

        let catalog = Self::new(symptoms);
        if catalog.is_empty() {
            tracing::warn!("⚠️ Catalog CSV has no symptom columns");
        } else {
            tracing::info!("📋 Loaded {} symptoms from catalog CSV", catalog.len());
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn filter(&self, query: &str) -> Vec<String> {
        if query.is_empty() {
            return self.symptoms.clone();
        }
        let query = query.to_lowercase();
        self.symptoms
            .iter()
            .filter(|s| s.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SymptomCatalog for StaticCatalog {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        Ok(self.filter(query))
    }
}

/// `skin_rash` → `Skin Rash`
pub fn display_name(column: &str) -> String {
    title_case(&column.replace('_', " "))
}

/// 非字母後的第一個字母大寫，其餘字母小寫
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}
