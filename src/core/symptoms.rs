use crate::core::{AnalysisBackend, AnalysisPage, SymptomCatalog};
use crate::utils::error::Result;
use thiserror::Error;

pub const MAX_SELECTED_SYMPTOMS: usize = 10;

/// 表單欄位名稱，每個症狀各送一次
pub const SYMPTOM_FIELD: &str = "symptoms";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymptomRejection {
    #[error("symptom name is empty")]
    Empty,

    #[error("'{0}' is already selected")]
    AlreadySelected(String),

    #[error("at most {limit} symptoms can be selected")]
    LimitReached { limit: usize },

    #[error("select at least one symptom before submitting")]
    NothingSelected,
}

/// 已選症狀：不重複、最多 10 筆、保留加入順序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomSet {
    items: Vec<String>,
}

impl SymptomSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, symptom: &str) -> std::result::Result<(), SymptomRejection> {
        let symptom = symptom.trim();
        if symptom.is_empty() {
            return Err(SymptomRejection::Empty);
        }
        if self.contains(symptom) {
            return Err(SymptomRejection::AlreadySelected(symptom.to_string()));
        }
        if self.items.len() >= MAX_SELECTED_SYMPTOMS {
            return Err(SymptomRejection::LimitReached {
                limit: MAX_SELECTED_SYMPTOMS,
            });
        }
        self.items.push(symptom.to_string());
        Ok(())
    }

    pub fn remove(&mut self, symptom: &str) -> bool {
        let symptom = symptom.trim();
        let before = self.items.len();
        self.items.retain(|s| s != symptom);
        self.items.len() != before
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.items.iter().any(|s| s == symptom)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_SELECTED_SYMPTOMS
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// 每個症狀一組 `symptoms=<name>` 欄位
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        self.iter().map(|s| (SYMPTOM_FIELD, s)).collect()
    }

    /// 舊版頁面隱藏欄位 `selected_symptoms` 的值
    pub fn joined(&self) -> String {
        self.items.join(",")
    }
}

/// 從搜尋結果中排除已選的症狀，保留原順序
pub fn selectable<'a>(results: &'a [String], selected: &SymptomSet) -> Vec<&'a str> {
    results
        .iter()
        .map(String::as_str)
        .filter(|s| !selected.contains(s))
        .collect()
}

/// 症狀選擇器：持有已選集合與最後一次搜尋結果
pub struct SymptomSelector<C: SymptomCatalog, B: AnalysisBackend> {
    catalog: C,
    backend: B,
    selected: SymptomSet,
    last_results: Vec<String>,
}

impl<C: SymptomCatalog, B: AnalysisBackend> SymptomSelector<C, B> {
    pub fn new(catalog: C, backend: B) -> Self {
        Self {
            catalog,
            backend,
            selected: SymptomSet::new(),
            last_results: Vec::new(),
        }
    }

    pub fn selected(&self) -> &SymptomSet {
        &self.selected
    }

    /// 目前可選的選項（最後一次搜尋結果扣掉已選）
    pub fn options(&self) -> Vec<&str> {
        selectable(&self.last_results, &self.selected)
    }

    /// 搜尋失敗時保留上一次的結果
    pub async fn search(&mut self, query: &str) -> Result<Vec<&str>> {
        tracing::debug!("Searching symptom catalog for '{}'", query);
        let results = self.catalog.search(query).await?;
        tracing::debug!("Catalog returned {} symptoms", results.len());
        self.last_results = results;
        Ok(self.options())
    }

    pub fn add(&mut self, symptom: &str) -> Result<()> {
        if let Err(rejection) = self.selected.add(symptom) {
            tracing::warn!("Symptom not added: {}", rejection);
            return Err(rejection.into());
        }
        tracing::debug!("Selected {} symptoms", self.selected.len());
        Ok(())
    }

    pub fn remove(&mut self, symptom: &str) -> bool {
        self.selected.remove(symptom)
    }

    /// 沒有選任何症狀時不會送出
    pub async fn submit(&self) -> Result<AnalysisPage> {
        if self.selected.is_empty() {
            tracing::warn!("Submit blocked: no symptoms selected");
            return Err(SymptomRejection::NothingSelected.into());
        }
        tracing::info!("Submitting {} symptoms for analysis", self.selected.len());
        self.backend.submit(self.selected.as_slice()).await
    }
}
