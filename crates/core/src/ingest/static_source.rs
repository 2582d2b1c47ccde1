use crate::ingest::provider::PriceHistorySource;
use crate::ingest::types::DailyClose;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;

/// In-memory price history, keyed by instrument code.
///
/// Used for offline runs (loaded from a JSON file) and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceHistory {
    series: BTreeMap<String, Vec<DailyClose>>,
}

impl StaticPriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `{ "CODE.JK": [{"date": "YYYY-MM-DD", "close": 1.0}, ...], ... }`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read price file {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("invalid price file {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut series: BTreeMap<String, Vec<DailyClose>> =
            serde_json::from_str(text).context("price file is not a code -> closes map")?;
        for closes in series.values_mut() {
            closes.sort_by_key(|c| c.date);
        }
        Ok(Self { series })
    }

    pub fn insert(&mut self, code: impl Into<String>, closes: Vec<DailyClose>) {
        self.series.insert(code.into(), closes);
    }

    /// Registers a series of consecutive daily closes ending on `last_date`.
    pub fn with_closes(mut self, code: &str, last_date: NaiveDate, closes: &[f64]) -> Self {
        let n = closes.len() as i64;
        let series = closes
            .iter()
            .enumerate()
            .map(|(i, close)| DailyClose {
                date: last_date - chrono::Duration::days(n - 1 - i as i64),
                close: *close,
            })
            .collect();
        self.insert(code, series);
        self
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[async_trait::async_trait]
impl PriceHistorySource for StaticPriceHistory {
    fn provider_name(&self) -> &'static str {
        "static"
    }

    async fn fetch_daily_closes(&self, code: &str, _lookback: &str) -> Result<Vec<DailyClose>> {
        Ok(self.series.get(code).cloned().unwrap_or_default())
    }
}
