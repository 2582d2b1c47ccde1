use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyClosesResponse {
    pub symbol: String,
    #[serde(default)]
    pub closes: Vec<DailyClose>,
}

/// Closing prices in the order given; the series is expected to be chronological already.
pub fn close_values(series: &[DailyClose]) -> Vec<f64> {
    series.iter().map(|c| c.close).collect()
}
