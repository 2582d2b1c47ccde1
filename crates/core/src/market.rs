use crate::allocation::scoring::sma;
use crate::ingest::types::close_values;
use crate::ingest::PriceHistorySource;
use serde::{Deserialize, Serialize};

const SHORT_WINDOW: usize = 20;
const LONG_WINDOW: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketTrend {
    Uptrend,
    Downtrend,
    Sideways,
    InsufficientData,
    DataUnavailable,
    FetchError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSignal {
    pub name: String,
    pub code: String,
    pub trend: MarketTrend,
    pub confidence: Confidence,
}

/// Close/SMA20/SMA50 alignment for one ticker.
///
/// Both averages must be aligned with the latest close to call a direction with high confidence.
pub fn classify(closes: &[f64]) -> (MarketTrend, Confidence) {
    if closes.is_empty() {
        return (MarketTrend::DataUnavailable, Confidence::Low);
    }
    if closes.len() < LONG_WINDOW {
        return (MarketTrend::InsufficientData, Confidence::Low);
    }

    let last = closes[closes.len() - 1];
    let sma_short = sma(closes, SHORT_WINDOW);
    let sma_long = sma(closes, LONG_WINDOW);

    if last > sma_short && sma_short > sma_long {
        (MarketTrend::Uptrend, Confidence::High)
    } else if last < sma_short && sma_short < sma_long {
        (MarketTrend::Downtrend, Confidence::High)
    } else {
        (MarketTrend::Sideways, Confidence::Medium)
    }
}

/// Summarizes each `(name, code)` ticker in input order. Fetch failures are reported per
/// ticker and never abort the overview.
pub async fn market_overview(
    source: &dyn PriceHistorySource,
    tickers: &[(&str, &str)],
    lookback: &str,
) -> Vec<MarketSignal> {
    let mut out = Vec::with_capacity(tickers.len());
    for (name, code) in tickers {
        let (trend, confidence) = match source.fetch_daily_closes(code, lookback).await {
            Ok(series) => classify(&close_values(&series)),
            Err(err) => {
                tracing::warn!(%code, error = %err, "market overview fetch failed");
                (MarketTrend::FetchError, Confidence::Low)
            }
        };
        out.push(MarketSignal {
            name: name.to_string(),
            code: code.to_string(),
            trend,
            confidence,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::DailyClose;
    use crate::ingest::StaticPriceHistory;
    use chrono::NaiveDate;

    fn ramp(start: f64, step: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn rising_series_is_high_confidence_uptrend() {
        assert_eq!(
            classify(&ramp(100.0, 1.0, 60)),
            (MarketTrend::Uptrend, Confidence::High)
        );
    }

    #[test]
    fn falling_series_is_high_confidence_downtrend() {
        assert_eq!(
            classify(&ramp(200.0, -1.0, 60)),
            (MarketTrend::Downtrend, Confidence::High)
        );
    }

    #[test]
    fn mixed_alignment_is_sideways() {
        // Long rise then a sharp drop: close < SMA20 but SMA20 > SMA50.
        let mut v = ramp(100.0, 1.0, 59);
        v.push(100.0);
        assert_eq!(classify(&v), (MarketTrend::Sideways, Confidence::Medium));
    }

    #[test]
    fn short_or_empty_series() {
        assert_eq!(classify(&[]), (MarketTrend::DataUnavailable, Confidence::Low));
        assert_eq!(
            classify(&ramp(100.0, 1.0, 49)),
            (MarketTrend::InsufficientData, Confidence::Low)
        );
    }

    struct Broken;

    #[async_trait::async_trait]
    impl PriceHistorySource for Broken {
        fn provider_name(&self) -> &'static str {
            "broken"
        }

        async fn fetch_daily_closes(
            &self,
            _code: &str,
            _lookback: &str,
        ) -> anyhow::Result<Vec<DailyClose>> {
            anyhow::bail!("connection reset")
        }
    }

    #[tokio::test]
    async fn overview_keeps_ticker_order_and_reports_failures() {
        let last = NaiveDate::from_ymd_opt(2026, 1, 27).unwrap();
        let source = StaticPriceHistory::new().with_closes("BBCA.JK", last, &ramp(9000.0, 10.0, 60));
        let tickers = [("IHSG", "^JKSE"), ("BBCA", "BBCA.JK")];

        let out = market_overview(&source, &tickers, "6mo").await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "IHSG");
        assert_eq!(out[0].trend, MarketTrend::DataUnavailable);
        assert_eq!(out[1].trend, MarketTrend::Uptrend);

        let out = market_overview(&Broken, &tickers, "6mo").await;
        assert!(out
            .iter()
            .all(|s| s.trend == MarketTrend::FetchError && s.confidence == Confidence::Low));
    }
}
