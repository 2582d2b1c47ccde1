use crate::config::Settings;
use crate::ingest::types::{DailyClose, DailyClosesResponse};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PATH: &str = "/v1/daily_closes";
const DEFAULT_RETRIES: u32 = 3;

/// Source of daily closing prices for a single instrument.
///
/// Implementations return the series in chronological order. An unknown instrument or an empty
/// window is an empty `Vec`, not an error.
#[async_trait::async_trait]
pub trait PriceHistorySource: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Longest a single `fetch_daily_closes` call can take, retries included, when known.
    fn fetch_budget(&self) -> Option<Duration> {
        None
    }

    async fn fetch_daily_closes(&self, code: &str, lookback: &str) -> Result<Vec<DailyClose>>;
}

#[derive(Debug, Clone)]
pub struct HttpJsonPriceHistory {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    path: String,
    timeout: Duration,
    retries: u32,
}

impl HttpJsonPriceHistory {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_price_provider_base_url()?.to_string();
        let api_key = settings.price_provider_api_key.clone();

        let timeout_secs = std::env::var("PRICE_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("PRICE_PROVIDER_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES);

        let path = std::env::var("PRICE_PROVIDER_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        let timeout = Duration::from_secs(timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build price provider http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            path,
            timeout,
            retries,
        })
    }

    fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn fetch_once(&self, code: &str, lookback: &str) -> Result<DailyClosesResponse> {
        let res = self
            .http
            .get(self.url())
            .headers(self.headers()?)
            .query(&[("symbol", code), ("range", lookback), ("interval", "1d")])
            .send()
            .await
            .context("price provider request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read price provider response")?;
        let raw_json = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("price provider response is not valid JSON: {text}"))?;

        if !status.is_success() {
            anyhow::bail!("price provider HTTP {status}: {raw_json}");
        }

        serde_json::from_value::<DailyClosesResponse>(raw_json)
            .context("failed to parse price provider response into DailyClosesResponse")
    }
}

#[async_trait::async_trait]
impl PriceHistorySource for HttpJsonPriceHistory {
    fn provider_name(&self) -> &'static str {
        "external_http_json"
    }

    fn fetch_budget(&self) -> Option<Duration> {
        let attempts = self.retries.max(1);
        let waits = (1..attempts).fold(Duration::ZERO, |acc, attempt| {
            acc.saturating_add(backoff_after(attempt))
        });
        Some(self.timeout.saturating_mul(attempts).saturating_add(waits))
    }

    async fn fetch_daily_closes(&self, code: &str, lookback: &str) -> Result<Vec<DailyClose>> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(code, lookback).await {
                Ok(parsed) => {
                    validate(&parsed, code)?;
                    return Ok(parsed.closes);
                }
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = backoff_after(attempt);
                    tracing::warn!(attempt, ?backoff, %code, error = %err, "price history fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

/// 1s, 2s, 4s, ... after the given failed attempt.
fn backoff_after(attempt: u32) -> Duration {
    let secs = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    Duration::from_secs(secs)
}

fn validate(resp: &DailyClosesResponse, expected: &str) -> Result<()> {
    anyhow::ensure!(
        resp.symbol == expected,
        "price provider symbol mismatch: expected {expected}, got {}",
        resp.symbol
    );

    for pair in resp.closes.windows(2) {
        anyhow::ensure!(
            pair[0].date <= pair[1].date,
            "price history for {expected} is not chronological ({} after {})",
            pair[1].date,
            pair[0].date
        );
    }

    Ok(())
}
