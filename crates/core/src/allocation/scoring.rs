use crate::domain::plan::InstrumentCandidate;
use crate::domain::profile::Trend;
use crate::ingest::types::close_values;
use crate::ingest::{PriceHistorySource, DEFAULT_LOOKBACK};
use crate::universe::display_code;
use futures::stream::{self, StreamExt};
use std::time::Duration;

pub const SHORT_WINDOW: usize = 20;
pub const LONG_WINDOW: usize = 60;

/// SMA20 must clear SMA60 by this band before a trend is called.
const TREND_BAND: f64 = 0.01;

const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ScoringOptions {
    pub lookback: String,
    /// Maximum number of in-flight price fetches.
    pub concurrency: usize,
    /// A fetch that exceeds this is scored as if no data were available. When unset, the
    /// source's own fetch budget applies, falling back to ten seconds.
    pub fetch_timeout: Option<Duration>,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: None,
        }
    }
}

impl ScoringOptions {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("SICUAN_LOOKBACK") {
            if !s.trim().is_empty() {
                out.lookback = s.trim().to_string();
            }
        }

        if let Ok(s) = std::env::var("SICUAN_FETCH_CONCURRENCY") {
            if let Ok(n) = s.parse::<usize>() {
                out.concurrency = n.max(1);
            }
        }

        if let Ok(s) = std::env::var("SICUAN_FETCH_TIMEOUT_SECS") {
            if let Ok(n) = s.parse::<u64>() {
                out.fetch_timeout = Some(Duration::from_secs(n));
            }
        }

        out
    }

    pub fn timeout_for(&self, source: &dyn PriceHistorySource) -> Duration {
        self.fetch_timeout
            .or_else(|| source.fetch_budget())
            .unwrap_or(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS))
    }
}

/// Short vs. long moving-average crossover with a 1% dead-band.
///
/// Returns `None` when the series is shorter than the long window.
pub fn classify_trend(closes: &[f64]) -> Option<Trend> {
    if closes.len() < LONG_WINDOW {
        return None;
    }

    let sma_short = sma(closes, SHORT_WINDOW);
    let sma_long = sma(closes, LONG_WINDOW);

    let trend = if sma_short > sma_long * (1.0 + TREND_BAND) {
        Trend::Uptrend
    } else if sma_short < sma_long * (1.0 - TREND_BAND) {
        Trend::Downtrend
    } else {
        Trend::Sideways
    };
    Some(trend)
}

/// Mean of the last `window` values. Caller guarantees `closes.len() >= window`.
pub(crate) fn sma(closes: &[f64], window: usize) -> f64 {
    let tail = &closes[closes.len() - window..];
    tail.iter().sum::<f64>() / window as f64
}

/// Scores one instrument from its closing prices.
///
/// Insufficient history is a neutral signal: sideways, price 0 and the lowest score tier.
pub fn score_history(code: &str, closes: &[f64], bonus: u32) -> InstrumentCandidate {
    let (trend, last_price, base) = match classify_trend(closes) {
        Some(trend) => {
            let last = closes.last().copied().unwrap_or_default();
            (trend, last.trunc() as i64, trend.base_score())
        }
        None => (Trend::Sideways, 0, 1),
    };

    InstrumentCandidate {
        code: display_code(code).to_string(),
        trend,
        last_price,
        score: base + bonus,
    }
}

/// Stable sort by score, highest first, keeping the first `top_n`.
pub fn rank_top(mut candidates: Vec<InstrumentCandidate>, top_n: usize) -> Vec<InstrumentCandidate> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(top_n);
    candidates
}

/// Scores every code and returns the best `top_n`.
///
/// Fetches run concurrently but results are consumed in `codes` order, so ties keep the
/// candidate-list order regardless of which fetch finished first.
pub async fn select_top(
    source: &dyn PriceHistorySource,
    codes: &[String],
    bonus: u32,
    top_n: usize,
    opts: &ScoringOptions,
) -> Vec<InstrumentCandidate> {
    let scored: Vec<InstrumentCandidate> = stream::iter(codes)
        .map(|code| fetch_and_score(source, code, bonus, opts))
        .buffered(opts.concurrency.max(1))
        .collect()
        .await;

    rank_top(scored, top_n)
}

async fn fetch_and_score(
    source: &dyn PriceHistorySource,
    code: &str,
    bonus: u32,
    opts: &ScoringOptions,
) -> InstrumentCandidate {
    let timeout = opts.timeout_for(source);
    let fetch = source.fetch_daily_closes(code, &opts.lookback);
    let closes = match tokio::time::timeout(timeout, fetch).await {
        Ok(Ok(series)) => close_values(&series),
        Ok(Err(err)) => {
            tracing::warn!(
                %code,
                provider = source.provider_name(),
                error = %err,
                "price history fetch failed; scoring as insufficient data"
            );
            Vec::new()
        }
        Err(_) => {
            tracing::warn!(
                %code,
                provider = source.provider_name(),
                ?timeout,
                "price history fetch timed out; scoring as insufficient data"
            );
            Vec::new()
        }
    };

    let candidate = score_history(code, &closes, bonus);
    tracing::debug!(
        %code,
        points = closes.len(),
        trend = ?candidate.trend,
        score = candidate.score,
        "scored instrument"
    );
    candidate
}
