pub mod provider;
pub mod static_source;
pub mod types;

pub use provider::{HttpJsonPriceHistory, PriceHistorySource};
pub use static_source::StaticPriceHistory;
pub use types::DailyClose;

/// Default history window requested per instrument.
pub const DEFAULT_LOOKBACK: &str = "6mo";
