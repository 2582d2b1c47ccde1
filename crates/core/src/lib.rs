pub mod allocation;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod market;
pub mod universe;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub price_provider_base_url: Option<String>,
        pub price_provider_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                price_provider_base_url: std::env::var("PRICE_PROVIDER_BASE_URL").ok(),
                price_provider_api_key: std::env::var("PRICE_PROVIDER_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_price_provider_base_url(&self) -> anyhow::Result<&str> {
            self.price_provider_base_url
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .context("PRICE_PROVIDER_BASE_URL is required")
        }
    }

}
