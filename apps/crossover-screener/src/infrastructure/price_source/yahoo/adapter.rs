//! Yahoo chart adapter implementing `PriceSourcePort`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveTime};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Certificate, Client, StatusCode, Url};

use super::api_types::ChartResponse;
use super::error::YahooError;
use crate::application::ports::{PriceSourceError, PriceSourcePort};
use crate::config::PriceSourceConfig;
use crate::domain::{PriceSeries, RunWindow, TickerSymbol};

/// Longest error body kept in an error message.
const MAX_ERROR_BODY: usize = 256;

/// Price source backed by the Yahoo Finance chart API.
#[derive(Debug, Clone)]
pub struct YahooPriceSource {
    client: Client,
    base_url: Url,
}

impl YahooPriceSource {
    /// Build the adapter from configuration.
    pub fn new(config: &PriceSourceConfig) -> Result<Self, YahooError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| YahooError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(YahooError::InvalidBaseUrl {
                url: config.base_url.clone(),
                message: "URL cannot carry a path".to_string(),
            });
        }

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone());

        if let Some(path) = &config.ca_cert_path {
            let pem = std::fs::read(path).map_err(|e| YahooError::CaCertificate {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let cert = Certificate::from_pem(&pem).map_err(|e| YahooError::CaCertificate {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder.build().map_err(|e| YahooError::Client(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Chart endpoint for one symbol.
    fn chart_url(&self, ticker: &TickerSymbol) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart", ticker.as_str()]);
        }
        url
    }
}

/// Unix seconds at midnight UTC.
fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Query range covering every day of the window; `period2` is exclusive.
fn period_bounds(window: RunWindow) -> (i64, i64) {
    let end = window.end.checked_add_days(Days::new(1)).unwrap_or(window.end);
    (midnight_utc(window.start), midnight_utc(end))
}

fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

#[async_trait]
impl PriceSourcePort for YahooPriceSource {
    async fn fetch_daily_history(
        &self,
        ticker: &TickerSymbol,
        window: RunWindow,
    ) -> Result<PriceSeries, PriceSourceError> {
        let (period1, period2) = period_bounds(window);

        let response = self
            .client
            .get(self.chart_url(ticker))
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .map_err(|e| PriceSourceError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceSourceError::RateLimited {
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(PriceSourceError::NotFound {
                symbol: ticker.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PriceSourceError::Api {
                status: status.as_u16(),
                message: truncate(body),
            });
        }

        let body = response.text().await.map_err(|e| PriceSourceError::Network {
            message: e.to_string(),
        })?;
        let parsed: ChartResponse =
            serde_json::from_str(&body).map_err(|e| PriceSourceError::Parse {
                message: e.to_string(),
            })?;

        if let Some(error) = parsed.chart.error {
            return Err(PriceSourceError::Api {
                status: 0,
                message: format!("{}: {}", error.code, error.description),
            });
        }

        let series = parsed
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .map_or_else(PriceSeries::empty, |data| data.into_series());

        tracing::debug!(ticker = %ticker, rows = series.len(), "Chart fetched");

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> PriceSourceConfig {
        PriceSourceConfig {
            base_url: base_url.to_string(),
            ..PriceSourceConfig::default()
        }
    }

    #[test]
    fn chart_url_appends_symbol() {
        let source = YahooPriceSource::new(&config("https://query1.finance.yahoo.com")).unwrap();
        let url = source.chart_url(&TickerSymbol::parse("brk-b").unwrap());
        assert_eq!(
            url.as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/BRK-B"
        );
    }

    #[test]
    fn chart_url_keeps_base_path() {
        let source = YahooPriceSource::new(&config("http://localhost:8080/proxy/")).unwrap();
        let url = source.chart_url(&TickerSymbol::parse("AAPL").unwrap());
        assert_eq!(url.path(), "/proxy/v8/finance/chart/AAPL");
    }

    #[test]
    fn period_bounds_include_end_date() {
        let window = RunWindow {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        };
        let (period1, period2) = period_bounds(window);
        assert_eq!(period1, 1_704_067_200);
        assert_eq!(period2 - period1, 2 * 86_400);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = YahooPriceSource::new(&config("not a url")).unwrap_err();
        assert!(matches!(err, YahooError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn missing_ca_cert_is_rejected() {
        let config = PriceSourceConfig {
            ca_cert_path: Some("/nonexistent/ca.pem".into()),
            ..PriceSourceConfig::default()
        };
        let err = YahooPriceSource::new(&config).unwrap_err();
        assert!(matches!(err, YahooError::CaCertificate { .. }));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(1000);
        assert_eq!(truncate(body).len(), MAX_ERROR_BODY);
    }
}
