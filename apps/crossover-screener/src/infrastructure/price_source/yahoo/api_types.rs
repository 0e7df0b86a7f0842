//! Yahoo chart API response types.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::domain::{PricePoint, PriceSeries};

/// Top-level chart response.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

/// Chart envelope: either results or an error.
#[derive(Debug, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartData>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

/// Provider-reported error.
#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// One symbol's bars.
#[derive(Debug, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    #[serde(default)]
    pub indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Option<Vec<Option<f64>>>,
}

impl ChartData {
    /// Convert to a price series.
    ///
    /// Adjusted closes win over raw closes when both line up with the
    /// timestamps. Missing arrays yield an empty series.
    pub fn into_series(self) -> PriceSeries {
        let Some(timestamps) = self.timestamp else {
            return PriceSeries::empty();
        };
        let Some(indicators) = self.indicators else {
            return PriceSeries::empty();
        };

        let adjusted = indicators
            .adjclose
            .and_then(|a| a.into_iter().next())
            .and_then(|a| a.adjclose)
            .filter(|closes| closes.len() == timestamps.len());
        let raw = indicators.quote.into_iter().next().and_then(|q| q.close);

        let Some(closes) = adjusted.or(raw) else {
            return PriceSeries::empty();
        };

        let points = timestamps
            .iter()
            .zip(closes)
            .filter_map(|(&ts, close)| Some(PricePoint::new(trading_day(ts)?, close?)))
            .collect();

        PriceSeries::new(points)
    }
}

fn trading_day(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_closes_and_skips_nulls() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704205800, 1704292200, 1704378600],
                    "indicators": {"quote": [{"close": [185.64, null, 181.91]}]}
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let data = response.chart.result.unwrap().into_iter().next().unwrap();
        let series = data.into_series();

        assert_eq!(series.closes(), vec![185.64, 181.91]);
        assert_eq!(
            series.points()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn prefers_adjusted_closes() {
        let json = r#"{
            "timestamp": [1704205800, 1704292200],
            "indicators": {
                "quote": [{"close": [10.0, 11.0]}],
                "adjclose": [{"adjclose": [9.5, 10.5]}]
            }
        }"#;

        let data: ChartData = serde_json::from_str(json).unwrap();
        assert_eq!(data.into_series().closes(), vec![9.5, 10.5]);
    }

    #[test]
    fn missing_timestamps_is_empty() {
        let data: ChartData =
            serde_json::from_str(r#"{"indicators": {"quote": [{}]}}"#).unwrap();
        assert!(data.into_series().is_empty());
    }

    #[test]
    fn missing_close_is_empty() {
        let data: ChartData =
            serde_json::from_str(r#"{"timestamp": [1704205800], "indicators": {"quote": [{}]}}"#)
                .unwrap();
        assert!(data.into_series().is_empty());
    }
}
