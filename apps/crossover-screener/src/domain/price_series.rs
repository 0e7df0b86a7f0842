//! Daily close history for a single symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily bar reduced to what the crossover needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
}

impl PricePoint {
    /// Create a new price point.
    #[must_use]
    pub const fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Time-ordered closing prices for one symbol over a lookback window.
///
/// Rows without a usable close (missing or non-finite) are dropped at
/// construction, so every remaining row is valid. An empty series means
/// "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw points, sorting by date and dropping
    /// unusable closes. Later duplicates of a date replace earlier ones.
    #[must_use]
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite());
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self { points: deduped }
    }

    /// Build a series from closes on consecutive calendar days starting at `start`.
    #[must_use]
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Self {
        let points = closes
            .iter()
            .zip(start.iter_days())
            .map(|(&close, date)| PricePoint::new(date, close))
            .collect();
        Self::new(points)
    }

    /// An empty series.
    #[must_use]
    pub const fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Number of valid rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series carries no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All rows in date order.
    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Closing prices in date order.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// First and last dates covered, if any.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn new_sorts_by_date() {
        let series = PriceSeries::new(vec![
            PricePoint::new(day(3), 3.0),
            PricePoint::new(day(1), 1.0),
            PricePoint::new(day(2), 2.0),
        ]);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn new_drops_non_finite_closes() {
        let series = PriceSeries::new(vec![
            PricePoint::new(day(1), 1.0),
            PricePoint::new(day(2), f64::NAN),
            PricePoint::new(day(3), f64::INFINITY),
            PricePoint::new(day(4), 4.0),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.date_range(), Some((day(1), day(4))));
    }

    #[test]
    fn new_keeps_last_row_for_duplicate_dates() {
        let series = PriceSeries::new(vec![
            PricePoint::new(day(1), 1.0),
            PricePoint::new(day(1), 1.5),
        ]);
        assert_eq!(series.closes(), vec![1.5]);
    }

    #[test]
    fn from_closes_uses_consecutive_days() {
        let series = PriceSeries::from_closes(day(1), &[10.0, 11.0, 12.0]);
        assert_eq!(series.date_range(), Some((day(1), day(3))));
    }

    #[test]
    fn empty_series() {
        let series = PriceSeries::empty();
        assert!(series.is_empty());
        assert!(series.date_range().is_none());
    }
}
