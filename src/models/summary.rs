//! Date ranges, dataset bounds and per-day temperature aggregates

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Latest date for which the observation dataset holds records
pub const LATEST_KNOWN_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2017, 8, 23) {
    Some(date) => date,
    None => panic!("invalid latest known date"),
};

/// First date of the one-year analysis window ending at `LATEST_KNOWN_DATE`
pub const WINDOW_START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2016, 8, 23) {
    Some(date) => date,
    None => panic!("invalid window start date"),
};

/// Closed calendar-day interval with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, returning `None` when `start` is after `end`
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Range covering exactly one day
    #[must_use]
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the range, endpoints included
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days in the range, endpoints included
    #[must_use]
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every day of the range in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// Fixed bounds of the observation dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetBounds {
    /// First day of the fixed analysis window
    pub window_start: NaiveDate,
    /// No query may request dates after this day
    pub latest: NaiveDate,
}

impl Default for DatasetBounds {
    fn default() -> Self {
        Self {
            window_start: WINDOW_START_DATE,
            latest: LATEST_KNOWN_DATE,
        }
    }
}

impl DatasetBounds {
    /// The fixed analysis window `[window_start, latest]`
    #[must_use]
    pub fn window(&self) -> DateRange {
        DateRange::new(self.window_start, self.latest).unwrap_or(DateRange::single(self.latest))
    }
}

/// Minimum, mean and maximum temperature across all stations for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DailyTemperatureSummary {
    pub date: NaiveDate,
    pub low: f64,
    pub average: f64,
    pub high: f64,
}

impl DailyTemperatureSummary {
    /// Summarize a day's readings; `None` when there are none
    #[must_use]
    pub fn from_readings(date: NaiveDate, readings: &[f64]) -> Option<Self> {
        if readings.is_empty() {
            return None;
        }

        let low = readings.iter().copied().fold(f64::INFINITY, f64::min);
        let high = readings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let average = readings.iter().sum::<f64>() / readings.len() as f64;

        Some(Self {
            date,
            low,
            average,
            high,
        })
    }
}
