//! Observation and station reference data

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Station code as stored alongside each observation (e.g. `USC00519281`)
pub type StationId = String;

/// A single dated measurement at a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub station_id: StationId,
    pub date: NaiveDate,
    /// Temperature in degrees Fahrenheit
    pub temperature: f64,
    /// Precipitation in inches, absent when the station did not report it
    pub precipitation: Option<f64>,
}

impl Observation {
    #[must_use]
    pub fn new(
        station_id: impl Into<StationId>,
        date: NaiveDate,
        temperature: f64,
        precipitation: Option<f64>,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            date,
            temperature,
            precipitation,
        }
    }
}

/// Weather station reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Station {
    pub id: i64,
    /// Station code, shared with `Observation::station_id`
    #[serde(rename = "station")]
    #[sqlx(rename = "station")]
    pub station_code: StationId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_serializes_with_reference_keys() {
        let station = Station {
            id: 1,
            station_code: "USC00519397".to_string(),
            name: "WAIKIKI 717.2, HI US".to_string(),
            latitude: 21.2716,
            longitude: -157.8168,
            elevation: 3.0,
        };

        let json = serde_json::to_value(&station).unwrap();
        assert_eq!(json["station"], "USC00519397");
        assert_eq!(json["id"], 1);
        assert!(json.get("station_code").is_none());
    }
}
