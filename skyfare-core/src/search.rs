use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

use crate::flight::Flight;

/// Search criteria. Each field is optional; a blank field matches every flight.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct FlightSearchQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date: Option<NaiveDate>,
}

impl FlightSearchQuery {
    pub fn new(source: Option<&str>, destination: Option<&str>, date: Option<NaiveDate>) -> Self {
        let keep = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            source: keep(source),
            destination: keep(destination),
            date,
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.source.is_none() && self.destination.is_none() && self.date.is_none()
    }

    /// Exact match on source code, destination code and departure date.
    pub fn matches(&self, flight: &Flight) -> bool {
        self.source.as_deref().map_or(true, |s| flight.source == s)
            && self.destination.as_deref().map_or(true, |d| flight.destination == d)
            && self.date.map_or(true, |d| flight.departure_date == d)
    }
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
