use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::weather_code;

/// Weather-type sentinel for hour entries that carry no `W` value.
pub const UNKNOWN_WEATHER_TYPE: u8 = 33;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// The two endpoint families. Each has its own site list, so site ids are
/// never shared between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Observation,
    Forecast,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Observation => "observation",
            RequestKind::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reporting site from one of the site lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: u32,
    pub name: String,
    /// Unitary authority area; empty when the site list omits it.
    pub area: String,
    pub coordinate: Coordinate,
}

impl Site {
    /// "Name, Area", or just the name when there is no area.
    pub fn display_name(&self) -> String {
        if self.area.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.area)
        }
    }
}

/// Latest hourly observation. Values are kept as the API sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub temperature: String,
    pub visibility: String,
    pub wind_direction: String,
    pub wind_speed: String,
    pub wind_gust: String,
    pub weather_type: u8,
    pub pressure: String,
    pub pressure_tendency: String,
    pub dew_point: String,
    pub humidity: String,
}

impl Observation {
    pub fn weather_description(&self) -> &'static str {
        weather_code::describe(self.weather_type)
    }
}

/// One three-hourly forecast slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub feels_like: String,
    pub wind_gust: String,
    pub humidity: String,
    pub temperature: String,
    pub visibility: String,
    pub wind_direction: String,
    pub wind_speed: String,
    pub uv_index: String,
    pub weather_type: u8,
    pub precipitation_probability: String,
    pub minutes_since_midnight: String,
}

impl ForecastEntry {
    pub fn weather_description(&self) -> &'static str {
        weather_code::describe(self.weather_type)
    }

    /// Slot start as a wall-clock time, if `minutes_since_midnight` is usable.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        let minutes: u32 = self.minutes_since_midnight.trim().parse().ok()?;
        NaiveTime::from_num_seconds_from_midnight_opt(minutes.checked_mul(60)?, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationReport {
    pub site: Site,
    pub observation: Observation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub site: Site,
    pub entries: Vec<ForecastEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(minutes: &str) -> ForecastEntry {
        ForecastEntry {
            feels_like: String::new(),
            wind_gust: String::new(),
            humidity: String::new(),
            temperature: String::new(),
            visibility: String::new(),
            wind_direction: String::new(),
            wind_speed: String::new(),
            uv_index: String::new(),
            weather_type: UNKNOWN_WEATHER_TYPE,
            precipitation_probability: String::new(),
            minutes_since_midnight: minutes.to_string(),
        }
    }

    #[test]
    fn time_of_day_from_minutes() {
        let t = entry_at("180").time_of_day().expect("valid time");
        assert_eq!(t, NaiveTime::from_hms_opt(3, 0, 0).expect("valid"));

        let t = entry_at("1260").time_of_day().expect("valid time");
        assert_eq!(t.format("%H:%M").to_string(), "21:00");
    }

    #[test]
    fn time_of_day_rejects_garbage() {
        assert!(entry_at("").time_of_day().is_none());
        assert!(entry_at("noon").time_of_day().is_none());
        assert!(entry_at("1440").time_of_day().is_none());
    }

    #[test]
    fn site_display_name_omits_empty_area() {
        let mut site = Site {
            id: 3772,
            name: "Heathrow".into(),
            area: String::new(),
            coordinate: Coordinate::new(51.479, -0.449),
        };
        assert_eq!(site.display_name(), "Heathrow");

        site.area = "Greater London".into();
        assert_eq!(site.display_name(), "Heathrow, Greater London");
    }
}
