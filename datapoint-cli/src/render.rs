use std::fmt::{self, Write};

use chrono::NaiveTime;
use datapoint_core::{ForecastReport, ObservationReport};

const SPACER: &str = "  |  ";

/// Three-hour slots needed to cover `hours`.
pub fn slots_for_hours(hours: u32) -> usize {
    hours.div_ceil(3) as usize
}

pub fn observation(out: &mut impl Write, report: &ObservationReport) -> fmt::Result {
    let o = &report.observation;

    writeln!(out, "*** Current Observation ***")?;
    writeln!(out, "Site Name: {}", report.site.display_name())?;
    writeln!(out, "Weather Type: {}{SPACER}Temperature: {}c", o.weather_description(), o.temperature)?;
    writeln!(
        out,
        "Wind Speed: {}mph{SPACER}Wind Direction: {}{SPACER}Wind Gust: {}mph",
        o.wind_speed, o.wind_direction, o.wind_gust
    )?;
    writeln!(
        out,
        "Visibility: {} meters{SPACER}Pressure: {}hPa{SPACER}Pressure Tendency: {}",
        o.visibility, o.pressure, o.pressure_tendency
    )?;
    writeln!(out, "Dew Point: {}c{SPACER}Humidity: {}%", o.dew_point, o.humidity)
}

pub fn forecast(out: &mut impl Write, report: &ForecastReport, slots: usize) -> fmt::Result {
    writeln!(out, "*** 3 Hourly Weather Forecast ***")?;
    writeln!(out, "Site Name: {}", report.site.display_name())?;

    for (i, entry) in report.entries.iter().take(slots).enumerate() {
        let time = entry.time_of_day();
        if i > 0 && time == NaiveTime::from_hms_opt(0, 0, 0) {
            writeln!(out, "Tomorrow")?;
        }

        match time {
            Some(t) => writeln!(out, "Time: {}", t.format("%H:%M"))?,
            None => writeln!(out, "Time: unknown")?,
        }
        writeln!(
            out,
            "Weather Type: {}{SPACER}Precipitation Probability: {}%",
            entry.weather_description(),
            entry.precipitation_probability
        )?;
        writeln!(out, "Temperature: {}c{SPACER}Feels Like: {}c", entry.temperature, entry.feels_like)?;
        writeln!(
            out,
            "Wind Speed: {}mph{SPACER}Wind Direction: {}{SPACER}Wind Gust: {}mph",
            entry.wind_speed, entry.wind_direction, entry.wind_gust
        )?;
        writeln!(
            out,
            "Humidity: {}%{SPACER}Visibility: {}{SPACER}UV Level: {}",
            entry.humidity, entry.visibility, entry.uv_index
        )?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use datapoint_core::{Coordinate, ForecastEntry, Observation, Site, UNKNOWN_WEATHER_TYPE};

    fn site(area: &str) -> Site {
        Site {
            id: 310004,
            name: "Norwich".into(),
            area: area.into(),
            coordinate: Coordinate::new(52.63, 1.3),
        }
    }

    fn slot(minutes: &str, temp: &str) -> ForecastEntry {
        ForecastEntry {
            feels_like: "5".into(),
            wind_gust: "20".into(),
            humidity: "80".into(),
            temperature: temp.into(),
            visibility: "GO".into(),
            wind_direction: "W".into(),
            wind_speed: "9".into(),
            uv_index: "1".into(),
            weather_type: 7,
            precipitation_probability: "10".into(),
            minutes_since_midnight: minutes.into(),
        }
    }

    #[test]
    fn slots_round_up_to_three_hours() {
        assert_eq!(slots_for_hours(24), 8);
        assert_eq!(slots_for_hours(10), 4);
        assert_eq!(slots_for_hours(0), 0);
    }

    #[test]
    fn observation_lists_site_and_fields() {
        let report = ObservationReport {
            site: site("Norfolk"),
            observation: Observation {
                temperature: "11.2".into(),
                visibility: "25000".into(),
                wind_direction: "SW".into(),
                wind_speed: "8".into(),
                wind_gust: "8".into(),
                weather_type: UNKNOWN_WEATHER_TYPE,
                pressure: "1015".into(),
                pressure_tendency: "R".into(),
                dew_point: "9.0".into(),
                humidity: "88.1".into(),
            },
        };
        let mut text = String::new();
        observation(&mut text, &report).expect("render");
        assert!(text.contains("Site Name: Norwich, Norfolk"));
        assert!(text.contains("Weather Type: Unknown"));
        assert!(text.contains("Temperature: 11.2c"));
        assert!(text.contains("Humidity: 88.1%"));
    }

    #[test]
    fn forecast_marks_day_rollover() {
        let report = ForecastReport {
            site: site(""),
            entries: vec![slot("1260", "8"), slot("0", "6"), slot("180", "5")],
        };
        let mut text = String::new();
        forecast(&mut text, &report, 2).expect("render");
        assert!(text.contains("Site Name: Norwich\n"));
        assert!(text.contains("Time: 21:00"));
        assert!(text.contains("Tomorrow\nTime: 00:00"));
        assert!(!text.contains("03:00"));
        assert!(text.contains("Weather Type: Cloudy"));
    }

    #[test]
    fn forecast_with_no_slots_prints_only_header() {
        let report = ForecastReport {
            site: site("Norfolk"),
            entries: vec![slot("0", "6")],
        };
        let mut text = String::new();
        forecast(&mut text, &report, 0).expect("render");
        assert_eq!(text, "*** 3 Hourly Weather Forecast ***\nSite Name: Norwich, Norfolk\n");
    }
}
