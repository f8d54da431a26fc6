//! Turns DataPoint JSON into [`Site`], [`Observation`] and [`ForecastEntry`]
//! records.
//!
//! DataPoint collapses single-element lists into bare objects (`Period`, `Rep`
//! and sometimes `Location`), so every list-valued field goes through
//! [`entries`].

use serde_json::Value;

use crate::{
    error::{DataPointError, Result},
    model::{Coordinate, ForecastEntry, Observation, Site, UNKNOWN_WEATHER_TYPE},
};

/// Upper bound on forecast slots returned by one fetch.
pub const MAX_FORECAST_ENTRIES: usize = 28;

/// View a list-or-object field as a slice. `null` is an empty slice.
pub fn entries(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        Value::Null => &[],
        other => std::slice::from_ref(other),
    }
}

fn text(node: &Value, key: &str) -> Option<String> {
    match node.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_or_empty(node: &Value, key: &str) -> String {
    text(node, key).unwrap_or_default()
}

fn weather_type(node: &Value) -> u8 {
    let Some(raw) = text(node, "W") else {
        return UNKNOWN_WEATHER_TYPE;
    };

    raw.trim().parse().unwrap_or_else(|_| {
        tracing::debug!(value = %raw, "unparseable weather type");
        UNKNOWN_WEATHER_TYPE
    })
}

/// Map one observation hour entry. A missing gust means "not gusty", so it
/// takes the wind speed.
pub fn map_observation(node: &Value) -> Observation {
    let wind_speed = text_or_empty(node, "S");
    let wind_gust = text(node, "G").unwrap_or_else(|| wind_speed.clone());

    Observation {
        temperature: text_or_empty(node, "T"),
        visibility: text_or_empty(node, "V"),
        wind_direction: text_or_empty(node, "D"),
        wind_speed,
        wind_gust,
        weather_type: weather_type(node),
        pressure: text_or_empty(node, "P"),
        pressure_tendency: text_or_empty(node, "Pt"),
        dew_point: text_or_empty(node, "Dp"),
        humidity: text_or_empty(node, "H"),
    }
}

/// Map one forecast hour entry. Same defaults as [`map_observation`].
pub fn map_forecast_entry(node: &Value) -> ForecastEntry {
    let wind_speed = text_or_empty(node, "S");
    let wind_gust = text(node, "G").unwrap_or_else(|| wind_speed.clone());

    ForecastEntry {
        feels_like: text_or_empty(node, "F"),
        wind_gust,
        humidity: text_or_empty(node, "H"),
        temperature: text_or_empty(node, "T"),
        visibility: text_or_empty(node, "V"),
        wind_direction: text_or_empty(node, "D"),
        wind_speed,
        uv_index: text_or_empty(node, "U"),
        weather_type: weather_type(node),
        precipitation_probability: text_or_empty(node, "Pp"),
        minutes_since_midnight: text_or_empty(node, "$"),
    }
}

fn periods(doc: &Value) -> Result<&Value> {
    doc.pointer("/SiteRep/DV/Location/Period")
        .ok_or_else(|| DataPointError::MalformedResponse("missing SiteRep.DV.Location.Period".to_string()))
}

/// The most recent hour of an hourly observation response.
pub fn latest_observation(doc: &Value) -> Result<Observation> {
    let last_day = entries(periods(doc)?)
        .last()
        .ok_or_else(|| DataPointError::MalformedResponse("observation has no periods".to_string()))?;

    let reps = last_day
        .get("Rep")
        .ok_or_else(|| DataPointError::MalformedResponse("latest period has no Rep".to_string()))?;

    let last_hour = entries(reps)
        .last()
        .ok_or_else(|| DataPointError::MalformedResponse("latest period has no hours".to_string()))?;

    Ok(map_observation(last_hour))
}

/// Up to [`MAX_FORECAST_ENTRIES`] slots across all days, in order.
pub fn forecast_entries(doc: &Value) -> Result<Vec<ForecastEntry>> {
    let slots = entries(periods(doc)?)
        .iter()
        .filter_map(|day| day.get("Rep"))
        .flat_map(entries)
        .take(MAX_FORECAST_ENTRIES)
        .map(map_forecast_entry)
        .collect();

    Ok(slots)
}

fn number(node: &Value, key: &str) -> Option<f64> {
    match node.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_site(node: &Value) -> Result<Site> {
    let malformed = |field: &str| DataPointError::MalformedResponse(format!("site entry has no usable {field}: {node}"));

    let id = match node.get("id") {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| malformed("id"))?;

    let name = node
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("name"))?
        .to_string();

    let latitude = number(node, "latitude").ok_or_else(|| malformed("latitude"))?;
    let longitude = number(node, "longitude").ok_or_else(|| malformed("longitude"))?;

    Ok(Site {
        id,
        name,
        area: text_or_empty(node, "unitaryAuthArea"),
        coordinate: Coordinate::new(latitude, longitude),
    })
}

/// Sites from a `sitelist` response.
pub fn parse_site_list(doc: &Value) -> Result<Vec<Site>> {
    let locations = doc
        .pointer("/Locations/Location")
        .ok_or_else(|| DataPointError::MalformedResponse("missing Locations.Location".to_string()))?;

    entries(locations).iter().map(parse_site).collect()
}
