//! DataPoint significant-weather codes.

/// Descriptions indexed by weather-type code. Code 4 is reserved by the
/// upstream service; 31 is our own catch-all.
pub const WEATHER_CODES: [&str; 32] = [
    "Clear night",
    "Sunny day",
    "Partly cloudy (night)",
    "Partly cloudy (day)",
    "Not used",
    "Mist",
    "Fog",
    "Cloudy",
    "Overcast",
    "Light rain shower (night)",
    "Light rain shower (day)",
    "Drizzle",
    "Light rain",
    "Heavy rain shower (night)",
    "Heavy rain shower (day)",
    "Heavy rain",
    "Sleet shower (night)",
    "Sleet shower (day)",
    "Sleet",
    "Hail shower (night)",
    "Hail shower (day)",
    "Hail",
    "Light snow shower (night)",
    "Light snow shower (day)",
    "Light snow",
    "Heavy snow shower (night)",
    "Heavy snow shower (day)",
    "Heavy snow",
    "Thunder shower (night)",
    "Thunder shower (day)",
    "Thunder",
    "Unknown",
];

/// Human-readable description for a weather-type code. Anything outside the
/// table, including the missing-value sentinel 33, is "Unknown".
pub fn describe(code: u8) -> &'static str {
    WEATHER_CODES.get(usize::from(code)).copied().unwrap_or("Unknown")
}
