//! Core library for the Met Office DataPoint weather API.
//!
//! This crate defines:
//! - The [`DataPoint`] session client (nearest-site resolution and caching)
//! - A blocking API caller behind a [`Transport`] seam
//! - Mapping from DataPoint's single-letter JSON fields to named records
//! - Configuration & credentials handling
//!
//! It is used by `datapoint-cli`, but can also be embedded in other binaries.
//!
//! ```no_run
//! use datapoint_core::{Coordinate, DataPoint};
//!
//! let mut client = DataPoint::new("my-api-key")?;
//! client.set_location(Coordinate::new(52.634, 1.293))?;
//!
//! let report = client.fetch_observation()?;
//! println!("{}: {}C", report.site.display_name(), report.observation.temperature);
//! # Ok::<(), datapoint_core::DataPointError>(())
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod geo;
pub mod mapper;
pub mod model;
pub mod weather_code;

pub use api::{ApiClient, Endpoints, HttpTransport, Transport};
pub use client::DataPoint;
pub use config::Config;
pub use error::DataPointError;
pub use model::{
    Coordinate, ForecastEntry, ForecastReport, Observation, ObservationReport, RequestKind, Site,
    UNKNOWN_WEATHER_TYPE,
};
