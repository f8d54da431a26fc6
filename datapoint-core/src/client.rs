use crate::{
    api::{ApiClient, Endpoints, HttpTransport, Transport},
    config::Config,
    error::{DataPointError, Result},
    geo, mapper,
    model::{Coordinate, ForecastReport, ObservationReport, RequestKind, Site},
};

/// A DataPoint session: API key, target coordinate and the nearest site
/// resolved for each endpoint family.
///
/// Sites are looked up lazily on the first fetch of each kind and reused
/// until [`DataPoint::set_location`] is called again. The cache is plain
/// `&mut self` state; share a client across threads only behind a lock.
#[derive(Debug)]
pub struct DataPoint<T = HttpTransport> {
    api: ApiClient<T>,
    location: Option<Coordinate>,
    observation_site: Option<Site>,
    forecast_site: Option<Site>,
}

impl DataPoint<HttpTransport> {
    /// Client against the public endpoints.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::with_transport(api_key, Endpoints::default(), HttpTransport::new()?))
    }

    /// Client using the key, endpoints and default location from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            DataPointError::Configuration(
                "no API key configured. Hint: run `datapoint configure` or set DATAPOINT_API_KEY".to_string(),
            )
        })?;

        let mut client = Self::with_transport(api_key, config.endpoints.clone(), HttpTransport::new()?);
        if let Some(location) = config.location {
            client.set_location(location)?;
        }
        Ok(client)
    }
}

impl<T: Transport> DataPoint<T> {
    pub fn with_transport(api_key: impl Into<String>, endpoints: Endpoints, transport: T) -> Self {
        Self {
            api: ApiClient::new(api_key.into(), endpoints, transport),
            location: None,
            observation_site: None,
            forecast_site: None,
        }
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    /// Replace the API key. Cached sites stay valid.
    pub fn set_key(&mut self, api_key: impl Into<String>) {
        self.api.set_api_key(api_key.into());
    }

    pub fn location(&self) -> Option<Coordinate> {
        self.location
    }

    /// Set the target coordinate and forget both resolved sites.
    pub fn set_location(&mut self, location: Coordinate) -> Result<()> {
        if !location.latitude.is_finite() || !location.longitude.is_finite() {
            return Err(DataPointError::InvalidInput(format!(
                "coordinate ({}, {}) is not a finite number",
                location.latitude, location.longitude
            )));
        }

        self.location = Some(location);
        self.observation_site = None;
        self.forecast_site = None;
        Ok(())
    }

    pub fn observation_site(&self) -> Option<&Site> {
        self.observation_site.as_ref()
    }

    pub fn forecast_site(&self) -> Option<&Site> {
        self.forecast_site.as_ref()
    }

    fn cached_site(&mut self, kind: RequestKind) -> &mut Option<Site> {
        match kind {
            RequestKind::Observation => &mut self.observation_site,
            RequestKind::Forecast => &mut self.forecast_site,
        }
    }

    fn resolve_site(&mut self, kind: RequestKind) -> Result<Site> {
        if let Some(site) = self.cached_site(kind) {
            return Ok(site.clone());
        }

        let target = self.location.ok_or_else(|| {
            DataPointError::Configuration("no location set; call set_location first".to_string())
        })?;

        let doc = self.api.call("sitelist", kind)?;
        let sites = mapper::parse_site_list(&doc)?;
        let site = geo::nearest(&sites, target)?.clone();

        tracing::info!(%kind, site_id = site.id, site = %site.display_name(), "resolved nearest site");

        *self.cached_site(kind) = Some(site.clone());
        Ok(site)
    }

    /// Nearest observation site, fetching the site list on first use.
    pub fn resolve_observation_site(&mut self) -> Result<Site> {
        self.resolve_site(RequestKind::Observation)
    }

    /// Nearest forecast site, fetching the site list on first use.
    pub fn resolve_forecast_site(&mut self) -> Result<Site> {
        self.resolve_site(RequestKind::Forecast)
    }

    /// Latest hourly observation at the nearest observation site.
    pub fn fetch_observation(&mut self) -> Result<ObservationReport> {
        let site = self.resolve_observation_site()?;
        let doc = self
            .api
            .call(&format!("{}?res=hourly", site.id), RequestKind::Observation)?;
        let observation = mapper::latest_observation(&doc)?;

        Ok(ObservationReport { site, observation })
    }

    /// Three-hourly forecast at the nearest forecast site, at most
    /// [`mapper::MAX_FORECAST_ENTRIES`] slots.
    pub fn fetch_forecast(&mut self) -> Result<ForecastReport> {
        let site = self.resolve_forecast_site()?;
        let doc = self
            .api
            .call(&format!("{}?res=3hourly", site.id), RequestKind::Forecast)?;
        let entries = mapper::forecast_entries(&doc)?;

        tracing::debug!(site_id = site.id, count = entries.len(), "forecast slots");
        Ok(ForecastReport { site, entries })
    }
}
