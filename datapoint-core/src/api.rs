use std::time::Duration;

use reqwest::{blocking::Client, redirect::Policy};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{DataPointError, Result},
    model::RequestKind,
};

pub const OBSERVATION_BASE_URL: &str = "http://datapoint.metoffice.gov.uk/public/data/val/wxobs/all/json";
pub const FORECAST_BASE_URL: &str = "http://datapoint.metoffice.gov.uk/public/data/val/wxfcs/all/json";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_REDIRECTS: usize = 10;

/// Base URLs for the two endpoint families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub observation: String,
    pub forecast: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            observation: OBSERVATION_BASE_URL.to_string(),
            forecast: FORECAST_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn base(&self, kind: RequestKind) -> &str {
        match kind {
            RequestKind::Observation => &self.observation,
            RequestKind::Forecast => &self.forecast,
        }
    }
}

/// Fetches a URL and returns the response body.
pub trait Transport {
    fn get(&self, url: &str) -> Result<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<String> {
        (**self).get(url)
    }
}

/// Blocking HTTP transport: 10 second timeout, redirects followed.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| DataPointError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        // reqwest errors print their URL, which carries the key.
        let res = self.http.get(url).send().map_err(|e| DataPointError::Network {
            url: redact_key(url),
            source: Box::new(e.without_url()),
        })?;

        let status = res.status();
        let body = res.text().map_err(|e| DataPointError::Network {
            url: redact_key(url),
            source: Box::new(e.without_url()),
        })?;

        if !status.is_success() {
            return Err(DataPointError::HttpStatus {
                url: redact_key(url),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

/// Low-level DataPoint caller: builds keyed URLs and parses JSON bodies.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    api_key: String,
    endpoints: Endpoints,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(api_key: String, endpoints: Endpoints, transport: T) -> Self {
        Self {
            api_key,
            endpoints,
            transport,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = api_key;
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full request URL for `path` on the `kind` endpoint, key appended.
    pub fn url_for(&self, path: &str, kind: RequestKind) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(DataPointError::Configuration("API key is empty".to_string()));
        }
        if path.is_empty() {
            return Err(DataPointError::Configuration("request path is empty".to_string()));
        }

        let sep = if path.contains('?') { '&' } else { '?' };
        let base = self.endpoints.base(kind).trim_end_matches('/');

        Ok(format!("{base}/{path}{sep}key={}", self.api_key))
    }

    /// GET `path` from the `kind` endpoint and parse the body as JSON.
    pub fn call(&self, path: &str, kind: RequestKind) -> Result<Value> {
        let url = self.url_for(path, kind)?;
        tracing::debug!(%kind, path, "DataPoint request");

        let body = self.transport.get(&url)?;
        tracing::trace!(target: "datapoint_core::api", %kind, path, body = %body, "DataPoint response");

        serde_json::from_str(&body).map_err(|source| DataPointError::Parse {
            url: redact_key(&url),
            source,
        })
    }
}

/// Strip the `key=` parameter so URLs can go into errors and logs.
fn redact_key(url: &str) -> String {
    match url.find("key=") {
        Some(idx) => format!("{}key=***", &url[..idx]),
        None => url.to_string(),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        urls: RefCell<Vec<String>>,
        body: String,
    }

    impl Transport for Recorder {
        fn get(&self, url: &str) -> Result<String> {
            self.urls.borrow_mut().push(url.to_string());
            Ok(self.body.clone())
        }
    }

    fn client(key: &str, transport: Recorder) -> ApiClient<Recorder> {
        ApiClient::new(key.to_string(), Endpoints::default(), transport)
    }

    #[test]
    fn url_uses_question_mark_without_query() {
        let api = client("KEY", Recorder::default());
        let url = api.url_for("sitelist", RequestKind::Observation).expect("valid");
        assert_eq!(url, format!("{OBSERVATION_BASE_URL}/sitelist?key=KEY"));
    }

    #[test]
    fn url_uses_ampersand_with_existing_query() {
        let api = client("KEY", Recorder::default());
        let url = api.url_for("3772?res=3hourly", RequestKind::Forecast).expect("valid");
        assert_eq!(url, format!("{FORECAST_BASE_URL}/3772?res=3hourly&key=KEY"));
    }

    #[test]
    fn empty_key_fails_before_any_request() {
        let api = client("", Recorder::default());
        let err = api.call("sitelist", RequestKind::Forecast).unwrap_err();
        assert!(matches!(err, DataPointError::Configuration(_)));
        assert!(api.transport().urls.borrow().is_empty());
    }

    #[test]
    fn empty_path_fails_before_any_request() {
        let api = client("KEY", Recorder::default());
        let err = api.call("", RequestKind::Observation).unwrap_err();
        assert!(matches!(err, DataPointError::Configuration(_)));
        assert!(api.transport().urls.borrow().is_empty());
    }

    #[test]
    fn call_parses_json_body() {
        let api = client(
            "KEY",
            Recorder {
                body: r#"{"Locations":{"Location":[]}}"#.to_string(),
                ..Default::default()
            },
        );
        let doc = api.call("sitelist", RequestKind::Observation).expect("json");
        assert!(doc["Locations"]["Location"].is_array());
        assert_eq!(api.transport().urls.borrow().len(), 1);
    }

    #[test]
    fn call_reports_invalid_json_as_parse_error() {
        let api = client(
            "SECRET",
            Recorder {
                body: "<html>oops</html>".to_string(),
                ..Default::default()
            },
        );
        let err = api.call("sitelist", RequestKind::Observation).unwrap_err();
        assert!(err.is_parse());
        assert!(!err.to_string().contains("SECRET"));
    }

    #[test]
    fn custom_endpoint_trailing_slash_is_ignored() {
        let endpoints = Endpoints {
            observation: "http://localhost:8080/obs/".to_string(),
            forecast: "http://localhost:8080/fcs".to_string(),
        };
        let api = ApiClient::new("K".to_string(), endpoints, Recorder::default());
        assert_eq!(
            api.url_for("sitelist", RequestKind::Observation).expect("valid"),
            "http://localhost:8080/obs/sitelist?key=K"
        );
    }

    fn error_chain(err: &dyn std::error::Error) -> String {
        let mut parts = vec![err.to_string()];
        let mut source = err.source();
        while let Some(inner) = source {
            parts.push(inner.to_string());
            source = inner.source();
        }
        parts.join(" | ")
    }

    #[test]
    fn transport_failure_does_not_leak_key() {
        let endpoints = Endpoints {
            observation: "http://127.0.0.1:1/obs".to_string(),
            forecast: "http://127.0.0.1:1/fcs".to_string(),
        };
        let transport = HttpTransport::new().expect("client builds");
        let api = ApiClient::new("SECRETKEY".to_string(), endpoints, transport);

        let err = api.call("sitelist", RequestKind::Observation).unwrap_err();
        assert!(err.is_network());

        let chain = error_chain(&err);
        assert!(chain.contains("key=***"), "{chain}");
        assert!(!chain.contains("SECRETKEY"), "{chain}");
    }

    #[test]
    fn redact_key_hides_secret() {
        assert_eq!(redact_key("http://x/sitelist?key=abc"), "http://x/sitelist?key=***");
        assert_eq!(redact_key("http://x/sitelist"), "http://x/sitelist");
    }

    #[test]
    fn truncate_body_caps_length() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
