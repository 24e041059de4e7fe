/// Synchronous HTTP client for the monitoring backend.
///
/// Uses `ureq`. Every call is a single attempt with the configured timeout;
/// there is no retry. A non-2xx status whose body still parses as the
/// endpoint's JSON shape counts as a server answer, so `{"success": false}`
/// sent with a 400 reaches the caller as an application error rather than a
/// transport error.
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{
    ActivityApi, ApiError, CommandAck, CommandResponse, DATA_PATH, DataPayload, DataResponse,
    START_PATH, STOP_PATH, StartRequest,
};
use crate::activity::{DataType, MonitoringFilter};
use crate::config::schema::ServerConfig;

#[derive(Debug, Clone)]
pub struct HttpActivityApi {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpActivityApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: normalize_base_url(base_url),
            agent,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl ActivityApi for HttpActivityApi {
    fn start_monitoring(&self, filter: MonitoringFilter) -> Result<CommandAck, ApiError> {
        let result = self
            .agent
            .post(&self.url(START_PATH))
            .send_json(StartRequest { filter });
        read_json::<CommandResponse>(result)?.into_result()
    }

    fn stop_monitoring(&self) -> Result<CommandAck, ApiError> {
        let result = self
            .agent
            .post(&self.url(STOP_PATH))
            .set("Content-Type", "application/json")
            .call();
        read_json::<CommandResponse>(result)?.into_result()
    }

    fn monitoring_data(&self, data_type: DataType) -> Result<DataPayload, ApiError> {
        let result = self
            .agent
            .get(&self.url(DATA_PATH))
            .query("type", data_type.as_str())
            .call();
        read_json::<DataResponse>(result)?.into_payload(data_type)
    }
}

/// Decode a JSON body from either a success or an error-status response.
fn read_json<T: DeserializeOwned>(
    result: Result<ureq::Response, ureq::Error>,
) -> Result<T, ApiError> {
    let response = match result {
        Ok(resp) => resp,
        Err(ureq::Error::Status(code, resp)) => {
            return resp
                .into_json::<T>()
                .map_err(|e| ApiError::transport(format!("HTTP {code}: unparseable body: {e}")));
        }
        Err(ureq::Error::Transport(t)) => return Err(ApiError::transport(t)),
    };

    response
        .into_json::<T>()
        .map_err(|e| ApiError::transport(format!("unparseable response body: {e}")))
}

/// Strip trailing slashes and pin a `localhost` host to IPv4.
///
/// Only an exact `localhost` host is rewritten; `localhost.lan` and the
/// like are left alone.
fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if let Some((scheme, rest)) = trimmed.split_once("://")
        && let Some(after_host) = rest.strip_prefix("localhost")
        && (after_host.is_empty() || after_host.starts_with([':', '/']))
    {
        return format!("{scheme}://127.0.0.1{after_host}");
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(
            normalize_base_url("http://localhost:5000/"),
            "http://127.0.0.1:5000"
        );
        assert_eq!(normalize_base_url(" http://host:80 "), "http://host:80");
        assert_eq!(normalize_base_url("http://localhost"), "http://127.0.0.1");
        assert_eq!(
            normalize_base_url("https://localhost/backend/"),
            "https://127.0.0.1/backend"
        );
    }

    #[test]
    fn hosts_starting_with_localhost_are_kept() {
        let api = HttpActivityApi::new("http://localhost.lan:5000", Duration::from_secs(1));
        assert_eq!(api.base_url(), "http://localhost.lan:5000");
        assert_eq!(
            normalize_base_url("http://localhostess:80/"),
            "http://localhostess:80"
        );
    }

    #[test]
    fn url_joins_path() {
        let api = HttpActivityApi::new("http://example.test/", Duration::from_secs(1));
        assert_eq!(api.url(DATA_PATH), "http://example.test/api/monitoring_data");
    }
}
