//! Backend monitoring API: wire types, the [`ActivityApi`] seam, and the
//! HTTP implementation.
//!
//! Three endpoints are consumed:
//!
//! | Method | Path                              | Body / response                         |
//! |--------|-----------------------------------|-----------------------------------------|
//! | POST   | `/api/start_monitoring`           | `{"type": ...}` → `{success, message?}` |
//! | POST   | `/api/stop_monitoring`            | none → `{success, message?}`            |
//! | GET    | `/api/monitoring_data?type=...`   | `{error}` or `{data: [...]}`            |

mod client;
mod error;

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::activity::{ActivityRecord, DataType, MonitoringFilter};

pub use client::HttpActivityApi;
pub use error::ApiError;

pub const START_PATH: &str = "/api/start_monitoring";
pub const STOP_PATH: &str = "/api/stop_monitoring";
pub const DATA_PATH: &str = "/api/monitoring_data";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/start_monitoring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    #[serde(rename = "type")]
    pub filter: MonitoringFilter,
}

/// Response body shared by the start and stop endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl CommandResponse {
    /// Split into the acknowledged message or an application error.
    pub fn into_result(self) -> Result<CommandAck, ApiError> {
        if self.success {
            Ok(CommandAck {
                message: self.message.filter(|m| !m.is_empty()),
            })
        } else {
            Err(ApiError::application(self.message))
        }
    }
}

/// A successful start/stop acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandAck {
    pub message: Option<String>,
}

/// Response body of `GET /api/monitoring_data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataResponse {
    #[serde(default, deserialize_with = "lenient_error")]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<serde_json::Value>>,
}

impl DataResponse {
    /// Interpret the response for `data_type`. First match wins: a non-empty
    /// `error`, then a non-empty `data` list, then empty.
    pub fn into_payload(self, data_type: DataType) -> Result<DataPayload, ApiError> {
        if let Some(error) = self.error
            && !error.is_empty()
        {
            return Ok(DataPayload::Error(error));
        }

        match self.data {
            Some(items) if !items.is_empty() => {
                let records = items
                    .into_iter()
                    .map(|item| ActivityRecord::from_value(data_type, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| ApiError::transport(format!("malformed {data_type} record: {e}")))?;
                Ok(DataPayload::Records(records))
            }
            _ => Ok(DataPayload::Empty),
        }
    }
}

/// Accept any JSON value for `error`. Falsy values (`null`, `false`, `0`,
/// `""`) mean no error; anything else is shown as its text.
fn lenient_error<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    })
}

/// Interpreted result of a data fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataPayload {
    /// The server reported an error for this stream.
    Error(String),
    /// One or more records, in server order.
    Records(Vec<ActivityRecord>),
    /// No records.
    Empty,
}

// ---------------------------------------------------------------------------
// API seam
// ---------------------------------------------------------------------------

/// Remote monitoring backend as seen by the view controller.
pub trait ActivityApi {
    fn start_monitoring(&self, filter: MonitoringFilter) -> Result<CommandAck, ApiError>;
    fn stop_monitoring(&self) -> Result<CommandAck, ApiError>;
    fn monitoring_data(&self, data_type: DataType) -> Result<DataPayload, ApiError>;
}

impl<A: ActivityApi + ?Sized> ActivityApi for Arc<A> {
    fn start_monitoring(&self, filter: MonitoringFilter) -> Result<CommandAck, ApiError> {
        (**self).start_monitoring(filter)
    }

    fn stop_monitoring(&self) -> Result<CommandAck, ApiError> {
        (**self).stop_monitoring()
    }

    fn monitoring_data(&self, data_type: DataType) -> Result<DataPayload, ApiError> {
        (**self).monitoring_data(data_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_request_uses_type_key() {
        let body = StartRequest {
            filter: MonitoringFilter::Mouse,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"type":"mouse"}"#);
    }

    #[test]
    fn command_response_failure_keeps_message() {
        let resp: CommandResponse =
            serde_json::from_str(r#"{"success": false, "message": "busy"}"#).unwrap();
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.server_message(), Some("busy"));
    }

    #[test]
    fn command_response_without_success_is_failure() {
        let resp: CommandResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_result().is_err());
    }

    #[test]
    fn data_response_error_wins_over_data() {
        let resp: DataResponse = serde_json::from_str(
            r#"{"error": "not monitoring", "data": [{"time": "1", "action": "a", "position": "p"}]}"#,
        )
        .unwrap();
        assert_eq!(
            resp.into_payload(DataType::Mouse).unwrap(),
            DataPayload::Error("not monitoring".into())
        );
    }

    #[test]
    fn data_response_empty_error_falls_through() {
        let resp: DataResponse = serde_json::from_str(r#"{"error": "", "data": []}"#).unwrap();
        assert_eq!(resp.into_payload(DataType::Mouse).unwrap(), DataPayload::Empty);
    }

    #[test]
    fn data_response_shows_non_string_error() {
        let resp: DataResponse = serde_json::from_str(r#"{"error": 5}"#).unwrap();
        assert_eq!(
            resp.into_payload(DataType::Mouse).unwrap(),
            DataPayload::Error("5".into())
        );

        let resp: DataResponse =
            serde_json::from_str(r#"{"error": {"code": 3}, "data": []}"#).unwrap();
        assert_eq!(
            resp.into_payload(DataType::Mouse).unwrap(),
            DataPayload::Error(r#"{"code":3}"#.into())
        );
    }

    #[test]
    fn data_response_falsy_error_falls_through() {
        for body in [
            r#"{"error": null}"#,
            r#"{"error": false}"#,
            r#"{"error": 0}"#,
        ] {
            let resp: DataResponse = serde_json::from_str(body).unwrap();
            assert_eq!(
                resp.into_payload(DataType::Keyboard).unwrap(),
                DataPayload::Empty,
                "{body}"
            );
        }
    }

    #[test]
    fn data_response_missing_data_is_empty() {
        let resp: DataResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(
            resp.into_payload(DataType::Keyboard).unwrap(),
            DataPayload::Empty
        );
    }

    #[test]
    fn data_response_rejects_non_object_records() {
        let resp: DataResponse = serde_json::from_str(r#"{"data": [42]}"#).unwrap();
        let err = resp.into_payload(DataType::Keyboard).unwrap_err();
        assert!(err.is_transport());
    }
}
