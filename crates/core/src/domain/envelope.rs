use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::service::{DecodeFailure, ServiceRecord};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Failure category carried alongside the human-readable message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The orchestrator exited non-zero
    CommandFailed,
    /// The image pull stage of a deploy exited non-zero
    PullFailed,
    /// Status output could not be decoded
    Decode,
    Io,
    /// The stack configuration was rejected
    Config,
    Timeout,
    UnknownService,
    /// The orchestrator executable could not be started
    Spawn,
}

/// JSON body returned by every stack operation.
///
/// Constructed only through the associated functions so that an error always
/// carries a message and a success always carries its operation's payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Envelope {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    /// Decoded status records on status, service names on config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub services: Option<Vec<Value>>,
    /// Status lines that failed to decode (lenient decoding only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode_errors: Option<Vec<DecodeFailure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_config: Option<String>,
}

impl Envelope {
    fn empty(status: ResponseStatus) -> Self {
        Self {
            status,
            message: None,
            kind: None,
            services: None,
            decode_errors: None,
            logs: None,
            env_config: None,
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            kind: Some(kind),
            ..Self::empty(ResponseStatus::Error)
        }
    }

    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(ResponseStatus::Success)
        }
    }

    pub fn status_listing(services: Vec<ServiceRecord>, decode_errors: Vec<DecodeFailure>) -> Self {
        Self {
            services: Some(services.into_iter().map(ServiceRecord::into_inner).collect()),
            decode_errors: (!decode_errors.is_empty()).then_some(decode_errors),
            ..Self::empty(ResponseStatus::Success)
        }
    }

    pub fn logs(logs: impl Into<String>) -> Self {
        Self {
            logs: Some(logs.into()),
            ..Self::empty(ResponseStatus::Success)
        }
    }

    pub fn config(env_config: impl Into<String>, services: Vec<String>) -> Self {
        Self {
            env_config: Some(env_config.into()),
            services: Some(services.into_iter().map(Value::String).collect()),
            ..Self::empty(ResponseStatus::Success)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_error_envelope_omits_payload_fields() {
        let envelope = Envelope::error(ErrorKind::CommandFailed, "no such service");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            value,
            json!({
                "status": "error",
                "message": "no such service",
                "kind": "command_failed"
            })
        );
    }

    #[test]
    fn test_success_message_shape() {
        let value =
            serde_json::to_value(Envelope::success_message("Stack stopped successfully")).unwrap();
        assert_eq!(
            value,
            json!({ "status": "success", "message": "Stack stopped successfully" })
        );
    }

    #[test]
    fn test_status_listing_keeps_order() {
        let envelope = Envelope::status_listing(
            vec![
                ServiceRecord::new(json!({ "Service": "traefik" })),
                ServiceRecord::new(json!({ "Service": "redis" })),
            ],
            Vec::new(),
        );
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["services"][0]["Service"], "traefik");
        assert_eq!(value["services"][1]["Service"], "redis");
        assert!(value.get("decode_errors").is_none());
    }

    #[test]
    fn test_status_listing_reports_decode_errors() {
        let envelope = Envelope::status_listing(
            vec![ServiceRecord::new(json!({ "a": 1 }))],
            vec![DecodeFailure {
                line: 2,
                error: "expected value".to_string(),
            }],
        );
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["decode_errors"][0]["line"], 2);
        assert_eq!(envelope.services.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_config_envelope() {
        let envelope = Envelope::config("FOO=bar\n", vec!["redis".to_string()]);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["env_config"], "FOO=bar\n");
        assert_eq!(value["services"], json!(["redis"]));
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_empty_status_listing_round_trips() {
        let original = Envelope::status_listing(Vec::new(), Vec::new());

        let back: Envelope =
            serde_json::from_value(serde_json::to_value(&original).unwrap()).unwrap();

        assert_eq!(back, original);
        assert_eq!(back.services, Some(Vec::new()));
    }

    #[test]
    fn test_string_records_round_trip() {
        let original =
            Envelope::status_listing(vec![ServiceRecord::new(json!("redis"))], Vec::new());

        let back: Envelope =
            serde_json::from_value(serde_json::to_value(&original).unwrap()).unwrap();

        assert_eq!(back, original);
    }

    #[test]
    fn test_config_round_trips() {
        let original = Envelope::config("A=1\n", vec!["traefik".to_string(), "redis".to_string()]);

        let back: Envelope =
            serde_json::from_value(serde_json::to_value(&original).unwrap()).unwrap();

        assert_eq!(back, original);
    }

    #[test]
    fn test_status_always_serialized() {
        for envelope in [
            Envelope::logs(""),
            Envelope::error(ErrorKind::Timeout, "timed out"),
            Envelope::status_listing(Vec::new(), Vec::new()),
        ] {
            let value: Value = serde_json::to_value(&envelope).unwrap();
            let status = value["status"].as_str().unwrap();
            assert!(status == "success" || status == "error");
        }
    }
}
