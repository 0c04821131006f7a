use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// One decoded line of the orchestrator's machine-readable status output.
///
/// The shape is owned by the orchestrator and passed through unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct ServiceRecord(pub Value);

impl ServiceRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Compose service name (`Service`), falling back to the container `Name`.
    pub fn service_name(&self) -> Option<&str> {
        self.str_field("Service").or_else(|| self.str_field("Name"))
    }

    pub fn state(&self) -> Option<&str> {
        self.str_field("State")
    }

    pub fn health(&self) -> Option<&str> {
        self.str_field("Health").filter(|h| !h.is_empty())
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// A status line that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct DecodeFailure {
    /// 1-based line number in the orchestrator's stdout
    pub line: usize,
    pub error: String,
}
