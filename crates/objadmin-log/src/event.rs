//! Event kinds and record types for API, audit, and error logs.
//!
//! JSON field names double as canonical keys. Every field is skipped from
//! JSON output under exactly the condition that omits it from the
//! canonical string, so both forms always agree on which fields are present.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use objadmin_types::{ApiType, LogValue, Origin};
use serde::{Deserialize, Serialize};

use crate::canonical::Canonical;
use crate::time::is_zero_instant;

/// The three event kinds produced by the logging and audit subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A completed API call.
    Api,
    /// A user-triggered audited action.
    Audit,
    /// An error raised on a node.
    Error,
}

impl EventKind {
    /// Returns the label for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Audit => "audit",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = ParseEventKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "api" => Ok(Self::Api),
            "audit" => Ok(Self::Audit),
            "error" => Ok(Self::Error),
            _ => Err(ParseEventKindError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown event kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEventKindError(pub String);

impl std::fmt::Display for ParseEventKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for ParseEventKindError {}

pub(crate) fn is_zero_i32(n: &i32) -> bool {
    *n == 0
}

pub(crate) fn is_zero_i64(n: &i64) -> bool {
    *n == 0
}

pub(crate) fn is_zero_u64(n: &u64) -> bool {
    *n == 0
}

fn time_is_absent(t: &Option<DateTime<Utc>>) -> bool {
    t.as_ref().map_or(true, is_zero_instant)
}

fn call_info_is_empty(info: &Option<CallInfo>) -> bool {
    info.as_ref().map_or(true, CallInfo::is_empty)
}

fn trace_is_empty(trace: &Option<Trace>) -> bool {
    trace.as_ref().map_or(true, Trace::is_empty)
}

/// HTTP-level detail of a single API call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallInfo {
    /// Response status code.
    #[serde(rename = "httpStatusCode", skip_serializing_if = "is_zero_i32")]
    pub http_status_code: i32,
    /// Request body bytes received.
    #[serde(rename = "rx", skip_serializing_if = "is_zero_i64")]
    pub input_bytes: i64,
    /// Response body bytes sent.
    #[serde(rename = "tx", skip_serializing_if = "is_zero_i64")]
    pub output_bytes: i64,
    /// Response header bytes sent.
    #[serde(rename = "txHeaders", skip_serializing_if = "is_zero_i64")]
    pub header_bytes: i64,
    #[serde(rename = "timeToFirstByte", skip_serializing_if = "String::is_empty")]
    pub time_to_first_byte: String,
    #[serde(rename = "requestReadTime", skip_serializing_if = "String::is_empty")]
    pub request_read_time: String,
    #[serde(rename = "responseWriteTime", skip_serializing_if = "String::is_empty")]
    pub response_write_time: String,
    #[serde(rename = "requestTime", skip_serializing_if = "String::is_empty")]
    pub request_time: String,
    #[serde(rename = "timeToResponse", skip_serializing_if = "String::is_empty")]
    pub time_to_response: String,
    /// Time spent blocked reading the request body.
    #[serde(rename = "readBlocked", skip_serializing_if = "String::is_empty")]
    pub read_blocked: String,
    /// Time spent blocked writing the response body.
    #[serde(rename = "writeBlocked", skip_serializing_if = "String::is_empty")]
    pub write_blocked: String,
    #[serde(rename = "sourceHost", skip_serializing_if = "String::is_empty")]
    pub source_host: String,
    #[serde(rename = "requestID", skip_serializing_if = "String::is_empty")]
    pub request_id: String,
    #[serde(rename = "userAgent", skip_serializing_if = "String::is_empty")]
    pub user_agent: String,
    #[serde(rename = "requestPath", skip_serializing_if = "String::is_empty")]
    pub request_path: String,
    #[serde(rename = "requestHost", skip_serializing_if = "String::is_empty")]
    pub request_host: String,
    /// Claims of the credential that signed the request.
    #[serde(rename = "requestClaims", skip_serializing_if = "BTreeMap::is_empty")]
    pub request_claims: BTreeMap<String, LogValue>,
    #[serde(rename = "requestQuery", skip_serializing_if = "BTreeMap::is_empty")]
    pub request_query: BTreeMap<String, String>,
    #[serde(rename = "requestHeader", skip_serializing_if = "BTreeMap::is_empty")]
    pub request_header: BTreeMap<String, String>,
    #[serde(rename = "responseHeader", skip_serializing_if = "BTreeMap::is_empty")]
    pub response_header: BTreeMap<String, String>,
    /// Access key that signed the request.
    #[serde(rename = "accessKey", skip_serializing_if = "String::is_empty")]
    pub access_key: String,
    /// Parent user of a service account or impersonated identity.
    #[serde(rename = "parentUser", skip_serializing_if = "String::is_empty")]
    pub parent_user: String,
}

impl CallInfo {
    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.canonical().is_empty()
    }

    /// Looks up a request claim.
    pub fn claim(&self, key: &str) -> Option<&LogValue> {
        self.request_claims.get(key)
    }
}

/// One completed API call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEvent {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(with = "crate::time::optional", skip_serializing_if = "time_is_absent")]
    pub time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub node: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub api_type: Option<ApiType>,
    /// Operation name, e.g. `PutObject`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bucket: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub object: String,
    #[serde(rename = "versionId", skip_serializing_if = "String::is_empty")]
    pub version_id: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(rename = "callInfo", skip_serializing_if = "call_info_is_empty")]
    pub call_info: Option<CallInfo>,
    /// Integrity hash of the canonical content, zero when unsealed.
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub hash: u64,
}

impl ApiEvent {
    /// Returns the tag value for `key`, or `""` if the tag is not set.
    pub fn tag(&self, key: &str) -> &str {
        self.tags.get(key).map_or("", String::as_str)
    }
}

/// A user-triggered action recorded for auditing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditEvent {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(with = "crate::time::optional", skip_serializing_if = "time_is_absent")]
    pub time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub node: String,
    #[serde(rename = "apiName", skip_serializing_if = "String::is_empty")]
    pub api_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bucket: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(rename = "requestID", skip_serializing_if = "String::is_empty")]
    pub request_id: String,
    #[serde(rename = "requestClaims", skip_serializing_if = "BTreeMap::is_empty")]
    pub request_claims: BTreeMap<String, LogValue>,
    #[serde(rename = "sourceHost", skip_serializing_if = "String::is_empty")]
    pub source_host: String,
    #[serde(rename = "accessKey", skip_serializing_if = "String::is_empty")]
    pub access_key: String,
    #[serde(rename = "parentUser", skip_serializing_if = "String::is_empty")]
    pub parent_user: String,
    /// Integrity hash of the canonical content, zero when unsealed.
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub hash: u64,
}

impl AuditEvent {
    /// Returns the tag value for `key`, or `""` if the tag is not set.
    pub fn tag(&self, key: &str) -> &str {
        self.tags.get(key).map_or("", String::as_str)
    }

    /// Looks up a request claim.
    pub fn claim(&self, key: &str) -> Option<&LogValue> {
        self.request_claims.get(key)
    }
}

/// Source locations and captured state at the point an error was raised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trace {
    /// Source locations, innermost first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
    /// Local variables captured at the error site.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, LogValue>,
}

impl Trace {
    /// Returns `true` if the trace carries neither sources nor variables.
    pub fn is_empty(&self) -> bool {
        self.canonical().is_empty()
    }
}

/// An error raised on a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorEvent {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub node: String,
    #[serde(with = "crate::time::optional", skip_serializing_if = "time_is_absent")]
    pub time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(rename = "apiName", skip_serializing_if = "String::is_empty")]
    pub api_name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "trace_is_empty")]
    pub trace: Option<Trace>,
    /// Integrity hash of the canonical content, zero when unsealed.
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub hash: u64,
}

impl ErrorEvent {
    /// Returns the tag value for `key`, or `""` if the tag is not set.
    pub fn tag(&self, key: &str) -> &str {
        self.tags.get(key).map_or("", String::as_str)
    }
}

/// Any of the three event kinds, tagged with `"kind"` in JSON.
///
/// Used where a single stream carries mixed kinds, such as a log file fed
/// to the command-line encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LogEvent {
    Api(ApiEvent),
    Audit(AuditEvent),
    Error(ErrorEvent),
}

impl LogEvent {
    /// Returns the kind of the wrapped event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Api(_) => EventKind::Api,
            Self::Audit(_) => EventKind::Audit,
            Self::Error(_) => EventKind::Error,
        }
    }

    /// Returns the tag value for `key` on the wrapped event.
    pub fn tag(&self, key: &str) -> &str {
        match self {
            Self::Api(e) => e.tag(key),
            Self::Audit(e) => e.tag(key),
            Self::Error(e) => e.tag(key),
        }
    }
}

impl From<ApiEvent> for LogEvent {
    fn from(event: ApiEvent) -> Self {
        Self::Api(event)
    }
}

impl From<AuditEvent> for LogEvent {
    fn from(event: AuditEvent) -> Self {
        Self::Audit(event)
    }
}

impl From<ErrorEvent> for LogEvent {
    fn from(event: ErrorEvent) -> Self {
        Self::Error(event)
    }
}
