//! Canonical string encoding of event records.
//!
//! The canonical form is a single line of comma-separated fragments, one per
//! non-empty field:
//!
//! - scalars: `key=value`
//! - maps: `key={k1=v1,k2=v2}`, pairs sorted by their full `k=v` text
//! - lists: `key=[a,b]`, items sorted
//! - nested records: `key={inner fragments}`
//!
//! Fields holding their type's zero value contribute nothing, and a nested
//! record whose own encoding is empty is dropped rather than written as
//! `key={}`. The collected fragments are sorted before joining, so the
//! output does not depend on field declaration order and new fields can be
//! appended to a record without changing the encoding of events that leave
//! them unset.
//!
//! Encoding is total. It never fails and never reorders the caller's data;
//! every sort runs on a freshly collected vector.

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use objadmin_types::join_sorted_pairs;

use crate::event::{ApiEvent, AuditEvent, CallInfo, ErrorEvent, LogEvent, Trace};
use crate::time::{format_rfc3339_nano, is_zero_instant};

/// A record with a canonical string form.
pub trait Canonical {
    /// Appends one fragment per non-empty field to `out`.
    fn write_fragments(&self, out: &mut Fragments);

    /// Returns the sorted, comma-joined canonical encoding.
    fn canonical(&self) -> String {
        let mut out = Fragments::new();
        self.write_fragments(&mut out);
        out.finish()
    }
}

/// Encodes `value` into its canonical string.
pub fn encode<T: Canonical + ?Sized>(value: &T) -> String {
    value.canonical()
}

/// Accumulates the fragments of one record during encoding.
///
/// Each method applies the zero-value rule for its type and pushes at most
/// one fragment. Methods return `&mut Self` so a record's fields can be
/// written as a single chain in schema order.
#[derive(Debug, Default)]
pub struct Fragments {
    parts: Vec<String>,
}

impl Fragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// `key=value` unless `value` is empty.
    pub fn string(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.parts.push(format!("{key}={value}"));
        }
        self
    }

    /// `key=value` unless `value` is zero.
    pub fn int(&mut self, key: &str, value: i64) -> &mut Self {
        if value != 0 {
            self.parts.push(format!("{key}={value}"));
        }
        self
    }

    /// `key=value` unless `value` is zero.
    pub fn uint(&mut self, key: &str, value: u64) -> &mut Self {
        if value != 0 {
            self.parts.push(format!("{key}={value}"));
        }
        self
    }

    /// `key=label` for a set enumeration value.
    pub fn label<T: Display>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.parts.push(format!("{key}={value}"));
        }
        self
    }

    /// `key=<RFC 3339, nanosecond precision, UTC>` unless absent or the
    /// zero instant.
    pub fn time(&mut self, key: &str, value: Option<&DateTime<Utc>>) -> &mut Self {
        if let Some(t) = value.filter(|t| !is_zero_instant(t)) {
            self.parts.push(format!("{key}={}", format_rfc3339_nano(t)));
        }
        self
    }

    /// `key={k1=v1,...}` unless `map` is empty.
    pub fn map<V: Display>(&mut self, key: &str, map: &BTreeMap<String, V>) -> &mut Self {
        if !map.is_empty() {
            self.parts.push(format!("{key}={{{}}}", join_sorted_pairs(map)));
        }
        self
    }

    /// `key=[a,b,...]` over a sorted copy of `items`, unless empty.
    pub fn list<S: AsRef<str>>(&mut self, key: &str, items: &[S]) -> &mut Self {
        if !items.is_empty() {
            let mut sorted: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
            sorted.sort_unstable();
            self.parts.push(format!("{key}=[{}]", sorted.join(",")));
        }
        self
    }

    /// `key={inner}` unless `value` is absent or encodes to nothing.
    pub fn nested<T: Canonical>(&mut self, key: &str, value: Option<&T>) -> &mut Self {
        if let Some(value) = value {
            let inner = value.canonical();
            if !inner.is_empty() {
                self.parts.push(format!("{key}={{{inner}}}"));
            }
        }
        self
    }

    /// Number of fragments collected so far.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Sorts the fragments and joins them with commas.
    pub fn finish(self) -> String {
        let mut parts = self.parts;
        parts.sort_unstable();
        parts.join(",")
    }
}

impl Canonical for CallInfo {
    fn write_fragments(&self, out: &mut Fragments) {
        out.int("httpStatusCode", i64::from(self.http_status_code))
            .int("rx", self.input_bytes)
            .int("tx", self.output_bytes)
            .int("txHeaders", self.header_bytes)
            .string("timeToFirstByte", &self.time_to_first_byte)
            .string("requestReadTime", &self.request_read_time)
            .string("responseWriteTime", &self.response_write_time)
            .string("requestTime", &self.request_time)
            .string("timeToResponse", &self.time_to_response)
            .string("readBlocked", &self.read_blocked)
            .string("writeBlocked", &self.write_blocked)
            .string("sourceHost", &self.source_host)
            .string("requestID", &self.request_id)
            .string("userAgent", &self.user_agent)
            .string("requestPath", &self.request_path)
            .string("requestHost", &self.request_host)
            .map("requestClaims", &self.request_claims)
            .map("requestQuery", &self.request_query)
            .map("requestHeader", &self.request_header)
            .map("responseHeader", &self.response_header)
            .string("accessKey", &self.access_key)
            .string("parentUser", &self.parent_user);
    }
}

impl Canonical for ApiEvent {
    fn write_fragments(&self, out: &mut Fragments) {
        out.string("version", &self.version)
            .time("time", self.time.as_ref())
            .string("node", &self.node)
            .label("origin", self.origin)
            .label("type", self.api_type)
            .string("name", &self.name)
            .string("bucket", &self.bucket)
            .string("object", &self.object)
            .string("versionId", &self.version_id)
            .map("tags", &self.tags)
            .nested("callInfo", self.call_info.as_ref())
            .uint("hash", self.hash);
    }
}

impl Canonical for AuditEvent {
    fn write_fragments(&self, out: &mut Fragments) {
        out.string("version", &self.version)
            .time("time", self.time.as_ref())
            .string("node", &self.node)
            .string("apiName", &self.api_name)
            .string("bucket", &self.bucket)
            .map("tags", &self.tags)
            .string("requestID", &self.request_id)
            .map("requestClaims", &self.request_claims)
            .string("sourceHost", &self.source_host)
            .string("accessKey", &self.access_key)
            .string("parentUser", &self.parent_user)
            .uint("hash", self.hash);
    }
}

impl Canonical for Trace {
    fn write_fragments(&self, out: &mut Fragments) {
        out.list("source", &self.source)
            .map("variables", &self.variables);
    }
}

impl Canonical for ErrorEvent {
    fn write_fragments(&self, out: &mut Fragments) {
        out.string("version", &self.version)
            .string("node", &self.node)
            .time("time", self.time.as_ref())
            .string("message", &self.message)
            .string("apiName", &self.api_name)
            .map("tags", &self.tags)
            .nested("trace", self.trace.as_ref())
            .uint("hash", self.hash);
    }
}

impl Canonical for LogEvent {
    fn write_fragments(&self, out: &mut Fragments) {
        match self {
            Self::Api(e) => e.write_fragments(out),
            Self::Audit(e) => e.write_fragments(out),
            Self::Error(e) => e.write_fragments(out),
        }
    }
}
