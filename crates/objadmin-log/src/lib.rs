//! Log event model and canonical encoding for the object-storage admin SDK.
//!
//! The cluster reports three kinds of structured events: API calls, audited
//! user actions, and node errors. This crate defines those records and two
//! ways of serializing them:
//!
//! - **Canonical string**: a single sorted line of `key=value` fragments,
//!   byte-stable across runs and independent of map insertion order. Used as
//!   a log line, a deduplication key, or a golden test fixture.
//! - **JSON**: one document per event, field names as declared, empty
//!   fields omitted under the same rule as the canonical form.
//!
//! Events may additionally be sealed with a 64-bit integrity hash of their
//! canonical content. Sealing is opt-in per event kind.
//!
//! # Event kinds
//!
//! | Kind | Record | Nested |
//! |------|--------|--------|
//! | `api` | [`ApiEvent`] | [`CallInfo`] |
//! | `audit` | [`AuditEvent`] | |
//! | `error` | [`ErrorEvent`] | [`Trace`] |
//!
//! # Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use objadmin_log::{ApiEvent, Canonical};
//! use objadmin_types::Origin;
//!
//! let event = ApiEvent {
//!     version: "1".to_string(),
//!     time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
//!     origin: Some(Origin::Client),
//!     name: "PutObject".to_string(),
//!     bucket: "b1".to_string(),
//!     ..Default::default()
//! };
//!
//! assert_eq!(
//!     event.canonical(),
//!     "bucket=b1,name=PutObject,origin=client,time=2024-01-01T00:00:00Z,version=1"
//! );
//! ```

mod canonical;
mod error;
mod event;
mod integrity;
mod json;
pub mod time;

pub use canonical::{encode, Canonical, Fragments};
pub use error::LogError;
pub use event::{
    ApiEvent, AuditEvent, CallInfo, ErrorEvent, EventKind, LogEvent, ParseEventKindError, Trace,
};
pub use integrity::{ContentHasher, HashPolicy, Sealable, Sealer, Sha256Hasher};
pub use json::{from_json, to_json, to_json_value};
