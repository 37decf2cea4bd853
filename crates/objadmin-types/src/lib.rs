//! Shared types for the object-storage admin log model.
//!
//! This crate holds the closed enumerations that appear inside log events
//! ([`Origin`], [`ApiType`]) and the [`LogValue`] tagged union used for
//! open-ended claim and variable maps. It has no behaviour beyond parsing
//! and rendering these values, so every other crate in the workspace can
//! depend on it without pulling in the encoder.

use serde::{Deserialize, Serialize};

mod value;
pub use value::{join_sorted_pairs, LogValue};

/// The subsystem that triggered an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Origin {
    /// A request issued by an external client.
    #[serde(rename = "client")]
    Client,
    /// Site-to-site replication between clusters.
    #[serde(rename = "site-replication")]
    SiteReplication,
    /// Object lifecycle management (expiry, transition).
    #[serde(rename = "ilm")]
    Ilm,
    /// A batch job (replicate, key rotation, expiry).
    #[serde(rename = "batch")]
    Batch,
    /// Pool rebalancing.
    #[serde(rename = "rebalance")]
    Rebalance,
    /// Bucket replication.
    #[serde(rename = "replication")]
    Replication,
    /// Pool decommissioning.
    #[serde(rename = "decommission")]
    Decommission,
    /// Background or admin-triggered healing.
    #[serde(rename = "heal")]
    Heal,
}

impl Origin {
    /// Every origin, in declaration order.
    pub const ALL: [Origin; 8] = [
        Self::Client,
        Self::SiteReplication,
        Self::Ilm,
        Self::Batch,
        Self::Rebalance,
        Self::Replication,
        Self::Decommission,
        Self::Heal,
    ];

    /// Returns the wire label for this origin.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::SiteReplication => "site-replication",
            Self::Ilm => "ilm",
            Self::Batch => "batch",
            Self::Rebalance => "rebalance",
            Self::Replication => "replication",
            Self::Decommission => "decommission",
            Self::Heal => "heal",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Origin {
    type Err = ParseOriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|origin| origin.as_str() == s)
            .ok_or_else(|| ParseOriginError(s.to_string()))
    }
}

/// Error returned when parsing an unknown origin label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOriginError(pub String);

impl std::fmt::Display for ParseOriginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown origin: {}", self.0)
    }
}

impl std::error::Error for ParseOriginError {}

/// The resource class an API call operated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiType {
    /// Object-level call (GET/PUT/DELETE of a key).
    Object,
    /// Bucket-level call (create, policy, lifecycle).
    Bucket,
    /// Admin API call.
    Admin,
    /// Authentication or STS call.
    Auth,
}

impl ApiType {
    /// Returns the wire label for this API type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Bucket => "bucket",
            Self::Admin => "admin",
            Self::Auth => "auth",
        }
    }
}

impl std::fmt::Display for ApiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApiType {
    type Err = ParseApiTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "object" => Ok(Self::Object),
            "bucket" => Ok(Self::Bucket),
            "admin" => Ok(Self::Admin),
            "auth" => Ok(Self::Auth),
            _ => Err(ParseApiTypeError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown API type label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseApiTypeError(pub String);

impl std::fmt::Display for ParseApiTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown api type: {}", self.0)
    }
}

impl std::error::Error for ParseApiTypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_round_trip() {
        for origin in Origin::ALL {
            let parsed: Origin = origin.as_str().parse().expect("label should parse");
            assert_eq!(parsed, origin);
        }
    }

    #[test]
    fn origin_unknown_label() {
        let err = "client-request".parse::<Origin>().unwrap_err();
        assert_eq!(err, ParseOriginError("client-request".to_string()));
        assert_eq!(err.to_string(), "unknown origin: client-request");
    }

    #[test]
    fn origin_serde_uses_labels() {
        let json = serde_json::to_string(&Origin::SiteReplication).expect("should serialize");
        assert_eq!(json, "\"site-replication\"");
        let decoded: Origin = serde_json::from_str("\"ilm\"").expect("should deserialize");
        assert_eq!(decoded, Origin::Ilm);
    }

    #[test]
    fn api_type_labels() {
        assert_eq!(ApiType::Object.to_string(), "object");
        assert_eq!(ApiType::Bucket.to_string(), "bucket");
        assert_eq!(ApiType::Admin.to_string(), "admin");
        assert_eq!(ApiType::Auth.to_string(), "auth");
        assert_eq!("admin".parse::<ApiType>(), Ok(ApiType::Admin));
        assert!("Admin".parse::<ApiType>().is_err());
    }

    #[test]
    fn api_type_serde_matches_display() {
        for t in [ApiType::Object, ApiType::Bucket, ApiType::Admin, ApiType::Auth] {
            let json = serde_json::to_string(&t).expect("should serialize");
            assert_eq!(json, format!("\"{t}\""));
        }
    }
}
