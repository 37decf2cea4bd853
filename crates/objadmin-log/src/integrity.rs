//! Integrity hashing of event records.
//!
//! An event is *sealed* by hashing its canonical content and storing the
//! 64-bit result in its `hash` field. The digest input is the canonical
//! string with the hash field cleared, so sealing is idempotent and a
//! sealed event can be re-verified at any point downstream.
//!
//! Which kinds get sealed is decided by a [`HashPolicy`]; the digest
//! function is a pluggable [`ContentHasher`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::Canonical;
use crate::error::LogError;
use crate::event::{ApiEvent, AuditEvent, ErrorEvent, EventKind, LogEvent};

/// A 64-bit digest over canonical event content.
pub trait ContentHasher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Hashes `content` to 64 bits.
    fn hash64(&self, content: &[u8]) -> u64;
}

/// SHA-256 truncated to its first eight bytes, read big-endian.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn name(&self) -> &'static str {
        "sha256-64"
    }

    fn hash64(&self, content: &[u8]) -> u64 {
        let digest = Sha256::digest(content);
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(prefix)
    }
}

/// An event kind that carries an integrity hash.
pub trait Sealable: Canonical + Clone {
    const KIND: EventKind;

    /// The stored hash, zero when unsealed.
    fn hash(&self) -> u64;

    fn set_hash(&mut self, hash: u64);

    /// Canonical encoding with the hash field cleared.
    fn content(&self) -> String {
        let mut unsealed = self.clone();
        unsealed.set_hash(0);
        unsealed.canonical()
    }

    /// Computes the hash this event would be sealed with.
    ///
    /// Zero marks an unsealed event, so a zero digest is stored as 1.
    fn compute_hash(&self, hasher: &dyn ContentHasher) -> u64 {
        hasher.hash64(self.content().as_bytes()).max(1)
    }
}

impl Sealable for ApiEvent {
    const KIND: EventKind = EventKind::Api;

    fn hash(&self) -> u64 {
        self.hash
    }

    fn set_hash(&mut self, hash: u64) {
        self.hash = hash;
    }
}

impl Sealable for AuditEvent {
    const KIND: EventKind = EventKind::Audit;

    fn hash(&self) -> u64 {
        self.hash
    }

    fn set_hash(&mut self, hash: u64) {
        self.hash = hash;
    }
}

impl Sealable for ErrorEvent {
    const KIND: EventKind = EventKind::Error;

    fn hash(&self) -> u64 {
        self.hash
    }

    fn set_hash(&mut self, hash: u64) {
        self.hash = hash;
    }
}

/// Per-kind opt-in for integrity hashing.
///
/// Defaults to sealing audit events only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashPolicy {
    pub api: bool,
    pub audit: bool,
    pub error: bool,
}

impl HashPolicy {
    /// A policy that seals nothing.
    pub const NONE: HashPolicy = HashPolicy {
        api: false,
        audit: false,
        error: false,
    };

    /// A policy that seals every kind.
    pub const ALL: HashPolicy = HashPolicy {
        api: true,
        audit: true,
        error: true,
    };

    /// Returns `true` if events of `kind` should be sealed.
    pub fn applies(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Api => self.api,
            EventKind::Audit => self.audit,
            EventKind::Error => self.error,
        }
    }
}

impl Default for HashPolicy {
    fn default() -> Self {
        Self {
            api: false,
            audit: true,
            error: false,
        }
    }
}

/// Seals and verifies events according to a [`HashPolicy`].
///
/// Cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct Sealer {
    hasher: Arc<dyn ContentHasher>,
    policy: HashPolicy,
}

impl Sealer {
    pub fn new(hasher: Arc<dyn ContentHasher>, policy: HashPolicy) -> Self {
        Self { hasher, policy }
    }

    /// A SHA-256 sealer with the given policy.
    pub fn with_policy(policy: HashPolicy) -> Self {
        Self::new(Arc::new(Sha256Hasher), policy)
    }

    pub fn policy(&self) -> HashPolicy {
        self.policy
    }

    pub fn hasher(&self) -> &dyn ContentHasher {
        self.hasher.as_ref()
    }

    /// Seals `event` if its kind is enabled by the policy.
    ///
    /// Returns `true` if a hash was written.
    pub fn seal<E: Sealable>(&self, event: &mut E) -> bool {
        if !self.policy.applies(E::KIND) {
            return false;
        }
        let hash = event.compute_hash(self.hasher.as_ref());
        event.set_hash(hash);
        tracing::debug!(
            kind = %E::KIND,
            hasher = self.hasher.name(),
            hash = format_args!("{hash:016x}"),
            "sealed event"
        );
        true
    }

    /// Seals the event wrapped in `event` if its kind is enabled.
    pub fn seal_event(&self, event: &mut LogEvent) -> bool {
        match event {
            LogEvent::Api(e) => self.seal(e),
            LogEvent::Audit(e) => self.seal(e),
            LogEvent::Error(e) => self.seal(e),
        }
    }

    /// Checks the stored hash of `event` against its content.
    ///
    /// Verification ignores the policy: any sealed event can be checked.
    ///
    /// # Errors
    ///
    /// Returns `LogError::Unsealed` if the hash is zero and
    /// `LogError::IntegrityMismatch` if it does not match the content.
    pub fn verify<E: Sealable>(&self, event: &E) -> Result<(), LogError> {
        let stored = event.hash();
        if stored == 0 {
            return Err(LogError::Unsealed(E::KIND));
        }
        let computed = event.compute_hash(self.hasher.as_ref());
        if stored != computed {
            tracing::warn!(
                kind = %E::KIND,
                stored = format_args!("{stored:016x}"),
                computed = format_args!("{computed:016x}"),
                "event integrity mismatch"
            );
            return Err(LogError::IntegrityMismatch {
                kind: E::KIND,
                stored,
                computed,
            });
        }
        Ok(())
    }

    /// Verifies the event wrapped in `event`.
    ///
    /// # Errors
    ///
    /// See [`Sealer::verify`].
    pub fn verify_event(&self, event: &LogEvent) -> Result<(), LogError> {
        match event {
            LogEvent::Api(e) => self.verify(e),
            LogEvent::Audit(e) => self.verify(e),
            LogEvent::Error(e) => self.verify(e),
        }
    }
}

impl Default for Sealer {
    fn default() -> Self {
        Self::with_policy(HashPolicy::default())
    }
}

impl fmt::Debug for Sealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sealer")
            .field("hasher", &self.hasher.name())
            .field("policy", &self.policy)
            .finish()
    }
}
