//! The Nebula configuration document distributed to clients.
//!
//! A document has four sections, always present, rendered in declaration
//! order: `pki`, `firewall`, `tun`, `logging`. Documents are immutable once
//! constructed; the server hands out a rendered YAML string, never the
//! struct itself.
//!
//! The PKI blobs are opaque PEM-like text. They contain embedded newlines,
//! which the YAML renderer emits as literal block scalars so the blob text
//! survives a round-trip byte-for-byte.

use serde::{Deserialize, Serialize};

/// The `pki` section: CA certificate, host certificate, and host key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pki {
    /// PEM-like CA certificate blob.
    pub ca: String,
    /// PEM-like host certificate blob.
    pub cert: String,
    /// PEM-like host key blob.
    pub key: String,
}

/// A single inbound firewall rule.
///
/// Port and protocol are string-typed so the literal wildcard `"any"` can
/// appear alongside numeric ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inbound {
    pub port: String,
    pub proto: String,
    pub host: String,
}

/// The `firewall` section: an ordered sequence of inbound rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Firewall {
    pub inbound: Vec<Inbound>,
}

/// The `tun` section: virtual interface settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tun {
    /// Interface device name, e.g. `nebula1`.
    pub dev: String,
    pub drop_local_broadcast: bool,
}

/// The `logging` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logging {
    /// Log level string: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    pub level: String,
    pub log_file: String,
}

/// A complete Nebula configuration document for one client.
///
/// Field declaration order is the serialized section order and must not be
/// reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NebulaConfig {
    pub pki: Pki,
    pub firewall: Firewall,
    pub tun: Tun,
    pub logging: Logging,
}

impl NebulaConfig {
    /// Renders the document as human-readable YAML.
    ///
    /// Multi-line fields (the PKI blobs) are emitted as literal block text,
    /// preserving embedded newlines exactly.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_yaml::Error`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
