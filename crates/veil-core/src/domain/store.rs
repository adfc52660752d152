//! The config store: resolves a client identifier to a rendered document.
//!
//! [`ConfigStore`] is the one genuine polymorphism point in the system.
//! The server only sees the trait, so the in-memory table used here can be
//! swapped for a file-based or database-backed store without touching the
//! protocol or the handler.
//!
//! The in-memory store is populated once at construction and never mutated,
//! so any number of concurrent requests can read it without locking.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::domain::document::{Firewall, Inbound, Logging, NebulaConfig, Pki, Tun};

/// Error type for config store lookups.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document is registered for the given client identifier.
    ///
    /// The message intentionally carries the raw identifier; it crosses the
    /// RPC boundary verbatim and callers match on it.
    #[error("configuration not found for client ID: {0}")]
    NotFound(String),

    /// The document could not be rendered to YAML.
    #[error("failed to render config to YAML: {0}")]
    Render(#[from] serde_yaml::Error),
}

/// Lookup abstraction mapping a client identifier to a serialized document.
///
/// Identifiers are opaque, case-sensitive strings; no format validation is
/// performed. Implementations must be safe to share across concurrent
/// requests.
pub trait ConfigStore: Send + Sync {
    /// Returns the rendered YAML document for `client_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no entry exists. Empty and
    /// unknown identifiers are both a miss, not a separate invalid-input
    /// error.
    fn get_config(&self, client_id: &str) -> Result<String, StoreError>;
}

/// [`ConfigStore`] backed by an immutable in-memory table.
pub struct InMemoryConfigStore {
    configs: HashMap<String, NebulaConfig>,
}

impl InMemoryConfigStore {
    /// Creates a store over the given table.
    ///
    /// The table is fixed for the lifetime of the store; entries never
    /// expire and are never evicted. Tests construct their own tables so
    /// multiple stores can coexist without shared process state.
    pub fn new(configs: HashMap<String, NebulaConfig>) -> Self {
        Self { configs }
    }

    /// Number of registered clients.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns `true` if no clients are registered.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn get_config(&self, client_id: &str) -> Result<String, StoreError> {
        let config = self.configs.get(client_id).ok_or_else(|| {
            debug!("lookup miss for client ID: {client_id}");
            StoreError::NotFound(client_id.to_string())
        })?;
        Ok(config.to_yaml()?)
    }
}

// ── Seed data ─────────────────────────────────────────────────────────────────

fn pem_blob(header: &str, body: &str) -> String {
    format!("-----BEGIN {header}-----\n{body}\n-----END {header}-----")
}

fn seed_entry(client: &str, dev: &str, level: &str, log_file: &str) -> NebulaConfig {
    NebulaConfig {
        pki: Pki {
            ca: pem_blob("NEBULA CA CERT", &format!("{client}_ca_cert_content")),
            cert: pem_blob("NEBULA CERT", &format!("{client}_cert_content")),
            key: pem_blob("NEBULA KEY", &format!("{client}_key_content")),
        },
        firewall: Firewall {
            inbound: vec![Inbound {
                port: "any".to_string(),
                proto: "any".to_string(),
                host: "any".to_string(),
            }],
        },
        tun: Tun {
            dev: dev.to_string(),
            drop_local_broadcast: true,
        },
        logging: Logging {
            level: level.to_string(),
            log_file: log_file.to_string(),
        },
    }
}

/// Returns the fixed seed table used by the server at startup.
///
/// Three clients are registered: `client1`, `client2`, and `test-client`.
pub fn seed_configs() -> HashMap<String, NebulaConfig> {
    HashMap::from([
        (
            "client1".to_string(),
            seed_entry("client1", "nebula1", "info", "/var/log/nebula.log"),
        ),
        (
            "client2".to_string(),
            seed_entry("client2", "nebula2", "info", "/var/log/nebula.log"),
        ),
        (
            "test-client".to_string(),
            seed_entry("test_client", "nebula_test", "debug", "/var/log/nebula_test.log"),
        ),
    ])
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> InMemoryConfigStore {
        InMemoryConfigStore::new(seed_configs())
    }

    #[test]
    fn test_seeded_store_registers_three_clients() {
        let store = seeded_store();
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_get_config_returns_document_for_registered_client() {
        // Arrange
        let store = seeded_store();

        // Act
        let config = store.get_config("client1").expect("client1 is seeded");

        // Assert
        assert!(config.contains("client1_ca_cert_content"));
        assert!(config.contains("client1_cert_content"));
        assert!(config.contains("client1_key_content"));
        assert!(config.contains("dev: nebula1"));
        assert!(config.contains("level: info"));
    }

    #[test]
    fn test_get_config_emits_sections_in_documented_order() {
        let store = seeded_store();
        let config = store.get_config("client1").expect("client1 is seeded");

        let pki = config.find("pki:").unwrap();
        let firewall = config.find("firewall:").unwrap();
        let tun = config.find("tun:").unwrap();
        let logging = config.find("logging:").unwrap();
        assert!(pki < firewall && firewall < tun && tun < logging);
    }

    #[test]
    fn test_get_config_preserves_pki_blob_byte_for_byte() {
        // Arrange
        let table = seed_configs();
        let expected_ca = table["client1"].pki.ca.clone();
        let store = InMemoryConfigStore::new(table);

        // Act
        let config = store.get_config("client1").expect("client1 is seeded");
        let restored: NebulaConfig = serde_yaml::from_str(&config).expect("parse back");

        // Assert – embedded newlines included
        assert_eq!(restored.pki.ca, expected_ca);
    }

    #[test]
    fn test_get_config_unknown_client_returns_not_found() {
        let store = seeded_store();

        let result = store.get_config("nonexistent_client");

        let err = result.expect_err("unknown id must miss");
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(
            err.to_string(),
            "configuration not found for client ID: nonexistent_client"
        );
    }

    #[test]
    fn test_get_config_empty_client_id_is_a_miss() {
        let store = seeded_store();

        let result = store.get_config("");

        assert!(matches!(result, Err(StoreError::NotFound(id)) if id.is_empty()));
    }

    #[test]
    fn test_get_config_is_case_sensitive() {
        let store = seeded_store();
        assert!(store.get_config("Client1").is_err());
        assert!(store.get_config("client1").is_ok());
    }

    #[test]
    fn test_stores_with_independent_tables_do_not_share_state() {
        // Arrange – one empty store, one seeded store
        let empty = InMemoryConfigStore::new(HashMap::new());
        let seeded = seeded_store();

        // Assert
        assert!(empty.get_config("client1").is_err());
        assert!(seeded.get_config("client1").is_ok());
    }

    #[test]
    fn test_store_is_shareable_across_concurrent_readers() {
        use std::sync::Arc;

        let store: Arc<dyn ConfigStore> = Arc::new(seeded_store());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.get_config("client2").is_ok())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
