//! GetConfigUseCase: resolves a config request against the store.
//!
//! This use case sits at the application layer and delegates the lookup to
//! a [`ConfigStore`] trait object, so the in-memory table can be replaced
//! by any other backend without touching the handler or the protocol.

use std::sync::Arc;

use tracing::info;
use veil_core::{ConfigMessage, ConfigStore};

/// The Get Config use case.
///
/// Stateless across calls apart from its immutable reference to one store
/// instance; a single use case is shared by all concurrent requests.
pub struct GetConfigUseCase {
    store: Arc<dyn ConfigStore>,
}

impl GetConfigUseCase {
    /// Creates a new use case over the given store.
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Handles one config request and produces the wire response.
    ///
    /// Store success maps to [`ConfigMessage::GetConfigResponse`]; store
    /// failure maps to [`ConfigMessage::Error`] carrying the store's
    /// message verbatim. A failed lookup fails only this call.
    pub fn handle(&self, client_id: &str) -> ConfigMessage {
        info!("received request for client ID: {client_id}");
        match self.store.get_config(client_id) {
            Ok(config_content) => ConfigMessage::GetConfigResponse { config_content },
            Err(e) => ConfigMessage::Error {
                message: e.to_string(),
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
