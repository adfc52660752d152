//! # veil-core
//!
//! Shared library for veil-configs containing the network protocol codec,
//! the Nebula config document model, and the config store abstraction.
//!
//! This crate is used by both the server and client applications.
//! It has zero dependencies on sockets or OS APIs.
//!
//! # Architecture overview
//!
//! veil-configs distributes per-client Nebula overlay configuration files
//! from a central server to requesting clients over a single unary RPC
//! method, `GetNebulaConfig`. This crate is the shared foundation. It
//! defines:
//!
//! - **`protocol`** – How bytes travel over the network. Requests and
//!   responses are encoded into a compact binary format (8-byte header +
//!   payload) and decoded back into typed Rust structs on the other end.
//!
//! - **`domain`** – Pure business logic with no transport dependencies:
//!   the [`domain::document::NebulaConfig`] document and the
//!   [`domain::store::ConfigStore`] lookup abstraction that resolves a
//!   client identifier to a rendered document.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `veil_core::ConfigStore` instead of `veil_core::domain::store::ConfigStore`.
pub use domain::document::{Firewall, Inbound, Logging, NebulaConfig, Pki, Tun};
pub use domain::store::{seed_configs, ConfigStore, InMemoryConfigStore, StoreError};
pub use protocol::codec::{decode_message, encode_message, ProtocolError};
pub use protocol::messages::ConfigMessage;
