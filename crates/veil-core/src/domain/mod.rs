//! Domain entities for veil-configs.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: the config document itself and the store that resolves a
//! client identifier to a rendered document. Code in outer layers (server
//! handler, client channel) depends on this module, never the reverse.

/// The Nebula configuration document and its YAML rendering.
pub mod document;

/// The `ConfigStore` lookup abstraction and its in-memory implementation.
pub mod store;
