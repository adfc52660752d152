//! Infrastructure layer: TCP transport and settings persistence.

pub mod network;
pub mod settings;
