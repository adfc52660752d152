//! Application layer: use cases that sit between the wire and the domain.

pub mod get_config;
