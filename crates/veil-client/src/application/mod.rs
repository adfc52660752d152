//! Application layer: the fetch-and-save use case.

pub mod fetch_config;
