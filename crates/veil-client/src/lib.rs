//! veil-configs client library.
//!
//! `application` holds the fetch-and-save use case behind the
//! [`application::fetch_config::ConfigChannel`] trait; `infrastructure`
//! holds the TCP implementation of that channel with its per-call
//! deadline. The binary in `main.rs` wires them together.

pub mod application;
pub mod infrastructure;
