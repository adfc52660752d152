//! veil-configs server library.
//!
//! Layering follows the usual split: `application` holds the use case that
//! maps store lookups onto wire responses, `infrastructure` holds the TCP
//! listener and the settings loader. The binary in `main.rs` wires them
//! together.

pub mod application;
pub mod infrastructure;
