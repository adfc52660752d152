//! Infrastructure layer: the TCP transport behind the channel trait.

pub mod network;
