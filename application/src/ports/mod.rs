//! Port definitions (interfaces to the outside world)
//!
//! Adapters for these traits live in the infrastructure layer.

pub mod comparison_stream;
pub mod credential_store;
pub mod observer;
pub mod provider_gateway;
pub mod usage;
