//! Backend adapters for mediated mode

pub mod client;
pub mod sse;
pub mod wire;
