//! Direct provider adapters

pub mod direct;
pub mod wire;
