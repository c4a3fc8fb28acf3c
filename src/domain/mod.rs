//! Domain layer - quote scheduling and swap state

pub mod quote;
pub mod store;
