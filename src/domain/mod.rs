//! Domain layer - core business logic and entities

pub mod chain;
pub mod pool;
