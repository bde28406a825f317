//! Infrastructure layer - remote chain access

pub mod blockchain;
