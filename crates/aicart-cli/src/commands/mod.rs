//! CLI command implementations for the aicart access service.

pub mod keys;
pub mod password;
pub mod serve;
pub mod token;
