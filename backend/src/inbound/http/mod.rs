//! HTTP inbound adapter exposing REST endpoints.

pub mod archive;
pub mod articles;
pub mod auth;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod uploads;

pub use error::ApiResult;
