//! HTTP inbound adapter exposing the users and tweets REST endpoints.

pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tweets;
pub mod users;
pub mod validation;

pub use error::ApiResult;
