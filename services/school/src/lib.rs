pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod infra;
pub mod middleware;
pub mod router;
pub mod serde_ext;
pub mod state;
pub mod usecase;
pub mod worker;
