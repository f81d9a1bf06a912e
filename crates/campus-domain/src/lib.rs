//! Shared domain types for the campus services.

pub mod code;
pub mod mark;
pub mod role;
