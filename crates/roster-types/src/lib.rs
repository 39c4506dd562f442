//! Shared domain types for roster.
//!
//! Teams, users, pull requests, the closed error taxonomy and configuration
//! types used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod pull_request;
pub mod team;
pub mod user;
