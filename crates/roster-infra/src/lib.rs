//! Infrastructure layer for roster.
//!
//! Contains implementations of the repository traits defined in `roster-core`
//! (SQLite storage and an in-memory store), the seedable reviewer picker, and
//! configuration loading.

pub mod config;
pub mod memory;
pub mod random;
pub mod sqlite;
