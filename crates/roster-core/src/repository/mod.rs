//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (roster-infra) implements. The core crate never depends on any
//! specific storage technology.
//!
//! Every method that touches more than one row is a single atomic unit in
//! the implementation: callers never observe a half-applied write.

pub mod pull_request;
pub mod team;
pub mod user;
