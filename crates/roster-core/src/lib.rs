//! Business logic and repository trait definitions for roster.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, plus the team, user and pull request services. It depends
//! only on `roster-types` -- never on `roster-infra` or any database/IO crate.

pub mod repository;
pub mod service;
