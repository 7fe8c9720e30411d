//! # TaskBoard Shared Library
//!
//! This crate contains the types and business logic shared between the
//! TaskBoard API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing, JWT issuing, and request auth context
//! - `db`: Connection pooling and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskBoard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
