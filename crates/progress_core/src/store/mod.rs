//! Durable key-value storage with JSON value round-tripping.
//!
//! # Responsibility
//! - Define the raw key-value contract and its SQLite implementation.
//! - Provide fail-soft typed `load_or` / `save` helpers on top.
//!
//! # Invariants
//! - `load_or` never raises; every failure yields the caller default.
//! - `save` completes (or fails and logs) before it returns.
//!
//! # See also
//! - `crate::db` for connection bootstrap and schema.

pub mod kv_store;
