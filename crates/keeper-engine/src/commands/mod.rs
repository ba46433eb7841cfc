//! Command orchestration layer.
//!
//! Provides the mutation and query entry points that coordinate between
//! token parsing in keeper-core and node access in keeper-store.

pub mod engine_command;
pub mod engine_query;
pub mod mutation;
pub mod views;
