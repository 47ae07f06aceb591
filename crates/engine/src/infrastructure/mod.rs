//! Infrastructure implementations.
//!
//! Contains the store port, its backends and process configuration.

pub mod config;
pub mod memory;
pub mod ports;
pub mod sqlite;
