//! Core types, configuration, and utilities shared across the crate.

pub mod config;
pub mod error;
pub mod network;
pub mod scale;
pub mod state;
