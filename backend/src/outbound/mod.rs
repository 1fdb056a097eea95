//! Outbound adapters: implementations of the domain ports.

pub mod memory;
pub mod persistence;
pub mod security;
