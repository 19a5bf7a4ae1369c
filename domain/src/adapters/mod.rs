//! Adapters that live inside the domain crate for convenience.
//!
//! The in-memory store is the only backend: records exist for the process
//! lifetime and reset on restart.

pub mod memory_repo;
