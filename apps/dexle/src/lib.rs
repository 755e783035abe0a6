//! # dexle - THE BINARY (library surface)
//!
//! Exposes the HTTP API and CLI modules so integration tests can build
//! routers and drive commands without spawning a process.

pub mod api;
pub mod cli;
