//! Pagecraft editor library.
//!
//! Exposes the editor's configuration, state, and routes as a library so
//! integration tests can drive the HTTP API without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod sessions;
pub mod state;
