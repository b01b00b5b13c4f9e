//! Pagecraft Core - Shared types library.
//!
//! This crate provides common types used across all Pagecraft components:
//! - `engine` - Section store, resolution, and persistence gateways
//! - `editor` - HTTP editing service for merchant storefronts
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Sections, the kind registry, settings, and type-safe IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
