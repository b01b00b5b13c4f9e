//! Pagecraft Engine - Section composition and persistence.
//!
//! The engine owns everything between the editor's HTTP surface and the
//! database:
//!
//! - [`store`] - An editing session's working copy of a page, with dirty
//!   tracking against the last saved state
//! - [`resolver`] - Decides which section collection a product page renders
//! - [`gateway`] - Persistence behind a trait, with in-memory and Postgres
//!   backends
//! - [`factory`] - Builds new section instances from the kind registry

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod factory;
pub mod gateway;
pub mod resolver;
pub mod store;

pub use error::{GatewayError, SaveError, StoreError};
pub use factory::{build_section, duplicate_section};
pub use gateway::memory::MemoryGateway;
pub use gateway::{SectionGateway, SectionTemplate};
pub use resolver::{Resolution, ResolutionTier, SectionResolver};
pub use store::{SectionStore, StoreStatus, StoreTarget};
