//! Core types for Pagecraft.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod kind;
pub mod page;
pub mod schema;
pub mod section;
pub mod settings;

pub use id::*;
pub use kind::{SectionDescriptor, SectionKind};
pub use page::*;
pub use schema::{FieldControl, SelectOption, SettingField, SettingsViolation, validate_settings};
pub use section::Section;
pub use settings::SettingsMap;
