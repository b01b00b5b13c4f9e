//! Persistence gateways for section data.
//!
//! The engine talks to storage through [`SectionGateway`]. Saves replace a
//! page's entire collection in one atomic call; readers never observe a
//! half-applied edit.
//!
//! Two backends live here: [`memory::MemoryGateway`] backs tests and local
//! development, and [`postgres::PostgresGateway`] (behind the `postgres`
//! feature) backs deployments.

use std::str::FromStr;

use async_trait::async_trait;
use pagecraft_core::{
    MerchantId, PageType, Section, SectionId, SectionKind, SectionLocation, SettingsMap,
    TemplateId,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::GatewayError;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

/// A reusable, named section collection a merchant can assign to product
/// pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTemplate {
    pub id: TemplateId,
    pub name: String,
    pub sections: Vec<Section>,
}

/// Storage operations for pages and templates.
///
/// All writes are atomic at the collection level: `replace_*` either
/// persists the full list or leaves storage unchanged.
#[async_trait]
pub trait SectionGateway: Send + Sync {
    /// Load the sections of one storefront page, in position order.
    ///
    /// A page that was never saved loads as an empty collection.
    async fn fetch_page(
        &self,
        merchant: MerchantId,
        page_type: PageType,
    ) -> Result<Vec<Section>, GatewayError>;

    /// Replace the full section collection of one storefront page.
    async fn replace_page(
        &self,
        merchant: MerchantId,
        page_type: PageType,
        sections: &[Section],
    ) -> Result<(), GatewayError>;

    /// Load one template with its sections, or `None` if the merchant has
    /// no such template.
    async fn fetch_template(
        &self,
        merchant: MerchantId,
        template: TemplateId,
    ) -> Result<Option<SectionTemplate>, GatewayError>;

    /// All templates belonging to a merchant, ordered by name.
    async fn list_templates(
        &self,
        merchant: MerchantId,
    ) -> Result<Vec<SectionTemplate>, GatewayError>;

    /// Create an empty template.
    async fn create_template(
        &self,
        merchant: MerchantId,
        name: &str,
    ) -> Result<SectionTemplate, GatewayError>;

    /// Replace the full section collection of one template.
    async fn replace_template_sections(
        &self,
        merchant: MerchantId,
        template: TemplateId,
        sections: &[Section],
    ) -> Result<(), GatewayError>;

    /// Rename a template.
    async fn rename_template(
        &self,
        merchant: MerchantId,
        template: TemplateId,
        name: &str,
    ) -> Result<(), GatewayError>;

    /// Delete a template and its sections.
    async fn delete_template(
        &self,
        merchant: MerchantId,
        template: TemplateId,
    ) -> Result<(), GatewayError>;
}

/// Assemble a section from its stored parts.
///
/// Returns `Ok(None)` for a kind key this build does not know; callers
/// skip the row so one stale row cannot take a page down. An unknown
/// location key degrades to `None`, while a negative position is
/// corruption: nothing here ever writes one.
///
/// # Errors
///
/// Returns [`GatewayError::DataCorruption`] when `position` is negative.
pub fn section_from_stored(
    id: SectionId,
    kind_key: &str,
    position: i32,
    visible: bool,
    settings: serde_json::Value,
    location: Option<&str>,
) -> Result<Option<Section>, GatewayError> {
    let Some(kind) = SectionKind::from_key(kind_key) else {
        warn!(kind = %kind_key, "skipping stored section with unknown kind");
        return Ok(None);
    };

    let position = u32::try_from(position).map_err(|_| {
        GatewayError::DataCorruption(format!("section {id} has negative position {position}"))
    })?;

    let location = location.and_then(|raw| match SectionLocation::from_str(raw) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(location = %raw, "ignoring unknown section location");
            None
        }
    });

    Ok(Some(Section {
        id,
        kind,
        position,
        visible,
        settings: SettingsMap::from_stored(settings),
        location,
    }))
}
