//! Decides which section collection a product page renders.
//!
//! Product pages resolve through an ordered cascade of sources: the
//! product's assigned template, then the merchant's own product page
//! layout, then a hardcoded fallback. A source that errors or comes back
//! empty hands over to the next one, so resolution never fails; the worst
//! case is the fallback layout.

use std::sync::Arc;

use pagecraft_core::{MerchantId, PageType, Section, SectionKind, TemplateId};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::factory::build_section;
use crate::gateway::SectionGateway;
use crate::store::normalize_positions;

/// One source in the resolution cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    /// The template assigned to the product.
    Template,
    /// The merchant's saved product page.
    MerchantPage,
    /// Hardcoded default sections.
    Fallback,
}

impl ResolutionTier {
    /// The cascade, in resolution order. `Fallback` is last and always
    /// resolves.
    pub const CASCADE: [Self; 3] = [Self::Template, Self::MerchantPage, Self::Fallback];
}

/// The sections a product page should render, and where they came from.
///
/// Hidden sections are included; filtering on visibility is the
/// renderer's concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub sections: Vec<Section>,
    pub source: ResolutionTier,
}

/// Resolves product page sections through the cascade.
pub struct SectionResolver {
    gateway: Arc<dyn SectionGateway>,
}

impl SectionResolver {
    #[must_use]
    pub fn new(gateway: Arc<dyn SectionGateway>) -> Self {
        Self { gateway }
    }

    /// Resolve the sections for a product page.
    ///
    /// `template` is the template assigned to the product, if any.
    /// Resolution is infallible: storage errors are logged and treated as
    /// a miss for that tier.
    #[instrument(skip(self))]
    pub async fn resolve_product_sections(
        &self,
        merchant: MerchantId,
        template: Option<TemplateId>,
    ) -> Resolution {
        for tier in ResolutionTier::CASCADE {
            if let Some(resolution) = self.attempt(tier, merchant, template).await {
                debug!(
                    source = ?resolution.source,
                    count = resolution.sections.len(),
                    "resolved product page sections"
                );
                return resolution;
            }
        }
        unreachable!("the fallback tier always resolves")
    }

    async fn attempt(
        &self,
        tier: ResolutionTier,
        merchant: MerchantId,
        template: Option<TemplateId>,
    ) -> Option<Resolution> {
        match tier {
            ResolutionTier::Template => {
                let template_id = template?;
                match self.gateway.fetch_template(merchant, template_id).await {
                    Ok(Some(found)) if !found.sections.is_empty() => {
                        Some(resolved(found.sections, tier))
                    }
                    // A missing or empty template falls through.
                    Ok(_) => None,
                    Err(err) => {
                        warn!(error = %err, "template lookup failed; trying next source");
                        None
                    }
                }
            }
            ResolutionTier::MerchantPage => {
                match self.gateway.fetch_page(merchant, PageType::Product).await {
                    Ok(sections) if !sections.is_empty() => Some(resolved(sections, tier)),
                    Ok(_) => None,
                    Err(err) => {
                        warn!(error = %err, "merchant page lookup failed; trying next source");
                        None
                    }
                }
            }
            ResolutionTier::Fallback => Some(resolved(fallback_product_sections(), tier)),
        }
    }
}

fn resolved(mut sections: Vec<Section>, source: ResolutionTier) -> Resolution {
    normalize_positions(&mut sections);
    Resolution { sections, source }
}

/// The hardcoded sections every product page can fall back to.
///
/// Built fresh per call, so each resolution gets its own IDs and its own
/// copies of the default settings.
#[must_use]
pub fn fallback_product_sections() -> Vec<Section> {
    vec![
        build_section(SectionKind::ProductTrust, 0),
        build_section(SectionKind::RelatedProducts, 1),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use crate::gateway::SectionTemplate;
    use crate::gateway::memory::MemoryGateway;

    use super::*;

    fn resolver_with(gateway: Arc<MemoryGateway>) -> SectionResolver {
        SectionResolver::new(gateway)
    }

    fn template_with_sections(kinds: &[SectionKind]) -> SectionTemplate {
        let sections = kinds
            .iter()
            .enumerate()
            // Sparse stored positions; resolution renumbers them.
            .map(|(index, kind)| build_section(*kind, u32::try_from(index * 10 + 3).unwrap()))
            .collect();
        SectionTemplate {
            id: TemplateId::generate(),
            name: "Launch".into(),
            sections,
        }
    }

    #[tokio::test]
    async fn test_assigned_template_wins() {
        let gateway = Arc::new(MemoryGateway::new());
        let merchant = MerchantId::generate();
        let template = template_with_sections(&[SectionKind::Hero, SectionKind::RelatedProducts]);
        let template_id = template.id;
        gateway.seed_template(merchant, template);
        gateway.seed_page(
            merchant,
            PageType::Product,
            vec![build_section(SectionKind::RichText, 0)],
        );

        let resolution = resolver_with(Arc::clone(&gateway))
            .resolve_product_sections(merchant, Some(template_id))
            .await;

        assert_eq!(resolution.source, ResolutionTier::Template);
        let kinds: Vec<SectionKind> = resolution.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SectionKind::Hero, SectionKind::RelatedProducts]);
        let positions: Vec<u32> = resolution.sections.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_missing_template_falls_to_merchant_page() {
        let gateway = Arc::new(MemoryGateway::new());
        let merchant = MerchantId::generate();
        gateway.seed_page(
            merchant,
            PageType::Product,
            vec![build_section(SectionKind::ProductGrid, 0)],
        );

        let resolution = resolver_with(Arc::clone(&gateway))
            .resolve_product_sections(merchant, Some(TemplateId::generate()))
            .await;

        assert_eq!(resolution.source, ResolutionTier::MerchantPage);
        assert_eq!(resolution.sections[0].kind, SectionKind::ProductGrid);
    }

    #[tokio::test]
    async fn test_empty_template_falls_through() {
        let gateway = Arc::new(MemoryGateway::new());
        let merchant = MerchantId::generate();
        let template = SectionTemplate {
            id: TemplateId::generate(),
            name: "Empty".into(),
            sections: vec![],
        };
        let template_id = template.id;
        gateway.seed_template(merchant, template);
        gateway.seed_page(
            merchant,
            PageType::Product,
            vec![build_section(SectionKind::Testimonials, 0)],
        );

        let resolution = resolver_with(Arc::clone(&gateway))
            .resolve_product_sections(merchant, Some(template_id))
            .await;

        assert_eq!(resolution.source, ResolutionTier::MerchantPage);
    }

    #[tokio::test]
    async fn test_no_template_assigned_uses_merchant_page() {
        let gateway = Arc::new(MemoryGateway::new());
        let merchant = MerchantId::generate();
        gateway.seed_page(
            merchant,
            PageType::Product,
            vec![build_section(SectionKind::ImageWithText, 0)],
        );

        let resolution = resolver_with(Arc::clone(&gateway))
            .resolve_product_sections(merchant, None)
            .await;

        assert_eq!(resolution.source, ResolutionTier::MerchantPage);
    }

    #[tokio::test]
    async fn test_nothing_stored_resolves_to_fallback() {
        let gateway = Arc::new(MemoryGateway::new());
        let resolution = resolver_with(Arc::clone(&gateway))
            .resolve_product_sections(MerchantId::generate(), None)
            .await;

        assert_eq!(resolution.source, ResolutionTier::Fallback);
        let kinds: Vec<SectionKind> = resolution.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SectionKind::ProductTrust, SectionKind::RelatedProducts]);
        assert!(resolution.sections.iter().all(|s| s.visible));
        let positions: Vec<u32> = resolution.sections.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_fallback_sections_are_fresh_per_resolution() {
        let gateway = Arc::new(MemoryGateway::new());
        let resolver = resolver_with(Arc::clone(&gateway));
        let merchant = MerchantId::generate();

        let first = resolver.resolve_product_sections(merchant, None).await;
        let second = resolver.resolve_product_sections(merchant, None).await;
        assert_ne!(first.sections[0].id, second.sections[0].id);
    }

    #[tokio::test]
    async fn test_storage_errors_degrade_to_fallback() {
        let gateway = Arc::new(MemoryGateway::new());
        let merchant = MerchantId::generate();
        let template = template_with_sections(&[SectionKind::Hero]);
        let template_id = template.id;
        gateway.seed_template(merchant, template);
        gateway.seed_page(
            merchant,
            PageType::Product,
            vec![build_section(SectionKind::RichText, 0)],
        );
        gateway.set_fail_fetches(true);

        let resolution = resolver_with(Arc::clone(&gateway))
            .resolve_product_sections(merchant, Some(template_id))
            .await;

        assert_eq!(resolution.source, ResolutionTier::Fallback);
    }
}
