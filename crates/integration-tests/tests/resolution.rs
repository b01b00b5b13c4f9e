//! Integration tests for product page resolution.
//!
//! Resolution is infallible: a tier that cannot answer falls through to the
//! next, ending at the built-in fallback sections. These tests combine the
//! resolver with editing flows to check that saved edits show up in what
//! the storefront renders.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use pagecraft_core::{MerchantId, PageType, SectionKind};
use pagecraft_engine::{
    MemoryGateway, ResolutionTier, SectionGateway, SectionResolver, SectionStore, StoreTarget,
    build_section,
};

fn resolver_over(gateway: &Arc<MemoryGateway>) -> SectionResolver {
    SectionResolver::new(Arc::clone(gateway) as Arc<dyn SectionGateway>)
}

fn kinds(resolution: &pagecraft_engine::Resolution) -> Vec<SectionKind> {
    resolution.sections.iter().map(|s| s.kind).collect()
}

// =============================================================================
// Tier Selection
// =============================================================================

#[tokio::test]
async fn test_template_sections_win_over_page() {
    let gateway = Arc::new(MemoryGateway::new());
    let merchant = MerchantId::generate();
    gateway.seed_page(
        merchant,
        PageType::Product,
        vec![build_section(SectionKind::RichText, 0)],
    );
    let template = gateway.create_template(merchant, "Spring").await.unwrap();

    // Fill the template the way the editor does
    let mut store = SectionStore::new(
        StoreTarget::Template {
            merchant,
            template: template.id,
        },
        template.sections,
    );
    store.add(SectionKind::ImageWithText, None);
    store.add(SectionKind::RelatedProducts, None);
    store.save(gateway.as_ref()).await.unwrap();

    let resolution = resolver_over(&gateway)
        .resolve_product_sections(merchant, Some(template.id))
        .await;
    assert_eq!(resolution.source, ResolutionTier::Template);
    assert_eq!(
        kinds(&resolution),
        vec![SectionKind::ImageWithText, SectionKind::RelatedProducts]
    );
}

#[tokio::test]
async fn test_deleted_template_falls_back_to_page() {
    let gateway = Arc::new(MemoryGateway::new());
    let merchant = MerchantId::generate();
    gateway.seed_page(
        merchant,
        PageType::Product,
        vec![build_section(SectionKind::ProductGrid, 0)],
    );
    let template = gateway.create_template(merchant, "Retired").await.unwrap();
    gateway
        .replace_template_sections(merchant, template.id, &[build_section(SectionKind::Hero, 0)])
        .await
        .unwrap();
    gateway.delete_template(merchant, template.id).await.unwrap();

    // The stale assignment degrades to the merchant page
    let resolution = resolver_over(&gateway)
        .resolve_product_sections(merchant, Some(template.id))
        .await;
    assert_eq!(resolution.source, ResolutionTier::MerchantPage);
    assert_eq!(kinds(&resolution), vec![SectionKind::ProductGrid]);
}

#[tokio::test]
async fn test_empty_template_falls_back_to_page() {
    let gateway = Arc::new(MemoryGateway::new());
    let merchant = MerchantId::generate();
    gateway.seed_page(
        merchant,
        PageType::Product,
        vec![build_section(SectionKind::Newsletter, 0)],
    );
    let template = gateway.create_template(merchant, "Drafted").await.unwrap();

    let resolution = resolver_over(&gateway)
        .resolve_product_sections(merchant, Some(template.id))
        .await;
    assert_eq!(resolution.source, ResolutionTier::MerchantPage);
}

// =============================================================================
// Fallback Behavior
// =============================================================================

#[tokio::test]
async fn test_fresh_merchant_gets_fallback_sections() {
    let gateway = Arc::new(MemoryGateway::new());
    let merchant = MerchantId::generate();
    let resolver = resolver_over(&gateway);

    let resolution = resolver.resolve_product_sections(merchant, None).await;
    assert_eq!(resolution.source, ResolutionTier::Fallback);
    assert_eq!(
        kinds(&resolution),
        vec![SectionKind::ProductTrust, SectionKind::RelatedProducts]
    );
    let positions: Vec<u32> = resolution.sections.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0, 1]);
    assert!(resolution.sections.iter().all(|s| s.visible));

    // Fallback sections are fresh instances on every call
    let again = resolver.resolve_product_sections(merchant, None).await;
    assert_ne!(resolution.sections[0].id, again.sections[0].id);
}

#[tokio::test]
async fn test_resolution_survives_backend_failures() {
    let gateway = Arc::new(MemoryGateway::new());
    let merchant = MerchantId::generate();
    gateway.seed_page(
        merchant,
        PageType::Product,
        vec![build_section(SectionKind::Hero, 0)],
    );
    let resolver = resolver_over(&gateway);

    gateway.set_fail_fetches(true);
    let resolution = resolver.resolve_product_sections(merchant, None).await;
    assert_eq!(resolution.source, ResolutionTier::Fallback);

    gateway.set_fail_fetches(false);
    let resolution = resolver.resolve_product_sections(merchant, None).await;
    assert_eq!(resolution.source, ResolutionTier::MerchantPage);
}

// =============================================================================
// Edits Propagate to Resolution
// =============================================================================

#[tokio::test]
async fn test_saved_page_replaces_fallback() {
    let gateway = Arc::new(MemoryGateway::new());
    let merchant = MerchantId::generate();
    let resolver = resolver_over(&gateway);

    let before = resolver.resolve_product_sections(merchant, None).await;
    assert_eq!(before.source, ResolutionTier::Fallback);

    let mut store = SectionStore::new(
        StoreTarget::Page {
            merchant,
            page_type: PageType::Product,
        },
        Vec::new(),
    );
    store.add(SectionKind::Hero, None);
    store.save(gateway.as_ref()).await.unwrap();

    let after = resolver.resolve_product_sections(merchant, None).await;
    assert_eq!(after.source, ResolutionTier::MerchantPage);
    assert_eq!(kinds(&after), vec![SectionKind::Hero]);
}

#[tokio::test]
async fn test_template_edits_change_resolution() {
    let gateway = Arc::new(MemoryGateway::new());
    let merchant = MerchantId::generate();
    let template = gateway.create_template(merchant, "Evolving").await.unwrap();
    gateway
        .replace_template_sections(merchant, template.id, &[build_section(SectionKind::Hero, 0)])
        .await
        .unwrap();
    let resolver = resolver_over(&gateway);

    let before = resolver
        .resolve_product_sections(merchant, Some(template.id))
        .await;
    assert_eq!(kinds(&before), vec![SectionKind::Hero]);

    let loaded = gateway
        .fetch_template(merchant, template.id)
        .await
        .unwrap()
        .unwrap();
    let mut store = SectionStore::new(
        StoreTarget::Template {
            merchant,
            template: template.id,
        },
        loaded.sections,
    );
    store.add(SectionKind::Newsletter, None);
    store.save(gateway.as_ref()).await.unwrap();

    let after = resolver
        .resolve_product_sections(merchant, Some(template.id))
        .await;
    assert_eq!(
        kinds(&after),
        vec![SectionKind::Hero, SectionKind::Newsletter]
    );
}
