//! Integration tests for section editing flows.
//!
//! These drive a `SectionStore` against the in-memory gateway the way the
//! editor does: load, edit, save, reload. The gateway's call counters and
//! injected failures verify what actually reaches storage.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use pagecraft_core::{MerchantId, PageType, SectionKind};
use pagecraft_engine::{
    MemoryGateway, SaveError, SectionGateway, SectionStore, StoreStatus, StoreTarget,
    build_section,
};
use serde_json::json;

fn page_target(merchant: MerchantId) -> StoreTarget {
    StoreTarget::Page {
        merchant,
        page_type: PageType::Home,
    }
}

fn kinds(store: &SectionStore) -> Vec<SectionKind> {
    store.sections().iter().map(|s| s.kind).collect()
}

fn positions(store: &SectionStore) -> Vec<u32> {
    store.sections().iter().map(|s| s.position).collect()
}

// =============================================================================
// Save and Reload
// =============================================================================

#[tokio::test]
async fn test_edit_save_reload_round_trip() {
    let gateway = MemoryGateway::new();
    let merchant = MerchantId::generate();

    let mut store = SectionStore::new(page_target(merchant), Vec::new());
    store.add(SectionKind::Hero, None);
    store.add(SectionKind::Newsletter, None);
    store.save(&gateway).await.unwrap();

    // A fresh session sees the saved collection as its clean baseline
    let loaded = gateway.fetch_page(merchant, PageType::Home).await.unwrap();
    let reloaded = SectionStore::new(page_target(merchant), loaded);
    assert_eq!(reloaded.status(), StoreStatus::Loaded);
    assert_eq!(
        kinds(&reloaded),
        vec![SectionKind::Hero, SectionKind::Newsletter]
    );
    assert_eq!(positions(&reloaded), vec![0, 1]);
}

#[tokio::test]
async fn test_clean_save_never_calls_gateway() {
    let gateway = MemoryGateway::new();
    let merchant = MerchantId::generate();
    gateway.seed_page(
        merchant,
        PageType::Home,
        vec![build_section(SectionKind::Hero, 0)],
    );

    let sections = gateway.fetch_page(merchant, PageType::Home).await.unwrap();
    let mut store = SectionStore::new(page_target(merchant), sections);

    store.save(&gateway).await.unwrap();
    assert_eq!(gateway.replace_count(), 0);
    assert_eq!(store.status(), StoreStatus::Loaded);
}

#[tokio::test]
async fn test_save_replaces_whole_collection() {
    let gateway = MemoryGateway::new();
    let merchant = MerchantId::generate();
    gateway.seed_page(
        merchant,
        PageType::Home,
        vec![
            build_section(SectionKind::Hero, 0),
            build_section(SectionKind::RichText, 1),
            build_section(SectionKind::Footer, 2),
        ],
    );

    let sections = gateway.fetch_page(merchant, PageType::Home).await.unwrap();
    let rich_text = sections[1].id;
    let mut store = SectionStore::new(page_target(merchant), sections);
    store.remove(rich_text).unwrap();
    store.add(SectionKind::Newsletter, None);
    store.save(&gateway).await.unwrap();

    let stored = gateway.fetch_page(merchant, PageType::Home).await.unwrap();
    let stored_kinds: Vec<SectionKind> = stored.iter().map(|s| s.kind).collect();
    assert_eq!(
        stored_kinds,
        vec![
            SectionKind::Hero,
            SectionKind::Footer,
            SectionKind::Newsletter
        ]
    );
    let stored_positions: Vec<u32> = stored.iter().map(|s| s.position).collect();
    assert_eq!(stored_positions, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_reorder_semantics_survive_save() {
    let gateway = MemoryGateway::new();
    let merchant = MerchantId::generate();
    gateway.seed_page(
        merchant,
        PageType::Home,
        vec![
            build_section(SectionKind::AnnouncementBar, 0),
            build_section(SectionKind::Hero, 1),
            build_section(SectionKind::Footer, 2),
        ],
    );

    let sections = gateway.fetch_page(merchant, PageType::Home).await.unwrap();
    let mut store = SectionStore::new(page_target(merchant), sections);
    store.reorder(0, 2).unwrap();
    store.save(&gateway).await.unwrap();

    let stored = gateway.fetch_page(merchant, PageType::Home).await.unwrap();
    let stored_kinds: Vec<SectionKind> = stored.iter().map(|s| s.kind).collect();
    assert_eq!(
        stored_kinds,
        vec![
            SectionKind::Hero,
            SectionKind::Footer,
            SectionKind::AnnouncementBar
        ]
    );
}

#[tokio::test]
async fn test_duplicated_section_persists_independently() {
    let gateway = MemoryGateway::new();
    let merchant = MerchantId::generate();

    let mut store = SectionStore::new(page_target(merchant), Vec::new());
    let original = store.add(SectionKind::Testimonials, None);
    let copy = store.duplicate(original).unwrap();
    store
        .update_setting(copy, "heading", json!("More praise"))
        .unwrap();
    store.save(&gateway).await.unwrap();

    let stored = gateway.fetch_page(merchant, PageType::Home).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].id, stored[1].id);
    assert_eq!(
        stored[0].settings.get("heading"),
        Some(&json!("What customers say"))
    );
    assert_eq!(stored[1].settings.get("heading"), Some(&json!("More praise")));
}

// =============================================================================
// Failure Handling
// =============================================================================

#[tokio::test]
async fn test_failed_save_keeps_edits_and_reason() {
    let gateway = MemoryGateway::new();
    let merchant = MerchantId::generate();
    gateway.seed_page(
        merchant,
        PageType::Home,
        vec![build_section(SectionKind::Hero, 0)],
    );

    let sections = gateway.fetch_page(merchant, PageType::Home).await.unwrap();
    let hero = sections[0].id;
    let mut store = SectionStore::new(page_target(merchant), sections);
    store.update_setting(hero, "title", json!("Sale")).unwrap();

    gateway.fail_next_replace();
    let err = store.save(&gateway).await.unwrap_err();
    assert!(matches!(err, SaveError::Gateway(_)));

    // The working set still carries the edit and the reason sticks
    assert_eq!(store.sections()[0].settings.get("title"), Some(&json!("Sale")));
    assert_eq!(store.status(), StoreStatus::Error);
    assert!(
        store
            .last_error()
            .unwrap()
            .contains("injected replace failure")
    );

    // Storage is untouched
    let stored = gateway.fetch_page(merchant, PageType::Home).await.unwrap();
    assert_eq!(
        stored[0].settings.get("title"),
        Some(&json!("Welcome to our store"))
    );

    // The reason survives further edits until a save succeeds
    store
        .update_setting(hero, "subtitle", json!("This week only"))
        .unwrap();
    assert_eq!(store.status(), StoreStatus::Error);

    store.save(&gateway).await.unwrap();
    assert_eq!(store.status(), StoreStatus::Loaded);
    assert!(store.last_error().is_none());
    let stored = gateway.fetch_page(merchant, PageType::Home).await.unwrap();
    assert_eq!(stored[0].settings.get("title"), Some(&json!("Sale")));
}

#[tokio::test]
async fn test_invalid_settings_never_reach_gateway() {
    let gateway = MemoryGateway::new();
    let merchant = MerchantId::generate();

    let mut store = SectionStore::new(page_target(merchant), Vec::new());
    let hero = store.add(SectionKind::Hero, None);
    store
        .update_setting(hero, "overlay_opacity", json!("opaque"))
        .unwrap();

    let err = store.save(&gateway).await.unwrap_err();
    let SaveError::Validation { violations } = err else {
        panic!("expected a validation failure");
    };
    assert!(!violations.is_empty());
    assert_eq!(gateway.replace_count(), 0);

    // Validation is a client problem, not a backend failure
    assert_eq!(store.status(), StoreStatus::Dirty);
    assert!(store.last_error().is_none());
}

// =============================================================================
// Template Editing
// =============================================================================

#[tokio::test]
async fn test_template_edits_save_through_gateway() {
    let gateway = MemoryGateway::new();
    let merchant = MerchantId::generate();
    let template = gateway.create_template(merchant, "Launch").await.unwrap();

    let mut store = SectionStore::new(
        StoreTarget::Template {
            merchant,
            template: template.id,
        },
        template.sections,
    );
    store.add(SectionKind::ProductGrid, None);
    store.save(&gateway).await.unwrap();

    let stored = gateway
        .fetch_template(merchant, template.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Launch");
    assert_eq!(stored.sections.len(), 1);
    assert_eq!(stored.sections[0].kind, SectionKind::ProductGrid);

    // Page storage is untouched by template saves
    assert!(
        gateway
            .fetch_page(merchant, PageType::Product)
            .await
            .unwrap()
            .is_empty()
    );
}
