//! In-memory gateway for tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pagecraft_core::{MerchantId, PageType, Section, TemplateId};

use super::{SectionGateway, SectionTemplate};
use crate::error::GatewayError;

/// Gateway backed by process-local maps.
///
/// Besides storage it counts fetch and replace calls and can inject
/// failures, which is what the store and resolver tests are built on.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    pages: Mutex<HashMap<(MerchantId, PageType), Vec<Section>>>,
    templates: Mutex<HashMap<(MerchantId, TemplateId), SectionTemplate>>,
    fetch_calls: AtomicUsize,
    replace_calls: AtomicUsize,
    fail_fetches: AtomicBool,
    fail_replace_once: AtomicBool,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Seeding and instrumentation =====

    /// Store a page collection directly, bypassing call counters.
    pub fn seed_page(&self, merchant: MerchantId, page_type: PageType, sections: Vec<Section>) {
        lock(&self.pages).insert((merchant, page_type), sections);
    }

    /// Store a template directly, bypassing call counters.
    pub fn seed_template(&self, merchant: MerchantId, template: SectionTemplate) {
        lock(&self.templates).insert((merchant, template.id), template);
    }

    /// Number of `fetch_page` and `fetch_template` calls so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::Relaxed)
    }

    /// Number of `replace_page` and `replace_template_sections` calls so far.
    #[must_use]
    pub fn replace_count(&self) -> usize {
        self.replace_calls.load(Ordering::Relaxed)
    }

    /// Make every fetch fail until switched back off.
    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::Relaxed);
    }

    /// Make exactly the next replace call fail.
    pub fn fail_next_replace(&self) {
        self.fail_replace_once.store(true, Ordering::Relaxed);
    }

    // ===== Internals =====

    fn check_fetch(&self) -> Result<(), GatewayError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_fetches.load(Ordering::Relaxed) {
            return Err(GatewayError::Unavailable("injected fetch failure".into()));
        }
        Ok(())
    }

    fn check_replace(&self) -> Result<(), GatewayError> {
        self.replace_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_replace_once.swap(false, Ordering::Relaxed) {
            return Err(GatewayError::Unavailable("injected replace failure".into()));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl SectionGateway for MemoryGateway {
    async fn fetch_page(
        &self,
        merchant: MerchantId,
        page_type: PageType,
    ) -> Result<Vec<Section>, GatewayError> {
        self.check_fetch()?;
        Ok(lock(&self.pages)
            .get(&(merchant, page_type))
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_page(
        &self,
        merchant: MerchantId,
        page_type: PageType,
        sections: &[Section],
    ) -> Result<(), GatewayError> {
        self.check_replace()?;
        lock(&self.pages).insert((merchant, page_type), sections.to_vec());
        Ok(())
    }

    async fn fetch_template(
        &self,
        merchant: MerchantId,
        template: TemplateId,
    ) -> Result<Option<SectionTemplate>, GatewayError> {
        self.check_fetch()?;
        Ok(lock(&self.templates).get(&(merchant, template)).cloned())
    }

    async fn list_templates(
        &self,
        merchant: MerchantId,
    ) -> Result<Vec<SectionTemplate>, GatewayError> {
        let mut templates: Vec<SectionTemplate> = lock(&self.templates)
            .iter()
            .filter(|((owner, _), _)| *owner == merchant)
            .map(|(_, template)| template.clone())
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    async fn create_template(
        &self,
        merchant: MerchantId,
        name: &str,
    ) -> Result<SectionTemplate, GatewayError> {
        let template = SectionTemplate {
            id: TemplateId::generate(),
            name: name.to_owned(),
            sections: Vec::new(),
        };
        lock(&self.templates).insert((merchant, template.id), template.clone());
        Ok(template)
    }

    async fn replace_template_sections(
        &self,
        merchant: MerchantId,
        template: TemplateId,
        sections: &[Section],
    ) -> Result<(), GatewayError> {
        self.check_replace()?;
        let mut templates = lock(&self.templates);
        let entry = templates
            .get_mut(&(merchant, template))
            .ok_or(GatewayError::NotFound)?;
        entry.sections = sections.to_vec();
        Ok(())
    }

    async fn rename_template(
        &self,
        merchant: MerchantId,
        template: TemplateId,
        name: &str,
    ) -> Result<(), GatewayError> {
        let mut templates = lock(&self.templates);
        let entry = templates
            .get_mut(&(merchant, template))
            .ok_or(GatewayError::NotFound)?;
        entry.name = name.to_owned();
        Ok(())
    }

    async fn delete_template(
        &self,
        merchant: MerchantId,
        template: TemplateId,
    ) -> Result<(), GatewayError> {
        lock(&self.templates)
            .remove(&(merchant, template))
            .map(|_| ())
            .ok_or(GatewayError::NotFound)
    }
}
