//! The section store: one editing session's working copy of a page.
//!
//! A store is loaded from persisted sections, edited in memory, and saved
//! back as a whole. It tracks dirtiness by comparing the working copy
//! against the last saved baseline, so reverting an edit by hand makes the
//! store clean again without any undo bookkeeping.

use pagecraft_core::{
    MerchantId, PageType, Section, SectionId, SectionKind, SettingsViolation, TemplateId,
    validate_settings,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{SaveError, StoreError};
use crate::factory::{build_section, duplicate_section};
use crate::gateway::SectionGateway;

/// What a store edits and where saves go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTarget {
    /// The live section collection of one storefront page.
    Page {
        merchant: MerchantId,
        page_type: PageType,
    },
    /// The section collection of a reusable template.
    Template {
        merchant: MerchantId,
        template: TemplateId,
    },
}

/// Lifecycle state of a store, as shown in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    /// Working copy matches the saved baseline.
    Loaded,
    /// Working copy has unsaved edits.
    Dirty,
    /// A save is in flight.
    Saving,
    /// The last save failed; the reason is in `last_error`.
    Error,
}

/// An editable, order-preserving collection of sections.
#[derive(Debug)]
pub struct SectionStore {
    target: StoreTarget,
    working: Vec<Section>,
    baseline: Vec<Section>,
    dirty: bool,
    saving: bool,
    last_error: Option<String>,
}

impl SectionStore {
    /// Open a store over sections loaded from persistence.
    ///
    /// Stored positions are normalized on the way in: sections are ordered
    /// by their stored position and renumbered densely from zero.
    #[must_use]
    pub fn new(target: StoreTarget, mut sections: Vec<Section>) -> Self {
        normalize_positions(&mut sections);
        Self {
            target,
            baseline: sections.clone(),
            working: sections,
            dirty: false,
            saving: false,
            last_error: None,
        }
    }

    // ===== Accessors =====

    #[must_use]
    pub const fn target(&self) -> StoreTarget {
        self.target
    }

    /// Working copy, in render order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.working
    }

    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.working.iter().find(|section| section.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.working.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Why the last save failed, if it did.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current lifecycle state.
    ///
    /// A failed save keeps the store in `Error` through further edits; only
    /// a successful save or a reset moves it out.
    #[must_use]
    pub const fn status(&self) -> StoreStatus {
        if self.saving {
            StoreStatus::Saving
        } else if self.last_error.is_some() {
            StoreStatus::Error
        } else if self.dirty {
            StoreStatus::Dirty
        } else {
            StoreStatus::Loaded
        }
    }

    // ===== Editing operations =====

    /// Add a new section of `kind` at `index`, or append when `index` is
    /// `None` or past the end. Returns the new section's ID.
    pub fn add(&mut self, kind: SectionKind, index: Option<usize>) -> SectionId {
        let at = index.unwrap_or(self.working.len()).min(self.working.len());
        let section = build_section(kind, 0);
        let id = section.id;
        self.working.insert(at, section);
        self.after_mutation();
        id
    }

    /// Remove the section with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SectionNotFound`] if no such section exists.
    pub fn remove(&mut self, id: SectionId) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        self.working.remove(index);
        self.after_mutation();
        Ok(())
    }

    /// Move the section at `from` so it ends up at `to`.
    ///
    /// This is a list splice: the section is taken out, then reinserted at
    /// `to` within the shortened list. `to` past the end means "move to the
    /// back".
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfBounds`] if `from` does not point at
    /// an existing section.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        if from >= self.working.len() {
            return Err(StoreError::IndexOutOfBounds {
                index: from,
                len: self.working.len(),
            });
        }
        let section = self.working.remove(from);
        let at = to.min(self.working.len());
        self.working.insert(at, section);
        self.after_mutation();
        Ok(())
    }

    /// Insert a copy of the section right after the original.
    ///
    /// The copy gets a fresh ID and its own deep copy of the settings, so
    /// later edits to either side stay independent. Returns the copy's ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SectionNotFound`] if no such section exists.
    pub fn duplicate(&mut self, id: SectionId) -> Result<SectionId, StoreError> {
        let (index, copy) = self
            .working
            .iter()
            .enumerate()
            .find(|(_, section)| section.id == id)
            .map(|(index, source)| (index, duplicate_section(source)))
            .ok_or(StoreError::SectionNotFound(id))?;
        let copy_id = copy.id;
        self.working.insert(index + 1, copy);
        self.after_mutation();
        Ok(copy_id)
    }

    /// Set one setting on a section.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SectionNotFound`] if no such section exists.
    pub fn update_setting(
        &mut self,
        id: SectionId,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let section = self
            .working
            .iter_mut()
            .find(|section| section.id == id)
            .ok_or(StoreError::SectionNotFound(id))?;
        section.settings.set(key, value);
        self.after_mutation();
        Ok(())
    }

    /// Flip a section's visibility. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SectionNotFound`] if no such section exists.
    pub fn toggle_visibility(&mut self, id: SectionId) -> Result<bool, StoreError> {
        let section = self
            .working
            .iter_mut()
            .find(|section| section.id == id)
            .ok_or(StoreError::SectionNotFound(id))?;
        section.visible = !section.visible;
        let visible = section.visible;
        self.after_mutation();
        Ok(visible)
    }

    /// Discard unsaved edits and return to the saved baseline.
    ///
    /// Also clears a failed save's error.
    pub fn reset(&mut self) {
        self.working = self.baseline.clone();
        self.last_error = None;
        self.after_mutation();
    }

    // ===== Persistence =====

    /// Persist the working copy through the gateway.
    ///
    /// A clean store saves nothing and makes no gateway calls. Settings are
    /// validated against their kind schemas first; any violation aborts the
    /// save before the gateway is touched. On success the working copy
    /// becomes the new baseline. On failure the edits are kept and the
    /// store reports [`StoreStatus::Error`] with the reason.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Validation`] for schema violations and
    /// [`SaveError::Gateway`] when the backend rejects the save.
    #[instrument(skip(self, gateway), fields(sections = self.working.len()))]
    pub async fn save(&mut self, gateway: &dyn SectionGateway) -> Result<(), SaveError> {
        if !self.dirty {
            // Nothing to persist; a stale failure no longer applies.
            self.last_error = None;
            return Ok(());
        }

        let violations: Vec<SettingsViolation> = self
            .working
            .iter()
            .flat_map(|section| validate_settings(section.kind, &section.settings))
            .collect();
        if !violations.is_empty() {
            warn!(count = violations.len(), "save blocked by settings violations");
            return Err(SaveError::Validation { violations });
        }

        self.saving = true;
        let result = match self.target {
            StoreTarget::Page {
                merchant,
                page_type,
            } => gateway.replace_page(merchant, page_type, &self.working).await,
            StoreTarget::Template {
                merchant,
                template,
            } => {
                gateway
                    .replace_template_sections(merchant, template, &self.working)
                    .await
            }
        };
        self.saving = false;

        match result {
            Ok(()) => {
                self.baseline = self.working.clone();
                self.last_error = None;
                self.refresh_dirty();
                debug!("store saved");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "store save failed");
                self.last_error = Some(err.to_string());
                Err(SaveError::Gateway(err))
            }
        }
    }

    // ===== Internals =====

    fn index_of(&self, id: SectionId) -> Result<usize, StoreError> {
        self.working
            .iter()
            .position(|section| section.id == id)
            .ok_or(StoreError::SectionNotFound(id))
    }

    fn after_mutation(&mut self) {
        assign_positions(&mut self.working);
        self.refresh_dirty();
    }

    fn refresh_dirty(&mut self) {
        // Order-sensitive structural comparison against the baseline.
        self.dirty = self.working != self.baseline;
    }
}

/// Order sections by their stored position and renumber densely from zero.
///
/// Gaps and duplicates in stored positions disappear; ties keep their
/// stored order.
pub fn normalize_positions(sections: &mut [Section]) {
    sections.sort_by_key(|section| section.position);
    assign_positions(sections);
}

fn assign_positions(sections: &mut [Section]) {
    for (index, section) in sections.iter_mut().enumerate() {
        section.position = u32::try_from(index).unwrap_or(u32::MAX);
    }
}
