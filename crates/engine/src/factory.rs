//! Builds new section instances from the kind registry.

use pagecraft_core::{Section, SectionId, SectionKind};

/// Build a fresh section of the given kind at the given position.
///
/// The new section starts visible, with its own copy of the kind's default
/// settings. Defaults are cloned per call, so sections built back to back
/// never share settings storage.
#[must_use]
pub fn build_section(kind: SectionKind, position: u32) -> Section {
    Section {
        id: SectionId::generate(),
        kind,
        position,
        visible: true,
        settings: kind.default_settings(),
        location: None,
    }
}

/// Build a copy of an existing section, placed right after it.
///
/// The copy gets a fresh ID and its own deep copy of the settings, so later
/// edits to either side stay independent.
#[must_use]
pub fn duplicate_section(source: &Section) -> Section {
    Section {
        id: SectionId::generate(),
        kind: source.kind,
        position: source.position + 1,
        visible: source.visible,
        settings: source.settings.clone(),
        location: source.location,
    }
}
