//! The section instance type.

use serde::{Deserialize, Serialize};

use super::id::SectionId;
use super::kind::SectionKind;
use super::page::SectionLocation;
use super::settings::SettingsMap;

/// One placed section on a storefront page.
///
/// `position` is the section's index within its collection. Collections
/// keep positions dense (`0..len`) after every edit, so equal positions
/// never occur within one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub kind: SectionKind,
    pub position: u32,
    pub visible: bool,
    #[serde(default)]
    pub settings: SettingsMap,
    /// Explicit placement override; `None` means the kind's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SectionLocation>,
}

impl Section {
    /// The region this section renders into.
    #[must_use]
    pub fn resolved_location(&self) -> SectionLocation {
        self.location.unwrap_or_else(|| self.kind.location())
    }
}
