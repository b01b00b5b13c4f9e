//! Page and placement enums for storefront composition.

use serde::{Deserialize, Serialize};

/// Storefront page a section collection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    /// Landing page of the storefront.
    Home,
    /// Collection browsing page.
    Catalog,
    /// Individual product page.
    Product,
}

impl PageType {
    /// All page types, in display order.
    pub const ALL: [Self; 3] = [Self::Home, Self::Catalog, Self::Product];

    /// Stable string key, matching the serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Catalog => "catalog",
            Self::Product => "product",
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "catalog" => Ok(Self::Catalog),
            "product" => Ok(Self::Product),
            _ => Err(format!("invalid page type: {s}")),
        }
    }
}

/// Region of the page layout a section renders into.
///
/// Header and footer sections frame every page; template sections make up
/// the reorderable body in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLocation {
    Header,
    Template,
    Footer,
}

impl SectionLocation {
    /// Stable string key, matching the serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Template => "template",
            Self::Footer => "footer",
        }
    }
}

impl std::fmt::Display for SectionLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SectionLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(Self::Header),
            "template" => Ok(Self::Template),
            "footer" => Ok(Self::Footer),
            _ => Err(format!("invalid section location: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_page_type_round_trips() {
        for page_type in PageType::ALL {
            assert_eq!(PageType::from_str(page_type.as_str()).unwrap(), page_type);
        }
    }

    #[test]
    fn test_page_type_serializes_snake_case() {
        let json = serde_json::to_string(&PageType::Catalog).unwrap();
        assert_eq!(json, "\"catalog\"");
    }

    #[test]
    fn test_location_rejects_unknown() {
        assert!(SectionLocation::from_str("sidebar").is_err());
    }
}
