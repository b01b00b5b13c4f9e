//! The section kind registry.
//!
//! Every section type a merchant can place on a page is a variant of
//! [`SectionKind`]. Adding a kind is a compile-time change: matches over
//! the enum are exhaustive, so a new variant that misses a branch fails
//! the build instead of failing at runtime.

use serde::{Deserialize, Serialize};

use super::page::SectionLocation;
use super::schema::{FieldControl, SelectOption, SettingField};
use super::settings::SettingsMap;

/// A section type merchants can add to a storefront page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    AnnouncementBar,
    Header,
    Hero,
    RichText,
    ImageWithText,
    ProductGrid,
    CollectionList,
    Testimonials,
    Newsletter,
    ProductTrust,
    RelatedProducts,
    Footer,
}

/// Everything the editor palette needs to present one kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionDescriptor {
    pub kind: SectionKind,
    pub label: &'static str,
    pub location: SectionLocation,
    pub defaults: SettingsMap,
    pub schema: &'static [SettingField],
}

impl SectionKind {
    /// All kinds, in palette order.
    pub const ALL: [Self; 12] = [
        Self::AnnouncementBar,
        Self::Header,
        Self::Hero,
        Self::RichText,
        Self::ImageWithText,
        Self::ProductGrid,
        Self::CollectionList,
        Self::Testimonials,
        Self::Newsletter,
        Self::ProductTrust,
        Self::RelatedProducts,
        Self::Footer,
    ];

    /// Look up a kind by its stable string key.
    ///
    /// Returns `None` for keys this build does not know, which callers use
    /// to skip unreadable stored rows instead of failing a whole page.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "announcement_bar" => Some(Self::AnnouncementBar),
            "header" => Some(Self::Header),
            "hero" => Some(Self::Hero),
            "rich_text" => Some(Self::RichText),
            "image_with_text" => Some(Self::ImageWithText),
            "product_grid" => Some(Self::ProductGrid),
            "collection_list" => Some(Self::CollectionList),
            "testimonials" => Some(Self::Testimonials),
            "newsletter" => Some(Self::Newsletter),
            "product_trust" => Some(Self::ProductTrust),
            "related_products" => Some(Self::RelatedProducts),
            "footer" => Some(Self::Footer),
            _ => None,
        }
    }

    /// Stable string key, matching the serialized form.
    #[must_use]
    pub const fn as_key(&self) -> &'static str {
        match self {
            Self::AnnouncementBar => "announcement_bar",
            Self::Header => "header",
            Self::Hero => "hero",
            Self::RichText => "rich_text",
            Self::ImageWithText => "image_with_text",
            Self::ProductGrid => "product_grid",
            Self::CollectionList => "collection_list",
            Self::Testimonials => "testimonials",
            Self::Newsletter => "newsletter",
            Self::ProductTrust => "product_trust",
            Self::RelatedProducts => "related_products",
            Self::Footer => "footer",
        }
    }

    /// Human-readable name shown in the editor palette.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AnnouncementBar => "Announcement bar",
            Self::Header => "Header",
            Self::Hero => "Hero banner",
            Self::RichText => "Rich text",
            Self::ImageWithText => "Image with text",
            Self::ProductGrid => "Product grid",
            Self::CollectionList => "Collection list",
            Self::Testimonials => "Testimonials",
            Self::Newsletter => "Newsletter signup",
            Self::ProductTrust => "Product trust badges",
            Self::RelatedProducts => "Related products",
            Self::Footer => "Footer",
        }
    }

    /// Where on the page this kind renders.
    #[must_use]
    pub const fn location(&self) -> SectionLocation {
        match self {
            Self::AnnouncementBar | Self::Header => SectionLocation::Header,
            Self::Footer => SectionLocation::Footer,
            Self::Hero
            | Self::RichText
            | Self::ImageWithText
            | Self::ProductGrid
            | Self::CollectionList
            | Self::Testimonials
            | Self::Newsletter
            | Self::ProductTrust
            | Self::RelatedProducts => SectionLocation::Template,
        }
    }

    /// Fresh default settings for a new instance of this kind.
    ///
    /// Returns a new map on every call; two instances never share settings
    /// storage, so editing one cannot leak into the other.
    #[must_use]
    pub fn default_settings(&self) -> SettingsMap {
        let defaults = match self {
            Self::AnnouncementBar => serde_json::json!({
                "text": "Free shipping on orders over $50",
                "link": "",
                "background_color": "#111111",
            }),
            Self::Header => serde_json::json!({
                "sticky": true,
                "show_search": true,
            }),
            Self::Hero => serde_json::json!({
                "title": "Welcome to our store",
                "subtitle": "New arrivals every week",
                "button_label": "Shop now",
                "button_link": "/collections",
                "background_image": "",
                "overlay_opacity": 40,
                "text_alignment": "center",
            }),
            Self::RichText => serde_json::json!({
                "content": "Share your brand story.",
                "max_width": 720,
            }),
            Self::ImageWithText => serde_json::json!({
                "image": "",
                "title": "Crafted with care",
                "body": "Tell customers what makes this product special.",
                "image_side": "left",
            }),
            Self::ProductGrid => serde_json::json!({
                "heading": "Our products",
                "collection": "",
                "columns": 4,
                "limit": 8,
            }),
            Self::CollectionList => serde_json::json!({
                "heading": "Shop by collection",
                "limit": 6,
            }),
            Self::Testimonials => serde_json::json!({
                "heading": "What customers say",
                "quotes": [
                    {"quote": "Absolutely love it.", "author": "Happy customer"},
                ],
            }),
            Self::Newsletter => serde_json::json!({
                "heading": "Stay in the loop",
                "subheading": "Sign up for news and offers",
                "button_label": "Subscribe",
                "background_color": "#f5f2ea",
            }),
            Self::ProductTrust => serde_json::json!({
                "heading": "Why shop with us",
                "badges": [
                    {"icon": "", "label": "Free returns"},
                    {"icon": "", "label": "Secure checkout"},
                    {"icon": "", "label": "2-year warranty"},
                ],
            }),
            Self::RelatedProducts => serde_json::json!({
                "heading": "You may also like",
                "limit": 4,
            }),
            Self::Footer => serde_json::json!({
                "show_newsletter": false,
                "copyright": "© Your store",
            }),
        };
        SettingsMap::from_stored(defaults)
    }

    /// Settings schema for this kind's editor panel.
    #[must_use]
    pub const fn settings_schema(&self) -> &'static [SettingField] {
        match self {
            Self::AnnouncementBar => ANNOUNCEMENT_BAR_SCHEMA,
            Self::Header => HEADER_SCHEMA,
            Self::Hero => HERO_SCHEMA,
            Self::RichText => RICH_TEXT_SCHEMA,
            Self::ImageWithText => IMAGE_WITH_TEXT_SCHEMA,
            Self::ProductGrid => PRODUCT_GRID_SCHEMA,
            Self::CollectionList => COLLECTION_LIST_SCHEMA,
            Self::Testimonials => TESTIMONIALS_SCHEMA,
            Self::Newsletter => NEWSLETTER_SCHEMA,
            Self::ProductTrust => PRODUCT_TRUST_SCHEMA,
            Self::RelatedProducts => RELATED_PRODUCTS_SCHEMA,
            Self::Footer => FOOTER_SCHEMA,
        }
    }

    /// Full palette entry for this kind.
    #[must_use]
    pub fn descriptor(&self) -> SectionDescriptor {
        SectionDescriptor {
            kind: *self,
            label: self.label(),
            location: self.location(),
            defaults: self.default_settings(),
            schema: self.settings_schema(),
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl std::str::FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| format!("invalid section kind: {s}"))
    }
}

// ===== Schemas =====

const TEXT_ALIGNMENTS: &[SelectOption] = &[
    SelectOption { value: "left", label: "Left" },
    SelectOption { value: "center", label: "Center" },
    SelectOption { value: "right", label: "Right" },
];

const IMAGE_SIDES: &[SelectOption] = &[
    SelectOption { value: "left", label: "Left" },
    SelectOption { value: "right", label: "Right" },
];

const QUOTE_FIELDS: &[SettingField] = &[
    SettingField { key: "quote", label: "Quote", control: FieldControl::Textarea },
    SettingField { key: "author", label: "Author", control: FieldControl::Text },
];

const BADGE_FIELDS: &[SettingField] = &[
    SettingField { key: "icon", label: "Icon", control: FieldControl::Image },
    SettingField { key: "label", label: "Label", control: FieldControl::Text },
];

const ANNOUNCEMENT_BAR_SCHEMA: &[SettingField] = &[
    SettingField { key: "text", label: "Text", control: FieldControl::Text },
    SettingField { key: "link", label: "Link", control: FieldControl::Text },
    SettingField {
        key: "background_color",
        label: "Background color",
        control: FieldControl::Color,
    },
];

const HEADER_SCHEMA: &[SettingField] = &[
    SettingField { key: "sticky", label: "Sticky header", control: FieldControl::Toggle },
    SettingField { key: "show_search", label: "Show search", control: FieldControl::Toggle },
];

const HERO_SCHEMA: &[SettingField] = &[
    SettingField { key: "title", label: "Title", control: FieldControl::Text },
    SettingField { key: "subtitle", label: "Subtitle", control: FieldControl::Text },
    SettingField { key: "button_label", label: "Button label", control: FieldControl::Text },
    SettingField { key: "button_link", label: "Button link", control: FieldControl::Text },
    SettingField {
        key: "background_image",
        label: "Background image",
        control: FieldControl::Image,
    },
    SettingField {
        key: "overlay_opacity",
        label: "Overlay opacity",
        control: FieldControl::Range { min: 0, max: 100, step: 5, unit: Some("%") },
    },
    SettingField {
        key: "text_alignment",
        label: "Text alignment",
        control: FieldControl::Select { options: TEXT_ALIGNMENTS },
    },
];

const RICH_TEXT_SCHEMA: &[SettingField] = &[
    SettingField { key: "content", label: "Content", control: FieldControl::Textarea },
    SettingField {
        key: "max_width",
        label: "Maximum width",
        control: FieldControl::Number { min: Some(320), max: Some(1280) },
    },
];

const IMAGE_WITH_TEXT_SCHEMA: &[SettingField] = &[
    SettingField { key: "image", label: "Image", control: FieldControl::Image },
    SettingField { key: "title", label: "Title", control: FieldControl::Text },
    SettingField { key: "body", label: "Body", control: FieldControl::Textarea },
    SettingField {
        key: "image_side",
        label: "Image side",
        control: FieldControl::Select { options: IMAGE_SIDES },
    },
];

const PRODUCT_GRID_SCHEMA: &[SettingField] = &[
    SettingField { key: "heading", label: "Heading", control: FieldControl::Text },
    SettingField { key: "collection", label: "Collection handle", control: FieldControl::Text },
    SettingField {
        key: "columns",
        label: "Columns",
        control: FieldControl::Range { min: 2, max: 6, step: 1, unit: None },
    },
    SettingField {
        key: "limit",
        label: "Products to show",
        control: FieldControl::Number { min: Some(1), max: Some(24) },
    },
];

const COLLECTION_LIST_SCHEMA: &[SettingField] = &[
    SettingField { key: "heading", label: "Heading", control: FieldControl::Text },
    SettingField {
        key: "limit",
        label: "Collections to show",
        control: FieldControl::Number { min: Some(1), max: Some(12) },
    },
];

const TESTIMONIALS_SCHEMA: &[SettingField] = &[
    SettingField { key: "heading", label: "Heading", control: FieldControl::Text },
    SettingField {
        key: "quotes",
        label: "Quotes",
        control: FieldControl::Items { fields: QUOTE_FIELDS },
    },
];

const NEWSLETTER_SCHEMA: &[SettingField] = &[
    SettingField { key: "heading", label: "Heading", control: FieldControl::Text },
    SettingField { key: "subheading", label: "Subheading", control: FieldControl::Text },
    SettingField { key: "button_label", label: "Button label", control: FieldControl::Text },
    SettingField {
        key: "background_color",
        label: "Background color",
        control: FieldControl::Color,
    },
];

const PRODUCT_TRUST_SCHEMA: &[SettingField] = &[
    SettingField { key: "heading", label: "Heading", control: FieldControl::Text },
    SettingField {
        key: "badges",
        label: "Badges",
        control: FieldControl::Items { fields: BADGE_FIELDS },
    },
];

const RELATED_PRODUCTS_SCHEMA: &[SettingField] = &[
    SettingField { key: "heading", label: "Heading", control: FieldControl::Text },
    SettingField {
        key: "limit",
        label: "Products to show",
        control: FieldControl::Range { min: 2, max: 12, step: 1, unit: None },
    },
];

const FOOTER_SCHEMA: &[SettingField] = &[
    SettingField {
        key: "show_newsletter",
        label: "Show newsletter signup",
        control: FieldControl::Toggle,
    },
    SettingField { key: "copyright", label: "Copyright notice", control: FieldControl::Text },
];
