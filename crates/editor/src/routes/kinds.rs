//! Section palette routes.

use axum::Json;

use pagecraft_core::{SectionDescriptor, SectionKind};

/// List every available section kind with its label, default settings, and
/// settings schema, in palette order.
///
/// GET /api/section-kinds
pub async fn list() -> Json<Vec<SectionDescriptor>> {
    Json(SectionKind::ALL.iter().map(SectionKind::descriptor).collect())
}
