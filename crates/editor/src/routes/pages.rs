//! Published section routes.
//!
//! Read-side endpoints that return sections as the storefront will render
//! them, without opening an editing session.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use pagecraft_core::{MerchantId, PageType, Section, TemplateId};
use pagecraft_engine::Resolution;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Query parameters identifying the merchant.
#[derive(Debug, Deserialize)]
pub struct MerchantQuery {
    pub merchant_id: MerchantId,
}

/// Published sections for one merchant page.
///
/// GET /api/pages/{page_type}/sections?merchant_id=...
///
/// # Errors
///
/// Returns 400 for an unknown page type.
pub async fn page_sections(
    State(state): State<AppState>,
    Path(page_type): Path<String>,
    Query(query): Query<MerchantQuery>,
) -> Result<Json<Vec<Section>>> {
    let page_type = page_type
        .parse::<PageType>()
        .map_err(ApiError::BadRequest)?;

    let sections = state
        .gateway()
        .fetch_page(query.merchant_id, page_type)
        .await?;
    Ok(Json(sections))
}

/// Query parameters for product page resolution.
#[derive(Debug, Deserialize)]
pub struct ProductSectionsQuery {
    pub merchant_id: MerchantId,
    pub template_id: Option<TemplateId>,
}

/// Resolved sections for the product page.
///
/// GET /api/product-sections?merchant_id=...&template_id=...
///
/// Resolution never fails: a broken or missing template falls through to the
/// merchant's product page, and an empty product page falls through to the
/// built-in sections.
pub async fn product_sections(
    State(state): State<AppState>,
    Query(query): Query<ProductSectionsQuery>,
) -> Json<Resolution> {
    let resolution = state
        .resolver()
        .resolve_product_sections(query.merchant_id, query.template_id)
        .await;
    Json(resolution)
}
