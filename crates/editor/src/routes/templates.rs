//! Section template routes.
//!
//! Templates are named section collections a merchant can assign to product
//! pages. Template contents are edited through a session targeting the
//! template; these routes manage the templates themselves.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use pagecraft_core::{MerchantId, TemplateId};
use pagecraft_engine::SectionTemplate;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Query parameters identifying the merchant.
#[derive(Debug, Deserialize)]
pub struct MerchantQuery {
    pub merchant_id: MerchantId,
}

/// List a merchant's section templates, ordered by name.
///
/// GET /api/templates?merchant_id=...
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MerchantQuery>,
) -> Result<Json<Vec<SectionTemplate>>> {
    let templates = state.gateway().list_templates(query.merchant_id).await?;
    Ok(Json(templates))
}

/// Request to create a template.
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub merchant_id: MerchantId,
    pub name: String,
}

/// Create an empty template.
///
/// POST /api/templates
///
/// # Errors
///
/// Returns 400 for a blank name.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<SectionTemplate>)> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest(
            "template name must not be empty".to_string(),
        ));
    }

    let template = state
        .gateway()
        .create_template(request.merchant_id, name)
        .await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// Request to rename a template.
#[derive(Debug, Deserialize)]
pub struct RenameTemplateRequest {
    pub merchant_id: MerchantId,
    pub name: String,
}

/// Rename a template.
///
/// PUT /api/templates/{id}
///
/// # Errors
///
/// Returns 400 for a blank name and 404 for an unknown template.
pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<TemplateId>,
    Json(request): Json<RenameTemplateRequest>,
) -> Result<StatusCode> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest(
            "template name must not be empty".to_string(),
        ));
    }

    state
        .gateway()
        .rename_template(request.merchant_id, id, name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a template.
///
/// DELETE /api/templates/{id}?merchant_id=...
///
/// # Errors
///
/// Returns 404 for an unknown template.
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<TemplateId>,
    Query(query): Query<MerchantQuery>,
) -> Result<StatusCode> {
    state
        .gateway()
        .delete_template(query.merchant_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
