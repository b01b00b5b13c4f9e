//! Editing session routes.
//!
//! A session wraps a `SectionStore` loaded from the gateway. Edits go
//! through a single tagged operation endpoint and stay in memory until the
//! session is saved; closing or resetting a session discards them.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pagecraft_core::{
    MerchantId, PageType, Section, SectionId, SectionKind, SessionId, TemplateId,
};
use pagecraft_engine::{SectionStore, StoreStatus, StoreTarget};

use crate::error::{ApiError, Result};
use crate::sessions::EditingSession;
use crate::state::AppState;

/// Request to open an editing session.
///
/// Exactly one of `page_type` and `template_id` must be set.
#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    pub merchant_id: MerchantId,
    pub page_type: Option<PageType>,
    pub template_id: Option<TemplateId>,
}

/// Snapshot of a session returned from every session endpoint.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub merchant_id: MerchantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_type: Option<PageType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<TemplateId>,
    pub status: StoreStatus,
    pub dirty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub sections: Vec<Section>,
}

impl SessionView {
    fn from_store(session_id: SessionId, store: &SectionStore) -> Self {
        let (merchant_id, page_type, template_id) = match store.target() {
            StoreTarget::Page {
                merchant,
                page_type,
            } => (merchant, Some(page_type), None),
            StoreTarget::Template { merchant, template } => (merchant, None, Some(template)),
        };

        Self {
            session_id,
            merchant_id,
            page_type,
            template_id,
            status: store.status(),
            dirty: store.is_dirty(),
            last_error: store.last_error().map(String::from),
            sections: store.sections().to_vec(),
        }
    }
}

/// An edit operation applied to a session's working set.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SessionOp {
    /// Insert a new section of `kind` at `index` (appended when omitted).
    Add {
        kind: SectionKind,
        index: Option<usize>,
    },
    /// Remove a section.
    Remove { section_id: SectionId },
    /// Move the section at `from` so it ends up at index `to`.
    Reorder { from: usize, to: usize },
    /// Copy a section, placing the copy right after the original.
    Duplicate { section_id: SectionId },
    /// Set one setting key on a section.
    UpdateSetting {
        section_id: SectionId,
        key: String,
        value: Value,
    },
    /// Flip a section's visibility.
    ToggleVisibility { section_id: SectionId },
}

/// Open an editing session against a merchant page or a template.
///
/// POST /api/sessions
///
/// Seeds the session's working copy and baseline from the target's saved
/// sections and returns the new session with 201 Created. A product page
/// session seeds through the resolution cascade, so a merchant who never
/// saved anything edits the same layout the storefront renders.
///
/// # Errors
///
/// Returns 400 unless exactly one of `page_type` and `template_id` is set,
/// and 404 for a missing template.
pub async fn open(
    State(state): State<AppState>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>)> {
    let target = match (request.page_type, request.template_id) {
        (Some(page_type), None) => StoreTarget::Page {
            merchant: request.merchant_id,
            page_type,
        },
        (None, Some(template)) => StoreTarget::Template {
            merchant: request.merchant_id,
            template,
        },
        _ => {
            return Err(ApiError::BadRequest(
                "exactly one of page_type and template_id must be set".to_string(),
            ));
        }
    };

    let sections = match target {
        StoreTarget::Page {
            merchant,
            page_type: PageType::Product,
        } => {
            state
                .resolver()
                .resolve_product_sections(merchant, None)
                .await
                .sections
        }
        StoreTarget::Page {
            merchant,
            page_type,
        } => state.gateway().fetch_page(merchant, page_type).await?,
        StoreTarget::Template { merchant, template } => state
            .gateway()
            .fetch_template(merchant, template)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("template {template}")))?
            .sections,
    };

    let store = SectionStore::new(target, sections);
    let (session_id, session) = state.sessions().open(store).await;
    let store = session.store().await;

    Ok((
        StatusCode::CREATED,
        Json(SessionView::from_store(session_id, &store)),
    ))
}

/// Current state of an editing session.
///
/// GET /api/sessions/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>> {
    let session = load_session(&state, id).await?;
    let store = session.store().await;
    Ok(Json(SessionView::from_store(id, &store)))
}

/// Apply one edit operation to the session's working set.
///
/// POST /api/sessions/{id}/ops
///
/// # Errors
///
/// Returns 404 for an unknown section id and 400 for an out-of-bounds
/// reorder source.
pub async fn apply_op(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(op): Json<SessionOp>,
) -> Result<Json<SessionView>> {
    let session = load_session(&state, id).await?;
    let mut store = session.store().await;

    match op {
        SessionOp::Add { kind, index } => {
            store.add(kind, index);
        }
        SessionOp::Remove { section_id } => {
            store.remove(section_id)?;
        }
        SessionOp::Reorder { from, to } => {
            store.reorder(from, to)?;
        }
        SessionOp::Duplicate { section_id } => {
            store.duplicate(section_id)?;
        }
        SessionOp::UpdateSetting {
            section_id,
            key,
            value,
        } => {
            store.update_setting(section_id, &key, value)?;
        }
        SessionOp::ToggleVisibility { section_id } => {
            store.toggle_visibility(section_id)?;
        }
    }

    Ok(Json(SessionView::from_store(id, &store)))
}

/// Persist the session's working set through the gateway.
///
/// POST /api/sessions/{id}/save
///
/// A clean session saves without touching the gateway.
///
/// # Errors
///
/// Settings problems come back as 422 before anything is written. Gateway
/// failures leave the working set intact, record the reason on the session,
/// and surface as 502.
pub async fn save(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>> {
    let session = load_session(&state, id).await?;
    let mut store = session.store().await;

    store.save(state.gateway().as_ref()).await?;

    Ok(Json(SessionView::from_store(id, &store)))
}

/// Discard unsaved edits, restoring the last saved baseline.
///
/// POST /api/sessions/{id}/reset
pub async fn reset(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>> {
    let session = load_session(&state, id).await?;
    let mut store = session.store().await;
    store.reset();
    Ok(Json(SessionView::from_store(id, &store)))
}

/// Close an editing session, discarding any unsaved edits.
///
/// DELETE /api/sessions/{id}
pub async fn close(State(state): State<AppState>, Path(id): Path<SessionId>) -> Result<StatusCode> {
    if state.sessions().close(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound)
    }
}

/// Fetch a live session or fail with 404.
async fn load_session(state: &AppState, id: SessionId) -> Result<Arc<EditingSession>> {
    state
        .sessions()
        .get(id)
        .await
        .ok_or(ApiError::SessionNotFound)
}
