use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use coach_core::{
    block::{BlockId, BlockPatch},
    config::Config,
    draft::DraftUpdate,
    error::PersistenceError,
    payload::RecordId,
    types::{BlockKind, Category, SaveMode, Step},
    view::WizardView,
    wizard::Wizard,
    CoachError,
};

// ---------------------------------------------------------------------------
// Response / request types
// ---------------------------------------------------------------------------

/// A wizard view tagged with the session it belongs to.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session: String,
    #[serde(flatten)]
    pub view: WizardView,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenParams {
    pub category: Option<String>,
    pub resume: Option<String>,
    pub step: Option<String>,
}

#[derive(Deserialize)]
pub struct TagBody {
    pub tag: String,
}

#[derive(Deserialize)]
pub struct AddBlockBody {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct MoveBlockBody {
    pub index: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignDayBody {
    pub block_id: String,
}

#[derive(Deserialize)]
pub struct HeaderPreviewBody {
    pub url: String,
}

fn view_of(app: &AppState, id: &str) -> Result<Json<SessionView>, AppError> {
    let view = app.with_wizard(id, |w| Ok(WizardView::of(w)))?;
    Ok(Json(SessionView {
        session: id.to_string(),
        view,
    }))
}

/// Apply `f` to the session's wizard and return the resulting view.
fn mutate(
    app: &AppState,
    id: &str,
    f: impl FnOnce(&mut Wizard) -> coach_core::Result<()>,
) -> Result<Json<SessionView>, AppError> {
    let view = app.with_wizard(id, |w| {
        f(w)?;
        Ok(WizardView::of(w))
    })?;
    Ok(Json(SessionView {
        session: id.to_string(),
        view,
    }))
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// POST /api/wizards?category=&resume=&step=: open a wizard session.
pub async fn open_wizard(
    State(app): State<AppState>,
    Query(params): Query<OpenParams>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let category = params
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()?;
    let step = params.step.as_deref().map(str::parse::<Step>).transpose()?;
    let resume = params.resume.as_deref().map(RecordId::parse).transpose()?;

    let root = app.root.clone();
    let gateway = app.gateway.clone();
    let wizard = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        Ok::<_, CoachError>(Wizard::open(
            gateway.as_ref(),
            resume.as_ref(),
            step,
            category,
            config.authoring,
        ))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let view = WizardView::of(&wizard);
    let session = app.insert(wizard)?;
    tracing::info!(%session, step = %view.step, "wizard opened");
    Ok((StatusCode::CREATED, Json(SessionView { session, view })))
}

/// GET /api/wizards: every open session.
pub async fn list_wizards(
    State(app): State<AppState>,
) -> Result<Json<Vec<SessionView>>, AppError> {
    let views = app.snapshot(|id, w| SessionView {
        session: id.to_string(),
        view: WizardView::of(w),
    })?;
    Ok(Json(views))
}

/// GET /api/wizards/{id}
pub async fn get_wizard(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    view_of(&app, &id)
}

/// DELETE /api/wizards/{id}: discard the session; stored records stay.
pub async fn delete_wizard(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    app.remove(&id)?;
    tracing::info!(session = %id, "wizard discarded");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Draft metadata
// ---------------------------------------------------------------------------

/// PATCH /api/wizards/{id}/draft: set title, description, category or
/// header image.
pub async fn update_draft(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<DraftUpdate>,
) -> Result<Json<SessionView>, AppError> {
    mutate(&app, &id, |w| {
        for field in body.into_fields() {
            w.set_field(field)?;
        }
        Ok(())
    })
}

/// POST /api/wizards/{id}/tags: toggle one tag.
pub async fn toggle_tag(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TagBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (action, view) = app.with_wizard(&id, |w| {
        let action = w.toggle_tag(&body.tag)?;
        Ok((action, WizardView::of(w)))
    })?;
    Ok(Json(serde_json::json!({
        "action": action,
        "wizard": SessionView { session: id, view },
    })))
}

/// POST /api/wizards/{id}/header/preview
pub async fn preview_header(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<HeaderPreviewBody>,
) -> Result<Json<SessionView>, AppError> {
    let url = body.url.trim().to_string();
    if url.is_empty() {
        return Err(AppError::bad_request("header image url is empty"));
    }
    mutate(&app, &id, |w| w.preview_header_image(url))
}

/// POST /api/wizards/{id}/header/confirm
pub async fn confirm_header(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    mutate(&app, &id, |w| w.confirm_header_image().map(|_| ()))
}

/// POST /api/wizards/{id}/header/discard
pub async fn discard_header(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    mutate(&app, &id, |w| w.discard_header_preview().map(|_| ()))
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// POST /api/wizards/{id}/blocks: append a block.
pub async fn add_block(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AddBlockBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let (block, view) = app.with_wizard(&id, |w| {
        let block = w.add_block(body.kind)?;
        if let Some(content) = body.content {
            w.update_block(&block, &BlockPatch::content(content))?;
        }
        Ok((block, WizardView::of(w)))
    })?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "block": block,
            "wizard": SessionView { session: id, view },
        })),
    ))
}

/// PATCH /api/wizards/{id}/blocks/{block}: edit content, items or image.
pub async fn update_block(
    State(app): State<AppState>,
    Path((id, block)): Path<(String, String)>,
    Json(patch): Json<BlockPatch>,
) -> Result<Json<serde_json::Value>, AppError> {
    let block = BlockId::from(block);
    let (ignored, view) = app.with_wizard(&id, |w| {
        let ignored = w.update_block(&block, &patch)?;
        Ok((ignored, WizardView::of(w)))
    })?;
    Ok(Json(serde_json::json!({
        "ignored": ignored,
        "wizard": SessionView { session: id, view },
    })))
}

/// DELETE /api/wizards/{id}/blocks/{block}
pub async fn remove_block(
    State(app): State<AppState>,
    Path((id, block)): Path<(String, String)>,
) -> Result<Json<SessionView>, AppError> {
    let block = BlockId::from(block);
    mutate(&app, &id, |w| {
        w.remove_block(&block)?
            .map(|_| ())
            .ok_or_else(|| CoachError::BlockNotFound(block.to_string()))
    })
}

/// PUT /api/wizards/{id}/blocks/{block}/position: move to a 0-based index.
pub async fn move_block(
    State(app): State<AppState>,
    Path((id, block)): Path<(String, String)>,
    Json(body): Json<MoveBlockBody>,
) -> Result<Json<SessionView>, AppError> {
    let block = BlockId::from(block);
    mutate(&app, &id, |w| {
        if w.reorder_block(&block, body.index)? {
            Ok(())
        } else {
            Err(CoachError::BlockNotFound(block.to_string()))
        }
    })
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// POST /api/wizards/{id}/days/{day}: schedule a block on a day.
pub async fn assign_day(
    State(app): State<AppState>,
    Path((id, day)): Path<(String, u32)>,
    Json(body): Json<AssignDayBody>,
) -> Result<Json<SessionView>, AppError> {
    let block = BlockId::from(body.block_id);
    mutate(&app, &id, |w| w.assign_day(day, &block))
}

/// DELETE /api/wizards/{id}/days/{day}: clear a day.
pub async fn clear_day(
    State(app): State<AppState>,
    Path((id, day)): Path<(String, u32)>,
) -> Result<Json<SessionView>, AppError> {
    mutate(&app, &id, |w| w.clear_day(day).map(|_| ()))
}

/// DELETE /api/wizards/{id}/days/{day}/{block}
pub async fn unassign_day(
    State(app): State<AppState>,
    Path((id, day, block)): Path<(String, u32, String)>,
) -> Result<Json<SessionView>, AppError> {
    let block = BlockId::from(block);
    mutate(&app, &id, |w| {
        if w.unassign_day(day, &block)? {
            Ok(())
        } else {
            Err(CoachError::BlockNotFound(block.to_string()))
        }
    })
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// POST /api/wizards/{id}/next
pub async fn next(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    mutate(&app, &id, |w| w.next().map(|_| ()))
}

/// POST /api/wizards/{id}/previous
pub async fn previous(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    mutate(&app, &id, |w| w.previous().map(|_| ()))
}

/// POST /api/wizards/{id}/start-new: leave `success` for a fresh draft.
pub async fn start_new(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    mutate(&app, &id, |w| w.start_new())
}

/// POST /api/wizards/{id}/notice/dismiss
pub async fn dismiss_notice(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    mutate(&app, &id, |w| {
        w.dismiss_notice();
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Save / publish
// ---------------------------------------------------------------------------

/// POST /api/wizards/{id}/save-draft
pub async fn save_draft(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    save(app, id, SaveMode::Draft).await
}

/// POST /api/wizards/{id}/publish
pub async fn publish(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    save(app, id, SaveMode::Publish).await
}

/// The session lock is released while the gateway call runs; a second save
/// arriving meanwhile is refused by the wizard's in-flight guard.
async fn save(
    app: AppState,
    id: String,
    mode: SaveMode,
) -> Result<Json<serde_json::Value>, AppError> {
    let request = app.with_wizard(&id, |w| w.begin_save(mode))?;

    let gateway = app.gateway.clone();
    let outcome = tokio::task::spawn_blocking(move || request.send(gateway.as_ref()))
        .await
        .unwrap_or_else(|e| Err(PersistenceError::Storage(format!("task join error: {e}"))));

    let (record, view) = app.with_wizard(&id, |w| {
        let record = w.finish_save(outcome)?;
        Ok((record, WizardView::of(w)))
    })?;
    Ok(Json(serde_json::json!({
        "record": record,
        "wizard": SessionView { session: id, view },
    })))
}
