//! Folder, world, and backup handlers.

use axum::Json;
use axum::extract::{Path, State};

use worldbackup_entity::{FolderListItem, World};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::path::{backup_id, folder_id, world_id};
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// GET /api/folders
pub async fn list_folders(State(state): State<AppState>) -> Json<ApiResponse<Vec<FolderListItem>>> {
    Json(ApiResponse::ok(state.folder_service.list_folders().await))
}

/// GET /api/folders/{id}/worlds
pub async fn list_worlds(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<World>> {
    let worlds = state.folder_service.list_worlds(folder_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(worlds)))
}

/// DELETE /api/folders/{id}/worlds/{wid}
pub async fn remove_world(
    State(state): State<AppState>,
    Path((id, wid)): Path<(String, String)>,
) -> ApiResult<World> {
    let world = state
        .folder_service
        .remove_world(folder_id(&id)?, world_id(&wid)?)
        .await?;
    Ok(Json(ApiResponse::ok(world)))
}

/// DELETE /api/folders/{id}/worlds/{wid}/backups/{bid}
pub async fn delete_backup(
    State(state): State<AppState>,
    Path((id, wid, bid)): Path<(String, String, String)>,
) -> ApiResult<World> {
    let world = state
        .folder_service
        .delete_backup(folder_id(&id)?, world_id(&wid)?, backup_id(&bid)?)
        .await?;
    Ok(Json(ApiResponse::ok(world)))
}

/// PATCH /api/folders/{id}/worlds/{wid}/backups/{bid}
pub async fn restore_backup(
    State(state): State<AppState>,
    Path((id, wid, bid)): Path<(String, String, String)>,
) -> ApiResult<World> {
    let world = state
        .folder_service
        .restore_backup(folder_id(&id)?, world_id(&wid)?, backup_id(&bid)?)
        .await?;
    Ok(Json(ApiResponse::ok(world)))
}
