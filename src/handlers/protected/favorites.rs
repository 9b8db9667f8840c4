use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
};
use axum::{Extension, Json};
use serde::Serialize;

use crate::app::AppState;
use crate::database::{Favorite, NewFavorite};
use crate::error::ApiResult;
use crate::middleware::AuthUser;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: u64,
}

/// GET /api/favorites
pub async fn favorites_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Favorite>> {
    Ok(Json(state.favorites.list(&user.user_id).await?))
}

/// POST /api/favorites
pub async fn favorites_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewFavorite>, JsonRejection>,
) -> ApiResult<Favorite> {
    let Json(body) = payload?;
    Ok(Json(state.favorites.create(&user.user_id, body).await?))
}

/// DELETE /api/favorites/:id
///
/// An id that is not a number cannot match any row, so it reports zero
/// deletions like any other missing id.
pub async fn favorites_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<DeleteResponse> {
    let Path(id) = path?;
    let deleted = match id.parse::<i64>() {
        Ok(id) => state.favorites.delete(&user.user_id, id).await?,
        Err(_) => {
            tracing::debug!("Ignoring delete of non-numeric favorite id {:?}", id);
            0
        }
    };

    Ok(Json(DeleteResponse { deleted }))
}
