use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiResult;

/// GET /quotes - upstream quote page, returned as-is
pub async fn quote_list(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(Json(state.characters.list_quotes().await?))
}
