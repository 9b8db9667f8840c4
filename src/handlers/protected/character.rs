use axum::extract::{rejection::PathRejection, Path, RawQuery, State};
use axum::Json;

use crate::app::AppState;
use crate::error::ApiResult;
use crate::upstream::{Character, Quote};

/// True when the query string carries a `quote` key with any value,
/// including an empty one or the key repeated
pub fn quote_requested(query: Option<&str>) -> bool {
    query
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).any(|(key, _)| key == "quote"))
        .unwrap_or(false)
}

/// GET /character - upstream character list
pub async fn character_list(State(state): State<AppState>) -> ApiResult<Vec<Character>> {
    Ok(Json(state.characters.list_characters().await?))
}

/// GET /character/:name[?quote] - first character matching `name`, with its
/// quotes attached when `quote` is present
pub async fn character_get(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    RawQuery(query): RawQuery,
) -> ApiResult<Character> {
    let Path(name) = path?;
    let include_quotes = quote_requested(query.as_deref());
    let character = state.characters.lookup_character(&name, include_quotes).await?;
    Ok(Json(character))
}

/// GET /character/:id/quotes - quotes for an upstream character id
pub async fn character_quotes(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Vec<Quote>> {
    let Path(id) = path?;
    Ok(Json(state.characters.character_quotes(&id).await?))
}
