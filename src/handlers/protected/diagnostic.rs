use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::middleware::AuthUser;

/// GET /api/test - echo the identity the gate resolved
pub async fn api_test(Extension(user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "message": format!("in this protected route, we get the user's id like so: {}", user.user_id),
        "userId": user.user_id,
    }))
}
