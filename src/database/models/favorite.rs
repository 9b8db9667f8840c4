use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::UserIdentity;

/// A stored favorite quote. Rows are only created and deleted, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i64,
    pub quote_ref: String,
    pub dialog: String,
    pub character_ref: String,
    pub owner_id: UserIdentity,
}

/// Body of `POST /api/favorites`. References are opaque and not checked
/// against upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    #[serde(alias = "_db_quote_id", default)]
    pub quote_ref: String,
    #[serde(default)]
    pub dialog: String,
    #[serde(alias = "character", default)]
    pub character_ref: String,
}
