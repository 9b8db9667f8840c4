use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::DatabaseError;
use super::models::{Favorite, NewFavorite};

/// Owner-scoped access to the `favorites` table. Every method takes the
/// authenticated identity and never reads or writes another owner's rows.
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// All favorites owned by `owner`, in store order
    async fn list(&self, owner: &str) -> Result<Vec<Favorite>, DatabaseError>;

    /// Insert a favorite for `owner` and return the stored row
    async fn create(&self, owner: &str, favorite: NewFavorite) -> Result<Favorite, DatabaseError>;

    /// Delete `id` if `owner` owns it. Returns the number of rows removed;
    /// missing and foreign ids both yield zero.
    async fn delete(&self, owner: &str, id: i64) -> Result<u64, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

pub struct PgFavoritesRepository {
    pool: PgPool,
}

impl PgFavoritesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoritesRepository for PgFavoritesRepository {
    async fn list(&self, owner: &str) -> Result<Vec<Favorite>, DatabaseError> {
        let rows = sqlx::query_as::<_, Favorite>(
            "SELECT id, quote_ref, dialog, character_ref, owner_id
             FROM favorites
             WHERE owner_id = $1",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, owner: &str, favorite: NewFavorite) -> Result<Favorite, DatabaseError> {
        let row = sqlx::query_as::<_, Favorite>(
            "INSERT INTO favorites (quote_ref, dialog, character_ref, owner_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, quote_ref, dialog, character_ref, owner_id",
        )
        .bind(&favorite.quote_ref)
        .bind(&favorite.dialog)
        .bind(&favorite.character_ref)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created favorite {} for owner {}", row.id, owner);
        Ok(row)
    }

    async fn delete(&self, owner: &str, id: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM favorites WHERE owner_id = $1 AND id = $2")
            .bind(owner)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
