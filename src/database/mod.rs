pub mod favorites;
pub mod manager;
pub mod models;

pub use favorites::{FavoritesRepository, PgFavoritesRepository};
pub use manager::{DatabaseError, DatabaseManager};
pub use models::{Favorite, NewFavorite};
