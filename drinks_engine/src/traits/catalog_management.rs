use thiserror::Error;

use crate::db_types::{Drink, NewDrink, RecipeEncodingError};

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Drink #{0} does not exist")]
    DrinkNotFound(i64),
    #[error("Invalid drink. {0}")]
    InvalidDrink(String),
    #[error("A drink with the title '{0}' already exists")]
    DuplicateTitle(String),
    #[error("{0}")]
    RecipeEncoding(#[from] RecipeEncodingError),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::DatabaseError(e.to_string())
    }
}

/// The `CatalogManagement` trait defines the storage operations for the drinks catalog.
///
/// Implementations report a missing row as `Ok(None)` rather than an error; the [`crate::CatalogApi`] decides what a
/// missing drink means to the caller. Every write happens in its own transaction, and is rolled back if it fails.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Fetches every drink, ordered by ascending id. An empty catalog is an empty vector.
    async fn fetch_drinks(&self) -> Result<Vec<Drink>, CatalogError>;

    /// Fetches the drink with the given id. If no drink exists, `None` is returned.
    async fn fetch_drink(&self, id: i64) -> Result<Option<Drink>, CatalogError>;

    /// Stores a new drink and returns its newly assigned id.
    ///
    /// If the title is already taken, [`CatalogError::DuplicateTitle`] is returned.
    async fn insert_drink(&self, drink: NewDrink) -> Result<i64, CatalogError>;

    /// Replaces the title and recipe of the drink with the given id, returning the updated drink, or `None` if it does
    /// not exist.
    async fn update_drink(&self, id: i64, drink: NewDrink) -> Result<Option<Drink>, CatalogError>;

    /// Removes the drink with the given id. Returns the id of the removed drink, or `None` if it did not exist.
    async fn delete_drink(&self, id: i64) -> Result<Option<i64>, CatalogError>;
}
