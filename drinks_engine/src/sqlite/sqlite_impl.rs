//! `SqliteDatabase` is a concrete implementation of a drinks catalog backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate, migrate::MigrateDatabase, Sqlite, SqlitePool};

use super::db::{drinks, new_pool};
use crate::{
    db_types::{Drink, Ingredient, NewDrink},
    traits::{CatalogError, CatalogManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({}, {:?})", self.url, self.pool)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_drinks(&self) -> Result<Vec<Drink>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        drinks::fetch_drinks(&mut conn).await
    }

    async fn fetch_drink(&self, id: i64) -> Result<Option<Drink>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        drinks::fetch_drink(id, &mut conn).await
    }

    async fn insert_drink(&self, drink: NewDrink) -> Result<i64, CatalogError> {
        // An uncommitted transaction is rolled back when it is dropped, which is what happens on the `?` early returns.
        let mut tx = self.pool.begin().await?;
        let id = drinks::insert_drink(&drink, &mut tx).await?;
        tx.commit().await?;
        Ok(id)
    }

    async fn update_drink(&self, id: i64, drink: NewDrink) -> Result<Option<Drink>, CatalogError> {
        let mut tx = self.pool.begin().await?;
        let updated = drinks::update_drink(id, &drink, &mut tx).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_drink(&self, id: i64) -> Result<Option<i64>, CatalogError> {
        let mut tx = self.pool.begin().await?;
        let deleted = drinks::delete_drink(id, &mut tx).await?;
        tx.commit().await?;
        Ok(deleted)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Creates the SQLite database file at `url` if it does not exist yet. The parent directory must already exist.
    pub async fn create_if_missing(url: &str) -> Result<(), sqlx::Error> {
        if !Sqlite::database_exists(url).await? {
            info!("🗃️ Database {url} does not exist. Creating it.");
            Sqlite::create_database(url).await?;
        }
        Ok(())
    }

    /// Brings the schema up to date.
    pub async fn migrate(&self) -> Result<(), CatalogError> {
        migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| CatalogError::DatabaseError(format!("Could not run migrations. {e}")))?;
        debug!("🗃️ Migrations complete");
        Ok(())
    }

    /// Wipes the catalog and seeds it with a single drink, `water`.
    ///
    /// Removed ids are not recycled: the seeded drink gets the next id in the sequence.
    pub async fn reset(&self) -> Result<i64, CatalogError> {
        let mut tx = self.pool.begin().await?;
        let removed = drinks::delete_all_drinks(&mut tx).await?;
        let water = NewDrink::new("water", vec![Ingredient::new("water", "blue", 1)]);
        let id = drinks::insert_drink(&water, &mut tx).await?;
        tx.commit().await?;
        warn!("🗃️ Catalog reset. {removed} drinks removed, 'water' seeded with id {id}");
        Ok(id)
    }

    pub async fn close(&mut self) -> Result<(), sqlx::Error> {
        self.pool.close().await;
        Ok(())
    }
}
