//! Sqlite database operations for the drinks catalog
//!
//! Generally clients should never call these methods directly, and prefer to use the [`CatalogManagement`] trait
//! methods that are implemented on the [`SqliteDatabase`] struct instead.
//!
//! [`CatalogManagement`]: crate::CatalogManagement
//! [`SqliteDatabase`]: crate::SqliteDatabase

use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{Drink, DrinkRow, NewDrink},
    traits::CatalogError,
};

pub async fn fetch_drinks(conn: &mut SqliteConnection) -> Result<Vec<Drink>, CatalogError> {
    let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks ORDER BY id ASC")
        .fetch_all(conn)
        .await?;
    trace!("🗃️ Fetched {} drinks", rows.len());
    let drinks = rows.into_iter().map(Drink::try_from).collect::<Result<Vec<Drink>, _>>()?;
    Ok(drinks)
}

pub async fn fetch_drink(id: i64, conn: &mut SqliteConnection) -> Result<Option<Drink>, CatalogError> {
    let row = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    let drink = row.map(Drink::try_from).transpose()?;
    Ok(drink)
}

pub async fn insert_drink(drink: &NewDrink, conn: &mut SqliteConnection) -> Result<i64, CatalogError> {
    let recipe = drink.recipe.encode()?;
    let result = sqlx::query("INSERT INTO drinks (title, recipe) VALUES (?, ?)")
        .bind(drink.title.as_str())
        .bind(recipe)
        .execute(conn)
        .await
        .map_err(|e| write_error(&drink.title, e))?;
    let id = result.last_insert_rowid();
    debug!("🗃️ Drink '{}' inserted with id {id}", drink.title);
    Ok(id)
}

/// Overwrites the title and recipe of drink `id` in a single statement, so that concurrent writers never leave a row
/// holding the title of one write and the recipe of another.
pub async fn update_drink(
    id: i64,
    drink: &NewDrink,
    conn: &mut SqliteConnection,
) -> Result<Option<Drink>, CatalogError> {
    let recipe = drink.recipe.encode()?;
    let row = sqlx::query_as::<_, DrinkRow>(
        "UPDATE drinks SET title = ?, recipe = ? WHERE id = ? RETURNING id, title, recipe",
    )
    .bind(drink.title.as_str())
    .bind(recipe)
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(|e| write_error(&drink.title, e))?;
    match row {
        Some(row) => {
            debug!("🗃️ Drink #{id} updated to '{}'", row.title);
            Ok(Some(Drink::try_from(row)?))
        },
        None => {
            debug!("🗃️ Drink #{id} does not exist. Nothing updated");
            Ok(None)
        },
    }
}

pub async fn delete_drink(id: i64, conn: &mut SqliteConnection) -> Result<Option<i64>, CatalogError> {
    let result = sqlx::query("DELETE FROM drinks WHERE id = ?").bind(id).execute(conn).await?;
    match result.rows_affected() {
        0 => Ok(None),
        1 => {
            debug!("🗃️ Drink #{id} deleted");
            Ok(Some(id))
        },
        n => Err(CatalogError::DatabaseError(format!("Deleting drink #{id} removed {n} rows"))),
    }
}

/// Removes every drink. The id sequence is left alone, so ids are still never reused.
pub async fn delete_all_drinks(conn: &mut SqliteConnection) -> Result<u64, CatalogError> {
    let result = sqlx::query("DELETE FROM drinks").execute(conn).await?;
    Ok(result.rows_affected())
}

fn write_error(title: &str, e: sqlx::Error) -> CatalogError {
    match &e {
        sqlx::Error::Database(de) if de.is_unique_violation() => CatalogError::DuplicateTitle(title.to_string()),
        _ => CatalogError::from(e),
    }
}
