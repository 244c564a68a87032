//! Unifies the API for reading and editing the drinks catalog.
//!
//! `CatalogApi` sits between the HTTP layer and a [`CatalogManagement`] backend. It is responsible for
//! * validating drinks before they reach the backend,
//! * turning "no such drink" into [`CatalogError::DrinkNotFound`],
//! * producing the short and long projections of the catalog.

use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{DrinkLong, DrinkShort, NewDrink},
    traits::{CatalogError, CatalogManagement},
};

pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    /// The public menu: every drink, ordered by id, without ingredient quantities.
    pub async fn list_short(&self) -> Result<Vec<DrinkShort>, CatalogError> {
        let drinks = self.db.fetch_drinks().await?;
        Ok(drinks.iter().map(|d| d.short()).collect())
    }

    /// The full catalog, ordered by id, including ingredient quantities.
    pub async fn list_long(&self) -> Result<Vec<DrinkLong>, CatalogError> {
        let drinks = self.db.fetch_drinks().await?;
        Ok(drinks.iter().map(|d| d.long()).collect())
    }

    pub async fn fetch(&self, id: i64) -> Result<DrinkLong, CatalogError> {
        let drink = self.db.fetch_drink(id).await?.ok_or(CatalogError::DrinkNotFound(id))?;
        Ok(drink.long())
    }

    /// Adds a drink to the catalog and returns its id.
    pub async fn create(&self, drink: NewDrink) -> Result<i64, CatalogError> {
        validate(&drink)?;
        let id = self.db.insert_drink(drink).await?;
        info!("🗃️ New drink #{id} added to the catalog");
        Ok(id)
    }

    /// Replaces the title and recipe of drink `id` wholesale. Fields are not merged.
    pub async fn update(&self, id: i64, drink: NewDrink) -> Result<DrinkLong, CatalogError> {
        validate(&drink)?;
        let updated = self.db.update_drink(id, drink).await?.ok_or(CatalogError::DrinkNotFound(id))?;
        info!("🗃️ Drink #{id} updated");
        Ok(updated.long())
    }

    pub async fn delete(&self, id: i64) -> Result<i64, CatalogError> {
        let id = self.db.delete_drink(id).await?.ok_or(CatalogError::DrinkNotFound(id))?;
        info!("🗃️ Drink #{id} removed from the catalog");
        Ok(id)
    }
}

fn validate(drink: &NewDrink) -> Result<(), CatalogError> {
    if drink.title.trim().is_empty() {
        return Err(CatalogError::InvalidDrink("A drink must have a title".to_string()));
    }
    if drink.recipe.is_empty() {
        return Err(CatalogError::InvalidDrink("A drink must have at least one ingredient".to_string()));
    }
    Ok(())
}
