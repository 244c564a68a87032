use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

//--------------------------------------     Ingredient      ---------------------------------------------------------
/// A single line of a drink recipe, e.g. `{"name": "milk", "color": "grey", "parts": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

impl Ingredient {
    pub fn new<S: Into<String>>(name: S, color: S, parts: i64) -> Self {
        Self { name: name.into(), color: color.into(), parts }
    }

    pub fn summary(&self) -> IngredientSummary {
        IngredientSummary { name: self.name.clone(), color: self.color.clone() }
    }
}

/// The public view of an ingredient. Quantities are not disclosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSummary {
    pub name: String,
    pub color: String,
}

//--------------------------------------       Recipe        ---------------------------------------------------------
#[derive(Debug, Clone, Error)]
#[error("Recipe could not be converted to or from its stored form: {0}")]
pub struct RecipeEncodingError(String);

/// An ordered list of ingredients.
///
/// In memory (and on the wire) a recipe is structured data. The database keeps it as an opaque text column, and the
/// only way in and out of that column is through [`Recipe::encode`] and [`Recipe::decode`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(Vec<Ingredient>);

impl Recipe {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self(ingredients)
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn summary(&self) -> Vec<IngredientSummary> {
        self.0.iter().map(Ingredient::summary).collect()
    }

    pub fn encode(&self) -> Result<String, RecipeEncodingError> {
        serde_json::to_string(&self.0).map_err(|e| RecipeEncodingError(e.to_string()))
    }

    pub fn decode(stored: &str) -> Result<Self, RecipeEncodingError> {
        serde_json::from_str::<Vec<Ingredient>>(stored).map(Self).map_err(|e| RecipeEncodingError(e.to_string()))
    }
}

impl From<Vec<Ingredient>> for Recipe {
    fn from(ingredients: Vec<Ingredient>) -> Self {
        Self(ingredients)
    }
}

//--------------------------------------        Drink        ---------------------------------------------------------
/// A drink as it is held in the catalog. Serializing a `Drink` yields the long projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Recipe,
}

/// The long projection: every field, including ingredient quantities.
pub type DrinkLong = Drink;

/// The short projection, for unauthenticated consumers of the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<IngredientSummary>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort { id: self.id, title: self.title.clone(), recipe: self.recipe.summary() }
    }

    pub fn long(&self) -> DrinkLong {
        self.clone()
    }
}

impl Display for Drink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} ({} ingredients)", self.id, self.title, self.recipe.len())
    }
}

/// A drink that has not been stored yet, or the replacement contents for an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Recipe,
}

impl NewDrink {
    pub fn new<S: Into<String>>(title: S, recipe: Vec<Ingredient>) -> Self {
        Self { title: title.into(), recipe: Recipe::new(recipe) }
    }
}

//--------------------------------------      DrinkRow       ---------------------------------------------------------
/// The raw row in the `drinks` table.
#[derive(Debug, Clone, FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: String,
}

impl TryFrom<DrinkRow> for Drink {
    type Error = RecipeEncodingError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe = Recipe::decode(&row.recipe)?;
        Ok(Self { id: row.id, title: row.title, recipe })
    }
}
