use drinks_engine::db_types::{DrinkLong, Ingredient, NewDrink};
use serde::{Deserialize, Serialize};

/// Body of `POST /drinks` and `PATCH /drinks/{id}`. Both fields are required and anything else is refused.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrinkRequest {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<DrinkRequest> for NewDrink {
    fn from(req: DrinkRequest) -> Self {
        NewDrink::new(req.title, req.recipe)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self { success: true, drinks }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkCreatedResponse {
    pub success: bool,
    pub message: String,
    pub drink_id: i64,
}

impl DrinkCreatedResponse {
    pub fn new(drink_id: i64) -> Self {
        Self { success: true, message: "recipe added.".into(), drink_id }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkUpdatedResponse {
    pub success: bool,
    pub message: String,
    pub drinks: Vec<DrinkLong>,
}

impl DrinkUpdatedResponse {
    pub fn new(drink: DrinkLong) -> Self {
        Self { success: true, message: "recipe updated".into(), drinks: vec![drink] }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkDeletedResponse {
    pub success: bool,
    pub drink_id: i64,
}

impl DrinkDeletedResponse {
    pub fn new(drink_id: i64) -> Self {
        Self { success: true, drink_id }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl ErrorResponse {
    pub fn new<S: Into<String>>(error: u16, message: S) -> Self {
        Self { success: false, error, message: message.into() }
    }
}
