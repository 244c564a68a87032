use std::collections::HashMap;

use cucumber::World;
use drinks_engine::{
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    CatalogApi,
    CatalogError,
    SqliteDatabase,
};
use log::*;

#[derive(Default, Debug, World)]
pub struct CatalogWorld {
    pub system: Option<CatalogSystem>,
    /// Ids of drinks created during the scenario, by title
    pub ids: HashMap<String, i64>,
    pub last_error: Option<CatalogError>,
}

#[derive(Debug)]
pub struct CatalogSystem {
    pub db_path: String,
    pub api: CatalogApi<SqliteDatabase>,
}

impl CatalogWorld {
    pub fn api(&self) -> &CatalogApi<SqliteDatabase> {
        &self.system.as_ref().expect("CatalogApi not initialised").api
    }

    pub fn id_of(&self, title: &str) -> i64 {
        *self.ids.get(title).unwrap_or_else(|| panic!("No drink called '{title}' was created in this scenario"))
    }
}

impl CatalogSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        debug!("Created database: {url}");
        let api = CatalogApi::new(db);
        Self { db_path: url, api }
    }
}
