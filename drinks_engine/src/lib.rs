//! Drinks Engine
//!
//! The storage half of the coffee shop drinks API. It owns the catalog of drinks and knows nothing about HTTP or
//! authentication.
//!
//! The library is divided into two main sections:
//! 1. Database management ([`mod@sqlite`] and [`mod@traits`]). SQLite is the supported backend. Backends implement the
//!    [`CatalogManagement`] trait. The data types stored in the catalog are defined in [`mod@db_types`] and are public.
//! 2. The public API ([`CatalogApi`]). This validates incoming drinks, converts "no such row" outcomes into
//!    [`CatalogError::DrinkNotFound`] and produces the short and long projections served to clients.
//!
//! ```rust,ignore
//! use drinks_engine::{CatalogApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/drinks.db", 5).await?;
//! db.migrate().await?;
//! let api = CatalogApi::new(db);
//! let menu = api.list_short().await?;
//! ```
mod catalog_api;

pub mod db_types;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod test_utils;

pub use catalog_api::CatalogApi;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{CatalogError, CatalogManagement};
