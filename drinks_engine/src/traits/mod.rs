//! #  Backend contracts
//!
//! The module defines the behaviour a database backend needs to expose in order to serve the drinks catalog.
//!
//! * [`CatalogManagement`] defines the create, read, update and delete operations over the `drinks` table.
mod catalog_management;

pub use catalog_management::{CatalogError, CatalogManagement};
