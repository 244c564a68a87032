//! # Drinks server
//! This crate hosts the HTTP surface of the drinks catalog. It is responsible for:
//! * Serving the public menu, which lists each drink's ingredients without their quantities.
//! * Guarding the detailed menu and every write behind bearer tokens issued by the configured identity provider.
//! * Translating catalog and authentication failures into a uniform JSON error envelope.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `GET /drinks`: The public menu.
//! * `GET /drinks-detail`: The full menu. Requires `get:drinks-detail`.
//! * `POST /drinks`: Add a drink. Requires `post:drinks`.
//! * `PATCH /drinks/{id}`: Replace a drink. Requires `patch:drinks`.
//! * `DELETE /drinks/{id}`: Remove a drink. Requires `delete:drinks`.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod jwks;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
