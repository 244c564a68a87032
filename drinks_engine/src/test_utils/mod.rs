//! Helpers for tests that need a real, disposable catalog database.
pub mod prepare_env;
