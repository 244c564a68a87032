use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    http::{header, KeepAlive},
    middleware::Logger,
    web,
    App,
    HttpServer,
};
use drinks_engine::{CatalogApi, CatalogManagement, SqliteDatabase};
use log::*;

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        not_found,
        CreateDrinkRoute,
        DeleteDrinkRoute,
        DrinksDetailRoute,
        DrinksRoute,
        UpdateDrinkRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    SqliteDatabase::create_if_missing(&config.database_url)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.reset_database {
        db.reset().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    // Created once, outside the worker factory, so that every worker shares the same key-set cache
    let verifier = web::Data::new(TokenVerifier::from_config(&config.auth)?);
    info!("🚀️ Access tokens must be issued by {} for {}", config.auth.issuer, config.auth.audience);
    let srv = HttpServer::new(move || {
        let catalog_api = CatalogApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("drinks::access_log"))
            .wrap(cors())
            .app_data(web::Data::new(catalog_api))
            .app_data(verifier.clone())
            .configure(configure_routes::<SqliteDatabase>)
            .default_service(web::to(not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers every route, plus the extractor settings that turn bad paths and bodies into error envelopes.
pub fn configure_routes<B>(cfg: &mut web::ServiceConfig)
where B: CatalogManagement + 'static {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health)
        .service(DrinksRoute::<B>::new())
        .service(DrinksDetailRoute::<B>::new())
        .service(CreateDrinkRoute::<B>::new())
        .service(UpdateDrinkRoute::<B>::new())
        .service(DeleteDrinkRoute::<B>::new());
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "PUT", "POST", "DELETE", "OPTIONS", "PATCH"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into())
}

/// Ids that are not integers cannot name a drink, so they are reported as not found.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| ServerError::NoRecordFound(err.to_string()).into())
}
