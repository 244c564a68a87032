//! Request handler definitions
//!
//! Define each route and its handler here. Handlers only translate between HTTP and the [`CatalogApi`]; anything more
//! involved belongs in the engine.
//!
//! Since each worker thread processes its requests sequentially, handlers must never block the current thread. All
//! database work is expressed as futures, so a slow query lets the worker get on with other requests.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use drinks_engine::{CatalogApi, CatalogManagement};
use log::*;

use crate::{
    auth::JwtClaims,
    data_objects::{DrinkCreatedResponse, DrinkDeletedResponse, DrinkRequest, DrinkUpdatedResponse, DrinksResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires $permission:literal) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new($permission));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

/// Fallback for every request that no route claims.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ServerError> {
    debug!("💻️ No route for {} {}", req.method(), req.path());
    Err(ServerError::NoRecordFound(format!("No resource at {}", req.path())))
}

//----------------------------------------------   Drinks  ----------------------------------------------------
route!(drinks => Get "/drinks" impl CatalogManagement);
/// The public menu. Ingredient quantities are withheld.
pub async fn drinks<B>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError>
where B: CatalogManagement {
    trace!("💻️ GET drinks");
    let drinks = api.list_short().await?;
    Ok(HttpResponse::Ok().json(DrinksResponse::new(drinks)))
}

route!(drinks_detail => Get "/drinks-detail" impl CatalogManagement where requires "get:drinks-detail");
/// The full catalog, including ingredient quantities.
pub async fn drinks_detail<B>(claims: JwtClaims, api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError>
where B: CatalogManagement {
    trace!("💻️ GET drinks-detail for {}", claims.sub);
    let drinks = api.list_long().await?;
    Ok(HttpResponse::Ok().json(DrinksResponse::new(drinks)))
}

route!(create_drink => Post "/drinks" impl CatalogManagement where requires "post:drinks");
pub async fn create_drink<B>(
    claims: JwtClaims,
    body: web::Json<DrinkRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement,
{
    let drink = body.into_inner();
    debug!("💻️ {} is adding drink '{}'", claims.sub, drink.title);
    let id = api.create(drink.into()).await?;
    Ok(HttpResponse::Ok().json(DrinkCreatedResponse::new(id)))
}

route!(update_drink => Patch "/drinks/{id}" impl CatalogManagement where requires "patch:drinks");
/// Replaces the title and recipe of a drink. Both fields must be supplied.
pub async fn update_drink<B>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<DrinkRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement,
{
    let id = path.into_inner();
    debug!("💻️ {} is updating drink #{id}", claims.sub);
    let drink = api.update(id, body.into_inner().into()).await?;
    Ok(HttpResponse::Ok().json(DrinkUpdatedResponse::new(drink)))
}

route!(delete_drink => Delete "/drinks/{id}" impl CatalogManagement where requires "delete:drinks");
pub async fn delete_drink<B>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement,
{
    let id = path.into_inner();
    debug!("💻️ {} is removing drink #{id}", claims.sub);
    let id = api.delete(id).await?;
    Ok(HttpResponse::Ok().json(DrinkDeletedResponse::new(id)))
}
