use actix_web::{http::StatusCode, test::TestRequest};
use chrono::{Duration, Utc};
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
};
use serde_json::json;

use super::{
    helpers::{
        assert_error,
        claims,
        issue_token,
        latte,
        send,
        send_with_verifier,
        sign,
        valid_token,
        with_token,
        AUDIENCE,
        ISSUER,
        KEY_ID,
        ROGUE_KEY,
        SIGNING_KEY,
    },
    mocks::MockCatalog,
};
use crate::{
    auth::{Audience, TokenVerifier},
    jwks::{JwksCache, KeySetSource},
};

fn detail_catalog() -> MockCatalog {
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_drinks().returning(|| Ok(vec![latte(1)]));
    catalog
}

fn no_access_catalog() -> MockCatalog {
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_drinks().never();
    catalog
}

async fn detail_with_header(value: &str, catalog: MockCatalog) -> (StatusCode, serde_json::Value) {
    let req = TestRequest::get().uri("/drinks-detail").insert_header(("Authorization", value.to_string()));
    send(req, catalog).await
}

async fn detail_with_token(token: &str) -> (StatusCode, serde_json::Value) {
    send(with_token(TestRequest::get().uri("/drinks-detail"), token), no_access_catalog()).await
}

#[actix_web::test]
async fn public_menu_needs_no_token() {
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_drinks().returning(|| Ok(vec![]));
    let (status, _) = send(TestRequest::get().uri("/drinks"), catalog).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn detail_without_token_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send(TestRequest::get().uri("/drinks-detail"), no_access_catalog()).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Authorization header is expected."));
}

#[actix_web::test]
async fn detail_without_permission_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let (status, body) = detail_with_token(&valid_token(&["post:drinks", "patch:drinks"])).await;
    assert_error(status, &body, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn detail_with_permission_is_allowed() {
    let token = valid_token(&["get:drinks-detail"]);
    let (status, body) = send(with_token(TestRequest::get().uri("/drinks-detail"), &token), detail_catalog()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["recipe"][0]["parts"], json!(1));
}

#[actix_web::test]
async fn each_write_needs_its_own_permission() {
    let token = valid_token(&["get:drinks-detail"]);
    let drink = json!({"title": "Water", "recipe": [{"name": "water", "color": "blue", "parts": 1}]});
    let requests = [
        TestRequest::post().uri("/drinks").set_json(&drink),
        TestRequest::patch().uri("/drinks/1").set_json(&drink),
        TestRequest::delete().uri("/drinks/1"),
    ];
    for req in requests {
        let mut catalog = MockCatalog::new();
        catalog.expect_insert_drink().never();
        catalog.expect_update_drink().never();
        catalog.expect_delete_drink().never();
        let (status, body) = send(with_token(req, &token), catalog).await;
        assert_error(status, &body, StatusCode::FORBIDDEN);
    }
}

#[actix_web::test]
async fn malformed_authorization_headers_are_unauthorized() {
    for header in ["Basic YmFyaXN0YTpzZWNyZXQ=", "Bearer", "Bearer a b", "Token abc", "Bearer not-a-jwt"] {
        let (status, body) = detail_with_header(header, no_access_catalog()).await;
        assert_error(status, &body, StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn bearer_scheme_is_case_insensitive() {
    let token = valid_token(&["get:drinks-detail"]);
    let (status, _) = detail_with_header(&format!("bearer {token}"), detail_catalog()).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn expired_token_is_unauthorized() {
    let token = sign(claims(&["get:drinks-detail"]), Some(Utc::now() - Duration::hours(1)), Some(KEY_ID), &SIGNING_KEY);
    let (status, body) = detail_with_token(&token).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn token_without_expiry_is_unauthorized() {
    let token = sign(claims(&["get:drinks-detail"]), None, Some(KEY_ID), &SIGNING_KEY);
    let (status, body) = detail_with_token(&token).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn recently_expired_token_is_within_leeway() {
    let token =
        sign(claims(&["get:drinks-detail"]), Some(Utc::now() - Duration::seconds(10)), Some(KEY_ID), &SIGNING_KEY);
    let (status, _) = send(with_token(TestRequest::get().uri("/drinks-detail"), &token), detail_catalog()).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn wrong_audience_is_unauthorized() {
    let mut c = claims(&["get:drinks-detail"]);
    c.aud = Audience::Single("coffee".into());
    let (status, body) = detail_with_token(&issue_token(c)).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn audience_list_containing_the_api_is_accepted() {
    let mut c = claims(&["get:drinks-detail"]);
    c.aud = Audience::Multiple(vec!["https://drinks-test.eu.auth0.com/userinfo".into(), AUDIENCE.into()]);
    let token = issue_token(c);
    let (status, _) = send(with_token(TestRequest::get().uri("/drinks-detail"), &token), detail_catalog()).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn wrong_issuer_is_unauthorized() {
    let mut c = claims(&["get:drinks-detail"]);
    c.iss = "https://impostor.auth0.com/".into();
    let (status, body) = detail_with_token(&issue_token(c)).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn unknown_key_id_is_unauthorized() {
    let token = sign(claims(&["get:drinks-detail"]), Some(Utc::now() + Duration::hours(1)), Some("rotated"), &SIGNING_KEY);
    let (status, body) = detail_with_token(&token).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn missing_key_id_is_unauthorized() {
    let token = sign(claims(&["get:drinks-detail"]), Some(Utc::now() + Duration::hours(1)), None, &SIGNING_KEY);
    let (status, body) = detail_with_token(&token).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn token_signed_by_another_key_is_unauthorized() {
    let token = sign(claims(&["get:drinks-detail"]), Some(Utc::now() + Duration::hours(1)), Some(KEY_ID), &ROGUE_KEY);
    let (status, body) = detail_with_token(&token).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn tampered_claims_are_unauthorized() {
    let genuine = valid_token(&[]);
    let elevated = valid_token(&["get:drinks-detail"]);
    // Graft the payload of one token onto the signature of another
    let genuine_parts = genuine.split('.').collect::<Vec<_>>();
    let elevated_parts = elevated.split('.').collect::<Vec<_>>();
    let forged = format!("{}.{}.{}", genuine_parts[0], elevated_parts[1], genuine_parts[2]);
    let (status, body) = detail_with_token(&forged).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn symmetric_algorithms_are_refused() {
    let header = Header::empty().with_token_type("JWT").with_key_id(KEY_ID);
    let mut c = Claims::new(claims(&["get:drinks-detail"]));
    c.expiration = Some(Utc::now() + Duration::hours(1));
    let token = Hs256.token(&header, &c, &Hs256Key::new(b"not-so-secret")).unwrap();
    let (status, body) = detail_with_token(&token).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn token_without_permissions_is_unauthorized() {
    let mut c = claims(&[]);
    c.permissions = None;
    let (status, body) = detail_with_token(&issue_token(c)).await;
    assert_error(status, &body, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn unreachable_key_set_is_a_server_error() {
    let source =
        KeySetSource::remote("http://127.0.0.1:9/.well-known/jwks.json", std::time::Duration::from_secs(2)).unwrap();
    let keys = JwksCache::new(source, None);
    let verifier = TokenVerifier::new(ISSUER, AUDIENCE, Duration::seconds(60), keys);
    let req = with_token(TestRequest::get().uri("/drinks-detail"), &valid_token(&["get:drinks-detail"]));
    let (status, body) = send_with_verifier(req, no_access_catalog(), verifier).await;
    assert_error(status, &body, StatusCode::INTERNAL_SERVER_ERROR);
}
