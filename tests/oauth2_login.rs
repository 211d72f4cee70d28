mod common;

use std::sync::Arc;

use actix_web::{
    cookie::Cookie,
    http::{StatusCode, header},
    test, web,
};
use httpmock::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{Value, json};

use common::{CLIENT_HOST, state_with, test_db};
use nangpago::{
    app::create_app,
    app_state::AppState,
    auth::{
        cookies::{ACCESS_COOKIE, OAUTH2_STATE_COOKIE, REFRESH_COOKIE},
        oauth2::{ClientRegistration, OAuth2Provider},
    },
    database::models::{refresh_tokens, users},
    services::search::InMemoryRecipeIndex,
};

fn google_against(server: &MockServer) -> ClientRegistration {
    ClientRegistration {
        provider: OAuth2Provider::Google,
        client_id: "google-client".to_string(),
        client_secret: "google-secret".to_string(),
        authorization_uri: server.url("/o/oauth2/v2/auth"),
        token_uri: server.url("/token"),
        user_info_uri: server.url("/userinfo"),
        scopes: vec!["openid".to_string(), "email".to_string()],
        redirect_uri: "http://127.0.0.1:8080/api/login/oauth2/code/google".to_string(),
    }
}

async fn state_with_google(server: &MockServer) -> web::Data<AppState> {
    let mut state = state_with(test_db().await, Arc::new(InMemoryRecipeIndex::new()));
    state.oauth2_registrations.insert(google_against(server));
    web::Data::new(state)
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn authorization_redirects_to_the_provider_with_state() {
    let server = MockServer::start_async().await;
    let state = state_with_google(&server).await;
    let app = test::init_service(create_app(state)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/oauth2/authorization/google")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let location = location(&resp);
    assert!(location.starts_with(&server.url("/o/oauth2/v2/auth")));
    assert!(location.contains("client_id=google-client"));
    assert!(location.contains("prompt=select_account"));

    let state_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == OAUTH2_STATE_COOKIE)
        .expect("state cookie is set");
    assert!(location.contains(&format!("state={}", state_cookie.value())));
}

#[actix_web::test]
async fn unknown_or_unconfigured_providers_are_not_found() {
    let server = MockServer::start_async().await;
    let state = state_with_google(&server).await;
    let app = test::init_service(create_app(state)).await;

    for uri in [
        "/api/oauth2/authorization/naver",
        "/api/oauth2/authorization/github",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn callback_registers_the_user_and_sets_token_cookies() {
    let server = MockServer::start_async().await;
    let token = server
        .mock_async(|when, then| {
            when.method(POST).path("/token").body_contains("code=auth-code");
            then.status(200)
                .json_body(json!({ "access_token": "provider-token", "token_type": "Bearer" }));
        })
        .await;
    let user_info = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/userinfo")
                .header("authorization", "Bearer provider-token");
            then.status(200).json_body(json!({
                "sub": "1234",
                "email": "cook@gmail.com",
                "name": "Kim Cook",
                "given_name": "Cook",
                "picture": "https://example.com/cook.png"
            }));
        })
        .await;

    let state = state_with_google(&server).await;
    let app = test::init_service(create_app(state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/login/oauth2/code/google?code=auth-code&state=xyz")
        .cookie(Cookie::new(OAUTH2_STATE_COOKIE, "xyz"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    token.assert_async().await;
    user_info.assert_async().await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), CLIENT_HOST);

    let names: Vec<String> = resp
        .response()
        .cookies()
        .filter(|c| !c.value().is_empty())
        .map(|c| c.name().to_string())
        .collect();
    assert!(names.contains(&ACCESS_COOKIE.to_string()));
    assert!(names.contains(&REFRESH_COOKIE.to_string()));

    let user = users::Entity::find()
        .filter(users::Column::Email.eq("cook@gmail.com"))
        .one(&state.db)
        .await
        .unwrap()
        .expect("user is registered");
    assert_eq!(user.provider, "GOOGLE");
    assert_eq!(user.role, "ROLE_USER");
    assert_eq!(user.nickname, "Cook");

    let stored = refresh_tokens::Entity::find()
        .filter(refresh_tokens::Column::Email.eq("cook@gmail.com"))
        .one(&state.db)
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[actix_web::test]
async fn state_mismatch_redirects_to_the_login_page_with_an_error() {
    let server = MockServer::start_async().await;
    let token = server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(200).json_body(json!({ "access_token": "provider-token" }));
        })
        .await;

    let state = state_with_google(&server).await;
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/api/login/oauth2/code/google?code=auth-code&state=forged")
        .cookie(Cookie::new(OAUTH2_STATE_COOKIE, "xyz"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        location(&resp),
        format!("{}/login?error=oauth2_error", CLIENT_HOST)
    );
    assert_eq!(token.hits_async().await, 0);
}

#[actix_web::test]
async fn failed_code_exchange_redirects_with_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(400).json_body(json!({ "error": "invalid_grant" }));
        })
        .await;

    let state = state_with_google(&server).await;
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/api/login/oauth2/code/google?code=stale&state=xyz")
        .cookie(Cookie::new(OAUTH2_STATE_COOKIE, "xyz"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).ends_with("/login?error=oauth2_error"));
}

#[actix_web::test]
async fn reissue_and_status_round_trip() {
    let server = MockServer::start_async().await;
    let state = state_with_google(&server).await;
    let user = common::seed_user(
        &state.db,
        "cook@nangpago.kr",
        "cook",
        nangpago::auth::Role::User,
    )
    .await;
    let tokens = nangpago::services::token_service::issue(
        &state.db,
        &state.jwt,
        &nangpago::services::user_service::principal_of(&user),
    )
    .await
    .unwrap();
    let app = test::init_service(create_app(state)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/auth/reissue").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/reissue")
        .cookie(Cookie::new(REFRESH_COOKIE, tokens.refresh.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let access = resp
        .response()
        .cookies()
        .find(|c| c.name() == ACCESS_COOKIE)
        .map(|c| c.value().to_string())
        .expect("access cookie is reissued");

    let req = test::TestRequest::get()
        .uri("/api/auth/status")
        .cookie(Cookie::new(ACCESS_COOKIE, access))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["email"], "cook@nangpago.kr");
    assert_eq!(body["data"]["role"], "ROLE_USER");

    // access-токен в роли refresh не принимается
    let req = test::TestRequest::post()
        .uri("/api/auth/reissue")
        .cookie(Cookie::new(REFRESH_COOKIE, tokens.access))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}
