mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use common::{access_cookie, memory_state, seed_recipe, seed_user};
use nangpago::{app::create_app, auth::Role};

#[actix_web::test]
async fn comment_lifecycle_is_limited_to_the_author() {
    let (state, _) = memory_state().await;
    let author = seed_user(&state.db, "author@nangpago.kr", "author", Role::User).await;
    let other = seed_user(&state.db, "other@nangpago.kr", "other", Role::User).await;
    let recipe = seed_recipe(&state.db, "김치볶음밥", "김치, 밥").await;
    let author_cookie = access_cookie(&state, &author);
    let other_cookie = access_cookie(&state, &other);
    let app = test::init_service(create_app(state)).await;
    let base = format!("/api/recipe/{}/comment", recipe.id);

    let req = test::TestRequest::post()
        .uri(&base)
        .cookie(author_cookie.clone())
        .set_json(json!({ "content": "  맛있어요!  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["data"]["content"], "맛있어요!");
    assert_eq!(created["data"]["nickname"], "author");
    let comment_id = created["data"]["id"].as_i64().unwrap();

    let listed: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&base).to_request())
            .await;
    assert_eq!(listed["data"]["totalItems"], 1);
    assert_eq!(listed["data"]["content"][0]["isOwnComment"], false);

    let listed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&base)
            .cookie(author_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(listed["data"]["content"][0]["isOwnComment"], true);

    let req = test::TestRequest::put()
        .uri(&format!("{}/{}", base, comment_id))
        .cookie(other_cookie.clone())
        .set_json(json!({ "content": "hijack" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("{}/{}", base, comment_id))
        .cookie(author_cookie.clone())
        .set_json(json!({ "content": "정말 맛있어요" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["data"]["content"], "정말 맛있어요");

    let req = test::TestRequest::delete()
        .uri(&format!("{}/{}", base, comment_id))
        .cookie(other_cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("{}/{}", base, comment_id))
        .cookie(author_cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let count: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("{}/count", base))
            .to_request(),
    )
    .await;
    assert_eq!(count["data"], 0);
}

#[actix_web::test]
async fn anonymous_and_blank_comments_are_rejected() {
    let (state, _) = memory_state().await;
    let user = seed_user(&state.db, "cook@nangpago.kr", "cook", Role::User).await;
    let recipe = seed_recipe(&state.db, "김치볶음밥", "김치, 밥").await;
    let cookie = access_cookie(&state, &user);
    let app = test::init_service(create_app(state)).await;
    let uri = format!("/api/recipe/{}/comment", recipe.id);

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "content": "hello" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    for content in ["   ".to_string(), "가".repeat(501)] {
        let req = test::TestRequest::post()
            .uri(&uri)
            .cookie(cookie.clone())
            .set_json(json!({ "content": content }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_INPUT");
    }
}

#[actix_web::test]
async fn comment_pages_are_one_based_and_newest_first() {
    let (state, _) = memory_state().await;
    let user = seed_user(&state.db, "cook@nangpago.kr", "cook", Role::User).await;
    let recipe = seed_recipe(&state.db, "김치볶음밥", "김치, 밥").await;
    let cookie = access_cookie(&state, &user);
    let app = test::init_service(create_app(state)).await;
    let uri = format!("/api/recipe/{}/comment", recipe.id);

    for n in 1..=3 {
        let req = test::TestRequest::post()
            .uri(&uri)
            .cookie(cookie.clone())
            .set_json(json!({ "content": format!("comment {}", n) }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("{}?pageNo=1&pageSize=2", uri))
            .to_request(),
    )
    .await;
    assert_eq!(page["data"]["totalItems"], 3);
    assert_eq!(page["data"]["totalPages"], 2);
    assert_eq!(page["data"]["content"][0]["content"], "comment 3");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("{}?pageNo=0", uri))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn huge_comment_page_numbers_are_bad_requests() {
    let (state, _) = memory_state().await;
    let recipe = seed_recipe(&state.db, "김치볶음밥", "김치, 밥").await;
    let app = test::init_service(create_app(state)).await;
    let uri = format!("/api/recipe/{}/comment", recipe.id);

    for query in [
        "pageNo=9223372036854775807&pageSize=10",
        "pageNo=9223372036854775807&pageSize=100",
        "pageNo=4611686018427387904&pageSize=4",
    ] {
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("{}?{}", uri, query))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", query);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    // последняя страница внутри окна по-прежнему отдаётся
    let page: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("{}?pageNo=1000&pageSize=10", uri))
            .to_request(),
    )
    .await;
    assert_eq!(page["data"]["content"], serde_json::json!([]));
}

#[actix_web::test]
async fn favorites_toggle_like_likes_do() {
    let (state, _) = memory_state().await;
    let user = seed_user(&state.db, "cook@nangpago.kr", "cook", Role::User).await;
    let recipe = seed_recipe(&state.db, "김치볶음밥", "김치, 밥").await;
    let cookie = access_cookie(&state, &user);
    let app = test::init_service(create_app(state)).await;

    let status = || {
        test::TestRequest::get()
            .uri(&format!("/api/recipe/{}/favorite/status", recipe.id))
            .cookie(cookie.clone())
            .to_request()
    };
    let toggle = || {
        test::TestRequest::post()
            .uri(&format!("/api/recipe/{}/favorite/toggle", recipe.id))
            .cookie(cookie.clone())
            .to_request()
    };

    let before: Value = test::call_and_read_body_json(&app, status()).await;
    assert_eq!(before["data"], false);

    let toggled: Value = test::call_and_read_body_json(&app, toggle()).await;
    assert_eq!(toggled["data"]["favorite"], true);
    let after: Value = test::call_and_read_body_json(&app, status()).await;
    assert_eq!(after["data"], true);

    let toggled: Value = test::call_and_read_body_json(&app, toggle()).await;
    assert_eq!(toggled["data"]["favorite"], false);
}
