//! End-to-end route tests over an in-memory database.

use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web, App};
use inkwell_core::db::open_db_in_memory;
use inkwell_server::{configure, session_middleware, AppState, SESSION_COOKIE_NAME};
use rstest::rstest;
use serde_json::{json, Value};

fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let conn = open_db_in_memory().expect("in-memory database");
    App::new()
        .app_data(web::Data::new(AppState::new(conn)))
        .wrap(session_middleware(Key::generate(), false))
        .configure(configure)
}

async fn send(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    request: actix_test::TestRequest,
    cookie: Option<&Cookie<'static>>,
) -> ServiceResponse {
    let request = match cookie {
        Some(cookie) => request.cookie(cookie.clone()),
        None => request,
    };
    actix_test::call_service(app, request.to_request()).await
}

async fn signup_and_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    username: &str,
) -> Cookie<'static> {
    let credentials = json!({"username": username, "password": "pw"});
    let res = send(
        app,
        actix_test::TestRequest::post()
            .uri("/register")
            .set_json(&credentials),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send(
        app,
        actix_test::TestRequest::post()
            .uri("/login")
            .set_json(&credentials),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("session cookie")
        .into_owned()
}

async fn create_page(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    cookie: &Cookie<'static>,
    title: &str,
) -> String {
    let res = send(
        app,
        actix_test::TestRequest::post()
            .uri("/pages")
            .set_json(json!({"title": title})),
        Some(cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    body["id"].as_str().expect("page id").to_string()
}

async fn create_block(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    cookie: &Cookie<'static>,
    payload: Value,
) -> ServiceResponse {
    send(
        app,
        actix_test::TestRequest::post()
            .uri("/blocks")
            .set_json(payload),
        Some(cookie),
    )
    .await
}

async fn word_count(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    cookie: &Cookie<'static>,
) -> u64 {
    let res = send(
        app,
        actix_test::TestRequest::get().uri("/user/stats"),
        Some(cookie),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    body["word_count"].as_u64().expect("word_count")
}

#[actix_web::test]
async fn health_reports_version() {
    let app = actix_test::init_service(test_app()).await;
    let res = send(&app, actix_test::TestRequest::get().uri("/health"), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["version"], json!(inkwell_core::core_version()));
}

#[actix_web::test]
async fn register_login_write_and_read_stats() {
    let app = actix_test::init_service(test_app()).await;
    let alice = signup_and_login(&app, "alice").await;
    let page_id = create_page(&app, &alice, "Notes").await;

    let res = create_block(
        &app,
        &alice,
        json!({"page_id": page_id, "type": "text", "content": "one two three", "order_index": 0}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let block: Value = actix_test::read_body_json(res).await;
    assert_eq!(block["type"], json!("text"));
    assert_eq!(block["content"], json!("one two three"));
    assert_eq!(block["page_id"], json!(page_id));

    let res = send(
        &app,
        actix_test::TestRequest::get().uri("/user/stats"),
        Some(&alice),
    )
    .await;
    let stats: Value = actix_test::read_body_json(res).await;
    assert_eq!(stats["username"], json!("alice"));
    assert_eq!(stats["word_count"], json!(3));
    assert_eq!(stats["level"], json!(0));
    assert_eq!(stats["progress"], json!(3));
    assert_eq!(stats["next_level_words"], json!(1000));
}

const SOME_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[rstest]
#[case::list_pages("GET", "/pages".to_string(), None)]
#[case::create_page("POST", "/pages".to_string(), Some(r#"{"title": "x"}"#))]
#[case::create_page_empty_body("POST", "/pages".to_string(), Some("{}"))]
#[case::stats("GET", "/user/stats".to_string(), None)]
#[case::list_blocks("GET", format!("/pages/{SOME_ID}/blocks"), None)]
#[case::list_blocks_bad_id("GET", "/pages/not-a-uuid/blocks".to_string(), None)]
#[case::rename_page_bad_body("PUT", format!("/pages/{SOME_ID}"), Some("{not json"))]
#[case::delete_page("DELETE", format!("/pages/{SOME_ID}"), None)]
#[case::delete_page_bad_id("DELETE", "/pages/not-a-uuid".to_string(), None)]
#[case::create_block_empty_body("POST", "/blocks".to_string(), Some("{}"))]
#[case::update_block_empty_body("PUT", format!("/blocks/{SOME_ID}"), Some("{}"))]
#[case::update_block_bad_id("PUT", "/blocks/not-a-uuid".to_string(), Some(r#"{"content": "x"}"#))]
#[case::delete_block("DELETE", format!("/blocks/{SOME_ID}"), None)]
#[actix_rt::test]
async fn requests_without_session_are_unauthorized(
    #[case] method: &str,
    #[case] uri: String,
    #[case] body: Option<&'static str>,
) {
    let app = actix_test::init_service(test_app()).await;
    let request = match method {
        "GET" => actix_test::TestRequest::get(),
        "POST" => actix_test::TestRequest::post(),
        "PUT" => actix_test::TestRequest::put(),
        "DELETE" => actix_test::TestRequest::delete(),
        other => panic!("unsupported method {other}"),
    };
    let request = match body {
        Some(raw) => request
            .insert_header(("content-type", "application/json"))
            .set_payload(raw),
        None => request,
    };
    let res = send(&app, request.uri(&uri), None).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("unauthorized"));
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn malformed_requests_from_logged_in_users_keep_their_status() {
    let app = actix_test::init_service(test_app()).await;
    let alice = signup_and_login(&app, "alice").await;

    let res = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/pages")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
        Some(&alice),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("validation"));

    let res = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/blocks/not-a-uuid")
            .set_json(json!({"content": "x"})),
        Some(&alice),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case::blank_username(json!({"username": "  ", "password": "pw"}))]
#[case::blank_password(json!({"username": "alice", "password": ""}))]
#[case::unknown_user(json!({"username": "mallory", "password": "pw"}))]
#[actix_rt::test]
async fn failed_logins_are_unauthorized(#[case] payload: Value) {
    let app = actix_test::init_service(test_app()).await;
    signup_and_login(&app, "alice").await;

    let res = send(
        &app,
        actix_test::TestRequest::post().uri("/login").set_json(payload),
        None,
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("unauthorized"));
}

#[actix_web::test]
async fn duplicate_registration_and_bad_login_are_rejected() {
    let app = actix_test::init_service(test_app()).await;
    signup_and_login(&app, "alice").await;

    let res = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": "alice", "password": "other"})),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"username": "alice", "password": "wrong"})),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res
        .response()
        .cookies()
        .all(|cookie| cookie.name() != SESSION_COOKIE_NAME));
}

#[rstest]
#[case::blank_username(json!({"username": "  ", "password": "pw"}))]
#[case::blank_password(json!({"username": "carol", "password": ""}))]
#[case::missing_password(json!({"username": "carol"}))]
#[actix_rt::test]
async fn invalid_registrations_are_bad_requests(#[case] payload: Value) {
    let app = actix_test::init_service(test_app()).await;
    let res = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/register")
            .set_json(payload),
        None,
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("validation"));
}

#[actix_web::test]
async fn logout_expires_the_session_cookie() {
    let app = actix_test::init_service(test_app()).await;
    let alice = signup_and_login(&app, "alice").await;

    let res = send(
        &app,
        actix_test::TestRequest::post().uri("/logout"),
        Some(&alice),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let removal = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("removal cookie");
    assert!(removal.value().is_empty());
}

#[actix_web::test]
async fn pages_are_private_to_their_owner() {
    let app = actix_test::init_service(test_app()).await;
    let alice = signup_and_login(&app, "alice").await;
    let bob = signup_and_login(&app, "bob").await;
    let page_id = create_page(&app, &alice, "Private").await;
    let res = create_block(
        &app,
        &alice,
        json!({"page_id": page_id, "content": "alpha beta", "order_index": 0}),
    )
    .await;
    let block: Value = actix_test::read_body_json(res).await;
    let block_id = block["id"].as_str().expect("block id").to_string();

    let res = send(&app, actix_test::TestRequest::get().uri("/pages"), Some(&bob)).await;
    let listed: Value = actix_test::read_body_json(res).await;
    assert_eq!(listed, json!([]));

    let cases = [
        (
            actix_test::TestRequest::get().uri(&format!("/pages/{page_id}/blocks")),
            StatusCode::NOT_FOUND,
        ),
        (
            actix_test::TestRequest::post().uri("/blocks").set_json(
                json!({"page_id": page_id, "type": "text", "content": "x", "order_index": 1}),
            ),
            StatusCode::NOT_FOUND,
        ),
        (
            actix_test::TestRequest::put()
                .uri(&format!("/pages/{page_id}"))
                .set_json(json!({"title": "Mine"})),
            StatusCode::FORBIDDEN,
        ),
        (
            actix_test::TestRequest::put()
                .uri(&format!("/blocks/{block_id}"))
                .set_json(json!({"content": "hijacked"})),
            StatusCode::FORBIDDEN,
        ),
        (
            actix_test::TestRequest::delete().uri(&format!("/blocks/{block_id}")),
            StatusCode::FORBIDDEN,
        ),
        (
            actix_test::TestRequest::delete().uri(&format!("/pages/{page_id}")),
            StatusCode::FORBIDDEN,
        ),
    ];
    for (request, expected) in cases {
        let res = send(&app, request, Some(&bob)).await;
        assert_eq!(res.status(), expected);
    }

    let res = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/pages/{page_id}/blocks")),
        Some(&alice),
    )
    .await;
    let blocks: Value = actix_test::read_body_json(res).await;
    assert_eq!(blocks[0]["content"], json!("alpha beta"));
    assert_eq!(word_count(&app, &alice).await, 2);
    assert_eq!(word_count(&app, &bob).await, 0);
}

#[actix_web::test]
async fn deleting_a_page_cascades_to_blocks() {
    let app = actix_test::init_service(test_app()).await;
    let alice = signup_and_login(&app, "alice").await;
    let page_id = create_page(&app, &alice, "Doomed").await;
    for (index, text) in ["one two", "three"].iter().enumerate() {
        let res = create_block(
            &app,
            &alice,
            json!({"page_id": page_id, "content": text, "order_index": index}),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }
    assert_eq!(word_count(&app, &alice).await, 3);

    let res = send(
        &app,
        actix_test::TestRequest::delete().uri(&format!("/pages/{page_id}")),
        Some(&alice),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/pages/{page_id}/blocks")),
        Some(&alice),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(word_count(&app, &alice).await, 0);
}

#[actix_web::test]
async fn blocks_list_in_order_and_updates_track_words() {
    let app = actix_test::init_service(test_app()).await;
    let alice = signup_and_login(&app, "alice").await;
    let page_id = create_page(&app, &alice, "Ordered").await;

    let res = create_block(
        &app,
        &alice,
        json!({"page_id": page_id, "content": "second", "order_index": 5}),
    )
    .await;
    let second: Value = actix_test::read_body_json(res).await;
    let res = create_block(
        &app,
        &alice,
        json!({"page_id": page_id, "type": "todo", "content": {"checked": false, "text": "first task"}, "order_index": 1}),
    )
    .await;
    let first: Value = actix_test::read_body_json(res).await;

    let res = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/pages/{page_id}/blocks")),
        Some(&alice),
    )
    .await;
    let listed: Value = actix_test::read_body_json(res).await;
    assert_eq!(listed[0]["id"], first["id"]);
    assert_eq!(listed[1]["id"], second["id"]);
    assert_eq!(word_count(&app, &alice).await, 3);

    let res = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/blocks/{}", second["id"].as_str().expect("id")))
            .set_json(json!({"content": "second block now", "order_index": 0})),
        Some(&alice),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = actix_test::read_body_json(res).await;
    assert_eq!(updated["order_index"], json!(0));
    assert_eq!(word_count(&app, &alice).await, 5);
}

#[actix_web::test]
async fn todo_create_normalizes_and_update_validates() {
    let app = actix_test::init_service(test_app()).await;
    let alice = signup_and_login(&app, "alice").await;
    let page_id = create_page(&app, &alice, "Tasks").await;

    let res = create_block(
        &app,
        &alice,
        json!({"page_id": page_id, "type": "todo", "content": "not a record", "order_index": 0}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let todo: Value = actix_test::read_body_json(res).await;
    assert_eq!(todo["content"], json!({"checked": false, "text": ""}));

    let res = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/blocks/{}", todo["id"].as_str().expect("id")))
            .set_json(json!({"content": {"text": "no checked flag"}})),
        Some(&alice),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("validation"));
}

#[rstest]
#[case::unknown_type(json!({"type": "image", "content": "x", "order_index": 0}))]
#[case::missing_order_index(json!({"type": "text", "content": "x"}))]
#[case::bad_page_id(json!({"page_id": "nope", "content": "x", "order_index": 0}))]
#[actix_rt::test]
async fn malformed_block_creation_is_a_bad_request(#[case] payload: Value) {
    let mut payload = payload;
    let app = actix_test::init_service(test_app()).await;
    let alice = signup_and_login(&app, "alice").await;
    let page_id = create_page(&app, &alice, "P").await;
    if payload.get("page_id").is_none() {
        payload["page_id"] = json!(page_id);
    }

    let res = create_block(&app, &alice, payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(word_count(&app, &alice).await, 0);
}

#[actix_web::test]
async fn unknown_resources_are_not_found() {
    let app = actix_test::init_service(test_app()).await;
    let alice = signup_and_login(&app, "alice").await;
    let missing = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    let res = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/blocks/{missing}"))
            .set_json(json!({"content": "x"})),
        Some(&alice),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = send(
        &app,
        actix_test::TestRequest::delete().uri("/pages/not-a-uuid"),
        Some(&alice),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("not_found"));
}
