use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use serde_json::json;
use waitlist_server::{routes, AppState, Settings, Storage as _};

async fn app_state() -> web::Data<AppState> {
    let config = Settings::new().expect("Failed to load config");
    web::Data::new(
        AppState::new(config)
            .await
            .expect("Failed to build app state"),
    )
}

async fn login<S>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let resp = test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({ "username": "admin", "password": "admin" }))
        .send_request(app)
        .await;
    assert_eq!(resp.status(), 200);

    resp.response()
        .cookies()
        .next()
        .expect("login should set a session cookie")
        .into_owned()
}

#[actix_web::test]
async fn test_login_rejects_bad_credentials() {
    let state = app_state().await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let resp = test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({ "username": "admin", "password": "wrong" }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid credentials");
}

#[actix_web::test]
async fn test_admin_list_requires_session() {
    let state = app_state().await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let resp = test::TestRequest::get()
        .uri("/api/admin/waitlist")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_login_then_list_returns_entries() {
    let state = app_state().await;
    state.storage.add_to_waitlist("a@example.com").await.unwrap();
    state.storage.add_to_waitlist("b@example.com").await.unwrap();

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let cookie = login(&app).await;
    let resp = test::TestRequest::get()
        .uri("/api/admin/waitlist")
        .cookie(cookie)
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let entries = body.as_array().expect("list body should be an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["email"], "a@example.com");
    assert_eq!(entries[1]["email"], "b@example.com");
}

#[actix_web::test]
async fn test_check_reflects_session_state() {
    let state = app_state().await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let resp = test::TestRequest::get()
        .uri("/api/admin/check")
        .send_request(&app)
        .await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["isAuthenticated"], false);

    let cookie = login(&app).await;
    let resp = test::TestRequest::get()
        .uri("/api/admin/check")
        .cookie(cookie)
        .send_request(&app)
        .await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["isAuthenticated"], true);
}

#[actix_web::test]
async fn test_logout_invalidates_session() {
    let state = app_state().await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let cookie = login(&app).await;

    let resp = test::TestRequest::post()
        .uri("/api/admin/logout")
        .cookie(cookie.clone())
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);

    let resp = test::TestRequest::get()
        .uri("/api/admin/waitlist")
        .cookie(cookie)
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_delete_entry_validates_id_and_existence() {
    let state = app_state().await;
    let entry = state.storage.add_to_waitlist("victim@example.com").await.unwrap();

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let cookie = login(&app).await;

    let resp = test::TestRequest::delete()
        .uri("/api/admin/waitlist/not-a-number")
        .cookie(cookie.clone())
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid ID format");

    let resp = test::TestRequest::delete()
        .uri("/api/admin/waitlist/99999")
        .cookie(cookie.clone())
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Entry not found");

    let resp = test::TestRequest::delete()
        .uri(&format!("/api/admin/waitlist/{}", entry.id))
        .cookie(cookie)
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);

    let entries = state.storage.all_waitlist_entries().await.unwrap();
    assert!(entries.is_empty());
}

#[actix_web::test]
async fn test_promotional_send_requires_entries() {
    let state = app_state().await;
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let cookie = login(&app).await;
    let resp = test::TestRequest::post()
        .uri("/api/admin/send-promotional")
        .cookie(cookie)
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No waitlist entries found");
}

#[actix_web::test]
async fn test_promotional_batch_reports_per_recipient_failures() {
    let state = app_state().await;
    // The middle address cannot be parsed into a mailbox, so its send fails
    // while the other two go through the stub transport.
    state.storage.add_to_waitlist("one@example.com").await.unwrap();
    state.storage.add_to_waitlist("not-an-address").await.unwrap();
    state.storage.add_to_waitlist("two@example.com").await.unwrap();

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let cookie = login(&app).await;
    let resp = test::TestRequest::post()
        .uri("/api/admin/send-promotional")
        .cookie(cookie)
        .set_json(json!({ "message": "Big news" }))
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("2 of 3 waitlist members"));
    let failed = body["failedEmails"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0], "not-an-address");
}

#[actix_web::test]
async fn test_launch_batch_succeeds_for_all_valid_recipients() {
    let state = app_state().await;
    state.storage.add_to_waitlist("a@example.com").await.unwrap();
    state.storage.add_to_waitlist("b@example.com").await.unwrap();

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    let cookie = login(&app).await;
    let resp = test::TestRequest::post()
        .uri("/api/admin/send-launch-announcement")
        .cookie(cookie)
        .send_request(&app)
        .await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("2 of 2 waitlist members"));
    assert!(body.get("failedEmails").is_none());
}

#[actix_web::test]
async fn test_send_endpoints_require_admin_session() {
    let state = app_state().await;
    state.storage.add_to_waitlist("a@example.com").await.unwrap();

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::configure),
    )
    .await;

    for uri in [
        "/api/admin/send-promotional",
        "/api/admin/send-launch-announcement",
    ] {
        let resp = test::TestRequest::post().uri(uri).send_request(&app).await;
        assert_eq!(resp.status(), 401, "{uri} should be gated");
    }
}
