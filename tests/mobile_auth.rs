#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use common::{PASSWORD, insert_user, test_state};
use fieldtrack::database::types::Role;

#[actix_web::test]
async fn test_login_success_returns_decodable_token() {
    let state = test_state().await;
    let owner = insert_user(&state, "Olga Owner", "olga@example.com", Role::Owner, None).await;
    let employee = insert_user(
        &state,
        "Eli Employee",
        "eli@example.com",
        Role::Employee,
        Some(owner.id),
    )
    .await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/mobile/auth")
        .set_json(json!({ "email": "Eli@Example.com ", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], employee.id);
    assert_eq!(body["user"]["email"], "eli@example.com");
    assert_eq!(body["user"]["role"], "EMPLOYEE");
    assert_eq!(body["user"]["isOnDuty"], false);
    assert!(body["user"].get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap();
    let claims = state.auth.decode_token(token).unwrap();
    assert_eq!(claims.sub, employee.id);
    assert_eq!(claims.role, Role::Employee);
    assert_eq!(claims.name, "Eli Employee");
    assert_eq!(claims.exp - claims.iat, 24 * 3600);
}

#[actix_web::test]
async fn test_wrong_password_and_unknown_email_look_identical() {
    let state = test_state().await;
    insert_user(&state, "Olga Owner", "olga@example.com", Role::Owner, None).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/mobile/auth")
        .set_json(json!({ "email": "olga@example.com", "password": "wrong_password" }))
        .to_request();
    let wrong_password = test::call_service(&app, req).await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = test::read_body_json(wrong_password).await;

    let req = test::TestRequest::post()
        .uri("/api/mobile/auth")
        .set_json(json!({ "email": "nobody@example.com", "password": PASSWORD }))
        .to_request();
    let unknown_email = test::call_service(&app, req).await;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let unknown_email: Value = test::read_body_json(unknown_email).await;

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["error"], "Invalid credentials");
}

#[actix_web::test]
async fn test_missing_fields_are_rejected() {
    let state = test_state().await;
    let app = test_app!(state);

    for payload in [
        json!({ "email": "olga@example.com" }),
        json!({ "password": PASSWORD }),
        json!({ "email": "   ", "password": PASSWORD }),
        json!({ "email": "olga@example.com", "password": "" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/mobile/auth")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Email and password are required");
    }
}

#[actix_web::test]
async fn test_malformed_json_uses_error_shape() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/mobile/auth")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[actix_web::test]
async fn test_token_from_session_cookie_is_accepted() {
    let state = test_state().await;
    let owner = insert_user(&state, "Olga Owner", "olga@example.com", Role::Owner, None).await;
    let employee = insert_user(
        &state,
        "Eli Employee",
        "eli@example.com",
        Role::Employee,
        Some(owner.id),
    )
    .await;
    let token = common::token_for(&state, &employee);
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/mobile/me")
        .cookie(actix_web::cookie::Cookie::new("session", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], employee.id);
    assert_eq!(body["ownerId"], owner.id);
}

#[actix_web::test]
async fn test_garbage_token_is_unauthorized() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/mobile/me")
        .insert_header(common::bearer("not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
