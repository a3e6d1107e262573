#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{Value, json};

use common::test_state;
use fieldtrack::database::{models::users, types::Role};
use fieldtrack::services::seed::ensure_admin;

#[actix_web::test]
async fn test_seed_is_idempotent() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/seed").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let first: Value = test::read_body_json(resp).await;
    assert_eq!(first["created"], true);

    let req = test::TestRequest::get().uri("/api/seed").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let second: Value = test::read_body_json(resp).await;
    assert_eq!(second["created"], false);
    assert_eq!(second["adminId"], first["adminId"]);

    let admins = users::Entity::find()
        .filter(users::Column::Email.eq("seed-admin@fieldtrack.test"))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(admins, 1);
}

#[actix_web::test]
async fn test_seeded_admin_can_sign_in_and_read_stats() {
    let state = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/seed").to_request();
    test::call_service(&app, req).await;

    let admin = users::Entity::find()
        .filter(users::Column::Role.eq(Role::Admin))
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.name, "System Admin");

    let req = test::TestRequest::post()
        .uri("/api/mobile/auth")
        .set_json(json!({ "email": "seed-admin@fieldtrack.test", "password": "seed-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/admin/system/stats")
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_seed_email_held_by_owner_is_a_conflict() {
    let state = test_state().await;
    common::insert_user(
        &state,
        "Olga Owner",
        "seed-admin@fieldtrack.test",
        Role::Owner,
        None,
    )
    .await;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/seed").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_INPUT");

    let admins = users::Entity::find()
        .filter(users::Column::Role.eq(Role::Admin))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(admins, 0);
}

#[actix_web::test]
async fn test_seed_rolls_back_admin_when_audit_fails() {
    let state = test_state().await;
    state
        .db
        .execute_unprepared("DROP TABLE system_logs")
        .await
        .unwrap();

    let outcome = ensure_admin(&state.db, &state.auth, &state.config.seed_admin()).await;
    assert!(outcome.is_err());

    let stored = users::Entity::find().count(&state.db).await.unwrap();
    assert_eq!(stored, 0);
}
