#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use common::{bearer, insert_collection, insert_ping, insert_shop, insert_user, test_state, token_for};
use fieldtrack::database::types::Role;
use fieldtrack::services::dashboard::{load_live_dashboard, start_of_local_day};

#[actix_web::test]
async fn test_history_paths_omit_employees_without_pings() {
    let state = test_state().await;
    let owner = insert_user(&state, "Olga Owner", "olga@example.com", Role::Owner, None).await;
    let walker = insert_user(&state, "Walker", "walker@example.com", Role::Employee, Some(owner.id)).await;
    let idle = insert_user(&state, "Idle", "idle@example.com", Role::Employee, Some(owner.id)).await;

    let since = start_of_local_day(chrono_tz::UTC, Utc::now());
    // Inserted out of order to check the path is sorted by time
    insert_ping(&state, walker.id, 1.2, 10.2, since + Duration::seconds(20)).await;
    insert_ping(&state, walker.id, 1.0, 10.0, since).await;
    insert_ping(&state, walker.id, 1.1, 10.1, since + Duration::seconds(10)).await;
    insert_ping(&state, walker.id, 0.5, 9.5, since - Duration::hours(1)).await;

    let token = token_for(&state, &owner);
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/owner/dashboard/live")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let expected_paths = json!({
        (walker.id.to_string()): [[1.0, 10.0], [1.1, 10.1], [1.2, 10.2]]
    });
    assert_eq!(body["historyPaths"], expected_paths);
    assert!(body["historyPaths"].get(idle.id.to_string()).is_none());

    let employee_ids: Vec<i64> = body["employees"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    assert_eq!(employee_ids.len(), 2);
    assert!(employee_ids.contains(&i64::from(walker.id)));
    assert!(employee_ids.contains(&i64::from(idle.id)));
}

#[actix_web::test]
async fn test_dashboard_is_scoped_to_owner() {
    let state = test_state().await;
    let owner = insert_user(&state, "Olga Owner", "olga@example.com", Role::Owner, None).await;
    let rival = insert_user(&state, "Rival Owner", "rival@example.com", Role::Owner, None).await;
    let mine = insert_user(&state, "Mine", "mine@example.com", Role::Employee, Some(owner.id)).await;
    let theirs = insert_user(&state, "Theirs", "theirs@example.com", Role::Employee, Some(rival.id)).await;

    let own_shop = insert_shop(&state, owner.id, "Corner Store").await;
    let rival_shop = insert_shop(&state, rival.id, "Rival Store").await;

    let since = start_of_local_day(chrono_tz::UTC, Utc::now());
    insert_ping(&state, mine.id, 1.0, 1.0, since + Duration::minutes(1)).await;
    insert_ping(&state, theirs.id, 2.0, 2.0, since + Duration::minutes(1)).await;

    let today = insert_collection(&state, own_shop.id, mine.id, 75.0, since + Duration::minutes(2)).await;
    insert_collection(&state, own_shop.id, mine.id, 30.0, since - Duration::hours(1)).await;
    insert_collection(&state, rival_shop.id, theirs.id, 99.0, since + Duration::minutes(2)).await;

    let dashboard = load_live_dashboard(&state.db, owner.id, since).await.unwrap();

    assert_eq!(dashboard.employees.len(), 1);
    assert_eq!(dashboard.employees[0].id, mine.id);
    assert_eq!(dashboard.history_paths.keys().copied().collect::<Vec<_>>(), vec![mine.id]);

    assert_eq!(dashboard.collection_points.len(), 1);
    let point = &dashboard.collection_points[0];
    assert_eq!(point.id, today.id);
    assert_eq!(point.amount, 75.0);
    assert_eq!(point.shop.id, own_shop.id);
    assert_eq!(point.employee.as_ref().map(|e| e.id), Some(mine.id));

    assert_eq!(dashboard.shops.len(), 1);
    assert_eq!(dashboard.shops[0].id, own_shop.id);
}

#[actix_web::test]
async fn test_dashboard_for_owner_without_data() {
    let state = test_state().await;
    let owner = insert_user(&state, "Olga Owner", "olga@example.com", Role::Owner, None).await;
    let token = token_for(&state, &owner);
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/owner/dashboard/live")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "employees": [], "historyPaths": {}, "collectionPoints": [], "shops": [] })
    );
}

#[actix_web::test]
async fn test_dashboard_rejects_other_roles() {
    let state = test_state().await;
    let owner = insert_user(&state, "Olga Owner", "olga@example.com", Role::Owner, None).await;
    let employee = insert_user(&state, "Eli", "eli@example.com", Role::Employee, Some(owner.id)).await;
    let admin = insert_user(&state, "Ada Admin", "ada@example.com", Role::Admin, None).await;
    let employee_token = token_for(&state, &employee);
    let admin_token = token_for(&state, &admin);
    let app = test_app!(state);

    for token in [employee_token, admin_token] {
        let req = test::TestRequest::get()
            .uri("/api/owner/dashboard/live")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    let req = test::TestRequest::get()
        .uri("/api/owner/dashboard/live")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
