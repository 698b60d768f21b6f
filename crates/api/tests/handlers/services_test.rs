use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{TestContext, issue_paths};

#[test_log::test(tokio::test)]
async fn create_requires_a_profile() {
    let ctx = TestContext::new();
    let response = ctx
        .post(Uuid::new_v4(), "/api/services", &json!({ "name": "Haircut", "duration": 30 }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "You need to set up your profile first" })
    );
    assert_eq!(ctx.store.service_count().await, 0);
}

#[test_log::test(tokio::test)]
async fn create_list_and_get() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;

    let first = ctx.create_service(user, "Haircut", 30).await;
    let second = ctx.create_service(user, " Coloring ", 120).await;

    let listed = ctx.get(user, "/api/services").await.json::<Value>();
    let ids: Vec<&str> = listed["services"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);

    let fetched = ctx.get(user, &format!("/api/services/{second}")).await;
    assert_eq!(fetched.status_code(), 200);
    let service = fetched.json::<Value>()["service"].clone();
    assert_eq!(service["name"], json!("Coloring"));
    assert_eq!(service["duration"], json!(120));
    assert_eq!(service["profile_id"], json!(user.to_string()));
}

#[test_log::test(tokio::test)]
async fn list_is_empty_for_new_owner() {
    let ctx = TestContext::new();
    let response = ctx.get(Uuid::new_v4(), "/api/services").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), json!({ "services": [] }));
}

#[test_log::test(tokio::test)]
async fn update_changes_duration_in_place() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;
    let id = ctx.create_service(user, "Haircut", 30).await;

    let response = ctx
        .put(user, &format!("/api/services/{id}"), &json!({ "name": "Haircut", "duration": 35 }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["service"]["duration"], json!(35));

    let listed = ctx.get(user, "/api/services").await.json::<Value>();
    let services = listed["services"].as_array().unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["id"], json!(id));
    assert_eq!(services[0]["duration"], json!(35));
}

#[test_log::test(tokio::test)]
async fn delete_removes_the_service() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;
    let id = ctx.create_service(user, "Haircut", 30).await;

    let response = ctx.delete(user, &format!("/api/services/{id}")).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Service deleted successfully" })
    );

    assert_eq!(ctx.get(user, &format!("/api/services/{id}")).await.status_code(), 404);
    assert_eq!(ctx.delete(user, &format!("/api/services/{id}")).await.status_code(), 404);
}

#[test_log::test(tokio::test)]
async fn other_owners_cannot_touch_a_service() {
    let ctx = TestContext::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    ctx.create_profile(alice, "Alice Studio").await;
    ctx.create_profile(bob, "Bob Studio").await;
    let id = ctx.create_service(alice, "Haircut", 30).await;
    let path = format!("/api/services/{id}");

    assert_eq!(ctx.get(bob, &path).await.status_code(), 404);
    assert_eq!(
        ctx.put(bob, &path, &json!({ "name": "Hijacked", "duration": 60 }))
            .await
            .status_code(),
        404
    );
    assert_eq!(ctx.delete(bob, &path).await.status_code(), 404);
    assert_eq!(ctx.get(bob, "/api/services").await.json::<Value>(), json!({ "services": [] }));

    let untouched = ctx.get(alice, &path).await.json::<Value>();
    assert_eq!(untouched["service"]["name"], json!("Haircut"));
    assert_eq!(untouched["service"]["duration"], json!(30));
}

#[rstest]
#[case("not-a-uuid")]
#[case("123")]
#[tokio::test]
async fn malformed_id_is_not_found(#[case] id: &str) {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;

    assert_eq!(ctx.get(user, &format!("/api/services/{id}")).await.status_code(), 404);
    assert_eq!(ctx.delete(user, &format!("/api/services/{id}")).await.status_code(), 404);
}

#[test_log::test(tokio::test)]
async fn name_and_duration_issues_are_reported_together() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;

    let response = ctx
        .post(user, "/api/services", &json!({ "name": "A", "duration": 10 }))
        .await;
    assert_eq!(response.status_code(), 400);

    let body = response.json::<Value>();
    assert_eq!(body["error"], json!("Invalid data"));
    assert_eq!(issue_paths(&body), vec![json!(["name"]), json!(["duration"])]);
    assert_eq!(ctx.store.service_count().await, 0);
}

#[rstest]
#[case(json!(14))]
#[case(json!(481))]
#[case(json!(30.5))]
#[case(json!("30"))]
#[case(Value::Null)]
#[tokio::test]
async fn invalid_durations_are_rejected(#[case] duration: Value) {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;

    let response = ctx
        .post(user, "/api/services", &json!({ "name": "Haircut", "duration": duration }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(issue_paths(&response.json::<Value>()), vec![json!(["duration"])]);
}

#[test_log::test(tokio::test)]
async fn invalid_update_does_not_change_the_service() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;
    let id = ctx.create_service(user, "Haircut", 30).await;
    let path = format!("/api/services/{id}");

    let response = ctx.put(user, &path, &json!({ "name": "Haircut", "duration": 500 })).await;
    assert_eq!(response.status_code(), 400);

    let fetched = ctx.get(user, &path).await.json::<Value>();
    assert_eq!(fetched["service"]["duration"], json!(30));
}
