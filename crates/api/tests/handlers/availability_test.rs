use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{TestContext, issue_paths};

fn windows(body: &Value) -> Vec<(i64, String, String)> {
    body["availabilities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| {
            (
                a["day_of_week"].as_i64().unwrap(),
                a["start_time"].as_str().unwrap().to_string(),
                a["end_time"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[test_log::test(tokio::test)]
async fn requires_a_profile() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();

    let response = ctx.get(user, "/api/availability").await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>(), json!({ "error": "Profile not found" }));

    let response = ctx.put(user, "/api/availability", &json!({ "availabilities": [] })).await;
    assert_eq!(response.status_code(), 404);
}

#[test_log::test(tokio::test)]
async fn empty_list_round_trips() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;

    let saved = ctx.put(user, "/api/availability", &json!({ "availabilities": [] })).await;
    assert_eq!(saved.status_code(), 200);
    assert_eq!(saved.json::<Value>(), json!({ "availabilities": [] }));

    let listed = ctx.get(user, "/api/availability").await;
    assert_eq!(listed.json::<Value>(), json!({ "availabilities": [] }));
}

#[test_log::test(tokio::test)]
async fn single_window_round_trips() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;

    let body = json!({
        "availabilities": [{ "day_of_week": 1, "start_time": "09:00", "end_time": "18:00" }]
    });
    let saved = ctx.put(user, "/api/availability", &body).await;
    assert_eq!(saved.status_code(), 200);

    let listed = ctx.get(user, "/api/availability").await.json::<Value>();
    assert_eq!(windows(&listed), vec![(1, "09:00".to_string(), "18:00".to_string())]);
    assert_eq!(listed["availabilities"][0]["profile_id"], json!(user.to_string()));
}

#[test_log::test(tokio::test)]
async fn save_replaces_previous_set_and_sorts() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;

    ctx.put(
        user,
        "/api/availability",
        &json!({ "availabilities": [{ "day_of_week": 6, "start_time": "10:00", "end_time": "14:00" }] }),
    )
    .await;

    let saved = ctx
        .put(
            user,
            "/api/availability",
            &json!({ "availabilities": [
                { "day_of_week": 5, "start_time": "14:00", "end_time": "18:00" },
                { "day_of_week": 1, "start_time": "09:00", "end_time": "12:00" },
                { "day_of_week": 5, "start_time": "08:00", "end_time": "12:00" }
            ] }),
        )
        .await
        .json::<Value>();

    let expected = vec![
        (1, "09:00".to_string(), "12:00".to_string()),
        (5, "08:00".to_string(), "12:00".to_string()),
        (5, "14:00".to_string(), "18:00".to_string()),
    ];
    assert_eq!(windows(&saved), expected);
    let listed = ctx.get(user, "/api/availability").await.json::<Value>();
    assert_eq!(windows(&listed), expected);
}

#[test_log::test(tokio::test)]
async fn overlapping_windows_are_kept() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;

    let response = ctx
        .put(
            user,
            "/api/availability",
            &json!({ "availabilities": [
                { "day_of_week": 2, "start_time": "09:00", "end_time": "12:00" },
                { "day_of_week": 2, "start_time": "11:00", "end_time": "15:00" }
            ] }),
        )
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(windows(&response.json::<Value>()).len(), 2);
}

#[test_log::test(tokio::test)]
async fn invalid_entry_rejects_whole_list_and_keeps_old_set() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;
    ctx.put(
        user,
        "/api/availability",
        &json!({ "availabilities": [{ "day_of_week": 3, "start_time": "09:00", "end_time": "17:00" }] }),
    )
    .await;

    let response = ctx
        .put(
            user,
            "/api/availability",
            &json!({ "availabilities": [
                { "day_of_week": 1, "start_time": "09:00", "end_time": "18:00" },
                { "day_of_week": 7, "start_time": "9:00", "end_time": "18:00" },
                { "day_of_week": 2, "start_time": "18:00", "end_time": "09:00" }
            ] }),
        )
        .await;
    assert_eq!(response.status_code(), 400);

    let body = response.json::<Value>();
    assert_eq!(body["error"], json!("Invalid data"));
    assert_eq!(
        issue_paths(&body),
        vec![
            json!(["availabilities", 1, "day_of_week"]),
            json!(["availabilities", 1, "start_time"]),
            json!(["availabilities", 2, "start_time"]),
        ]
    );

    let listed = ctx.get(user, "/api/availability").await.json::<Value>();
    assert_eq!(windows(&listed), vec![(3, "09:00".to_string(), "17:00".to_string())]);
}

#[test_log::test(tokio::test)]
async fn non_list_payload_is_rejected() {
    let ctx = TestContext::new();
    let user = Uuid::new_v4();
    ctx.create_profile(user, "Studio").await;

    let response = ctx
        .put(user, "/api/availability", &json!({ "availabilities": { "day_of_week": 1 } }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(issue_paths(&response.json::<Value>()), vec![json!(["availabilities"])]);
}

#[test_log::test(tokio::test)]
async fn availability_is_private_to_its_owner() {
    let ctx = TestContext::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    ctx.create_profile(alice, "Alice Studio").await;
    ctx.create_profile(bob, "Bob Studio").await;

    ctx.put(
        alice,
        "/api/availability",
        &json!({ "availabilities": [{ "day_of_week": 1, "start_time": "09:00", "end_time": "18:00" }] }),
    )
    .await;

    let bobs = ctx.get(bob, "/api/availability").await.json::<Value>();
    assert_eq!(bobs, json!({ "availabilities": [] }));

    // Bob clearing his own set leaves Alice's untouched
    ctx.put(bob, "/api/availability", &json!({ "availabilities": [] })).await;
    let alices = ctx.get(alice, "/api/availability").await.json::<Value>();
    assert_eq!(windows(&alices).len(), 1);
}
