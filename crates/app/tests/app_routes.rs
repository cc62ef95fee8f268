//! End-to-end tests driving the full application router (sessions, auth
//! handoff, onboarding gate, campaign wizard) against a stub engine.

#![allow(clippy::unwrap_used)]

mod common;

use axum::routing::{get, post};
use axum::{Json, Router};
use axum::http::StatusCode as AxumStatus;
use axum::response::IntoResponse;
use serde_json::{Value, json};

use common::{session_cookie, spawn, spawn_app};

fn profile_json() -> Value {
    json!({
        "user_id": "user_2aB3xY",
        "creator_type": "educator",
        "niche": "personal finance",
        "target_audience": "young professionals",
        "platforms": ["twitter"],
        "created_at": "2024-01-15T10:00:00Z",
        "updated_at": "2024-01-15T10:00:00Z"
    })
}

/// Stub engine: profile present or absent, campaign endpoints echoing.
fn engine_stub(onboarded: bool) -> Router {
    let onboarding = move || async move {
        if onboarded {
            (AxumStatus::OK, Json(profile_json())).into_response()
        } else {
            (AxumStatus::NOT_FOUND, "no profile").into_response()
        }
    };

    Router::new()
        .route(
            "/onboarding",
            get(onboarding).post(|Json(_body): Json<Value>| async { Json(profile_json()) }),
        )
        .route(
            "/campaigns",
            get(|| async {
                Json(json!([{
                    "campaign_id": "cmp_existing",
                    "workspace_id": "ws_1",
                    "goal": { "title": "Grow the list" },
                    "status": "ACTIVE",
                    "start_date": "2024-01-01",
                    "end_date": "2024-01-31",
                    "campaign_type": "audience_growth",
                    "platforms": ["twitter"],
                    "metric": "followers",
                    "target": 1000,
                    "frequency": "daily"
                }]))
            })
            .post(|Json(body): Json<Value>| async move {
                let mut campaign = body;
                let obj = campaign.as_object_mut().unwrap();
                obj.insert("id".to_string(), json!("cmp_new"));
                obj.insert("workspace_id".to_string(), json!("ws_1"));
                obj.insert("status".to_string(), json!("draft"));
                Json(campaign)
            }),
        )
}

fn handoff_body() -> Value {
    json!({
        "user": {
            "id": "user_2aB3xY",
            "name": "Ada",
            "email": "ada@example.com"
        },
        "token": "test-token"
    })
}

/// Establish a session and return (client, cookie, app base URL).
async fn signed_in_app(onboarded: bool) -> (reqwest::Client, String, String) {
    let engine_addr = spawn(engine_stub(onboarded)).await;
    let app_addr = spawn_app(engine_addr).await;
    let base = format!("http://{app_addr}");

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/api/auth/session"))
        .json(&handoff_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let cookie = session_cookie(&response);

    (client, cookie, base)
}

#[tokio::test]
async fn auth_handoff_round_trip() {
    let (client, cookie, base) = signed_in_app(true).await;

    let me: Value = client
        .get(format!("{base}/api/auth/me"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["name"], "Ada");

    let response = client
        .post(format!("{base}/api/auth/logout"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let me: Value = client
        .get(format!("{base}/api/auth/me"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me, Value::Null);
}

#[tokio::test]
async fn deleted_accounts_cannot_establish_a_session() {
    let engine_addr = spawn(engine_stub(true)).await;
    let app_addr = spawn_app(engine_addr).await;

    let mut body = handoff_body();
    body["user"]["deleted_at"] = json!("2024-01-01T00:00:00Z");

    let response = reqwest::Client::new()
        .post(format!("http://{app_addr}/api/auth/session"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn protected_api_routes_require_a_session() {
    let engine_addr = spawn(engine_stub(true)).await;
    let app_addr = spawn_app(engine_addr).await;

    let response = reqwest::Client::new()
        .get(format!("http://{app_addr}/api/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn dashboard_signals_onboarding_when_profile_is_absent() {
    let (client, cookie, base) = signed_in_app(false).await;

    let body: Value = client
        .get(format!("{base}/api/dashboard"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["needs_onboarding"], json!(true));
    assert_eq!(body["redirect"], "/onboarding");
}

#[tokio::test]
async fn dashboard_serves_profile_and_campaigns_when_onboarded() {
    let (client, cookie, base) = signed_in_app(true).await;

    let body: Value = client
        .get(format!("{base}/api/dashboard"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["needs_onboarding"], json!(false));
    assert_eq!(body["profile"]["niche"], "personal finance");
    // duck-typed list item normalized: goal.title became the name
    assert_eq!(body["campaigns"][0]["name"], "Grow the list");
    assert_eq!(body["campaigns"][0]["status"], "active");
}

fn campaign_form(start: &str, end: &str) -> Value {
    json!({
        "name": "Launch",
        "campaignType": "product_launch",
        "startDate": start,
        "endDate": end,
        "platforms": ["twitter"],
        "metric": "followers",
        "target": 5000,
        "frequency": "daily"
    })
}

#[tokio::test]
async fn campaign_with_end_before_start_is_rejected_at_the_timeline_step() {
    let (client, cookie, base) = signed_in_app(true).await;

    // end date precedes start date
    let response = client
        .put(format!("{base}/api/campaigns/new/form"))
        .header("cookie", &cookie)
        .json(&campaign_form("2024-02-10", "2024-02-05"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // basics step is valid, so the first advance lands on the timeline
    let response = client
        .post(format!("{base}/api/campaigns/new/next"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["step"], "timeline");

    // advancing past the timeline is refused, keyed to endDate
    let response = client
        .post(format!("{base}/api/campaigns/new/next"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["field"], "endDate");
}

#[tokio::test]
async fn campaign_wizard_walks_to_submission() {
    let (client, cookie, base) = signed_in_app(true).await;

    client
        .put(format!("{base}/api/campaigns/new/form"))
        .header("cookie", &cookie)
        .json(&campaign_form("2024-02-05", "2024-02-10"))
        .send()
        .await
        .unwrap();

    for _ in 0..3 {
        let response = client
            .post(format!("{base}/api/campaigns/new/next"))
            .header("cookie", &cookie)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let response = client
        .post(format!("{base}/api/campaigns/new/submit"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["campaign"]["id"], "cmp_new");

    // wizard session state was discarded on submission
    let body: Value = client
        .get(format!("{base}/api/campaigns/new"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["index"], json!(0));
    assert_eq!(body["form"]["name"], "");
}

#[tokio::test]
async fn submitting_before_the_final_step_is_refused() {
    let (client, cookie, base) = signed_in_app(true).await;

    client
        .put(format!("{base}/api/campaigns/new/form"))
        .header("cookie", &cookie)
        .json(&campaign_form("2024-02-05", "2024-02-10"))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{base}/api/campaigns/new/submit"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn onboarding_toggle_is_symmetric() {
    let (client, cookie, base) = signed_in_app(false).await;

    let toggle = |value: &str| {
        let client = client.clone();
        let cookie = cookie.clone();
        let url = format!("{base}/api/onboarding/toggle");
        let body = json!({ "field": "platforms", "value": value });
        async move {
            let response = client
                .post(url)
                .header("cookie", &cookie)
                .json(&body)
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 200);
            response.json::<Value>().await.unwrap()
        }
    };

    let state = toggle("twitter").await;
    assert_eq!(state["form"]["platforms"], json!(["twitter"]));

    let state = toggle("youtube").await;
    assert_eq!(state["form"]["platforms"], json!(["twitter", "youtube"]));

    // toggling the same value again removes it, preserving the rest
    let state = toggle("twitter").await;
    assert_eq!(state["form"]["platforms"], json!(["youtube"]));

    let state = toggle("twitter").await;
    assert_eq!(state["form"]["platforms"], json!(["youtube", "twitter"]));
}

#[tokio::test]
async fn onboarding_wizard_walks_to_submission() {
    let (client, cookie, base) = signed_in_app(false).await;

    let form = json!({
        "name": "Ada Makes Money",
        "creatorType": "educator",
        "niche": "personal finance",
        "targetAudience": "young professionals",
        "goals": ["grow_audience"],
        "platforms": ["twitter"]
    });
    client
        .put(format!("{base}/api/onboarding/form"))
        .header("cookie", &cookie)
        .json(&form)
        .send()
        .await
        .unwrap();

    for _ in 0..3 {
        let response = client
            .post(format!("{base}/api/onboarding/next"))
            .header("cookie", &cookie)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let response = client
        .post(format!("{base}/api/onboarding/submit"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["redirect"], "/dashboard");
    assert_eq!(body["profile"]["niche"], "personal finance");
}

#[tokio::test]
async fn onboarding_next_refuses_an_invalid_identity_step() {
    let (client, cookie, base) = signed_in_app(false).await;

    // whitespace-only name fails the identity predicate
    let form = json!({ "name": "   ", "niche": "personal finance" });
    client
        .put(format!("{base}/api/onboarding/form"))
        .header("cookie", &cookie)
        .json(&form)
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{base}/api/onboarding/next"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["field"], "name");
}

#[tokio::test]
async fn unknown_toggle_field_is_a_bad_request() {
    let (client, cookie, base) = signed_in_app(false).await;

    let response = client
        .post(format!("{base}/api/onboarding/toggle"))
        .header("cookie", &cookie)
        .json(&json!({ "field": "colors", "value": "red" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
