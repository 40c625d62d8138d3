//! End-to-end API integration tests
//!
//! These tests drive the complete HTTP surface through the router:
//! - Auction start with supplied, generated and roster-loaded participants
//! - Bid, pass, finalize and nominate commands
//! - Error mapping (400 for bad input, 409 for commands out of turn)
//! - The live event stream endpoint

use std::sync::Arc;

use auction_api::agents::BidderRegistry;
use auction_api::api::{self, AppState};
use auction_api::config::AppConfig;
use auction_api::domain::auction::AuctionService;
use auction_api::events::EventBus;
use auction_api::infrastructure::roster::JsonPlayerRoster;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot

const TEAM_A: &str = "00000000-0000-0000-0000-00000000000a";
const TEAM_B: &str = "00000000-0000-0000-0000-00000000000b";

/// Setup test application without a coordinator, so every team is passive
fn setup_app() -> (Router, BidderRegistry) {
    let config = AppConfig {
        roster_path: concat!(env!("CARGO_MANIFEST_DIR"), "/data/players.json").into(),
        team_count: 4,
        human_teams: 1,
        ..AppConfig::default()
    };
    let registry = BidderRegistry::new();
    let state = AppState::new(
        Arc::new(AuctionService::new(EventBus::new())),
        registry.clone(),
        Arc::new(JsonPlayerRoster::new(config.roster_path.clone())),
        Arc::new(config),
    );

    (api::router(state), registry)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };

    (status, json)
}

fn two_team_start() -> Value {
    json!({
        "teams": [
            { "id": TEAM_A, "name": "Chargers", "purse": 1000 },
            { "id": TEAM_B, "name": "Strikers", "purse": 1000, "autonomous": true }
        ],
        "players": [
            { "id": 1, "name": "Star Opener", "role": "Batsman", "base_price": 100 }
        ]
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_state_before_start_is_empty() {
    let (app, _) = setup_app();

    let (status, json) = send(&app, "GET", "/auction/state", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "not_started");
    assert_eq!(json["teams"], json!([]));
    assert!(json["current_player"].is_null());
}

#[tokio::test]
async fn test_full_lot_flow() {
    let (app, registry) = setup_app();

    // Step 1: Start with supplied teams and players
    let (status, json) = send(&app, "POST", "/auction/start", Some(two_team_start())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "nomination");
    assert_eq!(json["remaining_players"].as_array().unwrap().len(), 1);
    assert!(!registry.is_autonomous(TEAM_A.parse().unwrap()));
    assert!(registry.is_autonomous(TEAM_B.parse().unwrap()));

    // Step 2: Nominate the only player
    let (status, json) = send(&app, "POST", "/auction/next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "bidding");
    assert_eq!(json["current_player"]["name"], "Star Opener");

    // Step 3: Team A bids
    let (status, json) = send(
        &app,
        "POST",
        "/auction/bid",
        Some(json!({ "team_id": TEAM_A, "amount": 150 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["current_highest_bid"], "150");
    assert_eq!(json["current_highest_bidder_team_id"], TEAM_A);

    // Step 4: Lower bid from team B is rejected
    let (status, json) = send(
        &app,
        "POST",
        "/auction/bid",
        Some(json!({ "team_id": TEAM_B, "amount": 140 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("strictly higher"));

    // Step 5: The leader cannot pass
    let (status, _) = send(&app, "POST", "/auction/pass", Some(json!({ "team_id": TEAM_A }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Step 6: Team B passes, leaving only the leader
    let (status, json) = send(&app, "POST", "/auction/pass", Some(json!({ "team_id": TEAM_B }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "sold");

    // Step 7: Finalize debits the winner
    let (status, json) = send(&app, "POST", "/auction/finalize", None).await;
    assert_eq!(status, StatusCode::OK);
    let winner = json["teams"]
        .as_array()
        .unwrap()
        .iter()
        .find(|team| team["id"] == TEAM_A)
        .unwrap();
    assert_eq!(winner["purse_remaining"], "850");
    assert_eq!(winner["squad"][0]["sold_price"], "150");

    // Step 8: Queue exhausted
    let (status, json) = send(&app, "POST", "/auction/next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "finished");

    // Step 9: No restart
    let (status, _) = send(&app, "POST", "/auction/start", Some(two_team_start())).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_start_without_body_uses_generated_teams_and_roster() {
    let (app, registry) = setup_app();

    let (status, json) = send(&app, "POST", "/auction/start", None).await;

    assert_eq!(status, StatusCode::OK);
    let teams = json["teams"].as_array().unwrap();
    assert_eq!(teams.len(), 4);
    assert_eq!(teams[0]["name"], "Team 1");
    assert_eq!(teams[0]["id"], "00000000-0000-0000-0000-000000000001");
    assert_eq!(teams[0]["purse_remaining"], "1000");
    assert_eq!(registry.autonomous_team_ids().len(), 3);
    assert_eq!(json["remaining_players"].as_array().unwrap().len(), 16);
    assert_eq!(json["remaining_players"][0]["name"], "Arjun Rao");
}

#[tokio::test]
async fn test_start_with_empty_team_list_is_bad_request() {
    let (app, _) = setup_app();

    let (status, json) = send(
        &app,
        "POST",
        "/auction/start",
        Some(json!({ "teams": [], "players": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_start_with_unknown_role_is_bad_request() {
    let (app, _) = setup_app();

    let (status, _) = send(
        &app,
        "POST",
        "/auction/start",
        Some(json!({
            "players": [{ "id": 1, "name": "Mystery", "role": "Goalkeeper", "base_price": 50 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_start_body_is_bad_request() {
    let (app, _) = setup_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auction/start")
                .header("content-type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_commands_before_start_conflict() {
    let (app, _) = setup_app();

    for uri in ["/auction/next", "/auction/finalize"] {
        let (status, _) = send(&app, "POST", uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT, "{}", uri);
    }

    let (status, _) = send(
        &app,
        "POST",
        "/auction/bid",
        Some(json!({ "team_id": TEAM_A, "amount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_event_stream_is_server_sent_events() {
    let (app, _) = setup_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auction/events")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_starts_keep_winner_classification() {
    for _ in 0..20 {
        let (app, registry) = setup_app();
        let start_with = |b_autonomous: bool| {
            json!({
                "teams": [
                    { "id": TEAM_A, "name": "Chargers", "purse": 1000, "autonomous": !b_autonomous },
                    { "id": TEAM_B, "name": "Strikers", "purse": 1000, "autonomous": b_autonomous }
                ],
                "players": [{ "id": 1, "name": "Star Opener", "role": "Batsman", "base_price": 100 }]
            })
        };

        let (first, second) = tokio::join!(
            send(&app, "POST", "/auction/start", Some(start_with(true))),
            send(&app, "POST", "/auction/start", Some(start_with(false))),
        );

        let statuses = (first.0, second.0);
        let b_autonomous = if statuses == (StatusCode::OK, StatusCode::CONFLICT) {
            true
        } else if statuses == (StatusCode::CONFLICT, StatusCode::OK) {
            false
        } else {
            panic!("expected exactly one start to win, got {:?}", statuses);
        };
        assert_eq!(registry.is_autonomous(TEAM_B.parse().unwrap()), b_autonomous);
        assert_eq!(registry.is_autonomous(TEAM_A.parse().unwrap()), !b_autonomous);
    }
}
