//! End-to-end tests over the HTTP API on an ephemeral port.

use reqwest::{Client, StatusCode};
use serde_json::Value;

use fitclub::web::REQUEST_ID_HEADER;

use super::test_helpers::{memory_state, seed_club, spawn_server, upcoming_monday, Club};

async fn start() -> (Client, String, Club, tokio_util::sync::CancellationToken) {
    let state = memory_state().await;
    let club = seed_club(&state.db).await;
    let (base, ct) = spawn_server(state).await;
    (Client::new(), base, club, ct)
}

async fn json(response: reqwest::Response) -> Value {
    response.json().await.expect("json body")
}

fn booking_form(trainer_id: i64, start: &str, end: &str) -> Vec<(&'static str, String)> {
    vec![
        ("trainer_id", trainer_id.to_string()),
        ("session_date", upcoming_monday().format("%Y-%m-%d").to_string()),
        ("start_time", start.to_owned()),
        ("end_time", end.to_owned()),
    ]
}

// ── Health and request ids ───────────────────────────────────

#[tokio::test]
async fn health_returns_ok_with_request_id() {
    let (client, base, _, ct) = start().await;

    let resp = client
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("GET /health");
    assert_eq!(resp.status(), StatusCode::OK);
    let request_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("request id header");
    assert!(uuid::Uuid::parse_str(&request_id).is_ok());
    assert_eq!(resp.text().await.expect("body"), "ok");

    ct.cancel();
}

// ── Extractor rejections ─────────────────────────────────────

#[tokio::test]
async fn malformed_path_and_body_render_json_invalid_input() {
    let (client, base, club, ct) = start().await;

    let bad_id = client
        .post(format!("{base}/members/abc/sessions"))
        .form(&booking_form(club.trainer_id, "10:00", "11:00"))
        .send()
        .await
        .expect("non-integer id");
    assert_eq!(bad_id.status(), StatusCode::BAD_REQUEST);
    assert!(bad_id
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json")));
    let body = json(bad_id).await;
    assert_eq!(body["error"], "invalid_input");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

    let bare_body = client
        .post(format!("{base}/members/{}/sessions", club.member_id))
        .body("trainer_id=1")
        .send()
        .await
        .expect("no content type");
    assert_eq!(bare_body.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(bare_body).await["error"], "invalid_input");

    let bad_session = client
        .post(format!(
            "{base}/trainers/{}/sessions/first/complete",
            club.trainer_id
        ))
        .send()
        .await
        .expect("non-integer session id");
    assert_eq!(bad_session.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(bad_session).await["error"], "invalid_input");

    ct.cancel();
}

// ── Booking ──────────────────────────────────────────────────

#[tokio::test]
async fn booking_over_http_maps_outcomes_to_statuses() {
    let (client, base, club, ct) = start().await;
    let url = format!("{base}/members/{}/sessions", club.member_id);

    let created = client
        .post(&url)
        .form(&booking_form(club.trainer_id, "10:00", "11:00"))
        .send()
        .await
        .expect("book");
    assert_eq!(created.status(), StatusCode::CREATED);
    let session = json(created).await;
    assert_eq!(session["status"], "scheduled");
    assert_eq!(session["room_id"], club.room_ids[0]);
    assert_eq!(session["start_time"], "10:00:00");

    let conflict = client
        .post(&url)
        .form(&booking_form(club.trainer_id, "10:30", "11:30"))
        .send()
        .await
        .expect("book overlap");
    assert_eq!(conflict.status(), StatusCode::CONFLICT);
    assert_eq!(json(conflict).await["error"], "conflict");

    let outside = client
        .post(&url)
        .form(&booking_form(club.trainer_id, "19:00", "20:00"))
        .send()
        .await
        .expect("book outside");
    assert_eq!(outside.status(), StatusCode::CONFLICT);
    assert_eq!(json(outside).await["error"], "not_available");

    let inverted = client
        .post(&url)
        .form(&booking_form(club.trainer_id, "12:00", "11:00"))
        .send()
        .await
        .expect("book inverted");
    assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(inverted).await["error"], "invalid_input");

    let missing = client
        .post(&url)
        .form(&[("trainer_id", club.trainer_id.to_string())])
        .send()
        .await
        .expect("book incomplete");
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body = json(missing).await;
    assert_eq!(body["error"], "invalid_input");
    assert!(body["message"]
        .as_str()
        .is_some_and(|m| m.contains("session_date")));

    let unknown = client
        .post(format!("{base}/members/999/sessions"))
        .form(&booking_form(club.trainer_id, "13:00", "14:00"))
        .send()
        .await
        .expect("book unknown member");
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(unknown).await["error"], "not_found");

    ct.cancel();
}

#[tokio::test]
async fn cancel_and_free_rooms_over_http() {
    let (client, base, club, ct) = start().await;
    let date = upcoming_monday().format("%Y-%m-%d").to_string();

    let session = json(
        client
            .post(format!("{base}/members/{}/sessions", club.member_id))
            .form(&booking_form(club.trainer_id, "09:00", "10:00"))
            .send()
            .await
            .expect("book"),
    )
    .await;
    let session_id = session["id"].as_i64().expect("session id");

    let free = json(
        client
            .get(format!("{base}/rooms/free"))
            .query(&[
                ("session_date", date.as_str()),
                ("start_time", "09:00"),
                ("end_time", "10:00"),
            ])
            .send()
            .await
            .expect("free rooms"),
    )
    .await;
    let free_ids: Vec<_> = free
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|room| room["id"].as_i64())
        .collect();
    assert_eq!(free_ids, vec![club.room_ids[1]]);

    let foreign = client
        .post(format!(
            "{base}/members/{}/sessions/{session_id}/cancel",
            club.second_member_id
        ))
        .send()
        .await
        .expect("cancel foreign");
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

    let cancelled = client
        .post(format!(
            "{base}/members/{}/sessions/{session_id}/cancel",
            club.member_id
        ))
        .send()
        .await
        .expect("cancel");
    assert_eq!(cancelled.status(), StatusCode::OK);
    assert_eq!(json(cancelled).await["status"], "cancelled");

    ct.cancel();
}

// ── Member views ─────────────────────────────────────────────

#[tokio::test]
async fn registration_and_dashboard() {
    let (client, base, club, ct) = start().await;

    let registered = client
        .post(format!("{base}/members"))
        .form(&[
            ("email", "new@club.test"),
            ("first_name", "New"),
            ("last_name", "Member"),
        ])
        .send()
        .await
        .expect("register");
    assert_eq!(registered.status(), StatusCode::CREATED);

    let duplicate = client
        .post(format!("{base}/members"))
        .form(&[
            ("email", "new@club.test"),
            ("first_name", "Again"),
            ("last_name", "Member"),
        ])
        .send()
        .await
        .expect("register again");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    assert_eq!(json(duplicate).await["error"], "already_exists");

    let goal = client
        .post(format!("{base}/members/{}/goals", club.member_id))
        .form(&[("goal_type", "Weight Loss"), ("target_value", "70")])
        .send()
        .await
        .expect("goal");
    assert_eq!(goal.status(), StatusCode::CREATED);

    let metric = client
        .post(format!("{base}/members/{}/metrics", club.member_id))
        .form(&[("weight", "81.5"), ("heart_rate", "60")])
        .send()
        .await
        .expect("metric");
    assert_eq!(metric.status(), StatusCode::CREATED);

    client
        .post(format!("{base}/members/{}/sessions", club.member_id))
        .form(&booking_form(club.trainer_id, "15:00", "16:00"))
        .send()
        .await
        .expect("book");

    let dashboard = json(
        client
            .get(format!("{base}/members/{}/dashboard", club.member_id))
            .send()
            .await
            .expect("dashboard"),
    )
    .await;
    assert_eq!(dashboard["member"]["id"], club.member_id);
    assert_eq!(dashboard["latest_metric"]["weight"], 81.5);
    assert_eq!(dashboard["active_goals"].as_array().map(Vec::len), Some(1));
    assert_eq!(
        dashboard["upcoming_sessions"].as_array().map(Vec::len),
        Some(1)
    );
    assert_eq!(dashboard["upcoming_sessions"][0]["room_name"], "PT 1");
    assert_eq!(dashboard["pending_balance"], "0.00");

    let missing = client
        .get(format!("{base}/members/4040/dashboard"))
        .send()
        .await
        .expect("dashboard missing");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    ct.cancel();
}

// ── Trainer views ────────────────────────────────────────────

#[tokio::test]
async fn trainer_sees_only_members_they_trained() {
    let (client, base, club, ct) = start().await;

    client
        .post(format!("{base}/members/{}/sessions", club.member_id))
        .form(&booking_form(club.trainer_id, "09:00", "10:00"))
        .send()
        .await
        .expect("book");

    let members = json(
        client
            .get(format!("{base}/trainers/{}/members", club.trainer_id))
            .send()
            .await
            .expect("members"),
    )
    .await;
    assert_eq!(members.as_array().map(Vec::len), Some(1));

    let detail = client
        .get(format!(
            "{base}/trainers/{}/members/{}",
            club.trainer_id, club.member_id
        ))
        .send()
        .await
        .expect("detail");
    assert_eq!(detail.status(), StatusCode::OK);

    let stranger = client
        .get(format!(
            "{base}/trainers/{}/members/{}",
            club.trainer_id, club.second_member_id
        ))
        .send()
        .await
        .expect("stranger");
    assert_eq!(stranger.status(), StatusCode::NOT_FOUND);

    let schedule = json(
        client
            .get(format!("{base}/trainers/{}/schedule", club.trainer_id))
            .send()
            .await
            .expect("schedule"),
    )
    .await;
    assert_eq!(schedule["sessions"].as_array().map(Vec::len), Some(1));
    assert_eq!(schedule["availability"][0]["day_of_week"], "Monday");

    ct.cancel();
}

// ── Admin ────────────────────────────────────────────────────

#[tokio::test]
async fn admin_billing_flow_updates_dashboard() {
    let (client, base, club, ct) = start().await;

    let bill = client
        .post(format!("{base}/admin/bills"))
        .form(&[
            ("member_id", club.member_id.to_string()),
            ("amount", "49.90".to_owned()),
            ("description", "Monthly membership".to_owned()),
        ])
        .send()
        .await
        .expect("bill");
    assert_eq!(bill.status(), StatusCode::CREATED);
    let bill = json(bill).await;
    assert_eq!(bill["total_amount"], "49.90");
    assert_eq!(bill["status"], "pending");
    let bill_id = bill["id"].as_i64().expect("bill id");

    let stats = json(
        client
            .get(format!("{base}/admin/dashboard"))
            .send()
            .await
            .expect("stats"),
    )
    .await;
    assert_eq!(stats["total_members"], 2);
    assert_eq!(stats["total_trainers"], 2);
    assert_eq!(stats["pending_revenue"], "49.90");

    let overpay = client
        .post(format!("{base}/admin/payments"))
        .form(&[
            ("bill_id", bill_id.to_string()),
            ("amount", "50.00".to_owned()),
            ("payment_method", "card".to_owned()),
        ])
        .send()
        .await
        .expect("overpay");
    assert_eq!(overpay.status(), StatusCode::BAD_REQUEST);

    let paid = client
        .post(format!("{base}/admin/payments"))
        .form(&[
            ("bill_id", bill_id.to_string()),
            ("amount", "49.90".to_owned()),
            ("payment_method", "cash".to_owned()),
        ])
        .send()
        .await
        .expect("pay");
    assert_eq!(paid.status(), StatusCode::CREATED);
    let receipt = json(paid).await;
    assert_eq!(receipt["payment"]["method"], "cash");
    assert_eq!(receipt["bill"]["status"], "paid");

    let bills = json(
        client
            .get(format!("{base}/admin/billing"))
            .send()
            .await
            .expect("bills"),
    )
    .await;
    assert_eq!(bills[0]["amount_paid"], "49.90");

    let stats = json(
        client
            .get(format!("{base}/admin/dashboard"))
            .send()
            .await
            .expect("stats"),
    )
    .await;
    assert_eq!(stats["pending_revenue"], "0.00");

    ct.cancel();
}

#[tokio::test]
async fn admin_catalog_management() {
    let (client, base, club, ct) = start().await;

    let room = client
        .post(format!("{base}/admin/rooms"))
        .form(&[
            ("room_name", "PT 3"),
            ("room_type", "Personal Training"),
            ("capacity", "2"),
        ])
        .send()
        .await
        .expect("room");
    assert_eq!(room.status(), StatusCode::CREATED);
    let rooms = json(
        client
            .get(format!("{base}/admin/rooms"))
            .send()
            .await
            .expect("rooms"),
    )
    .await;
    assert_eq!(rooms.as_array().map(Vec::len), Some(4));

    let studio_id = club.studio_id.to_string();
    let equipment = json(
        client
            .post(format!("{base}/admin/equipment"))
            .form(&[
                ("equipment_name", "Rowing machine"),
                ("room_id", studio_id.as_str()),
            ])
            .send()
            .await
            .expect("equipment"),
    )
    .await;
    assert_eq!(equipment["status"], "operational");
    assert_eq!(equipment["room_name"], "Studio");
    let equipment_id = equipment["id"].as_i64().expect("equipment id");

    let updated = json(
        client
            .post(format!("{base}/admin/equipment/{equipment_id}/status"))
            .form(&[("status", "Out of Service"), ("notes", "belt torn")])
            .send()
            .await
            .expect("status"),
    )
    .await;
    assert_eq!(updated["status"], "out_of_service");
    assert_eq!(updated["maintenance_notes"], "belt torn");

    let class = client
        .post(format!("{base}/admin/classes"))
        .form(&[
            ("class_name", "Spin".to_owned()),
            ("trainer_id", club.trainer_id.to_string()),
            ("room_id", club.studio_id.to_string()),
            (
                "schedule_date",
                upcoming_monday().format("%Y-%m-%d").to_string(),
            ),
            ("start_time", "18:00".to_owned()),
            ("end_time", "19:00".to_owned()),
            ("capacity", "1".to_owned()),
        ])
        .send()
        .await
        .expect("class");
    assert_eq!(class.status(), StatusCode::CREATED);
    let class = json(class).await;
    assert_eq!(class["spots_left"], 1);
    let class_id = class["id"].as_i64().expect("class id");

    let joined = client
        .post(format!("{base}/members/{}/classes", club.member_id))
        .form(&[("class_id", class_id.to_string())])
        .send()
        .await
        .expect("join");
    assert_eq!(joined.status(), StatusCode::CREATED);

    let full = client
        .post(format!("{base}/members/{}/classes", club.second_member_id))
        .form(&[("class_id", class_id.to_string())])
        .send()
        .await
        .expect("join full");
    assert_eq!(full.status(), StatusCode::BAD_REQUEST);

    ct.cancel();
}
