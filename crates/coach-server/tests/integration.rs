use axum::http::StatusCode;
use http_body_util::BodyExt;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bootstrap a minimal coach workspace inside the given temp directory.
fn init_project(dir: &TempDir) {
    coach_core::io::ensure_dir(&dir.path().join(".coach/records")).unwrap();
    coach_core::config::Config::new("test-studio")
        .save(dir.path())
        .unwrap();
    coach_core::state::State::new("test-studio")
        .save(dir.path())
        .unwrap();
}

/// Send a request via `oneshot` and return (status, parsed JSON body).
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

async fn post(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, None).await
}

async fn post_json(
    app: &axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

async fn open(app: &axum::Router, query: &str) -> String {
    let (status, body) = post(app, &format!("/api/wizards{query}")).await;
    assert_eq!(status, StatusCode::CREATED, "open failed: {body}");
    body["session"].as_str().unwrap().to_string()
}

async fn add_block(app: &axum::Router, session: &str, body: serde_json::Value) -> String {
    let (status, body) = post_json(app, &format!("/api/wizards/{session}/blocks"), body).await;
    assert_eq!(status, StatusCode::CREATED, "add block failed: {body}");
    body["block"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn open_wizard_returns_view() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());

    let (status, body) = post(&app, "/api/wizards?category=fitness").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["step"], "overview");
    assert_eq!(body["draft"]["category"], "fitness");
    assert_eq!(body["plan"], json!(["overview", "content", "calendar", "review"]));
    assert_eq!(body["canProceed"], false);
}

#[tokio::test]
async fn open_wizard_rejects_bad_category() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());

    let (status, body) = post(&app, "/api/wizards?category=yoga").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("yoga"));
}

#[tokio::test]
async fn open_wizard_requires_init() {
    let dir = TempDir::new().unwrap();
    let app = coach_server::build_router(dir.path().to_path_buf());

    let (status, _) = post(&app, "/api/wizards").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_session_is_404() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());

    let (status, _) = get(&app, "/api/wizards/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = post(&app, "/api/wizards/nope/next").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_wizard_discards_session() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());
    let session = open(&app, "").await;

    let (status, body) = get(&app, "/api/wizards").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/wizards/{session}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(&app, &format!("/api/wizards/{session}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn next_blocked_until_overview_complete() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());
    let session = open(&app, "?category=nutrition").await;

    let (status, body) = post(&app, &format!("/api/wizards/{session}/next")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"], json!(["title"]));

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/wizards/{session}/draft"),
        Some(json!({ "title": "Green Smoothie" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["canProceed"], true);

    let (status, body) = post(&app, &format!("/api/wizards/{session}/next")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "content");

    let (status, body) = post(&app, &format!("/api/wizards/{session}/previous")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "overview");

    let (status, _) = post(&app, &format!("/api/wizards/{session}/previous")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tags_toggle() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());
    let session = open(&app, "").await;
    let uri = format!("/api/wizards/{session}/tags");

    let (status, body) = post_json(&app, &uri, json!({ "tag": "strength" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "added");
    assert_eq!(body["wizard"]["draft"]["tags"], json!(["strength"]));

    let (_, body) = post_json(&app, &uri, json!({ "tag": "strength" })).await;
    assert_eq!(body["action"], "removed");

    let (status, _) = post_json(&app, &uri, json!({ "tag": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blocks_add_edit_move_remove() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());
    let session = open(&app, "?category=nutrition").await;

    let a = add_block(&app, &session, json!({ "type": "text", "content": "Intro" })).await;
    let b = add_block(&app, &session, json!({ "type": "ingredients" })).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/wizards/{session}/blocks/{b}"),
        Some(json!({ "items": ["oats", "milk"], "imageUrl": "https://img.example/x.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ignored"], json!(["imageUrl"]));
    assert_eq!(
        body["wizard"]["draft"]["blocks"][1]["items"],
        json!(["oats", "milk"])
    );

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/wizards/{session}/blocks/{b}/position"),
        Some(json!({ "index": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["draft"]["blocks"][0]["id"], b.as_str());
    assert_eq!(body["draft"]["blocks"][1]["order"], 1);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/wizards/{session}/blocks/{a}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["draft"]["blocks"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/wizards/{session}/blocks/{a}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn days_assign_and_unassign() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());
    let session = open(&app, "?category=fitness").await;
    let block = add_block(&app, &session, json!({ "type": "text" })).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/wizards/{session}/days/3"),
        json!({ "blockId": block }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["draft"]["days"], json!([{ "day": 3, "blockIds": [block] }]));

    let (status, _) = post_json(
        &app,
        &format!("/api/wizards/{session}/days/0"),
        json!({ "blockId": block }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/wizards/{session}/days/3/{block}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["draft"].get("days").is_none());
}

// ---------------------------------------------------------------------------
// Save / publish
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_empty_draft_lists_missing_fields() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());
    let session = open(&app, "?category=mental").await;

    let (status, body) = post(&app, &format!("/api/wizards/{session}/publish")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = body["fields"].as_array().unwrap();
    assert!(fields.contains(&json!("title")));
    assert!(fields.contains(&json!("blocks")));

    // A draft save of the same empty draft succeeds.
    let (status, body) = post(&app, &format!("/api/wizards/{session}/save-draft")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wizard"]["step"], "overview");
    assert!(body["record"].as_str().is_some());
}

#[tokio::test]
async fn push_day_reaches_success() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());
    let session = open(&app, "?category=fitness").await;

    send(
        &app,
        "PATCH",
        &format!("/api/wizards/{session}/draft"),
        Some(json!({ "title": "Push Day" })),
    )
    .await;
    post_json(
        &app,
        &format!("/api/wizards/{session}/tags"),
        json!({ "tag": "strength" }),
    )
    .await;
    let (_, body) = post(&app, &format!("/api/wizards/{session}/next")).await;
    assert_eq!(body["step"], "content");

    add_block(&app, &session, json!({ "type": "text", "content": "Warm up" })).await;
    let (_, body) = post(&app, &format!("/api/wizards/{session}/next")).await;
    assert_eq!(body["step"], "calendar");
    let (_, body) = post(&app, &format!("/api/wizards/{session}/next")).await;
    assert_eq!(body["step"], "review");

    let (status, body) = post(&app, &format!("/api/wizards/{session}/publish")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wizard"]["step"], "success");
    let record = body["record"].as_str().unwrap().to_string();

    let (status, stored) = get(&app, &format!("/api/records/{record}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["title"], "Push Day");
    assert_eq!(stored["isDraft"], false);
    assert_eq!(stored["tags"], json!(["strength"]));

    // Success is terminal until start-new.
    let (status, _) = post(&app, &format!("/api/wizards/{session}/next")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, body) = post(&app, &format!("/api/wizards/{session}/start-new")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "overview");
    assert_eq!(body["draft"]["category"], "fitness");
}

#[tokio::test]
async fn resume_existing_record() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());
    let session = open(&app, "?category=nutrition").await;
    send(
        &app,
        "PATCH",
        &format!("/api/wizards/{session}/draft"),
        Some(json!({ "title": "Overnight Oats" })),
    )
    .await;
    let (_, saved) = post(&app, &format!("/api/wizards/{session}/save-draft")).await;
    let record = saved["record"].as_str().unwrap().to_string();

    let (status, body) = post(&app, &format!("/api/wizards?resume={record}&step=review")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["draft"]["title"], "Overnight Oats");
    assert_eq!(body["recordId"], record.as_str());
    assert_eq!(body["step"], "content");
}

#[tokio::test]
async fn resume_missing_record_starts_fresh() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());

    let (status, body) = post(&app, "/api/wizards?resume=gone").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["step"], "overview");
    assert_eq!(body["notice"]["kind"], "resume_failed");

    let session = body["session"].as_str().unwrap();
    let (_, body) = post(&app, &format!("/api/wizards/{session}/notice/dismiss")).await;
    assert!(body.get("notice").is_none());
}

#[tokio::test]
async fn records_list_and_missing_record() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = coach_server::build_router(dir.path().to_path_buf());

    let (status, body) = get(&app, "/api/records").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = get(&app, "/api/records/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
