use axum::{
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use leetdraw_core::{
    Difficulty, DrawError, FetchError, QuestionSelector, QuestionSlug, QuestionSource,
};
use leetdraw_leetcode::LeetCodeClient;
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn_fake_leetcode(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("listener should bind");
    let address = listener.local_addr().expect("listener should have an address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake leetcode server should run");
    });
    format!("http://{address}")
}

fn client_for(base: &str) -> LeetCodeClient {
    LeetCodeClient::with_http_client(
        reqwest::Client::new(),
        format!("{base}/api/problems/all/"),
        format!("{base}/graphql"),
    )
}

async fn catalog() -> Json<Value> {
    Json(json!({
        "stat_status_pairs": [
            {"stat": {"question_id": 42, "question__title_slug": "trapping-rain-water"}, "paid_only": false}
        ]
    }))
}

async fn graphql(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["operationName"] != "questionData" {
        return (StatusCode::BAD_REQUEST, Json(json!({"errors": [{"message": "bad operation"}]})));
    }
    let slug = body["variables"]["titleSlug"].as_str().unwrap_or_default();
    let expected_referer = format!("/problems/{slug}/");
    let has_referer = headers
        .get("referer")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.ends_with(&expected_referer));
    if !has_referer {
        return (StatusCode::FORBIDDEN, Json(json!({"detail": "missing referer"})));
    }

    if slug != "trapping-rain-water" {
        return (StatusCode::OK, Json(json!({"data": {"question": null}})));
    }

    (
        StatusCode::OK,
        Json(json!({"data": {"question": {
            "questionId": "42",
            "questionFrontendId": "42",
            "title": "Trapping Rain Water",
            "titleSlug": "trapping-rain-water",
            "content": "<p>Given <code>n</code> non-negative integers representing an elevation map.</p>",
            "isPaidOnly": false,
            "difficulty": "Hard",
            "likes": 31000,
            "dislikes": 450,
            "topicTags": [{"name": "Array", "slug": "array"}, {"name": "Stack", "slug": "stack"}]
        }}})),
    )
}

fn healthy_router() -> Router {
    Router::new().route("/api/problems/all/", get(catalog)).route("/graphql", post(graphql))
}

#[tokio::test]
async fn catalog_fetch_returns_slugs() {
    let base = spawn_fake_leetcode(healthy_router()).await;

    let slugs = client_for(&base).list_slugs().await.expect("catalog should load");

    assert_eq!(slugs, vec![QuestionSlug::new("trapping-rain-water")]);
}

#[tokio::test]
async fn detail_fetch_posts_graphql_query_with_referer() {
    let base = spawn_fake_leetcode(healthy_router()).await;

    let detail = client_for(&base)
        .question_detail(&QuestionSlug::new("trapping-rain-water"))
        .await
        .expect("detail should load");

    assert_eq!(detail.title, "Trapping Rain Water");
    assert_eq!(detail.difficulty, Difficulty::Hard);
}

#[tokio::test]
async fn unknown_slug_maps_to_not_found() {
    let base = spawn_fake_leetcode(healthy_router()).await;

    let result = client_for(&base).question_detail(&QuestionSlug::new("no-such-question")).await;

    assert_eq!(result, Err(FetchError::NotFound { slug: "no-such-question".to_owned() }));
}

#[tokio::test]
async fn non_success_status_is_reported_with_code() {
    let router = Router::new()
        .route("/api/problems/all/", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }));
    let base = spawn_fake_leetcode(router).await;

    let result = client_for(&base).list_slugs().await;

    assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
}

#[tokio::test]
async fn non_json_body_is_a_shape_failure() {
    let router =
        Router::new().route("/api/problems/all/", get(|| async { "<html>maintenance</html>" }));
    let base = spawn_fake_leetcode(router).await;

    let result = client_for(&base).list_slugs().await;

    assert!(matches!(result, Err(FetchError::Shape { .. })));
}

#[tokio::test]
async fn refused_connection_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("listener should bind");
    let address = listener.local_addr().expect("listener should have an address");
    drop(listener);

    let result = client_for(&format!("http://{address}")).list_slugs().await;

    assert!(matches!(result, Err(FetchError::Transport { .. })));
}

#[tokio::test]
async fn selector_draws_end_to_end_over_http() {
    let base = spawn_fake_leetcode(healthy_router()).await;
    let selector = QuestionSelector::new(client_for(&base));

    let record = selector.draw().await.expect("draw should succeed");

    assert_eq!(record.id, "42");
    assert_eq!(
        record.content.as_deref(),
        Some("Given n non-negative integers representing an elevation map.")
    );
    assert_eq!(record.tags, "Array, Stack");
    assert_eq!(
        record.question_url,
        "https://leetcode.com/problems/trapping-rain-water/description/"
    );
}

#[tokio::test]
async fn empty_catalog_over_http_fails_the_draw() {
    let router = Router::new()
        .route("/api/problems/all/", get(|| async { Json(json!({"stat_status_pairs": []})) }));
    let base = spawn_fake_leetcode(router).await;

    let result = QuestionSelector::new(client_for(&base)).draw().await;

    assert_eq!(result, Err(DrawError::EmptyCatalog));
}
