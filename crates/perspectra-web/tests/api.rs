//! End-to-end API tests against the in-memory store and a scripted LLM.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use futures_util::StreamExt;
use tower::ServiceExt;
use uuid::Uuid;

use perspectra_agents::{Agents, PromptLoader};
use perspectra_config::AgentsConfig;
use perspectra_db::Store;
use perspectra_kg::ConceptGraph;
use perspectra_llm::{FallbackRouter, RetryPolicy, ScriptedBackend};
use perspectra_web::auth::JwtKeys;
use perspectra_web::background::run_summary;
use perspectra_web::router::build_router_shared;
use perspectra_web::seed::seed;
use perspectra_web::state::{AppEvent, AppState, SharedState};

struct Harness {
    app: Router,
    state: SharedState,
    llm: Arc<ScriptedBackend>,
}

async fn harness() -> Harness {
    let store = Store::in_memory();
    seed(&store).await.unwrap();
    let graph = ConceptGraph::builtin().unwrap();
    let names = graph.concepts().iter().map(|c| (c.id.clone(), c.name.clone())).collect();

    let llm = Arc::new(ScriptedBackend::new("scripted-model"));
    let router = FallbackRouter::new(llm.clone(), RetryPolicy::immediate(1));
    let agents = Agents::new(Arc::new(router), Arc::new(PromptLoader::builtin())).with_concept_names(names);

    // Large interval so no detached summary competes for scripted replies.
    let agents_config = AgentsConfig { background_every: 100, ..Default::default() };
    let state = Arc::new(AppState::new(
        store,
        Arc::new(graph),
        Arc::new(agents),
        JwtKeys::new("test-secret", 72),
        agents_config,
    ));
    Harness { app: build_router_shared(state.clone()), state, llm }
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let request = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": email, "password": "hunter2hunter2", "name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["access_token"].as_str().unwrap().to_string()
}

fn review_reply(score: u32) -> Value {
    json!({
        "score": score,
        "strengths": ["clear variable names"],
        "weaknesses": ["quadratic scan"],
        "thinking_style": "brute_force",
        "concept_gaps": ["Hash Maps & Sets"],
        "known_concepts": ["Arrays"],
        "topics_to_revise": ["hashing"],
        "detailed_feedback": "What lookup structure would avoid the inner loop?",
        "profile_updates": {
            "skills": { "Arrays": 0.6, "Hash Maps & Sets": 0.2 },
            "gaps": ["Hash Maps & Sets"],
            "strengths": ["Arrays"],
            "mistake_patterns": ["nested loops"]
        }
    })
}

const GOOD_CODE: &str = "def two_sum(nums, target):\n    for i in range(len(nums)):\n        for j in range(i + 1, len(nums)):\n            if nums[i] + nums[j] == target:\n                return [i, j]\n    return []\n";

// ── Status & auth ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_status_endpoints() {
    let h = harness().await;
    let (status, body) = call(&h.app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");

    let (status, body) = call(&h.app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_login_and_me() {
    let h = harness().await;
    let token = register(&h.app, "Ada@Example.com").await;

    let (status, body) = call(&h.app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["name"], "Ada");

    let (status, body) = call(
        &h.app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "ada@example.com", "password": "another-pass", "name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");

    let (status, body) = call(
        &h.app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ADA@example.com", "password": "hunter2hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");

    let (status, body) = call(
        &h.app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid email or password");
}

#[tokio::test]
async fn test_registration_rejects_invalid_input() {
    let h = harness().await;
    let (status, _) = call(
        &h.app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": "hunter2hunter2", "name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_missing_or_bad_token_is_401_with_challenge() {
    let h = harness().await;
    for token in [None, Some("garbage")] {
        let mut builder = Request::builder().uri("/profile/me");
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let response = h.app.clone().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }
}

// ── Profile ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_new_profile_and_patch() {
    let h = harness().await;
    let token = register(&h.app, "p@example.com").await;

    let (status, body) = call(&h.app, Method::GET, "/profile/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["onboarding_complete"], false);
    assert_eq!(body["submissions_count"], 0);

    let (status, body) = call(
        &h.app,
        Method::PATCH,
        "/profile/me",
        Some(&token),
        Some(json!({ "goal": "  crack interviews ", "preferred_style": "Conceptual" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"], "crack interviews");
    assert_eq!(body["preferred_style"], "conceptual");
    assert_eq!(body["experience_level"], "beginner");
}

#[tokio::test]
async fn test_onboarding() {
    let h = harness().await;
    let token = register(&h.app, "o@example.com").await;

    let (_, body) = call(&h.app, Method::GET, "/profile/onboarding/questions", None, None).await;
    assert_eq!(body["questions"].as_array().unwrap().len(), 5);

    h.llm.push_json(json!({
        "experience_level": "intermediate",
        "preferred_style": "visual",
        "initial_skills": { "Arrays": 0.5 },
        "initial_gaps": ["Graphs"],
        "known_concepts": ["Arrays", "Stacks"]
    }));
    let answers = json!({ "answers": { "q1": "Intermediate", "q2": "arrays, stacks", "q3": "graphs", "q4": "interviews", "q5": "student" } });
    let (status, body) = call(&h.app, Method::POST, "/profile/onboarding", Some(&token), Some(answers.clone())).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Onboarding complete");
    assert_eq!(body["profile"]["onboarding_complete"], true);
    assert_eq!(body["profile"]["experience_level"], "intermediate");
    assert_eq!(body["profile"]["gaps"], json!(["Graphs"]));

    // No scripted reply left: the LLM failure surfaces as 502.
    let (status, _) = call(&h.app, Method::POST, "/profile/onboarding", Some(&token), Some(answers)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

// ── Problems ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_problem_listing() {
    let h = harness().await;
    let (status, body) = call(&h.app, Method::GET, "/problems/list", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 50);
    let problems = body["problems"].as_array().unwrap();
    assert!(problems.iter().all(|p| p.get("examples").is_none()));
    let difficulties: Vec<u64> = problems.iter().map(|p| p["difficulty"].as_u64().unwrap()).collect();
    assert!(difficulties.windows(2).all(|w| w[0] <= w[1]));

    let (_, body) = call(&h.app, Method::GET, "/problems/list?difficulty=1", None, None).await;
    assert_eq!(body["total"], 7);
    assert!(body["problems"].as_array().unwrap().iter().all(|p| p["difficulty"] == 1));

    let (_, body) = call(&h.app, Method::GET, "/problems/list?concept_id=c02", None, None).await;
    assert!(body["problems"].as_array().unwrap().iter().any(|p| p["id"] == "p001"));

    let (status, _) = call(&h.app, Method::GET, "/problems/list?difficulty=9", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_problem_detail() {
    let h = harness().await;
    let (status, body) = call(&h.app, Method::GET, "/problems/p001", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["examples"].is_array());

    let (status, body) = call(&h.app, Method::GET, "/problems/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Problem not found");
}

// ── Review ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_precheck_endpoint() {
    let h = harness().await;
    let token = register(&h.app, "pc@example.com").await;
    let (status, body) = call(
        &h.app,
        Method::POST,
        "/review/precheck",
        Some(&token),
        Some(json!({ "code": "def f(:\n    return 1\n" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    let kinds: Vec<&str> = body["issues"].as_array().unwrap().iter().map(|i| i["kind"].as_str().unwrap()).collect();
    assert!(kinds.contains(&"unclosed"), "{kinds:?}");
}

#[tokio::test]
async fn test_submit_flow() {
    let h = harness().await;
    let token = register(&h.app, "s@example.com").await;

    // Broken code never reaches the reviewer.
    let (status, body) = call(
        &h.app,
        Method::POST,
        "/review/submit",
        Some(&token),
        Some(json!({ "problem_id": "p001", "code": "def f(:\n" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!body["issues"].as_array().unwrap().is_empty());
    assert_eq!(h.llm.calls(), 0);

    h.llm.push_json(review_reply(72));
    let submission = json!({ "problem_id": "p001", "code": GOOD_CODE, "language": "python" });
    let (status, body) = call(&h.app, Method::POST, "/review/submit", Some(&token), Some(submission.clone())).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["score"], 72);
    assert_eq!(body["display_score"], 7.2);
    assert_eq!(body["submissions_count"], 1);

    let (_, profile) = call(&h.app, Method::GET, "/profile/me", Some(&token), None).await;
    assert_eq!(profile["submissions_count"], 1);
    assert_eq!(profile["skills"]["Arrays"], 0.6);
    assert_eq!(profile["gaps"], json!(["Hash Maps & Sets"]));
    assert_eq!(profile["recent_weaknesses"], json!(["Hash Maps & Sets"]));
    assert_eq!(profile["mistake_patterns"], json!(["nested loops"]));
    assert_eq!(profile["known_concepts"], json!(["Arrays"]));
    assert_eq!(profile["thinking_style"], "brute_force");

    // Same code with cosmetic trailing whitespace is still a duplicate.
    let resubmit = json!({ "problem_id": "p001", "code": format!("{GOOD_CODE}   \n\n") });
    let (status, body) = call(&h.app, Method::POST, "/review/submit", Some(&token), Some(resubmit)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Code unchanged since last submission; edit it before resubmitting");
    assert_eq!(h.llm.calls(), 1);

    let (status, body) = call(&h.app, Method::GET, "/review/history", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["problem_id"], "p001");
    assert!(reviews[0].get("code").is_none());
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_history_page_reports_overall_total() {
    let h = harness().await;
    let token = register(&h.app, "page@example.com").await;
    for (score, code) in [(40, GOOD_CODE.to_string()), (80, format!("{GOOD_CODE}# second attempt\n"))] {
        h.llm.push_json(review_reply(score));
        let (status, body) = call(
            &h.app,
            Method::POST,
            "/review/submit",
            Some(&token),
            Some(json!({ "problem_id": "p001", "code": code })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (_, body) = call(&h.app, Method::GET, "/review/history?limit=1", Some(&token), None).await;
    assert_eq!(body["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_submit_unknown_problem() {
    let h = harness().await;
    let token = register(&h.app, "u@example.com").await;
    let (status, _) = call(
        &h.app,
        Method::POST,
        "/review/submit",
        Some(&token),
        Some(json!({ "problem_id": "p999", "code": GOOD_CODE })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reviewer_failure_is_bad_gateway() {
    let h = harness().await;
    let token = register(&h.app, "f@example.com").await;
    h.llm.push_error("provider down");
    let (status, _) = call(
        &h.app,
        Method::POST,
        "/review/submit",
        Some(&token),
        Some(json!({ "problem_id": "p001", "code": GOOD_CODE })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (_, body) = call(&h.app, Method::GET, "/review/history", Some(&token), None).await;
    assert!(body["reviews"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_background_summary_writes_insights() {
    let h = harness().await;
    let token = register(&h.app, "bg@example.com").await;
    let (_, me) = call(&h.app, Method::GET, "/auth/me", Some(&token), None).await;
    let user_id = me["user_id"].as_str().unwrap().parse().unwrap();

    // Nothing reviewed yet: no LLM call, nothing written.
    assert!(!run_summary(&h.state, user_id).await.unwrap());
    assert_eq!(h.llm.calls(), 0);

    h.llm.push_json(review_reply(60));
    call(
        &h.app,
        Method::POST,
        "/review/submit",
        Some(&token),
        Some(json!({ "problem_id": "p001", "code": GOOD_CODE })),
    )
    .await;

    let mut events = h.state.subscribe();
    h.llm.push_json(json!({
        "summary": "Solid array work; hashing still shaky.",
        "struggling": ["Hash Maps & Sets"],
        "recommended_focus": ["Hash Maps & Sets"],
        "encouragement": "Nice start!"
    }));
    assert!(run_summary(&h.state, user_id).await.unwrap());

    let (status, body) = call(&h.app, Method::GET, "/insights/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insights"]["summary"], "Solid array work; hashing still shaky.");
    assert_eq!(body["last_summarized_at"], 1);
    assert_eq!(body["submissions_count"], 1);

    assert_eq!(
        events.try_recv().unwrap(),
        AppEvent::InsightsUpdated { user_id, submissions_count: 1 }
    );
}

// ── Tutor ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tutor_ask_and_hint() {
    let h = harness().await;
    let token = register(&h.app, "t@example.com").await;

    h.llm.push_text("What do you need to remember about numbers you've already seen?");
    let (status, body) = call(
        &h.app,
        Method::POST,
        "/tutor/ask",
        Some(&token),
        Some(json!({
            "problem_id": "p001",
            "question": "Where do I start?",
            "conversation_history": [{ "role": "user", "content": "hi" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].as_str().unwrap().ends_with('?'));

    let mut events = h.state.subscribe();
    h.llm.push_text("Think about complements.");
    let (status, body) = call(
        &h.app,
        Method::POST,
        "/tutor/hint",
        Some(&token),
        Some(json!({ "problem_id": "p001", "current_code": "def two_sum(nums, target):\n    pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hint"], "Think about complements.");
    assert!(matches!(events.try_recv().unwrap(), AppEvent::HintGiven { .. }));

    let (_, profile) = call(&h.app, Method::GET, "/profile/me", Some(&token), None).await;
    assert_eq!(profile["recent_hints"], json!(["Think about complements."]));

    let (status, _) = call(
        &h.app,
        Method::POST,
        "/tutor/ask",
        Some(&token),
        Some(json!({ "problem_id": "p001", "question": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ── Graph & insights ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_graph_endpoints() {
    let h = harness().await;
    let token = register(&h.app, "g@example.com").await;

    let (_, body) = call(&h.app, Method::GET, "/graph/concepts", None, None).await;
    assert_eq!(body["nodes"].as_array().unwrap().len(), 30);
    assert_eq!(body["edges"].as_array().unwrap().len(), 42);

    let (status, body) = call(&h.app, Method::GET, "/graph/student", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let nodes = body["nodes"].as_array().unwrap();
    assert!(nodes.iter().all(|n| n["status"] == "untouched" && n["skill_level"] == 0.0));

    let (_, body) = call(&h.app, Method::GET, "/graph/recommend", Some(&token), None).await;
    let recs = body["recommendations"].as_array().unwrap();
    assert!(!recs.is_empty() && recs.len() <= 3);
    assert!(recs.iter().all(|r| r["tier"] == 1));

    let (_, body) = call(
        &h.app,
        Method::GET,
        "/graph/path?from_concept=arrays&to_concept=Dynamic%20Programming",
        None,
        None,
    )
    .await;
    let path = body["path"].as_array().unwrap();
    assert_eq!(path.first().unwrap()["name"], "Arrays");
    assert_eq!(path.last().unwrap()["name"], "Dynamic Programming");
    assert_eq!(body["hops"].as_u64().unwrap() as usize, path.len() - 1);

    let (_, body) = call(&h.app, Method::GET, "/graph/path?from_concept=Arrays&to_concept=Cooking", None, None).await;
    assert_eq!(body["path"], json!([]));
    assert!(body["message"].as_str().unwrap().contains("Cooking"));
}

#[tokio::test]
async fn test_graph_layout() {
    let h = harness().await;
    let token = register(&h.app, "l@example.com").await;

    let (status, body) = call(&h.app, Method::GET, "/graph/layout?width=800&height=600&q=tree", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 30);
    assert_eq!(body["edges"].as_array().unwrap().len(), 42);
    assert_eq!(body["camera"], json!({ "x": 400.0, "y": 300.0, "scale": 1.0 }));
    let matches = body["matches"].as_array().unwrap();
    assert!(matches.contains(&json!("c11")));
    assert!(matches.contains(&json!("c30")));

    let (_, body) = call(&h.app, Method::GET, "/graph/layout", Some(&token), None).await;
    assert!(body.get("camera").is_none());
    assert_eq!(body["matches"], json!([]));
}

#[tokio::test]
async fn test_insights_empty_before_summary() {
    let h = harness().await;
    let token = register(&h.app, "i@example.com").await;
    let (status, body) = call(&h.app, Method::GET, "/insights/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insights"], Value::Null);
    assert_eq!(body["submissions_count"], 0);
    assert_eq!(body["last_summarized_at"], 0);
}

// ── Malformed requests ────────────────────────────────────────────────────────

async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, String, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_unparseable_json_body_gets_detail() {
    let h = harness().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let (status, content_type, body) = send_raw(&h.app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "application/json");
    assert!(body["detail"].as_str().unwrap().contains("JSON"), "{body}");
}

#[tokio::test]
async fn test_bad_query_strings_get_detail() {
    let h = harness().await;
    for uri in ["/problems/list?difficulty=abc", "/graph/path?from_concept=Arrays"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, content_type, body) = send_raw(&h.app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(content_type, "application/json", "{uri}");
        assert!(body["detail"].as_str().unwrap().contains("query string"), "{uri}: {body}");
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_events_require_a_token() {
    let h = harness().await;
    let (status, body) = call(&h.app, Method::GET, "/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid or expired token");
}

#[tokio::test]
async fn test_events_stream_only_the_callers_events() {
    let h = harness().await;
    let token = register(&h.app, "sse@example.com").await;
    let (_, me) = call(&h.app, Method::GET, "/auth/me", Some(&token), None).await;
    let user_id: Uuid = me["user_id"].as_str().unwrap().parse().unwrap();

    let request = Request::builder()
        .uri("/events")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let stranger = Uuid::new_v4();
    h.state.publish(AppEvent::HintGiven { user_id: stranger, problem_id: "p002".into() });
    h.state.publish(AppEvent::HintGiven { user_id, problem_id: "p001".into() });

    let mut frames = response.into_body().into_data_stream();
    let frame = tokio::time::timeout(std::time::Duration::from_secs(5), frames.next())
        .await
        .expect("no event within 5s")
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();
    let data = text.trim().strip_prefix("data:").unwrap().trim();
    let event: AppEvent = serde_json::from_str(data).unwrap();
    assert_eq!(event, AppEvent::HintGiven { user_id, problem_id: "p001".into() });
}
