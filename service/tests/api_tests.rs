//! End-to-end tests of the warp application surface.
//!
//! Every test builds a fresh app with the stub judge backend and no
//! outbound URLs configured, so all component paths run offline.

use df_judge::{EvaluateRequest, EvaluateResponse, JudgeBackend, JudgeError, StubBackend};
use df_service::{app, AppState};
use df_test_utils::{
    converge_request, draft_spec, environment_spec, evaluate_request, sample_spec,
    stub_execute_request,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use warp::{Filter, Reply};

fn service() -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    app(Arc::new(AppState::new(Arc::new(StubBackend))))
}

fn body_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_version() {
    let service = service();
    let res = warp::test::request().path("/health").reply(&service).await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_ready_reports_uptime() {
    let service = service();
    let res = warp::test::request().path("/ready").reply(&service).await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["status"], "ready");
    assert!(body["uptime_seconds"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_unknown_route_is_404_with_detail() {
    let service = service();
    let res = warp::test::request().path("/nope").reply(&service).await;

    assert_eq!(res.status(), 404);
    assert_eq!(body_json(res.body())["detail"], "Not Found");
}

#[tokio::test]
async fn test_evaluate_with_stub_backend() {
    let service = service();
    let res = warp::test::request()
        .method("POST")
        .path("/evaluate")
        .json(&evaluate_request())
        .reply(&service)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["score"], 0.5);
    assert_eq!(body["reasoning"], "stub backend — fixed score for testing");
    assert_eq!(body["model_version"], "stub-v0");
}

#[tokio::test]
async fn test_evaluate_rejects_incomplete_body_with_422() {
    let service = service();
    let res = warp::test::request()
        .method("POST")
        .path("/evaluate")
        .json(&json!({"prompt": "p"}))
        .reply(&service)
        .await;

    assert_eq!(res.status(), 422);
    let detail = body_json(res.body())["detail"].as_str().unwrap().to_string();
    assert!(detail.contains("trajectory_log"), "unexpected detail: {detail}");
}

struct FailingBackend;

#[async_trait::async_trait]
impl JudgeBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn evaluate(&self, _request: &EvaluateRequest) -> Result<EvaluateResponse, JudgeError> {
        Err(JudgeError::Invocation("endpoint unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_evaluate_backend_failure_is_502() {
    let service = app(Arc::new(AppState::new(Arc::new(FailingBackend))));
    let res = warp::test::request()
        .method("POST")
        .path("/evaluate")
        .json(&evaluate_request())
        .reply(&service)
        .await;

    assert_eq!(res.status(), 502);
    assert_eq!(body_json(res.body())["detail"], "Judge backend evaluation failed");
}

#[tokio::test]
async fn test_validate_accepts_complete_spec() {
    let service = service();
    let res = warp::test::request()
        .method("POST")
        .path("/specs/validate")
        .json(&json!({"spec": sample_spec()}))
        .reply(&service)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["valid"], true);
    assert_eq!(body["errors"], json!([]));
}

#[tokio::test]
async fn test_validate_flags_malformed_spec_id() {
    let mut spec = sample_spec();
    spec.id = "bad".to_string();

    let service = service();
    let res = warp::test::request()
        .method("POST")
        .path("/specs/validate")
        .json(&json!({"spec": spec}))
        .reply(&service)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["valid"], false);
    assert_eq!(
        body["errors"][0],
        "Spec ID must match 'spec-{date}-{slug}' format, got: bad"
    );
}

#[tokio::test]
async fn test_compile_published_spec_yields_scenarios() {
    let service = service();
    let res = warp::test::request()
        .method("POST")
        .path("/specs/compile")
        .json(&json!({"spec": sample_spec()}))
        .reply(&service)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["spec_id"], "spec-20260301-persona-auth");
    assert_eq!(body["errors"], json!([]));

    // two criteria plus one invariant
    let scenarios = body["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 3);
    assert!(scenarios[0]["id"].as_str().unwrap().starts_with("scn-"));
    assert_eq!(
        scenarios[2]["criterion_ref"],
        "[INVARIANT] Tokens are never logged"
    );
    assert!(scenarios[2]["id"].as_str().unwrap().starts_with("scn-inv-"));
}

#[tokio::test]
async fn test_compile_draft_spec_reports_state_gate() {
    let service = service();
    let res = warp::test::request()
        .method("POST")
        .path("/specs/compile")
        .json(&json!({"spec": draft_spec()}))
        .reply(&service)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["scenarios"], json!([]));
    assert_eq!(
        body["errors"][0],
        "Spec must be Published or Active to compile; current state: draft"
    );
}

#[tokio::test]
async fn test_execute_scenario_in_stub_mode() {
    let service = service();
    let res = warp::test::request()
        .method("POST")
        .path("/scenarios/execute")
        .json(&stub_execute_request("scn-api-1"))
        .reply(&service)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["scenario_id"], "scn-api-1");
    assert_eq!(body["status"], "completed");
    assert_eq!(body["trajectory"]["structural_assertions"]["passed"], 2);
    assert_eq!(body["trajectory"]["structural_assertions"]["failed"], 0);
    assert_eq!(body["satisfaction_score"], Value::Null);
    assert_eq!(body["judge_reasoning"], Value::Null);
}

#[tokio::test]
async fn test_execute_batch_preserves_order_and_honors_serial_flag() {
    let service = service();
    let request = json!({
        "scenarios": [stub_execute_request("scn-a"), stub_execute_request("scn-b")],
        "parallel": false,
        "max_concurrency": 5,
    });
    let res = warp::test::request()
        .method("POST")
        .path("/scenarios/execute-batch")
        .json(&request)
        .reply(&service)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["scenario_id"], "scn-a");
    assert_eq!(results[1]["scenario_id"], "scn-b");
    // no judge configured, so no scores to aggregate
    assert_eq!(body["aggregate_satisfaction"], Value::Null);
    assert!(body["total_elapsed_ms"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_converge_stores_session_for_status() {
    let service = service();
    let res = warp::test::request()
        .method("POST")
        .path("/attractor/converge")
        .json(&converge_request("spec-20260301-persona-auth"))
        .reply(&service)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["state"], "converged");
    assert_eq!(body["iterations_completed"], 1);
    assert_eq!(body["final_satisfaction"], 0.5);
    assert_eq!(
        body["code_artifact_ref"],
        "artifact://spec-20260301-persona-auth/iter-1"
    );

    let res = warp::test::request()
        .path("/attractor/status/spec-20260301-persona-auth")
        .reply(&service)
        .await;
    let status = body_json(res.body());
    assert_eq!(status["state"], "converged");
    assert_eq!(status["current_iteration"], 1);
    assert_eq!(status["current_satisfaction"], 0.5);
    assert_eq!(status["budget_remaining_usd"], 0.0);
}

#[tokio::test]
async fn test_attractor_status_for_unknown_spec() {
    let service = service();
    let res = warp::test::request()
        .path("/attractor/status/spec-20260101-ghost")
        .reply(&service)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["state"], "initializing");
    assert_eq!(body["current_iteration"], 0);
    assert_eq!(body["current_satisfaction"], 0.0);
}

#[tokio::test]
async fn test_converge_async_lands_in_registry() {
    let service = service();
    let res = warp::test::request()
        .method("POST")
        .path("/attractor/converge-async")
        .json(&converge_request("spec-20260301-persona-auth"))
        .reply(&service)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["spec_id"], "spec-20260301-persona-auth");
    assert_eq!(body["status"], "started");

    let mut state = String::from("initializing");
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let res = warp::test::request()
            .path("/attractor/status/spec-20260301-persona-auth")
            .reply(&service)
            .await;
        state = body_json(res.body())["state"].as_str().unwrap().to_string();
        if state != "initializing" {
            break;
        }
    }
    assert_eq!(state, "converged");
}

#[tokio::test]
async fn test_dtu_provision_status_teardown_flow() {
    let service = service();
    let res = warp::test::request()
        .method("POST")
        .path("/dtu/provision")
        .json(&json!({"environment": environment_spec(&["persona", "redis"])}))
        .reply(&service)
        .await;

    assert_eq!(res.status(), 200);
    let body = body_json(res.body());
    assert_eq!(body["status"], "ready");
    let namespace = body["namespace"].as_str().unwrap().to_string();
    assert!(namespace.starts_with("dtu-"));
    let twins = body["twins"].as_array().unwrap();
    assert_eq!(twins.len(), 2);
    assert_eq!(twins[0]["service_name"], "persona");
    assert_eq!(
        twins[0]["endpoint"],
        format!("http://persona.{namespace}.svc:8080")
    );

    let res = warp::test::request().path("/dtu/environments").reply(&service).await;
    assert_eq!(body_json(res.body()).as_array().unwrap().len(), 1);

    let res = warp::test::request()
        .path(&format!("/dtu/environments/{namespace}"))
        .reply(&service)
        .await;
    assert_eq!(res.status(), 200);
    assert!(body_json(res.body())["age_seconds"].as_f64().unwrap() >= 0.0);

    let res = warp::test::request()
        .method("POST")
        .path("/dtu/teardown")
        .json(&json!({"namespace": namespace}))
        .reply(&service)
        .await;
    assert_eq!(body_json(res.body())["status"], "terminated");

    let res = warp::test::request()
        .path(&format!("/dtu/environments/{namespace}"))
        .reply(&service)
        .await;
    assert_eq!(res.status(), 404);
    assert_eq!(
        body_json(res.body())["detail"],
        format!("Environment {namespace} not found")
    );
}

#[tokio::test]
async fn test_dtu_unknown_environment_is_404() {
    let service = service();
    let res = warp::test::request()
        .path("/dtu/environments/dtu-ghost")
        .reply(&service)
        .await;

    assert_eq!(res.status(), 404);
    assert_eq!(body_json(res.body())["detail"], "Environment dtu-ghost not found");
}
