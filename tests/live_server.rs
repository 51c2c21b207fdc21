//! Integration tests against a real listening socket.
//!
//! The service is started on an ephemeral loopback port and probed through
//! the same verifier used for deployed instances.

use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use e2e_app::api::{create_router, AppState};
use e2e_app::config::Config;
use e2e_app::error::{ProbeError, VerifyError};
use e2e_app::verifier::{
    run_verifier, HttpProbe, Outcome, PollPolicy, RecordingSleeper, Verifier, VerifierConfig,
};
use tokio::net::TcpListener;

/// Spawn `router` on 127.0.0.1 and return its base URL.
async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn fast_policy() -> PollPolicy {
    PollPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(10),
        timeout: Duration::from_secs(2),
    }
}

fn verifier(policy: PollPolicy) -> Verifier<HttpProbe, RecordingSleeper> {
    Verifier::new(
        HttpProbe::new(policy.timeout).unwrap(),
        RecordingSleeper::default(),
        policy,
    )
}

#[tokio::test]
async fn verifier_passes_against_running_service() {
    let state = AppState::new(Config {
        app_version: "1.2.3".to_string(),
        ..Config::default()
    });
    let base = spawn(create_router(state)).await;
    let target = VerifierConfig { app_url: base };

    let outcome = verifier(fast_policy()).run(&target.health_url()).await;

    assert_eq!(outcome, Outcome::Pass { attempts: 1 });
}

#[tokio::test]
async fn run_verifier_reports_first_attempt() {
    let base = spawn(create_router(AppState::default())).await;
    let target = VerifierConfig { app_url: base };

    let attempts = run_verifier(&target, fast_policy()).await.unwrap();

    assert_eq!(attempts, 1);
}

#[tokio::test]
async fn health_body_over_the_wire() {
    let base = spawn(create_router(AppState::default())).await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "dev");
}

#[tokio::test]
async fn root_redirect_over_the_wire() {
    let base = spawn(create_router(AppState::default())).await;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let response = client.get(format!("{}/", base)).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(response.headers()["location"], "/info");
}

#[tokio::test]
async fn verifier_fails_fast_on_unavailable_status() {
    let router =
        Router::new().route("/health", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    let base = spawn(router).await;
    let sleeper = RecordingSleeper::default();
    let verifier = Verifier::new(
        HttpProbe::new(Duration::from_secs(2)).unwrap(),
        sleeper.clone(),
        fast_policy(),
    );

    let outcome = verifier.run(&format!("{}/health", base)).await;

    assert_eq!(
        outcome,
        Outcome::Fail(VerifyError::UnexpectedStatus {
            attempt: 1,
            status: 503
        })
    );
    assert!(sleeper.sleeps().is_empty());
}

#[tokio::test]
async fn verifier_exhausts_budget_when_nothing_listens() {
    // Bind then drop to obtain a loopback port with no listener.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sleeper = RecordingSleeper::default();
    let verifier = Verifier::new(
        HttpProbe::new(Duration::from_secs(2)).unwrap(),
        sleeper.clone(),
        fast_policy(),
    );

    let outcome = verifier.run(&format!("http://{}/health", addr)).await;

    match outcome {
        Outcome::Fail(VerifyError::Exhausted {
            attempts,
            last_error,
        }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(
                last_error,
                ProbeError::Transport(_) | ProbeError::Timeout(_)
            ));
        }
        other => panic!("expected exhausted budget, got {:?}", other),
    }
    assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(10); 2]);
}
