//! Drives `HttpTransport` against a local webhook.

use admissions_core::{
    CoreConfig, Draft, DraftStore, FieldId, HttpTransport, NonEmptyText, SubmitError, Submitter,
    TransportError, Url,
};
use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
struct Hook {
    status: StatusCode,
    delay: Duration,
    received: Arc<Mutex<Vec<(Option<String>, String)>>>,
}

async fn receive(
    State(hook): State<Hook>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, &'static str) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    hook.received.lock().expect("lock").push((content_type, body));
    tokio::time::sleep(hook.delay).await;
    (hook.status, "Success!")
}

async fn spawn_hook(status: StatusCode, delay: Duration) -> (Url, Hook) {
    let hook = Hook {
        status,
        delay,
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/hook", post(receive))
        .with_state(hook.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let url = Url::parse(&format!("http://{addr}/hook")).expect("url");
    (url, hook)
}

fn submitter(url: Url, timeout: Duration) -> Submitter<HttpTransport> {
    let cfg = CoreConfig::new(url, NonEmptyText::new("2025-2026").expect("year"), timeout)
        .expect("config");
    let transport = HttpTransport::new(&cfg).expect("client");
    Submitter::new(cfg, transport)
}

fn sample_draft() -> Draft {
    let mut store = DraftStore::new();
    store.set_field(FieldId::StudentFirstName, "Amina");
    store.set_field(FieldId::ParentEmail, "parent@example.com");
    store.set_field(FieldId::ParentSignDate, "2025-03-01");
    store.get_all().clone()
}

#[tokio::test]
async fn posts_json_with_content_type() {
    let (url, hook) = spawn_hook(StatusCode::OK, Duration::ZERO).await;
    let submitter = submitter(url, Duration::from_secs(5));

    let ack = submitter.submit(&sample_draft()).await.expect("acknowledged");
    assert_eq!(ack.status, 200);

    let received = hook.received.lock().expect("lock");
    assert_eq!(received.len(), 1);
    let (content_type, body) = &received[0];
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let json: serde_json::Value = serde_json::from_str(body).expect("json body");
    assert_eq!(json["studentFirstName"], "Amina");
    assert_eq!(json["parentEmail"], "parent@example.com");
    assert_eq!(json["parentSignDate"], "2025-03-01T00:00:00.000Z");
    assert_eq!(json["schoolYear"], "2025-2026");
    assert!(json["submissionDate"]
        .as_str()
        .is_some_and(|s| s.ends_with('Z')));
}

#[tokio::test]
async fn server_error_is_reported_with_status() {
    let (url, hook) = spawn_hook(StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO).await;
    let submitter = submitter(url, Duration::from_secs(5));

    let err = submitter.submit(&sample_draft()).await.expect_err("500");
    assert!(matches!(err, SubmitError::Status(500)));
    assert_eq!(hook.received.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let (url, _hook) = spawn_hook(StatusCode::OK, Duration::from_secs(5)).await;
    let submitter = submitter(url, Duration::from_millis(200));

    let err = submitter.submit(&sample_draft()).await.expect_err("timeout");
    assert!(matches!(
        err,
        SubmitError::Transport(TransportError::Timeout)
    ));
}

#[tokio::test]
async fn closed_port_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let url = Url::parse(&format!("http://{addr}/hook")).expect("url");
    let err = submitter(url, Duration::from_secs(2))
        .submit(&sample_draft())
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, SubmitError::Transport(_)));
}
