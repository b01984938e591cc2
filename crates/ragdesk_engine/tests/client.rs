use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use ragdesk_engine::{
    ApiSettings, Backend, ChatResponse, Citation, FailureKind, ReqwestBackend, UPLOAD_FIELD,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    let settings = ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    };
    ReqwestBackend::new(&settings).expect("backend")
}

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn health_reports_index_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "online",
            "faiss_index_size": 128,
            "ollama": "configured",
            "google_genai": "missing_key"
        })))
        .mount(&server)
        .await;

    let report = backend_for(&server).health().await.expect("health ok");
    assert_eq!(report.faiss_index_size, 128);
    assert_eq!(report.google_genai.as_deref(), Some("missing_key"));
}

#[tokio::test]
async fn health_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = backend_for(&server).health().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn health_fails_on_garbled_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server).health().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // Bind and release a port so nothing listens on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let settings = ApiSettings {
        base_url: format!("http://127.0.0.1:{port}"),
        ..ApiSettings::default()
    };
    let backend = ReqwestBackend::new(&settings).unwrap();
    let err = backend.list_uploaded().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn lists_uploaded_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list_uploaded"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "files": ["manual.pdf", "specs.csv"] })),
        )
        .mount(&server)
        .await;

    let listing = backend_for(&server).list_uploaded().await.unwrap();
    assert_eq!(listing.files, vec!["manual.pdf", "specs.csv"]);
}

#[tokio::test]
async fn upload_sends_one_request_with_a_part_per_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "filename": "a.txt", "status": "indexed", "chunks": 3 },
                { "filename": "b.csv", "status": "error", "detail": "bad header" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let files = vec![
        write_fixture(&dir, "a.txt", "range: 300 miles"),
        write_fixture(&dir, "b.csv", "col\n1\n"),
    ];

    let report = backend_for(&server).upload(&files).await.expect("upload ok");
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].status, "indexed");
    assert_eq!(report.results[0].chunks, Some(3));
    assert_eq!(report.results[1].detail.as_deref(), Some("bad header"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    let field = format!("name=\"{UPLOAD_FIELD}\"");
    assert_eq!(body.matches(&field).count(), 2);
    assert!(body.contains("filename=\"a.txt\""));
    assert!(body.contains("filename=\"b.csv\""));
    assert!(body.contains("range: 300 miles"));
    assert!(body.contains("text/plain"));
}

#[tokio::test]
async fn upload_of_missing_file_fails_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.pdf");

    let err = backend_for(&server).upload(&[missing]).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::LocalFile);
}

#[tokio::test]
async fn upload_fails_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "disk full" })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "a.txt", "x");

    let err = backend_for(&server).upload(&[file]).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn chat_posts_question_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "question": "What is the range?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "300 miles",
            "status": "success",
            "sources": [
                { "filename": "a.pdf", "page": 3, "type": "text", "content_preview": "Range..." },
                { "filename": "b.png", "page": null, "type": "image_description" }
            ]
        })))
        .mount(&server)
        .await;

    let reply = backend_for(&server).chat("What is the range?").await.unwrap();
    assert_eq!(reply.answer.as_deref(), Some("300 miles"));
    assert_eq!(
        reply.sources.unwrap(),
        vec![
            Citation {
                filename: Some("a.pdf".to_string()),
                page: Some(3),
                kind: Some("text".to_string()),
                content_preview: Some("Range...".to_string()),
            },
            Citation {
                filename: Some("b.png".to_string()),
                page: None,
                kind: Some("image_description".to_string()),
                content_preview: None,
            },
        ]
    );
}

#[tokio::test]
async fn chat_error_payload_is_returned_as_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "No documents indexed" })),
        )
        .mount(&server)
        .await;

    let reply = backend_for(&server).chat("hi").await.unwrap();
    assert_eq!(reply.error.as_deref(), Some("No documents indexed"));
    assert_eq!(reply.answer, None);
}

#[tokio::test]
async fn chat_server_error_with_detail_becomes_error_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "model unavailable" })),
        )
        .mount(&server)
        .await;

    let reply = backend_for(&server).chat("hi").await.unwrap();
    assert_eq!(
        reply,
        ChatResponse {
            error: Some("model unavailable".to_string()),
            ..ChatResponse::default()
        }
    );
}

#[tokio::test]
async fn chat_server_error_without_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = backend_for(&server).chat("hi").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(502));
}

#[tokio::test]
async fn optional_timeout_cuts_slow_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "faiss_index_size": 1 })),
        )
        .mount(&server)
        .await;

    let settings = ApiSettings {
        base_url: server.uri(),
        request_timeout: Some(Duration::from_millis(50)),
    };
    let backend = ReqwestBackend::new(&settings).unwrap();

    let err = backend.health().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}
