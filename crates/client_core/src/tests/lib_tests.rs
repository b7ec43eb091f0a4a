use super::*;
use anyhow::Result;
use axum::{
    extract::{Multipart, State},
    http::{header::CONTENT_TYPE, StatusCode},
    routing::{get, post},
    Json, Router,
};
use std::{
    env, fs,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Debug)]
struct CapturedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<Vec<CapturedField>>>>>,
    reply_status: StatusCode,
    reply_body: &'static str,
    delay: Duration,
}

struct MockService {
    url: String,
    uploads: oneshot::Receiver<Vec<CapturedField>>,
}

async fn handle_convert(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> (StatusCode, [(axum::http::HeaderName, &'static str); 1], String) {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        fields.push(CapturedField {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(fields);
    }
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (
        state.reply_status,
        [(CONTENT_TYPE, "application/json")],
        state.reply_body.to_string(),
    )
}

async fn spawn_conversion_service(
    reply_status: StatusCode,
    reply_body: &'static str,
    delay: Duration,
) -> Result<MockService> {
    env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        reply_status,
        reply_body,
        delay,
    };
    let app = Router::new()
        .route("/api/convert", post(handle_convert))
        .route(
            "/api/health",
            get(|| async {
                Json(serde_json::json!({"status": "OK", "message": "OCR API is running"}))
            }),
        )
        .route(
            "/api/supported-formats",
            get(|| async {
                Json(serde_json::json!({
                    "formats": ["pdf", "png", "docx"],
                    "description": "Supported file formats for OCR conversion"
                }))
            }),
        )
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(MockService {
        url: format!("http://{addr}"),
        uploads: rx,
    })
}

fn temp_document(name: &str, contents: &[u8]) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("client_core_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[tokio::test]
async fn convert_uploads_single_file_field_and_returns_result() {
    let service = spawn_conversion_service(
        StatusCode::OK,
        r#"{"success":true,"text":"Hello world","filename":"report.pdf"}"#,
        Duration::ZERO,
    )
    .await
    .expect("spawn service");
    let path = temp_document("report.pdf", b"%PDF-1.4 fake");
    let client = ConversionClient::new(&service.url, DEFAULT_REQUEST_TIMEOUT).expect("client");

    let result = client
        .convert(&SelectedFile::from_path(&path))
        .await
        .expect("convert");

    assert!(result.success);
    assert_eq!(result.text, "Hello world");
    assert_eq!(result.filename, "report.pdf");

    let fields = service.uploads.await.expect("upload captured");
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "file");
    assert_eq!(fields[0].file_name.as_deref(), Some("report.pdf"));
    assert_eq!(fields[0].content_type.as_deref(), Some("application/pdf"));
    assert_eq!(fields[0].bytes, b"%PDF-1.4 fake");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[tokio::test]
async fn convert_uploads_in_memory_bytes_with_octet_stream_fallback() {
    let service = spawn_conversion_service(
        StatusCode::OK,
        r#"{"success":true,"text":"raw","filename":"blob"}"#,
        Duration::ZERO,
    )
    .await
    .expect("spawn service");
    let client = ConversionClient::new(&service.url, DEFAULT_REQUEST_TIMEOUT).expect("client");

    client
        .convert(&SelectedFile::from_bytes("blob", b"raw bytes".to_vec()))
        .await
        .expect("convert");

    let fields = service.uploads.await.expect("upload captured");
    assert_eq!(fields[0].file_name.as_deref(), Some("blob"));
    assert_eq!(
        fields[0].content_type.as_deref(),
        Some("application/octet-stream")
    );
    assert_eq!(fields[0].bytes, b"raw bytes");
}

#[tokio::test]
async fn rejection_with_json_body_is_passed_through() {
    let service = spawn_conversion_service(
        StatusCode::BAD_REQUEST,
        r#"{"success":false,"error":"Unsupported format"}"#,
        Duration::ZERO,
    )
    .await
    .expect("spawn service");
    let client = ConversionClient::new(&service.url, DEFAULT_REQUEST_TIMEOUT).expect("client");

    let result = client
        .convert(&SelectedFile::from_bytes("bad.xyz", b"??".to_vec()))
        .await
        .expect("well-formed rejection is not a transport error");

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Unsupported format"));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let service = spawn_conversion_service(
        StatusCode::PAYLOAD_TOO_LARGE,
        "<html>Request Entity Too Large</html>",
        Duration::ZERO,
    )
    .await
    .expect("spawn service");
    let client = ConversionClient::new(&service.url, DEFAULT_REQUEST_TIMEOUT).expect("client");

    let err = client
        .convert(&SelectedFile::from_bytes("big.pdf", b"x".to_vec()))
        .await
        .expect_err("must fail");

    assert!(
        matches!(err, ClientError::Decode { status: 413, .. }),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn slow_service_times_out() {
    let service = spawn_conversion_service(
        StatusCode::OK,
        r#"{"success":true,"text":"late","filename":"x.png"}"#,
        Duration::from_secs(2),
    )
    .await
    .expect("spawn service");
    let client = ConversionClient::new(&service.url, Duration::from_millis(100)).expect("client");

    let err = client
        .convert(&SelectedFile::from_bytes("x.png", b"png".to_vec()))
        .await
        .expect_err("must time out");

    assert!(err.is_timeout(), "unexpected error: {err}");
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client =
        ConversionClient::new(&format!("http://{addr}"), DEFAULT_REQUEST_TIMEOUT).expect("client");

    let err = client
        .convert(&SelectedFile::from_bytes("x.png", b"png".to_vec()))
        .await
        .expect_err("must fail");

    assert!(matches!(err, ClientError::Transport(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn missing_file_fails_before_any_request() {
    let client = ConversionClient::new(DEFAULT_SERVICE_URL, DEFAULT_REQUEST_TIMEOUT).expect("client");
    let missing = env::temp_dir().join("client_core_test_missing").join("gone.pdf");

    let err = client
        .convert(&SelectedFile::from_path(&missing))
        .await
        .expect_err("must fail");

    assert!(matches!(err, ClientError::ReadFile { .. }), "unexpected error: {err}");
}

#[tokio::test]
async fn health_and_supported_formats_decode() {
    let service = spawn_conversion_service(StatusCode::OK, "{}", Duration::ZERO)
        .await
        .expect("spawn service");
    let client = ConversionClient::new(&service.url, DEFAULT_REQUEST_TIMEOUT).expect("client");

    let health = client.health().await.expect("health");
    assert_eq!(health.status, "OK");

    let formats = client.supported_formats().await.expect("formats");
    assert_eq!(formats.formats, vec!["pdf", "png", "docx"]);
}

#[test]
fn rejects_non_http_service_urls() {
    assert!(parse_service_url("http://127.0.0.1:5000").is_ok());
    assert!(parse_service_url("  https://ocr.example.com/ ").is_ok());
    assert!(matches!(
        parse_service_url("ftp://example.com"),
        Err(ClientError::InvalidUrl { .. })
    ));
    assert!(matches!(
        parse_service_url("not a url"),
        Err(ClientError::InvalidUrl { .. })
    ));
}

#[test]
fn endpoints_resolve_against_service_root() {
    let client = ConversionClient::new("http://127.0.0.1:5000/", DEFAULT_REQUEST_TIMEOUT)
        .expect("client");
    assert_eq!(
        client.endpoint(CONVERT_PATH).expect("endpoint").as_str(),
        "http://127.0.0.1:5000/api/convert"
    );
}
