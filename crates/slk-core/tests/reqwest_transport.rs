//! Tests of the reqwest transport against a local one-shot HTTP server.

use std::time::Duration;

use slk_core::slack::{HttpRequest, ReqwestTransport};
use slk_core::{CallContext, Transport, TransportError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Raw request head and body as received by the server.
struct Received {
    head: String,
    body: Vec<u8>,
}

/// Accept one connection, capture the request, answer with `status` and `body`.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<Received>) {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    respond_once(response).await
}

/// Accept one connection, capture the request, write `response` verbatim and close.
async fn respond_once(response: String) -> (String, oneshot::Receiver<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buffer = Vec::new();
        let mut chunk = [0_u8; 1024];
        let head_end = loop {
            let n = socket.read(&mut chunk).await.expect("read");
            assert!(n > 0, "connection closed before request head");
            buffer.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buffer[..head_end]).into_owned();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buffer.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await.expect("read body");
            assert!(n > 0, "connection closed before request body");
            buffer.extend_from_slice(&chunk[..n]);
        }
        let request_body = buffer[head_end..head_end + content_length].to_vec();

        socket.write_all(response.as_bytes()).await.expect("write");
        let _ = socket.shutdown().await;
        let _ = tx.send(Received {
            head,
            body: request_body,
        });
    });

    (format!("http://{addr}"), rx)
}

fn transport() -> ReqwestTransport {
    // Local servers only; ignore any proxy from the environment.
    let http_client = reqwest::Client::builder()
        .no_proxy()
        .user_agent("slk-test/1.0")
        .timeout(Duration::from_secs(10))
        .build()
        .expect("reqwest client");
    ReqwestTransport::from_client(http_client)
}

#[tokio::test]
async fn test_get_encodes_query_and_returns_body() {
    let (base, received) = serve_once("200 OK", r#"{"ok":true}"#).await;
    let request = HttpRequest::get(
        format!("{base}/api/users.info"),
        vec![("token", "xoxb-1".to_string()), ("user", "U 1&2".to_string())],
    );

    let body = transport().send(request).await.expect("send");
    assert_eq!(body, br#"{"ok":true}"#);

    let received = received.await.expect("server saw request");
    let request_line = received.head.lines().next().unwrap_or_default();
    assert!(request_line.starts_with("GET /api/users.info?token=xoxb-1&user=U+1%262 "));
    assert!(received.head.to_ascii_lowercase().contains("user-agent: slk-test/1.0"));
}

#[tokio::test]
async fn test_post_json_sets_content_type() {
    let (base, received) = serve_once("200 OK", "ok").await;
    let request = HttpRequest::post_json(
        format!("{base}/services/T/B/X"),
        br#"{"text":"hi"}"#.to_vec(),
    );

    let body = transport().send(request).await.expect("send");
    assert_eq!(body, b"ok");

    let received = received.await.expect("server saw request");
    assert!(received.head.starts_with("POST /services/T/B/X "));
    assert!(received
        .head
        .to_ascii_lowercase()
        .contains("content-type: application/json"));
    assert_eq!(received.body, br#"{"text":"hi"}"#);
}

#[tokio::test]
async fn test_non_success_status_is_transport_error() {
    let (base, _received) = serve_once("500 Internal Server Error", "boom").await;
    let request = HttpRequest::get(format!("{base}/api/users.list"), Vec::new());

    let err = transport().send(request).await.expect_err("should fail");
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreadable_error_body_keeps_status() {
    // Promises more bytes than it sends, then closes.
    let (base, _received) = respond_once(
        "HTTP/1.1 502 Bad Gateway\r\nContent-Length: 100\r\nConnection: close\r\n\r\npartial"
            .to_string(),
    )
    .await;
    let request = HttpRequest::get(format!("{base}/api/users.list"), Vec::new());

    let err = transport().send(request).await.expect_err("should fail");
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 502);
            assert!(body.is_empty());
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_deadline_is_enforced() {
    // Accepts the connection but never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let request = HttpRequest::get(format!("http://{addr}/api/users.list"), Vec::new())
        .with_context(CallContext::new().with_timeout(Duration::from_millis(100)));
    let err = transport().send(request).await.expect_err("should time out");
    assert!(matches!(err, TransportError::Timeout));
    server.abort();
}

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let request = HttpRequest::get(format!("http://{addr}/api/users.list"), Vec::new());
    let err = transport().send(request).await.expect_err("should fail");
    assert!(matches!(err, TransportError::Request(_)));
}
