mod common;

use agentnet::base::neterror::{NetError, NetErrorKind};
use agentnet::http::Encoding;
use agentnet::urlrequest::UserAgent;
use common::{request_line, MockServer};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use url::Url;

const MEMBERS_ONLY: &str =
    "HTTP/1.1 401 Unauthorized\r\nWWW-Authenticate: Basic realm=\"Members\"\r\n\r\nlogin required";

#[tokio::test]
async fn test_challenge_then_identity() {
    let server = MockServer::start(|request| {
        if request.contains("Authorization: Basic dXNlcjpwYXNz\r\n") {
            b"HTTP/1.1 200 OK\r\n\r\nsecret".to_vec()
        } else {
            MEMBERS_ONLY.as_bytes().to_vec()
        }
    })
    .await;

    let mut agent = UserAgent::new();
    let response = agent.fetch_response(server.url("/private/page.html"), Encoding::get()).await.unwrap();
    assert!(response.is_challenge());
    assert_eq!(response.authentication_scheme(), Some("Basic"));
    assert_eq!(response.realm(), Some("Members"));

    let realm = agent.authenticator().realm("127.0.0.1", "Members").unwrap();
    assert_eq!(realm.root(), "/private/");

    agent.set_identity("127.0.0.1", "Members", "user", "pass");
    let response = agent.fetch_response(server.url("/private/other.html"), Encoding::get()).await.unwrap();
    assert_eq!(response.response_code(), 200);
    assert_eq!(response.text(), "secret");

    let outside = agent.fetch_response(server.url("/public/"), Encoding::get()).await.unwrap();
    assert_eq!(outside.response_code(), 401);
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn test_challenge_after_redirect_uses_requested_url() {
    let server = MockServer::start(|request| {
        if request.contains("Authorization: Basic dXNlcjpwYXNz\r\n") {
            b"HTTP/1.0 200 OK\r\n\r\nwelcome".to_vec()
        } else if request_line(request).starts_with("GET /a/start") {
            b"HTTP/1.0 302 Found\r\nLocation: /b/secret/page\r\n\r\n".to_vec()
        } else {
            MEMBERS_ONLY.as_bytes().to_vec()
        }
    })
    .await;

    let mut agent = UserAgent::new();
    let response = agent.fetch_response(server.url("/a/start"), Encoding::get()).await.unwrap();
    assert!(response.is_challenge());
    assert_eq!(response.url().path(), "/b/secret/page");

    let realm = agent.authenticator().realm("127.0.0.1", "Members").unwrap();
    assert_eq!(realm.root(), "/a/");

    agent.set_identity("127.0.0.1", "Members", "user", "pass");
    let response = agent.fetch_response(server.url("/a/other.html"), Encoding::get()).await.unwrap();
    assert_eq!(response.response_code(), 200);

    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(request_line(&requests[2]), "GET /a/other.html HTTP/1.0");
    assert!(requests[2].contains("Authorization: Basic dXNlcjpwYXNz\r\n"));
}

#[tokio::test]
async fn test_url_credentials_sent_without_challenge() {
    let server = MockServer::fixed("HTTP/1.0 200 OK\r\n\r\n").await;
    let url = Url::parse(&format!("http://me:pw@127.0.0.1:{}/", server.port)).unwrap();

    let mut agent = UserAgent::new();
    agent.fetch_response(url, Encoding::get()).await.unwrap();

    assert!(server.requests()[0].contains("Authorization: Basic bWU6cHc=\r\n"));
}

#[tokio::test]
async fn test_dynamic_header_per_attempt() {
    let server = MockServer::fixed("HTTP/1.0 200 OK\r\n\r\n").await;
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);

    let mut agent = UserAgent::new();
    agent
        .add_header("User-Agent", "agentnet-test")
        .add_dynamic_header("X-Count", move || seen.fetch_add(1, Ordering::SeqCst).to_string());
    agent.fetch_response(server.url("/"), Encoding::get()).await.unwrap();
    agent.fetch_response(server.url("/"), Encoding::get()).await.unwrap();

    let requests = server.requests();
    assert!(requests[0].contains("user-agent: agentnet-test\r\nx-count: 0\r\n"));
    assert!(requests[1].contains("x-count: 1\r\n"));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_get_parameters_move_to_query() {
    let server = MockServer::fixed("HTTP/1.0 200 OK\r\n\r\n").await;

    let mut agent = UserAgent::new();
    let encoding = Encoding::get().param("q", "rust lang").param("page", "2");
    let response = agent.fetch_response(server.url("/search"), encoding).await.unwrap();

    assert_eq!(request_line(&server.requests()[0]), "GET /search?q=rust+lang&page=2 HTTP/1.0");
    assert!(response.encoding().params().is_empty());
}

#[tokio::test]
async fn test_cookies_ignored_when_disabled() {
    let server = MockServer::fixed("HTTP/1.0 200 OK\r\nSet-Cookie: seen=yes\r\n\r\n").await;

    let mut agent = UserAgent::new();
    agent.set_cookie("pre", "set", None, "/", None);
    agent.ignore_cookies();
    agent.fetch_response(server.url("/"), Encoding::get()).await.unwrap();

    assert!(!server.requests()[0].contains("Cookie:"));
    assert_eq!(agent.cookie_value("127.0.0.1", "/", "seen"), None);
    assert_eq!(agent.cookie_jar().len(), 1);
}

#[tokio::test]
async fn test_file_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.html");
    std::fs::write(&path, "HTTP/1.0 302 Found\r\nLocation: /x\r\n\r\n<p>local</p>").unwrap();

    let mut agent = UserAgent::new();
    agent.use_proxy("127.0.0.1:9", None, None).unwrap();
    let url = Url::from_file_path(&path).unwrap();
    let response = agent.fetch_response(url, Encoding::get()).await.unwrap();

    assert_eq!(response.response_code(), 0);
    assert!(!response.is_redirect());
    assert!(response.text().ends_with("<p>local</p>"));
    assert!(response.sent().is_empty());
}

#[tokio::test]
async fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let url = Url::from_file_path(dir.path().join("absent.html")).unwrap();

    let mut agent = UserAgent::new();
    let err = agent.fetch_response(url, Encoding::get()).await.unwrap_err();
    assert!(matches!(err.error, NetError::FileOpenFailed { .. }));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mut agent = UserAgent::new();
    let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
    let err = agent.fetch_response(url.clone(), Encoding::get()).await.unwrap_err();

    assert_eq!(err.error.kind(), NetErrorKind::TransportOpen);
    assert_eq!(err.url, url);
    assert!(err.to_string().contains("127.0.0.1"));
}

#[tokio::test]
async fn test_empty_response() {
    let server = MockServer::start(|_| Vec::new()).await;

    let mut agent = UserAgent::new();
    let err = agent.fetch_response(server.url("/"), Encoding::get()).await.unwrap_err();

    assert_eq!(err.error, NetError::EmptyResponse);
    assert!(err.sent.starts_with(b"GET / HTTP/1.0\r\n"));
}

#[tokio::test]
async fn test_headers_without_body_separator() {
    let server = MockServer::fixed("HTTP/1.0 200 OK\r\nContent-Type: text/plain").await;

    let mut agent = UserAgent::new();
    let err = agent.fetch_response(server.url("/"), Encoding::get()).await.unwrap_err();

    assert_eq!(err.error, NetError::MalformedResponse);
    assert_eq!(err.headers.unwrap().mime_type(), Some("text/plain"));
}

#[tokio::test]
async fn test_gzip_body_decoded() {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(b"{\"ok\":true}").unwrap();
    let mut raw = b"HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\nContent-Type: application/json\r\n\r\n".to_vec();
    raw.extend(enc.finish().unwrap());
    let server = MockServer::start(move |_| raw.clone()).await;

    let mut agent = UserAgent::new();
    let response = agent.fetch_response(server.url("/api"), Encoding::get()).await.unwrap();

    assert_eq!(response.text(), "{\"ok\":true}");
    assert_eq!(response.header("content-encoding"), Some("gzip"));
    assert!(response.decoding_error().is_none());
}
