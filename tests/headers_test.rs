use agentnet::http::{Encoding, HeaderBlock, HttpResponse};
use bytes::Bytes;
use url::Url;

fn parse(raw: &str) -> HttpResponse {
    let url = Url::parse("http://www.example.com/a/").unwrap();
    HttpResponse::parse(raw.as_bytes(), url, Encoding::get(), Bytes::new()).unwrap()
}

#[test]
fn test_header_names_case_insensitive() {
    let response = parse(
        "http/1.1 200 OK\r\ncontent-TYPE: text/html\r\nX-Powered-By: tests\r\nSET-COOKIE: a=1\r\n\r\nbody",
    );
    assert_eq!(response.response_code(), 200);
    assert_eq!(response.mime_type(), Some("text/html"));
    assert_eq!(response.header("x-powered-by"), Some("tests"));
    assert_eq!(response.headers().cookies().len(), 1);
}

#[test]
fn test_header_value_with_colons() {
    let response = parse("HTTP/1.0 302 Found\r\nLocation: http://other.example.com:8080/x\r\n\r\n");
    assert_eq!(response.location(), Some("http://other.example.com:8080/x"));
    assert_eq!(response.header("location"), Some("http://other.example.com:8080/x"));
    assert!(response.is_redirect());
}

#[test]
fn test_challenge_with_extra_params() {
    let response = parse(
        "HTTP/1.1 401 Unauthorized\r\nWWW-Authenticate: Basic realm=\"Staff Area\", charset=\"UTF-8\"\r\n\r\n",
    );
    assert!(response.is_challenge());
    assert_eq!(response.authentication_scheme(), Some("Basic"));
    assert_eq!(response.realm(), Some("Staff Area"));
}

#[test]
fn test_only_first_separator_splits() {
    let response = parse("HTTP/1.0 200 OK\r\n\r\nHTTP/1.0 500 Fake\r\n\r\n");
    assert_eq!(response.response_code(), 200);
    assert_eq!(response.text(), "HTTP/1.0 500 Fake\r\n\r\n");
}

#[test]
fn test_bare_lf_lines() {
    let headers = HeaderBlock::parse("HTTP/1.1 404 Not Found\nContent-Type: text/plain\n");
    assert_eq!(headers.response_code(), 404);
    assert_eq!(headers.mime_type(), Some("text/plain"));
}
