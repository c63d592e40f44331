mod common;

use agentnet::http::Encoding;
use agentnet::socket::proxy::ProxySettings;
use agentnet::urlrequest::{UserAgent, UserAgentConfig};
use common::{request_line, MockServer};
use url::Url;

#[tokio::test]
async fn test_request_goes_through_proxy() {
    let proxy = MockServer::fixed("HTTP/1.0 200 OK\r\n\r\nvia proxy").await;

    let mut agent = UserAgent::new();
    agent.use_proxy(&format!("127.0.0.1:{}", proxy.port), Some("user"), Some("pass")).unwrap();
    let url = Url::parse("http://origin.test/a/b?c=1").unwrap();
    let response = agent.fetch_response(url, Encoding::get()).await.unwrap();

    assert_eq!(response.text(), "via proxy");
    let expected = format!(
        "GET http://origin.test/a/b?c=1 HTTP/1.0\r\n\
         Host: 127.0.0.1:{}\r\n\
         Proxy-Authorization: Basic dXNlcjpwYXNz\r\n\
         Connection: close\r\n\r\n",
        proxy.port
    );
    assert_eq!(proxy.requests()[0], expected);
}

#[tokio::test]
async fn test_proxy_without_credentials() {
    let proxy = MockServer::fixed("HTTP/1.0 200 OK\r\n\r\n").await;

    let config = UserAgentConfig {
        proxy: Some(ProxySettings::new(&format!("http://127.0.0.1:{}", proxy.port)).unwrap()),
        ..UserAgentConfig::default()
    };
    let mut agent = UserAgent::with_config(config);
    agent.fetch_response(Url::parse("http://origin.test:8000/").unwrap(), Encoding::get()).await.unwrap();

    let request = &proxy.requests()[0];
    assert_eq!(request_line(request), "GET http://origin.test:8000/ HTTP/1.0");
    assert!(!request.contains("Proxy-Authorization"));
}

#[tokio::test]
async fn test_redirects_stay_on_proxy() {
    let proxy = MockServer::start(|request| {
        if request_line(request).contains("/start") {
            b"HTTP/1.0 302 Found\r\nLocation: http://other.test/done\r\n\r\n".to_vec()
        } else {
            b"HTTP/1.0 200 OK\r\n\r\ndone".to_vec()
        }
    })
    .await;

    let mut agent = UserAgent::new();
    agent.use_proxy(&format!("127.0.0.1:{}", proxy.port), None, None).unwrap();
    let response = agent
        .fetch_response(Url::parse("http://origin.test/start").unwrap(), Encoding::get())
        .await
        .unwrap();

    assert_eq!(response.text(), "done");
    let requests = proxy.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(request_line(&requests[1]), "GET http://other.test/done HTTP/1.0");
}

#[test]
fn test_proxy_settings_parsing() {
    let proxy = ProxySettings::new("proxy.corp:3128").unwrap();
    assert_eq!(proxy.scheme(), "http");
    assert_eq!(proxy.port(), 3128);
    assert!(!proxy.requires_auth());

    assert_eq!(ProxySettings::new("https://proxy.corp").unwrap().port(), 8080);
    assert!(ProxySettings::new("socks5://proxy.corp").is_err());
}
