use xreq::config::{ClientConfig, HeaderMode};
use xreq::http::headers::{default_headers, DEFAULT_ACCEPT, DEFAULT_USER_AGENT};
use xreq::{RequestClient, RequestOptions};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn header_value<'a>(request: &'a wiremock::Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|value| value.to_str().ok())
}

#[test]
fn test_defaults_replace_constructor_headers() {
    let config = ClientConfig::new("example.com").header("X-Dropped", "1");
    let client = RequestClient::new(config);
    assert_eq!(
        client.headers(),
        &default_headers("example.com", "http://example.com/")
    );
}

#[test]
fn test_merge_mode_keeps_constructor_headers() {
    let config = ClientConfig::new("example.com")
        .header("X-Kept", "1")
        .header_mode(HeaderMode::Merge);
    let client = RequestClient::new(config);
    assert_eq!(client.headers()["X-Kept"], "1");
    assert_eq!(client.headers()["Accept"], DEFAULT_ACCEPT);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_default_headers_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/headers"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let mut client = RequestClient::new(ClientConfig::new("example.com"));
    let response = client
        .execute(&format!("{}/headers", server.uri()), RequestOptions::new())
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), 200);

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(header_value(request, "host"), Some("example.com"));
    assert_eq!(header_value(request, "origin"), Some("example.com"));
    assert_eq!(header_value(request, "referer"), Some("http://example.com/"));
    assert_eq!(header_value(request, "accept"), Some(DEFAULT_ACCEPT));
    assert_eq!(header_value(request, "cache-control"), Some("max-age=0"));
    assert_eq!(header_value(request, "user-agent"), Some(DEFAULT_USER_AGENT));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_call_headers_replace_instance_headers() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/headers"))
        .and(header("X-Test-Header", "xreq"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let mut client = RequestClient::new(ClientConfig::new("example.com"));
    let headers = [("X-Test-Header".to_string(), "xreq".to_string())]
        .into_iter()
        .collect();
    let response = client
        .execute(
            &format!("{}/headers", server.uri()),
            RequestOptions::new().headers(headers),
        )
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), 200);

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
    assert_eq!(header_value(&requests[0], "x-requested-with"), None);
    // The instance headers are untouched by a per-call replacement.
    assert_eq!(client.headers()["X-Requested-With"], "XMLHttpRequest");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_query_params_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust lang"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = RequestClient::new(ClientConfig::new("example.com"));
    let options = RequestOptions::new()
        .param("q", "rust lang")
        .param("page", "2");
    let response = client
        .execute(&format!("{}/search", server.uri()), options)
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), 200);
}
