//! HTTP client module
//!
//! [`RequestClient`] holds the default headers and the current cookie value,
//! and dispatches one GET or POST per call through reqwest.

use crate::config::{ClientConfig, HeaderMode, HttpMethod, MethodPolicy, ProxyConfig};
use crate::error::{Result, XreqError};
use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, COOKIE};
use reqwest::{Client, ClientBuilder, Method, Response};
use url::Url;

pub mod auth;
pub mod headers;
pub mod request;
pub mod response;

use auth::Auth;
use headers::{default_headers, default_referer, merge_headers, HeaderSet};
use request::{multipart_form, select_method, FilePart, RequestData, RequestOptions};

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }
}

/// Request client with browser-like default headers and cookie passthrough.
///
/// The stored cookie is replaced after every call by the cookie value that
/// call used. It is never read back from `Set-Cookie` response headers.
/// `execute` takes `&mut self`, so sharing one client across tasks needs
/// external locking.
#[derive(Debug, Clone)]
pub struct RequestClient {
    headers: HeaderSet,
    cookie: String,
    host: String,
    referer: String,
    method_policy: MethodPolicy,
    verify_certs: bool,
    debug_proxy: Option<ProxyConfig>,
}

impl RequestClient {
    /// Create a new client, installing the default header set
    pub fn new(config: ClientConfig) -> Self {
        let referer = if config.referer.is_empty() {
            default_referer(&config.host)
        } else {
            config.referer
        };

        let defaults = default_headers(&config.host, &referer);
        let headers = match config.header_mode {
            HeaderMode::Replace => {
                if !config.headers.is_empty() {
                    debug!(
                        "Replacing {} constructor header(s) with the default set",
                        config.headers.len()
                    );
                }
                defaults
            }
            HeaderMode::Merge => merge_headers(defaults, &config.headers),
        };

        Self {
            headers,
            cookie: config.cookie,
            host: config.host,
            referer,
            method_policy: config.method_policy,
            verify_certs: config.verify_certs,
            debug_proxy: config.debug_proxy,
        }
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderSet {
        &mut self.headers
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn set_cookie(&mut self, cookie: impl Into<String>) {
        self.cookie = cookie.into();
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn referer(&self) -> &str {
        &self.referer
    }

    /// Whether a call verifies TLS certificates; unset falls back to the config
    fn tls_verification(&self, requested: Option<bool>) -> bool {
        requested.unwrap_or(self.verify_certs)
    }

    /// Execute a single HTTP request.
    ///
    /// Missing headers and cookies fall back to the client's own. The verb
    /// follows [`select_method`]. Once the send attempt finishes, successful
    /// or not, the stored cookie becomes the cookie value this call used.
    pub async fn execute(&mut self, url: &str, options: RequestOptions) -> Result<Response> {
        let RequestOptions {
            method: requested,
            headers,
            files,
            data,
            params,
            auth,
            cookies,
            verify,
            proxy,
        } = options;

        let method = select_method(data.as_ref(), requested, self.method_policy);
        if let Some(requested) = requested {
            if requested != method {
                debug!("Requested {} but dispatching {}", requested, method);
            }
        }

        let headers = headers.unwrap_or_else(|| self.headers.clone());
        let cookies = cookies.unwrap_or_else(|| self.cookie.clone());
        let dispatch = Dispatch {
            url,
            method,
            headers: &headers,
            cookies: &cookies,
            files,
            data,
            params,
            auth,
            verify: self.tls_verification(verify),
            proxy: proxy.as_ref().or(self.debug_proxy.as_ref()),
        };

        let result = dispatch.send().await;
        self.cookie = cookies;
        result
    }
}

/// Everything resolved for one call
struct Dispatch<'a> {
    url: &'a str,
    method: HttpMethod,
    headers: &'a HeaderSet,
    cookies: &'a str,
    files: Vec<FilePart>,
    data: Option<RequestData>,
    params: Vec<(String, String)>,
    auth: Option<Auth>,
    verify: bool,
    proxy: Option<&'a ProxyConfig>,
}

impl Dispatch<'_> {
    async fn send(self) -> Result<Response> {
        let client = build_transport(self.verify, self.proxy)?;
        let mut request = client.request(self.method.into(), self.url);

        for (key, value) in self.headers {
            if !self.cookies.is_empty() && key.eq_ignore_ascii_case("cookie") {
                continue;
            }
            request = request.header(key, value);
        }

        if !self.cookies.is_empty() {
            request = request.header(COOKIE, self.cookies);
        }

        if let Some(auth) = &self.auth {
            request = request.header(AUTHORIZATION, auth.header_value());
        }

        if !self.params.is_empty() {
            request = request.query(&self.params);
        }

        match self.method {
            HttpMethod::Get => {
                if !self.files.is_empty() {
                    debug!("Ignoring {} file(s) on a GET request", self.files.len());
                }
            }
            HttpMethod::Post if !self.files.is_empty() => {
                request = request.multipart(multipart_form(self.data.as_ref(), self.files)?);
            }
            HttpMethod::Post => match self.data {
                Some(RequestData::Form(pairs)) => request = request.form(&pairs),
                Some(RequestData::Text(text)) => request = request.body(text),
                Some(RequestData::Json(value)) => request = request.json(&value),
                None => {}
            },
        }

        let request = request.build().map_err(XreqError::Http)?;
        log_request(&request);

        client.execute(request).await.map_err(XreqError::Http)
    }
}

/// Build the transport for one call; TLS verification and proxy vary per call.
fn build_transport(verify: bool, proxy: Option<&ProxyConfig>) -> Result<Client> {
    let mut builder = ClientBuilder::new();

    if let Some(proxy_config) = proxy {
        let proxy = reqwest::Proxy::all(&proxy_config.url)
            .map_err(|e| XreqError::Proxy(format!("Invalid proxy: {}", e)))?;

        let proxy = if let (Some(username), Some(password)) =
            (&proxy_config.username, &proxy_config.password)
        {
            proxy.basic_auth(username, password)
        } else {
            proxy
        };

        debug!("Routing request through proxy {}", proxy_config.url);
        builder = builder.proxy(proxy);
    }

    if !verify {
        warn!("TLS certificate verification is disabled for this request");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().map_err(XreqError::Http)
}

fn log_request(request: &reqwest::Request) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    debug!("> {} {}", request.method(), request_path(request.url()));
    for (name, value) in request.headers().iter() {
        let value = value.to_str().unwrap_or("<non-utf8>");
        debug!("> {}: {}", name, value);
    }
}

fn request_path(url: &Url) -> String {
    match url[url::Position::BeforePath..].trim() {
        "" => "/".to_string(),
        path => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_discards_constructor_headers_by_default() {
        let config = ClientConfig::new("example.com").header("X-Custom", "1");
        let client = RequestClient::new(config);
        assert_eq!(client.headers().len(), 8);
        assert!(!client.headers().contains_key("X-Custom"));
    }

    #[test]
    fn new_merges_constructor_headers_when_asked() {
        let config = ClientConfig::new("example.com")
            .header("X-Custom", "1")
            .header("user-agent", "xreq-test")
            .header_mode(HeaderMode::Merge);
        let client = RequestClient::new(config);
        assert_eq!(client.headers().len(), 9);
        assert_eq!(client.headers()["X-Custom"], "1");
        assert_eq!(client.headers()["user-agent"], "xreq-test");
        assert!(!client.headers().contains_key("User-Agent"));
    }

    #[test]
    fn new_derives_referer_from_host() {
        let client = RequestClient::new(ClientConfig::new("example.com"));
        assert_eq!(client.referer(), "http://example.com/");
        assert_eq!(client.headers()["Referer"], "http://example.com/");
        assert_eq!(client.headers()["Host"], "example.com");
        assert_eq!(client.headers()["Origin"], "example.com");
    }

    #[test]
    fn new_keeps_explicit_referer() {
        let config = ClientConfig::new("example.com").referer("http://example.com/login");
        let client = RequestClient::new(config);
        assert_eq!(client.referer(), "http://example.com/login");
        assert_eq!(client.headers()["Referer"], "http://example.com/login");
    }

    #[test]
    fn tls_verification_is_off_unless_requested() {
        let client = RequestClient::new(ClientConfig::new("example.com"));
        assert!(!client.tls_verification(None));
        assert!(client.tls_verification(Some(true)));

        let client = RequestClient::new(ClientConfig::new("example.com").verify_certs(true));
        assert!(client.tls_verification(None));
        assert!(!client.tls_verification(Some(false)));
    }

    #[test]
    fn build_transport_accepts_debug_proxy() {
        build_transport(true, Some(&ProxyConfig::debug())).expect("debug proxy is valid");
    }

    #[test]
    fn request_path_defaults_to_root() {
        let url = Url::parse("http://example.com").expect("url");
        assert_eq!(request_path(&url), "/");
        let url = Url::parse("http://example.com/api?a=1").expect("url");
        assert_eq!(request_path(&url), "/api?a=1");
    }
}
