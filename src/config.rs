//! Configuration management for xreq

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::XreqError;

/// Address of the local inspection proxy used while debugging traffic.
pub const DEBUG_PROXY_URL: &str = "http://192.168.1.122:8888";

/// HTTP methods the client is able to dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        };
        write!(f, "{}", method)
    }
}

impl FromStr for HttpMethod {
    type Err = XreqError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(XreqError::Unsupported(format!(
                "HTTP method {} is not supported",
                other
            ))),
        }
    }
}

/// How headers given at construction combine with the default set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderMode {
    /// Discard constructor headers and install the defaults only.
    #[default]
    Replace,
    /// Install the defaults, then lay constructor headers over them.
    Merge,
}

/// How the dispatched verb is chosen for a call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MethodPolicy {
    /// GET without body data, POST with it. An explicit method is ignored.
    #[default]
    InferFromData,
    /// An explicit method wins; inference applies when none is given.
    Explicit,
}

/// Proxy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// The local inspection proxy for both HTTP and HTTPS traffic
    pub fn debug() -> Self {
        Self::new(DEBUG_PROXY_URL)
    }
}

/// Client configuration supplied at construction
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub host: String,
    pub referer: String,
    pub cookie: String,
    pub headers: HashMap<String, String>,
    pub header_mode: HeaderMode,
    pub method_policy: MethodPolicy,
    /// TLS certificate verification. Off unless explicitly enabled.
    pub verify_certs: bool,
    pub debug_proxy: Option<ProxyConfig>,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = cookie.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn header_mode(mut self, mode: HeaderMode) -> Self {
        self.header_mode = mode;
        self
    }

    pub fn method_policy(mut self, policy: MethodPolicy) -> Self {
        self.method_policy = policy;
        self
    }

    pub fn verify_certs(mut self, verify: bool) -> Self {
        self.verify_certs = verify;
        self
    }

    pub fn debug_proxy(mut self, proxy: Option<ProxyConfig>) -> Self {
        self.debug_proxy = proxy;
        self
    }
}
