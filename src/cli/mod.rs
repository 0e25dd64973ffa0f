//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and application entry point.

use crate::config::{ClientConfig, HttpMethod, MethodPolicy, ProxyConfig};
use crate::error::{Result, XreqError};
use crate::exit_code::exit_code_for_error;
use crate::http::auth::Auth;
use crate::http::headers::{merge_headers, HeaderSet};
use crate::http::request::{FilePart, RequestData, RequestOptions};
use crate::http::response::{format_head, ResponseFormatter};
use crate::http::RequestClient;
use crate::utils::{StringUtils, UrlUtils};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::{self, Write};
use std::path::PathBuf;

/// Main entry point for the CLI application
pub fn run() {
    let matches = create_app().get_matches();
    crate::logging::init(matches.get_flag("verbose"));

    if let Err(e) = run_with_args(&matches) {
        eprintln!("xreq: error: {}", e);
        std::process::exit(exit_code_for_error(&e));
    }
}

/// Everything the command line asks for, before any I/O happens
#[derive(Debug)]
pub struct Invocation {
    pub url: String,
    pub config: ClientConfig,
    pub options: RequestOptions,
    pub extra_headers: HeaderSet,
    pub uploads: Vec<(String, PathBuf)>,
    pub include_head: bool,
    pub pretty_json: bool,
}

fn run_with_args(matches: &ArgMatches) -> Result<()> {
    let invocation = build_invocation(matches)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| XreqError::Config(format!("Failed to create async runtime: {}", e)))?;

    rt.block_on(execute_invocation(invocation))
}

async fn execute_invocation(invocation: Invocation) -> Result<()> {
    let Invocation {
        url,
        config,
        mut options,
        extra_headers,
        uploads,
        include_head,
        pretty_json,
    } = invocation;

    let mut client = RequestClient::new(config);
    if !extra_headers.is_empty() {
        options.headers = Some(merge_headers(client.headers().clone(), &extra_headers));
    }
    for (field, path) in uploads {
        options.files.push(FilePart::from_path(field, &path).await?);
    }

    let response = client.execute(&url, options).await?;

    let head = format_head(response.version(), response.status(), response.headers());
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.map_err(XreqError::Http)?;
    let body = ResponseFormatter::new(pretty_json).format(&body, content_type.as_deref())?;

    let mut stdout = io::stdout().lock();
    if include_head {
        stdout.write_all(head.as_bytes())?;
    }
    stdout.write_all(body.as_bytes())?;
    if !body.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

/// Create the CLI application structure
pub fn create_app() -> Command {
    Command::new("xreq")
        .version(crate::VERSION)
        .about("Send one HTTP request with browser-like default headers")
        .arg(Arg::new("url")
            .help("The URL to request")
            .required(true)
            .index(1))
        .arg(Arg::new("host")
            .long("host")
            .value_name("HOST")
            .help("Value for the Host and Origin headers (defaults to the URL host)"))
        .arg(Arg::new("referer")
            .short('e')
            .long("referer")
            .value_name("URL")
            .help("Referer header (defaults to http://HOST/)"))
        .arg(Arg::new("cookie")
            .short('b')
            .long("cookie")
            .value_name("DATA")
            .help("Cookie string sent with the request"))
        .arg(Arg::new("header")
            .short('H')
            .long("header")
            .value_name("HEADER")
            .help("Add or replace a header on top of the defaults")
            .action(ArgAction::Append))
        .arg(Arg::new("data")
            .short('d')
            .long("data")
            .value_name("KEY=VALUE")
            .help("Form field; any body data turns the request into a POST")
            .action(ArgAction::Append)
            .conflicts_with_all(["data-raw", "json"]))
        .arg(Arg::new("data-raw")
            .long("data-raw")
            .value_name("DATA")
            .help("Raw request body")
            .conflicts_with("json"))
        .arg(Arg::new("json")
            .long("json")
            .value_name("JSON")
            .help("JSON request body"))
        .arg(Arg::new("param")
            .short('P')
            .long("param")
            .value_name("KEY=VALUE")
            .help("Query string parameter")
            .action(ArgAction::Append))
        .arg(Arg::new("form")
            .short('F')
            .long("form")
            .value_name("FIELD=@PATH")
            .help("Upload a file as multipart form data (POST only)")
            .action(ArgAction::Append))
        .arg(Arg::new("request")
            .short('X')
            .long("request")
            .value_name("METHOD")
            .help("HTTP method; ignored unless --explicit-method is set"))
        .arg(Arg::new("explicit-method")
            .long("explicit-method")
            .help("Let --request override the method inferred from body data")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("user")
            .short('u')
            .long("user")
            .value_name("USER[:PASSWORD]")
            .help("Basic authentication")
            .conflicts_with("oauth2-bearer"))
        .arg(Arg::new("oauth2-bearer")
            .long("oauth2-bearer")
            .value_name("TOKEN")
            .help("Bearer token authentication"))
        .arg(Arg::new("verify")
            .long("verify")
            .help("Verify TLS certificates (off by default)")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("proxy")
            .short('x')
            .long("proxy")
            .value_name("[PROTOCOL://]HOST[:PORT]")
            .help("Route HTTP and HTTPS traffic through a proxy")
            .conflicts_with("debug-proxy"))
        .arg(Arg::new("debug-proxy")
            .long("debug-proxy")
            .help(format!("Route traffic through the inspection proxy at {}", crate::config::DEBUG_PROXY_URL))
            .action(ArgAction::SetTrue))
        .arg(Arg::new("include")
            .short('i')
            .long("include")
            .help("Print the status line and response headers")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("pretty-json")
            .long("pretty-json")
            .help("Pretty-print JSON response bodies")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Log the outgoing request")
            .action(ArgAction::SetTrue))
}

/// Build the client configuration and call options from command line arguments
pub fn build_invocation(matches: &ArgMatches) -> Result<Invocation> {
    let url_str = matches
        .get_one::<String>("url")
        .ok_or_else(|| XreqError::Config("Missing URL".to_string()))?;
    let url = UrlUtils::validate_url(url_str)?;

    let host = match matches.get_one::<String>("host") {
        Some(host) => host.clone(),
        None => UrlUtils::host_with_port(&url).unwrap_or_default(),
    };

    let mut config = ClientConfig::new(host).verify_certs(matches.get_flag("verify"));
    if let Some(referer) = matches.get_one::<String>("referer") {
        config = config.referer(referer.clone());
    }
    if let Some(cookie) = matches.get_one::<String>("cookie") {
        config = config.cookie(cookie.clone());
    }
    if matches.get_flag("explicit-method") {
        config = config.method_policy(MethodPolicy::Explicit);
    }
    if matches.get_flag("debug-proxy") {
        config = config.debug_proxy(Some(ProxyConfig::debug()));
    }

    let mut options = RequestOptions::new();

    if let Some(method_str) = matches.get_one::<String>("request") {
        options = options.method(method_str.parse::<HttpMethod>()?);
    }

    let mut extra_headers = HeaderSet::new();
    if let Some(headers) = matches.get_many::<String>("header") {
        for header_str in headers {
            let (key, value) = StringUtils::parse_header(header_str)?;
            extra_headers = merge_headers(extra_headers, &HeaderSet::from([(key, value)]));
        }
    }

    if let Some(fields) = matches.get_many::<String>("data") {
        let pairs = fields
            .map(|field| StringUtils::parse_key_value(field))
            .collect::<Result<Vec<_>>>()?;
        options = options.data(RequestData::Form(pairs));
    } else if let Some(raw) = matches.get_one::<String>("data-raw") {
        options = options.data(RequestData::Text(raw.clone()));
    } else if let Some(json) = matches.get_one::<String>("json") {
        options = options.data(RequestData::Json(serde_json::from_str(json)?));
    }

    if let Some(params) = matches.get_many::<String>("param") {
        for param in params {
            let (key, value) = StringUtils::parse_key_value(param)?;
            options = options.param(key, value);
        }
    }

    let uploads = match matches.get_many::<String>("form") {
        Some(files) => files
            .map(|file| StringUtils::parse_file_arg(file))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    if let Some(user_str) = matches.get_one::<String>("user") {
        options = options.auth(Auth::parse_user_pass(user_str)?);
    } else if let Some(token) = matches.get_one::<String>("oauth2-bearer") {
        options = options.auth(Auth::bearer(token.clone()));
    }

    if let Some(proxy_url) = matches.get_one::<String>("proxy") {
        options = options.proxy(ProxyConfig::new(proxy_url.clone()));
    }

    Ok(Invocation {
        url: url.to_string(),
        config,
        options,
        extra_headers,
        uploads,
        include_head: matches.get_flag("include"),
        pretty_json: matches.get_flag("pretty-json"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(args: &[&str]) -> Result<Invocation> {
        let matches = create_app()
            .try_get_matches_from(std::iter::once("xreq").chain(args.iter().copied()))
            .expect("arguments should parse");
        build_invocation(&matches)
    }

    #[test]
    fn host_defaults_to_url_host() {
        let invocation = invocation(&["http://127.0.0.1:8080/api"]).expect("invocation");
        assert_eq!(invocation.config.host, "127.0.0.1:8080");
        assert!(invocation.config.referer.is_empty());
        assert!(!invocation.config.verify_certs);
        assert!(invocation.options.data.is_none());
    }

    #[test]
    fn data_fields_become_form_body() {
        let invocation =
            invocation(&["example.com/api", "-d", "a=1", "-d", "b=2"]).expect("invocation");
        assert_eq!(invocation.url, "http://example.com/api");
        assert_eq!(
            invocation.options.data,
            Some(RequestData::form([("a", "1"), ("b", "2")]))
        );
    }

    #[test]
    fn json_body_must_parse() {
        let err = invocation(&["example.com", "--json", "{oops"]).expect_err("bad json");
        assert!(matches!(err, XreqError::Json(_)));
    }

    #[test]
    fn explicit_method_and_flags_are_carried() {
        let invocation = invocation(&[
            "example.com",
            "-X",
            "post",
            "--explicit-method",
            "--verify",
            "--debug-proxy",
            "-H",
            "X-One: 1",
            "-b",
            "session=abc",
        ])
        .expect("invocation");
        assert_eq!(invocation.options.method, Some(HttpMethod::Post));
        assert_eq!(invocation.config.method_policy, MethodPolicy::Explicit);
        assert!(invocation.config.verify_certs);
        assert_eq!(invocation.config.debug_proxy, Some(ProxyConfig::debug()));
        assert_eq!(invocation.extra_headers["X-One"], "1");
        assert_eq!(invocation.config.cookie, "session=abc");
    }

    #[test]
    fn unsupported_method_is_rejected() {
        let err = invocation(&["example.com", "-X", "DELETE"]).expect_err("delete");
        assert!(matches!(err, XreqError::Unsupported(_)));
    }
}
