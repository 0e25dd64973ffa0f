//! Utility functions and helpers for argument parsing

use crate::error::{Result, XreqError};
use std::path::PathBuf;
use url::Url;


/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate and normalize URL
    pub fn validate_url(input: &str) -> Result<Url> {
        // Add http:// if no scheme is provided
        let url_str = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        Url::parse(&url_str)
            .map_err(|e| XreqError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))
    }

    /// Host (with port, if any) of a URL, used when no host is configured
    pub fn host_with_port(url: &Url) -> Option<String> {
        let host = url.host_str()?;
        Some(match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }
}

/// String utilities
pub struct StringUtils;

impl StringUtils {
    /// Parse `Name: value` header lines
    pub fn parse_header(input: &str) -> Result<(String, String)> {
        match input.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(XreqError::InvalidHeader(format!(
                "Invalid header format: '{}'. Expected 'key: value'",
                input
            ))),
        }
    }

    /// Parse `key=value` pairs used for form fields and query parameters
    pub fn parse_key_value(input: &str) -> Result<(String, String)> {
        match input.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(XreqError::Config(format!(
                "Invalid field format: '{}'. Expected 'key=value'",
                input
            ))),
        }
    }

    /// Parse `field=@path` file upload arguments
    pub fn parse_file_arg(input: &str) -> Result<(String, PathBuf)> {
        let (field, value) = Self::parse_key_value(input)?;
        match value.strip_prefix('@') {
            Some(path) if !path.is_empty() => Ok((field, PathBuf::from(path))),
            _ => Err(XreqError::Config(format!(
                "Invalid file format: '{}'. Expected 'field=@path'",
                input
            ))),
        }
    }
}
