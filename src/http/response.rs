//! HTTP response formatting for display

use crate::error::Result;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Version};
use serde_json::Value;

/// Response formatter for different output formats
pub struct ResponseFormatter {
    pretty_json: bool,
}

impl ResponseFormatter {
    pub fn new(pretty_json: bool) -> Self {
        Self { pretty_json }
    }

    /// Format response body based on content type
    pub fn format(&self, body: &str, content_type: Option<&str>) -> Result<String> {
        if self.pretty_json && is_json_content(content_type) {
            let value: Value = serde_json::from_str(body)?;
            Ok(serde_json::to_string_pretty(&value)?)
        } else {
            Ok(body.to_string())
        }
    }
}

fn is_json_content(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.contains("application/json") || ct.contains("+json"))
        .unwrap_or(false)
}

/// Render the status line and headers the way they came off the wire
pub fn format_head(version: Version, status: StatusCode, headers: &HeaderMap) -> String {
    let mut head = format!("{:?} {}\r\n", version, status);
    for (name, value) in headers {
        head.push_str(&format!(
            "{}: {}\r\n",
            name,
            value.to_str().unwrap_or("<non-utf8>")
        ));
    }
    head.push_str("\r\n");
    head
}
