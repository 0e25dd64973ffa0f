//! HTTP authentication utilities

use crate::error::{Result, XreqError};
use base64::Engine;

/// Credentials attached to a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    Basic { username: String, password: String },
    Bearer(String),
}

impl Auth {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(token.into())
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        match self {
            Auth::Basic { username, password } => {
                let credentials = format!("{}:{}", username, password);
                let encoded =
                    base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
                format!("Basic {}", encoded)
            }
            Auth::Bearer(token) => format!("Bearer {}", token),
        }
    }

    /// Parse user:password format into basic credentials
    pub fn parse_user_pass(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(XreqError::Auth("Empty user:password value".to_string()));
        }
        match input.split_once(':') {
            Some((user, pass)) => Ok(Auth::basic(user, pass)),
            None => Ok(Auth::basic(input, "")),
        }
    }
}
