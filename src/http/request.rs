//! Per-call request options

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::config::{HttpMethod, MethodPolicy, ProxyConfig};
use crate::error::{Result, XreqError};
use crate::http::auth::Auth;
use crate::http::headers::HeaderSet;

/// Request body data
#[derive(Debug, Clone, PartialEq)]
pub enum RequestData {
    /// Sent as `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// Sent verbatim
    Text(String),
    /// Serialized as `application/json`
    Json(Value),
}

impl RequestData {
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RequestData::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Empty data counts as absent when choosing the verb
    pub fn is_empty(&self) -> bool {
        match self {
            RequestData::Form(pairs) => pairs.is_empty(),
            RequestData::Text(text) => text.is_empty(),
            RequestData::Json(Value::Null) => true,
            RequestData::Json(Value::Object(map)) => map.is_empty(),
            RequestData::Json(Value::Array(items)) => items.is_empty(),
            RequestData::Json(_) => false,
        }
    }
}

/// A file uploaded as one multipart part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub contents: Vec<u8>,
    pub mime: Option<String>,
}

impl FilePart {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            contents: contents.into(),
            mime: None,
        }
    }

    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk, naming the part after the file
    pub async fn from_path(field: impl Into<String>, path: &Path) -> Result<Self> {
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                XreqError::Config(format!("Upload path has no file name: {:?}", path))
            })?;
        Ok(Self::new(field, file_name, contents))
    }

    fn into_part(self) -> Result<(String, Part)> {
        let mut part = Part::bytes(self.contents).file_name(self.file_name);
        if let Some(mime) = &self.mime {
            part = part.mime_str(mime)?;
        }
        Ok((self.field, part))
    }
}

/// Build a multipart body from form fields and files
pub(crate) fn multipart_form(data: Option<&RequestData>, files: Vec<FilePart>) -> Result<Form> {
    let mut form = Form::new();
    match data {
        Some(RequestData::Form(pairs)) => {
            for (name, value) in pairs {
                form = form.text(name.clone(), value.clone());
            }
        }
        Some(RequestData::Text(_)) | Some(RequestData::Json(_)) => {
            return Err(XreqError::Unsupported(
                "file uploads only combine with form data".to_string(),
            ));
        }
        None => {}
    }
    for file in files {
        let (field, part) = file.into_part()?;
        form = form.part(field, part);
    }
    Ok(form)
}

/// Optional overrides for a single call. Unset fields fall back to client state.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<HttpMethod>,
    pub headers: Option<HeaderSet>,
    pub files: Vec<FilePart>,
    pub data: Option<RequestData>,
    pub params: Vec<(String, String)>,
    pub auth: Option<Auth>,
    pub cookies: Option<String>,
    pub verify: Option<bool>,
    pub proxy: Option<ProxyConfig>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn headers(mut self, headers: HeaderSet) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn file(mut self, file: FilePart) -> Self {
        self.files.push(file);
        self
    }

    pub fn data(mut self, data: RequestData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn cookies(mut self, cookies: impl Into<String>) -> Self {
        self.cookies = Some(cookies.into());
        self
    }

    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = Some(verify);
        self
    }

    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }
}

/// Choose the verb for a call.
///
/// Without body data the call is a GET, with it a POST. Under
/// [`MethodPolicy::InferFromData`] the requested method plays no part.
pub fn select_method(
    data: Option<&RequestData>,
    requested: Option<HttpMethod>,
    policy: MethodPolicy,
) -> HttpMethod {
    if let (MethodPolicy::Explicit, Some(method)) = (policy, requested) {
        return method;
    }
    match data {
        Some(data) if !data.is_empty() => HttpMethod::Post,
        _ => HttpMethod::Get,
    }
}
