//! Upstream request descriptions.

use std::fmt;

use serde_json::Value;
use url::form_urlencoded;

use crate::dedup::DedupKey;

const REFRESH_PARAM: &str = "refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request against a same-origin `/api/*` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Path plus encoded query string.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{}?{}", self.path, query)
    }

    pub fn dedup_key(&self) -> DedupKey {
        let body = self.body.as_ref().map(Value::to_string);
        DedupKey::new(self.method.as_str(), &self.url(), body.as_deref())
    }

    pub fn is_refresh(&self) -> bool {
        self.query
            .iter()
            .any(|(name, value)| name == REFRESH_PARAM && value == "true")
    }

    /// Copy of this request that asks the upstream to bypass its own cache.
    pub fn with_refresh(&self) -> Self {
        if self.is_refresh() {
            return self.clone();
        }
        self.clone().param(REFRESH_PARAM, true)
    }
}
