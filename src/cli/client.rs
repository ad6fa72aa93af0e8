use anyhow::Context;
use reqwest::{Method, StatusCode};
use serde_json::Value;

/// Thin JSON client for the MatBook REST API
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

/// Non-2xx response from the server
#[derive(Debug, thiserror::Error)]
#[error("{status}: {message}")]
pub struct RemoteError {
    pub status: StatusCode,
    pub message: String,
    pub body: Value,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        self.send(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<Value> {
        self.send(Method::DELETE, path, &[], None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> anyhow::Result<Value> {
        let url = self.url(path);
        let mut request = self.http.request(method.clone(), &url).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("{} {} failed", method, url))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .with_context(|| format!("{} {} returned a non-JSON body", method, url))?;

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("request failed")
                .to_string();
            return Err(RemoteError {
                status,
                message,
                body,
            }
            .into());
        }
        Ok(body)
    }
}
