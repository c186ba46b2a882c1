//! HTTP client for the timer API, used by the admin console and the widget.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::models::timer::{CreateTimerRequest, Timer, UpdateTimerRequest};

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// The API answered with a non-2xx status.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },
    /// The request could not complete, or the response could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct TimerApiClient {
    http: Client,
    base_url: String,
    session_token: Option<String>,
}

impl TimerApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            session_token: None,
        }
    }

    /// Attach the shop session token sent as `Authorization: Bearer` on admin calls.
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn list_timers(&self) -> Result<Vec<Timer>, ClientError> {
        let response = self.authorized(self.http.get(self.url("/api/timers"))).send().await?;
        read_json(response, "Failed to fetch timers").await
    }

    pub async fn get_timer(&self, id: Uuid) -> Result<Timer, ClientError> {
        let response = self
            .authorized(self.http.get(self.url(&format!("/api/timers/{id}"))))
            .send()
            .await?;
        read_json(response, "Failed to fetch timer").await
    }

    pub async fn create_timer(&self, req: &CreateTimerRequest) -> Result<Timer, ClientError> {
        let response = self
            .authorized(self.http.post(self.url("/api/timers")))
            .json(req)
            .send()
            .await?;
        read_json(response, "Failed to create timer").await
    }

    pub async fn update_timer(&self, id: Uuid, req: &UpdateTimerRequest) -> Result<Timer, ClientError> {
        let response = self
            .authorized(self.http.put(self.url(&format!("/api/timers/{id}"))))
            .json(req)
            .send()
            .await?;
        read_json(response, "Failed to update timer").await
    }

    pub async fn delete_timer(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .authorized(self.http.delete(self.url(&format!("/api/timers/{id}"))))
            .send()
            .await?;
        ensure_success(response, "Failed to delete timer").await?;
        Ok(())
    }

    /// Unauthenticated storefront lookup.
    pub async fn public_timers(&self, shop: &str, product_id: Option<&str>) -> Result<Vec<Timer>, ClientError> {
        let mut query = vec![("shop", shop)];
        if let Some(product_id) = product_id {
            query.push(("productId", product_id));
        }
        let response = self
            .http
            .get(self.url("/api/public/timers"))
            .query(&query)
            .send()
            .await?;
        read_json(response, "Failed to fetch timers").await
    }
}

/// Turns a non-2xx response into `RequestFailed`, preferring the server's `{error}` message.
async fn ensure_success(response: Response, fallback: &str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_owned))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_owned());
    tracing::warn!("API error {}: {}", status, message);

    Err(ClientError::RequestFailed {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, ClientError> {
    let response = ensure_success(response, fallback).await?;
    Ok(response.json::<T>().await?)
}
