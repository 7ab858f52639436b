//! Implements the `Gateway` trait against a JSON REST collection endpoint.
//!
//! | Operation | Request                         | Response body        |
//! |-----------|---------------------------------|----------------------|
//! | list      | `GET {base}/expenses`           | array of expenses    |
//! | create    | `POST {base}/expenses`          | the created expense  |
//! | update    | `PUT {base}/expenses/{id}`      | the updated expense  |
//! | delete    | `DELETE {base}/expenses/{id}`   | ignored              |

use crate::api::{Gateway, COLLECTION};
use crate::error::Res;
use crate::model::{Expense, ExpenseDraft};
use anyhow::{anyhow, bail, Context};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::trace;
use url::Url;

/// Talks to the expense collection of a REST server.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base: Url,
    http: reqwest::Client,
}

/// The error bodies servers commonly send back.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    message: Option<String>,
}

impl HttpGateway {
    /// Create an `HttpGateway` for the API rooted at `base`, e.g. `http://localhost:3000/api`.
    pub fn new(mut base: Url) -> Self {
        // Without a trailing slash `Url::join` would replace the last path segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn collection_url(&self) -> Res<Url> {
        self.base
            .join(COLLECTION)
            .with_context(|| format!("Invalid API base URL '{}'", self.base))
    }

    fn item_url(&self, id: &str) -> Res<Url> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("The API base URL '{}' cannot have a path", self.base))?
            .push(id);
        Ok(url)
    }

    /// Sends the request and returns the response if it has a 2xx status, otherwise an error
    /// describing the status and whatever explanation the server gave.
    async fn send(&self, method: Method, url: Url, request: RequestBuilder) -> Res<Response> {
        trace!("{method} {url}");
        let response = request
            .send()
            .await
            .with_context(|| format!("Unable to reach the expense API at {url}"))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());
        let detail = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(ErrorResponse {
                error: Some(detail),
                ..
            })
            | Ok(ErrorResponse {
                message: Some(detail),
                ..
            }) => detail,
            _ => body,
        };
        if detail.trim().is_empty() {
            bail!("{method} {url} failed with status {status}");
        }
        bail!("{method} {url} failed with status {status}: {detail}")
    }

    async fn json<T>(&self, method: Method, url: Url, request: RequestBuilder) -> Res<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method.clone(), url.clone(), request).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("Unable to parse the response to {method} {url}"))
    }
}

#[async_trait::async_trait]
impl Gateway for HttpGateway {
    async fn list(&mut self) -> Res<Vec<Expense>> {
        let url = self.collection_url()?;
        let request = self.http.get(url.clone());
        self.json(Method::GET, url, request).await
    }

    async fn create(&mut self, draft: &ExpenseDraft) -> Res<Expense> {
        let url = self.collection_url()?;
        let request = self.http.post(url.clone()).json(draft);
        self.json(Method::POST, url, request).await
    }

    async fn update(&mut self, expense: &Expense) -> Res<Expense> {
        let url = self.item_url(expense.id())?;
        let request = self.http.put(url.clone()).json(expense);
        self.json(Method::PUT, url, request).await
    }

    async fn delete(&mut self, id: &str) -> Res<()> {
        let url = self.item_url(id)?;
        let request = self.http.delete(url.clone());
        let _ = self.send(Method::DELETE, url, request).await?;
        Ok(())
    }
}
