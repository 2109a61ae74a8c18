//! HTTP client for the transaction JSON API.

use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Transaction, TransactionData, TransactionId};

/// The environment variable holding the API base URL, e.g. `http://localhost:3000/api`.
pub const API_URL_ENV: &str = "FINANCE_API_URL";

/// The base URL used when [API_URL_ENV] is not set.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";

/// The errors returned by [ApiClient].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Api {
        /// The response status.
        status: StatusCode,
        /// The server's `error` message, or a generic one if the body had none.
        message: String,
    },

    /// The user's input could not be turned into a transaction.
    #[error("{0}")]
    InvalidInput(#[from] crate::Error),
}

/// A client for the transaction API.
///
/// One request per call, no retries or caching.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: HttpClient,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API at `base_url`, e.g. `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();

        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Create a client using the base URL in [API_URL_ENV].
    ///
    /// Logs a warning and falls back to [DEFAULT_API_URL] if the variable is
    /// not set.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(API_URL_ENV).ok())
    }

    /// Create a client from the value of [API_URL_ENV], if it was set.
    fn from_env_value(value: Option<String>) -> Self {
        match value {
            Some(base_url) if !base_url.trim().is_empty() => Self::new(base_url),
            _ => {
                tracing::warn!(
                    "{API_URL_ENV} is not defined in the environment, using {DEFAULT_API_URL}"
                );
                Self::new(DEFAULT_API_URL)
            }
        }
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transactions_url(&self) -> String {
        format!("{}/transactions", self.base_url)
    }

    fn transaction_url(&self, id: &TransactionId) -> String {
        format!("{}/transactions/{id}", self.base_url)
    }

    /// GET /transactions
    ///
    /// # Errors
    /// Returns [ClientError::Api] if the server could not list the transactions.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        let response = self.http_client.get(self.transactions_url()).send().await?;

        Self::parse_response(response, "Failed to fetch transactions").await
    }

    /// GET /transactions/{id}
    ///
    /// # Errors
    /// Returns [ClientError::Api] with status `404 Not Found` if there is no
    /// transaction with `id`.
    pub async fn get_transaction(&self, id: &TransactionId) -> Result<Transaction, ClientError> {
        let response = self.http_client.get(self.transaction_url(id)).send().await?;

        Self::parse_response(response, "Failed to fetch transaction").await
    }

    /// POST /transactions
    ///
    /// # Errors
    /// Returns [ClientError::Api] if the server rejected the transaction.
    pub async fn create_transaction(
        &self,
        data: &TransactionData,
    ) -> Result<Transaction, ClientError> {
        let response = self
            .http_client
            .post(self.transactions_url())
            .json(data)
            .send()
            .await?;

        Self::parse_response(response, "Failed to create transaction").await
    }

    /// PUT /transactions/{id}
    ///
    /// Replaces all fields of the transaction.
    ///
    /// # Errors
    /// Returns [ClientError::Api] if the transaction does not exist or could
    /// not be updated.
    pub async fn update_transaction(
        &self,
        id: &TransactionId,
        data: &TransactionData,
    ) -> Result<Transaction, ClientError> {
        let response = self
            .http_client
            .put(self.transaction_url(id))
            .json(data)
            .send()
            .await?;

        Self::parse_response(response, "Failed to update transaction").await
    }

    /// DELETE /transactions/{id}
    ///
    /// # Errors
    /// Returns [ClientError::Api] if the transaction could not be deleted,
    /// including when it does not exist.
    pub async fn delete_transaction(&self, id: &TransactionId) -> Result<(), ClientError> {
        let response = self
            .http_client
            .delete(self.transaction_url(id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::handle_error_response(response, "Failed to delete transaction").await);
        }

        Ok(())
    }

    async fn parse_response<T: DeserializeOwned>(
        response: Response,
        failure_message: &str,
    ) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(Self::handle_error_response(response, failure_message).await);
        }

        Ok(response.json::<T>().await?)
    }

    /// Use the server's `error` message when the body has one.
    async fn handle_error_response(response: Response, failure_message: &str) -> ClientError {
        let status = response.status();
        let body_text = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<Value>(&body_text)
            .ok()
            .and_then(|body| body.get("error")?.as_str().map(str::to_owned))
            .unwrap_or_else(|| failure_message.to_owned());

        tracing::warn!("API error {status}: {message}");

        ClientError::Api { status, message }
    }
}
