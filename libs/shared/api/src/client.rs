use reqwest::{header::CONTENT_TYPE, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::ApiError;

/// The one HTTP client every resource module goes through. Attaches the
/// bearer token, sends JSON, and normalizes every failure into `ApiError`.
/// Calls are one-shot: no retries, no idempotency keys, no batching.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
        }
    }

    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform a request and deserialize the JSON response body.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, auth_token, body).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Perform a request whose response body is irrelevant (deletes,
    /// transition triggers answered with 204).
    pub async fn request_no_content(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(), ApiError> {
        self.send(method, path, auth_token, body).await?;
        Ok(())
    }

    /// Fetch a binary endpoint (the report export returns a PDF blob).
    pub async fn download(&self, path: &str, auth_token: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.send(Method::GET, path, Some(auth_token), None).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = auth_token {
            req = req.bearer_auth(token);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);
            return Err(normalize_error(status, &error_text));
        }

        Ok(response)
    }
}

/// Turn a non-2xx response into the uniform error contract: use the
/// backend-provided message when the body carries one, otherwise fall back
/// to a status-derived string.
fn normalize_error(status: StatusCode, body: &str) -> ApiError {
    let backend_message = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    let message = backend_message.unwrap_or_else(|| match status.canonical_reason() {
        Some(reason) => format!("Request failed: {} {}", status.as_u16(), reason),
        None => format!("Request failed: {}", status.as_u16()),
    });

    ApiError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_message_is_used_verbatim() {
        let err = normalize_error(StatusCode::BAD_REQUEST, r#"{"message": "X"}"#);
        assert_eq!(err.to_string(), "X");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn error_key_is_accepted_as_fallback_field() {
        let err = normalize_error(StatusCode::CONFLICT, r#"{"error": "slot taken"}"#);
        assert_eq!(err.to_string(), "slot taken");
    }

    #[test]
    fn unparseable_body_falls_back_to_status_string() {
        let err = normalize_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>");
        assert_eq!(err.to_string(), "Request failed: 500 Internal Server Error");
    }

    #[test]
    fn empty_body_falls_back_to_status_string() {
        let err = normalize_error(StatusCode::NOT_FOUND, "");
        assert_eq!(err.to_string(), "Request failed: 404 Not Found");
    }
}
