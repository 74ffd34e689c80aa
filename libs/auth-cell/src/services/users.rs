use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_api::ApiClient;
use shared_models::error::ApiError;

use crate::models::{CreateUserRequest, UpdateUserRequest, UserAccount};

/// Client for the users resource (account administration).
pub struct UserService {
    api: Arc<ApiClient>,
}

impl UserService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, auth_token: &str) -> Result<Vec<UserAccount>, ApiError> {
        debug!("Listing user accounts");
        self.api
            .request(Method::GET, "/users", Some(auth_token), None)
            .await
    }

    pub async fn get(&self, user_id: Uuid, auth_token: &str) -> Result<UserAccount, ApiError> {
        debug!("Fetching user account: {}", user_id);
        let path = format!("/users/{}", user_id);
        self.api
            .request(Method::GET, &path, Some(auth_token), None)
            .await
    }

    pub async fn create(
        &self,
        request: CreateUserRequest,
        auth_token: &str,
    ) -> Result<UserAccount, ApiError> {
        debug!("Creating user account for {}", request.email);

        let body = json!({
            "name": request.name,
            "email": request.email,
            "password": request.password,
            "role": request.role,
        });

        self.api
            .request(Method::POST, "/users", Some(auth_token), Some(body))
            .await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
        auth_token: &str,
    ) -> Result<UserAccount, ApiError> {
        debug!("Updating user account: {}", user_id);

        let mut update_data = serde_json::Map::new();
        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(password) = request.password {
            update_data.insert("password".to_string(), json!(password));
        }
        if let Some(role) = request.role {
            update_data.insert("role".to_string(), json!(role));
        }

        let path = format!("/users/{}", user_id);
        self.api
            .request(
                Method::PUT,
                &path,
                Some(auth_token),
                Some(serde_json::Value::Object(update_data)),
            )
            .await
    }

    pub async fn delete(&self, user_id: Uuid, auth_token: &str) -> Result<(), ApiError> {
        debug!("Deleting user account: {}", user_id);
        let path = format!("/users/{}", user_id);
        self.api
            .request_no_content(Method::DELETE, &path, Some(auth_token), None)
            .await
    }
}
