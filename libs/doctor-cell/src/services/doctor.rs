use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_api::ApiClient;
use shared_models::error::ApiError;

use crate::models::{CreateDoctorRequest, Doctor, UpdateDoctorRequest};

/// Client for the doctors resource.
pub struct DoctorService {
    api: Arc<ApiClient>,
}

impl DoctorService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, auth_token: &str) -> Result<Vec<Doctor>, ApiError> {
        debug!("Listing doctors");
        self.api
            .request(Method::GET, "/doctors", Some(auth_token), None)
            .await
    }

    pub async fn get(&self, doctor_id: Uuid, auth_token: &str) -> Result<Doctor, ApiError> {
        debug!("Fetching doctor: {}", doctor_id);
        let path = format!("/doctors/{}", doctor_id);
        self.api
            .request(Method::GET, &path, Some(auth_token), None)
            .await
    }

    pub async fn create(
        &self,
        request: CreateDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor, ApiError> {
        debug!("Creating doctor profile for {}", request.email);

        let body = json!({
            "first_name": request.first_name,
            "last_name": request.last_name,
            "email": request.email,
            "phone_number": request.phone_number,
            "document": request.document,
            "specialty": request.specialty,
        });

        self.api
            .request(Method::POST, "/doctors", Some(auth_token), Some(body))
            .await
    }

    pub async fn update(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor, ApiError> {
        debug!("Updating doctor: {}", doctor_id);

        let mut update_data = serde_json::Map::new();
        if let Some(first_name) = request.first_name {
            update_data.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = request.last_name {
            update_data.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(phone_number) = request.phone_number {
            update_data.insert("phone_number".to_string(), json!(phone_number));
        }
        if let Some(document) = request.document {
            update_data.insert("document".to_string(), json!(document));
        }
        if let Some(specialty) = request.specialty {
            update_data.insert("specialty".to_string(), json!(specialty));
        }

        let path = format!("/doctors/{}", doctor_id);
        self.api
            .request(
                Method::PUT,
                &path,
                Some(auth_token),
                Some(serde_json::Value::Object(update_data)),
            )
            .await
    }

    pub async fn delete(&self, doctor_id: Uuid, auth_token: &str) -> Result<(), ApiError> {
        debug!("Deleting doctor: {}", doctor_id);
        let path = format!("/doctors/{}", doctor_id);
        self.api
            .request_no_content(Method::DELETE, &path, Some(auth_token), None)
            .await
    }
}
