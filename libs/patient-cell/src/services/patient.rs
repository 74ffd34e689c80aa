use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_api::ApiClient;
use shared_models::error::ApiError;

use crate::models::{CreatePatientRequest, Patient, UpdatePatientRequest};

/// Client for the patients resource.
pub struct PatientService {
    api: Arc<ApiClient>,
}

impl PatientService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, auth_token: &str) -> Result<Vec<Patient>, ApiError> {
        debug!("Listing patients");
        self.api
            .request(Method::GET, "/patients", Some(auth_token), None)
            .await
    }

    pub async fn get(&self, patient_id: Uuid, auth_token: &str) -> Result<Patient, ApiError> {
        debug!("Fetching patient: {}", patient_id);
        let path = format!("/patients/{}", patient_id);
        self.api
            .request(Method::GET, &path, Some(auth_token), None)
            .await
    }

    pub async fn create(
        &self,
        request: CreatePatientRequest,
        auth_token: &str,
    ) -> Result<Patient, ApiError> {
        debug!("Creating patient profile for {}", request.email);

        let body = json!({
            "first_name": request.first_name,
            "last_name": request.last_name,
            "email": request.email,
            "phone_number": request.phone_number,
            "document": request.document,
            "date_of_birth": request.date_of_birth,
        });

        self.api
            .request(Method::POST, "/patients", Some(auth_token), Some(body))
            .await
    }

    pub async fn update(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
        auth_token: &str,
    ) -> Result<Patient, ApiError> {
        debug!("Updating patient: {}", patient_id);

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
        if let Some(date_of_birth) = request.date_of_birth {
            update_data.insert("date_of_birth".to_string(), json!(date_of_birth));
        }

        let path = format!("/patients/{}", patient_id);
        self.api
            .request(
                Method::PUT,
                &path,
                Some(auth_token),
                Some(serde_json::Value::Object(update_data)),
            )
            .await
    }

    pub async fn delete(&self, patient_id: Uuid, auth_token: &str) -> Result<(), ApiError> {
        debug!("Deleting patient: {}", patient_id);
        let path = format!("/patients/{}", patient_id);
        self.api
            .request_no_content(Method::DELETE, &path, Some(auth_token), None)
            .await
    }
}
