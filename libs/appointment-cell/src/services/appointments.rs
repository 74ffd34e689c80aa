use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_api::ApiClient;
use shared_models::error::ApiError;

use crate::models::{
    Appointment, AppointmentSearchQuery, AppointmentStatus, BookAppointmentRequest,
    UpdateAppointmentRequest,
};

/// Client for the appointments resource. Every call is one-shot; status
/// transitions are sent optimistically and the backend stays authoritative
/// over their legality.
pub struct AppointmentService {
    api: Arc<ApiClient>,
}

impl AppointmentService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, ApiError> {
        info!(
            "Booking appointment for patient {} with doctor {}",
            request.patient_id, request.doctor_id
        );

        let body = json!({
            "patient_id": request.patient_id,
            "doctor_id": request.doctor_id,
            "scheduled_at": request.scheduled_at.to_rfc3339(),
            "reason": request.reason,
        });

        self.api
            .request(Method::POST, "/appointments", Some(auth_token), Some(body))
            .await
    }

    pub async fn get(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, ApiError> {
        debug!("Fetching appointment: {}", appointment_id);
        let path = format!("/appointments/{}", appointment_id);
        self.api
            .request(Method::GET, &path, Some(auth_token), None)
            .await
    }

    pub async fn search(
        &self,
        query: AppointmentSearchQuery,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, ApiError> {
        debug!("Searching appointments with filters: {:?}", query);

        let mut query_parts = Vec::new();

        if let Some(patient_id) = query.patient_id {
            query_parts.push(format!("patient_id={}", patient_id));
        }
        if let Some(doctor_id) = query.doctor_id {
            query_parts.push(format!("doctor_id={}", doctor_id));
        }
        if let Some(status) = query.status {
            query_parts.push(format!("status={}", status));
        }
        if let Some(from_date) = query.from_date {
            let date_str = from_date.to_rfc3339();
            query_parts.push(format!("from={}", urlencoding::encode(&date_str)));
        }
        if let Some(to_date) = query.to_date {
            let date_str = to_date.to_rfc3339();
            query_parts.push(format!("to={}", urlencoding::encode(&date_str)));
        }
        if let Some(limit) = query.limit {
            query_parts.push(format!("limit={}", limit));
        }
        if let Some(offset) = query.offset {
            query_parts.push(format!("offset={}", offset));
        }

        let path = if query_parts.is_empty() {
            "/appointments".to_string()
        } else {
            format!("/appointments?{}", query_parts.join("&"))
        };

        self.api
            .request(Method::GET, &path, Some(auth_token), None)
            .await
    }

    pub async fn for_patient(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, ApiError> {
        self.search(
            AppointmentSearchQuery {
                patient_id: Some(patient_id),
                ..Default::default()
            },
            auth_token,
        )
        .await
    }

    pub async fn for_doctor(
        &self,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, ApiError> {
        self.search(
            AppointmentSearchQuery {
                doctor_id: Some(doctor_id),
                ..Default::default()
            },
            auth_token,
        )
        .await
    }

    pub async fn update(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, ApiError> {
        debug!("Updating appointment: {}", appointment_id);

        let mut update_data = serde_json::Map::new();
        if let Some(scheduled_at) = request.scheduled_at {
            update_data.insert("scheduled_at".to_string(), json!(scheduled_at.to_rfc3339()));
        }
        if let Some(reason) = request.reason {
            update_data.insert("reason".to_string(), json!(reason));
        }
        if let Some(status) = request.status {
            update_data.insert("status".to_string(), json!(status));
        }

        let path = format!("/appointments/{}", appointment_id);
        self.api
            .request(
                Method::PUT,
                &path,
                Some(auth_token),
                Some(serde_json::Value::Object(update_data)),
            )
            .await
    }

    /// Trigger the SCHEDULED → COMPLETED transition.
    pub async fn complete(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, ApiError> {
        let request = UpdateAppointmentRequest {
            status: Some(AppointmentStatus::Completed),
            ..Default::default()
        };

        let appointment = self.update(appointment_id, request, auth_token).await?;
        info!("Appointment {} completed", appointment_id);
        Ok(appointment)
    }

    /// Trigger the SCHEDULED → CANCELED transition.
    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, ApiError> {
        let request = UpdateAppointmentRequest {
            status: Some(AppointmentStatus::Canceled),
            ..Default::default()
        };

        let appointment = self.update(appointment_id, request, auth_token).await?;
        info!("Appointment {} canceled", appointment_id);
        Ok(appointment)
    }
}
