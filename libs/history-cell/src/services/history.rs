use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_api::ApiClient;
use shared_models::error::ApiError;

use crate::models::{ClinicalRecord, SaveClinicalRecordRequest};

/// Client for the clinical-history resource linked to appointments.
pub struct HistoryService {
    api: Arc<ApiClient>,
}

impl HistoryService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Fetch the record attached to an appointment. An appointment without
    /// one answers 404, which is a value here, not a failure.
    pub async fn get_for_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<ClinicalRecord>, ApiError> {
        debug!("Fetching clinical record for appointment {}", appointment_id);

        let path = format!("/appointments/{}/history", appointment_id);
        match self
            .api
            .request::<ClinicalRecord>(Method::GET, &path, Some(auth_token), None)
            .await
        {
            Ok(record) => Ok(Some(record)),
            Err(ApiError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create the record on first save, update it on every save after that.
    pub async fn save(
        &self,
        appointment_id: Uuid,
        request: SaveClinicalRecordRequest,
        auth_token: &str,
    ) -> Result<ClinicalRecord, ApiError> {
        let existing = self.get_for_appointment(appointment_id, auth_token).await?;

        let body = json!({
            "observations": request.observations,
            "prescription": request.prescription,
        });

        let path = format!("/appointments/{}/history", appointment_id);
        let method = if existing.is_some() {
            Method::PUT
        } else {
            Method::POST
        };

        let record: ClinicalRecord = self
            .api
            .request(method, &path, Some(auth_token), Some(body))
            .await?;

        info!(
            "Clinical record {} saved for appointment {}",
            record.id, appointment_id
        );
        Ok(record)
    }

    /// Fetch the appointment report from the one binary endpoint. The
    /// caller decides where the PDF bytes go.
    pub async fn download_report(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<u8>, ApiError> {
        debug!("Downloading report for appointment {}", appointment_id);

        let path = format!("/appointments/{}/report", appointment_id);
        self.api.download(&path, auth_token).await
    }
}
