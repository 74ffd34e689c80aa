use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Observations/prescription pair attached to an appointment. One-to-one:
/// created on the first save, updated on every save after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub observations: String,
    pub prescription: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveClinicalRecordRequest {
    pub observations: String,
    pub prescription: String,
}
