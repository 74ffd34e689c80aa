use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub api_base_url: String,
    pub session_file: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            session_file: std::env::temp_dir()
                .join("clinic-session-test.json")
                .to_string_lossy()
                .to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            session_file: self.session_file.clone(),
        }
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
    pub name: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "paciente".to_string(),
            name: "Test User".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
            name: "Test User".to_string(),
        }
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn medico(email: &str) -> Self {
        Self::new(email, "medico")
    }

    pub fn paciente(email: &str) -> Self {
        Self::new(email, "paciente")
    }
}

pub struct TokenTestUtils;

impl TokenTestUtils {
    /// Build a structurally valid JWT for tests. The signature segment is a
    /// placeholder: the client under test never verifies it.
    pub fn create_test_token(user: &TestUser, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        Self::assemble(payload)
    }

    pub fn create_expired_token(user: &TestUser) -> String {
        let now = Utc::now();

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": (now - Duration::hours(2)).timestamp(),
            "exp": (now - Duration::hours(1)).timestamp()
        });

        Self::assemble(payload)
    }

    pub fn create_token_without_exp(user: &TestUser) -> String {
        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role
        });

        Self::assemble(payload)
    }

    fn assemble(payload: Value) -> String {
        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let header_encoded = URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = URL_SAFE_NO_PAD.encode(payload.to_string());
        let signature_encoded = URL_SAFE_NO_PAD.encode(b"test-signature");

        format!("{}.{}.{}", header_encoded, payload_encoded, signature_encoded)
    }
}

/// Canned backend payloads shared by the cell test suites.
pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn login_response(user: &TestUser, token: &str) -> Value {
        json!({
            "token": token,
            "role": user.role,
            "user_id": user.id,
            "name": user.name,
            "email": user.email,
            "phone": "555-0100",
            "document": "12345678",
            "specialty": if user.role == "medico" { json!("Cardiology") } else { Value::Null }
        })
    }

    pub fn doctor_response(id: &str, email: &str, first_name: &str, specialty: &str) -> Value {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": "House",
            "email": email,
            "phone_number": "555-0101",
            "document": "MED-4421",
            "specialty": specialty,
            "created_at": "2025-01-15T10:00:00Z",
            "updated_at": "2025-01-15T10:00:00Z"
        })
    }

    pub fn patient_response(id: &str, email: &str, first_name: &str) -> Value {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": "Gomez",
            "email": email,
            "phone_number": "555-0102",
            "document": "87654321",
            "date_of_birth": "1990-04-12",
            "created_at": "2025-01-15T10:00:00Z",
            "updated_at": "2025-01-15T10:00:00Z"
        })
    }

    pub fn appointment_response(id: &str, patient_id: &str, doctor_id: &str, status: &str) -> Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "scheduled_at": "2025-06-01T14:30:00Z",
            "status": status,
            "reason": "Routine checkup",
            "clinical_record_id": Value::Null,
            "created_at": "2025-05-20T09:00:00Z",
            "updated_at": "2025-05-20T09:00:00Z"
        })
    }

    pub fn clinical_record_response(id: &str, appointment_id: &str) -> Value {
        json!({
            "id": id,
            "appointment_id": appointment_id,
            "observations": "Stable vitals",
            "prescription": "Paracetamol 500mg",
            "created_at": "2025-06-01T15:00:00Z",
            "updated_at": "2025-06-01T15:00:00Z"
        })
    }

    pub fn user_response(id: &str, email: &str, name: &str, role: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "email": email,
            "role": role
        })
    }
}
