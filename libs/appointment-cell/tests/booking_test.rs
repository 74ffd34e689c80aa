use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::BookAppointmentRequest;
use appointment_cell::services::booking::BookingService;
use shared_api::ApiClient;
use shared_utils::test_utils::MockBackendResponses;

fn service(mock_server: &MockServer) -> BookingService {
    BookingService::new(Arc::new(ApiClient::from_base_url(mock_server.uri())))
}

#[tokio::test]
async fn prepare_form_joins_doctors_and_patient() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::doctor_response(&doctor_id.to_string(), "g@example.com", "Greg", "Cardiology")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/patients/{}", patient_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::patient_response(&patient_id.to_string(), "ana@example.com", "Ana"),
        ))
        .mount(&mock_server)
        .await;

    let form = service(&mock_server)
        .prepare_form(patient_id, "tok")
        .await
        .unwrap();

    assert_eq!(form.doctors.len(), 1);
    assert_eq!(form.patient.id, patient_id);
}

#[tokio::test]
async fn prepare_form_fails_when_any_fetch_fails() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();

    // Doctors load fine, the patient fetch does not.
    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/patients/{}", patient_id)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Patient not found"})))
        .mount(&mock_server)
        .await;

    let err = service(&mock_server)
        .prepare_form(patient_id, "tok")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Patient not found");
}

#[tokio::test]
async fn book_chains_creation_and_agenda_refresh() {
    let mock_server = MockServer::start().await;
    let appointment_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockBackendResponses::appointment_response(
                &appointment_id.to_string(),
                &patient_id.to_string(),
                &doctor_id.to_string(),
                "SCHEDULED",
            ),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .and(query_param("patient_id", patient_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::appointment_response(
                &appointment_id.to_string(),
                &patient_id.to_string(),
                &doctor_id.to_string(),
                "SCHEDULED",
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = service(&mock_server)
        .book(
            BookAppointmentRequest {
                patient_id,
                doctor_id,
                scheduled_at: Utc.with_ymd_and_hms(2025, 6, 1, 14, 30, 0).unwrap(),
                reason: "Routine checkup".to_string(),
            },
            "tok",
        )
        .await
        .unwrap();

    assert_eq!(outcome.appointment.id, appointment_id);
    assert_eq!(outcome.agenda.len(), 1);
}

#[tokio::test]
async fn failed_booking_stops_the_chain() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Slot already taken"})),
        )
        .mount(&mock_server)
        .await;

    // No agenda refresh may happen after a failed creation.
    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = service(&mock_server)
        .book(
            BookAppointmentRequest {
                patient_id,
                doctor_id: Uuid::new_v4(),
                scheduled_at: Utc.with_ymd_and_hms(2025, 6, 1, 14, 30, 0).unwrap(),
                reason: "Routine checkup".to_string(),
            },
            "tok",
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Slot already taken");
}
