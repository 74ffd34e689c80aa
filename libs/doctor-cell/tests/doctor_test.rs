use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::{CreateDoctorRequest, UpdateDoctorRequest};
use doctor_cell::services::doctor::DoctorService;
use shared_api::ApiClient;
use shared_utils::test_utils::MockBackendResponses;

fn service(mock_server: &MockServer) -> DoctorService {
    DoctorService::new(Arc::new(ApiClient::from_base_url(mock_server.uri())))
}

#[tokio::test]
async fn list_carries_the_bearer_token() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/doctors"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::doctor_response(&id.to_string(), "g@example.com", "Greg", "Cardiology")
        ])))
        .mount(&mock_server)
        .await;

    let doctors = service(&mock_server).list("tok").await.unwrap();

    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].id, id);
    assert_eq!(doctors[0].full_name(), "Greg House");
    assert_eq!(doctors[0].specialty, "Cardiology");
}

#[tokio::test]
async fn get_fetches_one_doctor_by_id() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/doctors/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::doctor_response(&id.to_string(), "g@example.com", "Greg", "Cardiology"),
        ))
        .mount(&mock_server)
        .await;

    let doctor = service(&mock_server).get(id, "tok").await.unwrap();
    assert_eq!(doctor.id, id);
}

#[tokio::test]
async fn missing_doctor_surfaces_backend_message() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/doctors/{}", id)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Doctor not found"})))
        .mount(&mock_server)
        .await;

    let err = service(&mock_server).get(id, "tok").await.unwrap_err();
    assert_eq!(err.to_string(), "Doctor not found");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn create_posts_the_full_profile() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/doctors"))
        .and(body_json(json!({
            "first_name": "Greg",
            "last_name": "House",
            "email": "g@example.com",
            "phone_number": "555-0101",
            "document": "MED-4421",
            "specialty": "Cardiology"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockBackendResponses::doctor_response(&id.to_string(), "g@example.com", "Greg", "Cardiology"),
        ))
        .mount(&mock_server)
        .await;

    let created = service(&mock_server)
        .create(
            CreateDoctorRequest {
                first_name: "Greg".to_string(),
                last_name: "House".to_string(),
                email: "g@example.com".to_string(),
                phone_number: Some("555-0101".to_string()),
                document: Some("MED-4421".to_string()),
                specialty: "Cardiology".to_string(),
            },
            "tok",
        )
        .await
        .unwrap();

    assert_eq!(created.id, id);
}

#[tokio::test]
async fn update_sends_only_the_changed_fields() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("PUT"))
        .and(path(format!("/doctors/{}", id)))
        .and(body_json(json!({ "specialty": "Neurology" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::doctor_response(&id.to_string(), "g@example.com", "Greg", "Neurology"),
        ))
        .mount(&mock_server)
        .await;

    let updated = service(&mock_server)
        .update(
            id,
            UpdateDoctorRequest {
                specialty: Some("Neurology".to_string()),
                ..Default::default()
            },
            "tok",
        )
        .await
        .unwrap();

    assert_eq!(updated.specialty, "Neurology");
}

#[tokio::test]
async fn delete_is_one_shot() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path(format!("/doctors/{}", id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    service(&mock_server).delete(id, "tok").await.unwrap();
}
