use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::models::{CreateUserRequest, UpdateUserRequest};
use auth_cell::services::users::UserService;
use shared_api::ApiClient;
use shared_models::auth::Role;
use shared_utils::test_utils::MockBackendResponses;

fn service(mock_server: &MockServer) -> UserService {
    UserService::new(Arc::new(ApiClient::from_base_url(mock_server.uri())))
}

#[tokio::test]
async fn list_returns_all_accounts() {
    let mock_server = MockServer::start().await;
    let id_a = Uuid::new_v4();
    let id_b = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::user_response(&id_a.to_string(), "a@example.com", "Ann", "ADMIN"),
            MockBackendResponses::user_response(&id_b.to_string(), "b@example.com", "Bob", "MEDICO"),
        ])))
        .mount(&mock_server)
        .await;

    let users = service(&mock_server).list("token").await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].role, Role::Admin);
    assert_eq!(users[1].role, Role::Medico);
}

#[tokio::test]
async fn create_posts_the_new_account() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({
            "name": "Cara",
            "email": "cara@example.com",
            "password": "pw",
            "role": "PACIENTE"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockBackendResponses::user_response(&id.to_string(), "cara@example.com", "Cara", "PACIENTE"),
        ))
        .mount(&mock_server)
        .await;

    let created = service(&mock_server)
        .create(
            CreateUserRequest {
                name: "Cara".to_string(),
                email: "cara@example.com".to_string(),
                password: "pw".to_string(),
                role: Role::Paciente,
            },
            "token",
        )
        .await
        .unwrap();

    assert_eq!(created.id, id);
    assert_eq!(created.role, Role::Paciente);
}

#[tokio::test]
async fn update_sends_only_the_changed_fields() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("PUT"))
        .and(path(format!("/users/{}", id)))
        .and(body_json(json!({ "name": "Renamed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::user_response(&id.to_string(), "a@example.com", "Renamed", "ADMIN"),
        ))
        .mount(&mock_server)
        .await;

    let updated = service(&mock_server)
        .update(
            id,
            UpdateUserRequest {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
            "token",
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Renamed");
}

#[tokio::test]
async fn delete_is_a_single_one_shot_call() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path(format!("/users/{}", id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    service(&mock_server).delete(id, "token").await.unwrap();
}
