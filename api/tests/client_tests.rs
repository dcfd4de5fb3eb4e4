//! HTTP-level tests for `AccessApiClient` against a mock server

use folder_access_api::{
    AccessApi, AccessApiClient, ApiError, EmployeeId, FolderId, GrantAccess, RequestId,
    RequestStatus, StaticCredential, GRANT_CONFIRMATION,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AccessApiClient {
    AccessApiClient::new(server.uri(), Arc::new(StaticCredential::new("secret")))
}

#[tokio::test]
async fn test_list_access_requests_sends_bearer_and_parses_folders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/access/get-requests"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "folders": [
                {
                    "id": "F1",
                    "name": "Finance",
                    "accessRequests": [{
                        "requestId": "r1",
                        "employee": {"_id": "E1", "username": "ada", "email": "ada@example.com"},
                        "status": "pending",
                        "reason": "month end",
                        "createdAt": "2025-02-01T09:30:00Z"
                    }]
                },
                {"id": "F2", "name": "Legal"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let folders = client_for(&server)
        .list_access_requests()
        .await
        .unwrap_or_else(|e| panic!("request should succeed: {e}"));

    assert_eq!(folders.len(), 2);
    assert_eq!(folders[0].id, FolderId::new("F1"));
    assert_eq!(folders[0].access_requests[0].request_id, RequestId::new("r1"));
    assert!(folders[1].access_requests.is_empty());
}

#[tokio::test]
async fn test_missing_folders_key_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/access/get-requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let folders = client_for(&server).list_access_requests().await;
    assert_eq!(folders, Ok(Vec::new()));
}

#[tokio::test]
async fn test_list_employees_and_folders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "employees": [{"_id": "E3", "username": "grace", "email": "grace@example.com"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file/getAllFolders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "folders": [{"_id": "F2", "name": "Audit"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let employees = client.list_employees().await.unwrap_or_default();
    let folders = client.list_folders().await.unwrap_or_default();

    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].id, EmployeeId::new("E3"));
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].name, "Audit");
}

#[tokio::test]
async fn test_update_request_status_puts_status_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/access/update-request/r1"))
        .and(body_json(json!({"status": "approved"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .update_request_status(RequestId::new("r1"), RequestStatus::Approved)
        .await;

    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn test_delete_not_found_extracts_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/access/access-requests/r1"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Request not found"})),
        )
        .mount(&server)
        .await;

    let result = client_for(&server).delete_request(RequestId::new("r1")).await;

    assert_eq!(
        result,
        Err(ApiError::Remote {
            status: 404,
            message: Some("Request not found".to_string()),
            reason: Some("Not Found".to_string()),
        })
    );
}

#[tokio::test]
async fn test_grant_access_returns_raw_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/access/GiveAccess"))
        .and(body_json(json!({"folderId": "F2", "employeeId": "E3", "reason": "audit"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"msg": GRANT_CONFIRMATION})))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .grant_access(GrantAccess {
            folder_id: FolderId::new("F2"),
            employee_id: EmployeeId::new("E3"),
            reason: "audit".to_string(),
        })
        .await
        .unwrap_or_default();

    assert!(response.is_confirmed());
}

#[tokio::test]
async fn test_grant_access_non_json_body_is_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/access/GiveAccess"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .grant_access(GrantAccess {
            folder_id: FolderId::new("F2"),
            employee_id: EmployeeId::new("E3"),
            reason: "audit".to_string(),
        })
        .await;

    assert!(matches!(result, Err(ApiError::ResponseParseFailed(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_request_failure() {
    let client = AccessApiClient::new("http://127.0.0.1:9", Arc::new(StaticCredential::new("t")));

    let result = client.list_employees().await;

    assert!(matches!(result, Err(ApiError::RequestFailed(_))));
}
