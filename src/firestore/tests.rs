use super::FirebaseFirestore;
use httpmock::Method::{DELETE, GET, PATCH, POST};
use httpmock::MockServer;
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    name: String,
    age: i64,
}

fn test_store(server: &MockServer) -> FirebaseFirestore {
    let client = ClientBuilder::new(Client::new()).build();
    FirebaseFirestore::new_with_client(
        client,
        server.url("/v1/projects/p/databases/(default)/documents"),
    )
}

#[tokio::test]
async fn get_decodes_typed_fields() {
    let server = MockServer::start();
    let db = test_store(&server);

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/projects/p/databases/(default)/documents/users/alice");
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/users/alice",
            "fields": {
                "name": { "stringValue": "Alice" },
                "age": { "integerValue": "30" }
            },
            "createTime": "2021-01-01T00:00:00Z",
            "updateTime": "2021-01-01T00:00:00Z"
        }));
    });

    let user: Option<User> = db.doc("users/alice").get().await.unwrap();
    assert_eq!(
        user,
        Some(User {
            name: "Alice".to_string(),
            age: 30
        })
    );
    mock.assert();
}

#[tokio::test]
async fn get_missing_document_is_none() {
    let server = MockServer::start();
    let db = test_store(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/v1/projects/p/databases/(default)/documents/users/ghost");
        then.status(404).json_body(json!({
            "error": { "code": 404, "message": "Document not found", "status": "NOT_FOUND" }
        }));
    });

    let user: Option<User> = db.doc("users/ghost").get().await.unwrap();
    assert_eq!(user, None);
}

#[tokio::test]
async fn update_patches_encoded_fields() {
    let server = MockServer::start();
    let db = test_store(&server);

    let mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/v1/projects/p/databases/(default)/documents/users/alice")
            .json_body(json!({
                "fields": {
                    "name": { "stringValue": "Alice" },
                    "age": { "integerValue": "31" }
                }
            }));
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/users/alice",
            "fields": {},
            "updateTime": "2021-01-01T00:00:01Z"
        }));
    });

    db.doc("users/alice")
        .update(
            &User {
                name: "Alice".to_string(),
                age: 31,
            },
            None,
        )
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn update_with_mask_sends_field_paths() {
    let server = MockServer::start();
    let db = test_store(&server);

    let mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/v1/projects/p/databases/(default)/documents/users/alice")
            .query_param("updateMask.fieldPaths", "age");
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/users/alice",
            "fields": {}
        }));
    });

    db.doc("users/alice")
        .update(&json!({ "age": 31 }), Some(vec!["age".to_string()]))
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn add_returns_server_assigned_document() {
    let server = MockServer::start();
    let db = test_store(&server);

    server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/p/databases/(default)/documents/actionTemplates");
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/actionTemplates/abc123",
            "fields": { "name": { "stringValue": "copy users" } },
            "createTime": "2021-01-01T00:00:00Z",
            "updateTime": "2021-01-01T00:00:00Z"
        }));
    });

    let doc = db
        .collection("actionTemplates")
        .add(&json!({ "name": "copy users" }))
        .await
        .unwrap();
    assert_eq!(doc.id(), "abc123");
}

#[tokio::test]
async fn delete_targets_one_document() {
    let server = MockServer::start();
    let db = test_store(&server);

    let mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/v1/projects/p/databases/(default)/documents/actionTemplates/abc123");
        then.status(200).json_body(json!({}));
    });

    db.doc("actionTemplates/abc123").delete().await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn api_error_surfaces_status_and_body() {
    let server = MockServer::start();
    let db = test_store(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/v1/projects/p/databases/(default)/documents/users/alice");
        then.status(403).json_body(json!({
            "error": { "code": 403, "message": "Missing permission", "status": "PERMISSION_DENIED" }
        }));
    });

    let err = db.doc("users/alice").get::<User>().await.unwrap_err();
    assert!(err.to_string().contains("403"));
}
