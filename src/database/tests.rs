use super::FirebaseDatabase;
use httpmock::Method::{DELETE, GET, PATCH, PUT};
use httpmock::MockServer;
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use serde_json::json;

fn test_db(server: &MockServer) -> FirebaseDatabase {
    let client = ClientBuilder::new(Client::new()).build();
    FirebaseDatabase::new_with_client(client, server.url(""))
}

#[tokio::test]
async fn get_returns_subtree() {
    let server = MockServer::start();
    let db = test_db(&server);

    let mock = server.mock(|when, then| {
        when.method(GET).path("/environments/prod.json");
        then.status(200)
            .json_body(json!({ "name": "prod", "locked": true }));
    });

    let value = db.reference("environments/prod").get().await.unwrap();
    assert_eq!(value, json!({ "name": "prod", "locked": true }));
    mock.assert();
}

#[tokio::test]
async fn missing_path_reads_as_null() {
    let server = MockServer::start();
    let db = test_db(&server);

    server.mock(|when, then| {
        when.method(GET).path("/environments/nothing.json");
        then.status(200).body("null");
    });

    let value = db.reference("environments/nothing").get().await.unwrap();
    assert!(value.is_null());
}

#[tokio::test]
async fn update_patches_children() {
    let server = MockServer::start();
    let db = test_db(&server);

    let mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/users/abc.json")
            .json_body(json!({ "displayName": "Alice" }));
        then.status(200)
            .json_body(json!({ "displayName": "Alice" }));
    });

    db.reference("users/abc")
        .update(&json!({ "displayName": "Alice" }))
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn set_replaces_subtree() {
    let server = MockServer::start();
    let db = test_db(&server);

    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/users/abc.json")
            .json_body(json!({ "displayName": "Bob" }));
        then.status(200).json_body(json!({ "displayName": "Bob" }));
    });

    db.reference("users/abc")
        .set(&json!({ "displayName": "Bob" }))
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn remove_deletes_subtree() {
    let server = MockServer::start();
    let db = test_db(&server);

    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/users/abc.json");
        then.status(200).body("null");
    });

    db.reference("users/abc").remove().await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn slashes_in_reference_paths_are_normalized() {
    let server = MockServer::start();
    let db = test_db(&server);

    server.mock(|when, then| {
        when.method(GET).path("/a/b.json");
        then.status(200).body("1");
    });

    let value = db.reference("/a/b/").get().await.unwrap();
    assert_eq!(value, json!(1));
}

#[tokio::test]
async fn api_error_carries_message() {
    let server = MockServer::start();
    let db = test_db(&server);

    server.mock(|when, then| {
        when.method(GET).path("/secret.json");
        then.status(401).json_body(json!({
            "error": { "code": 401, "message": "Permission denied" }
        }));
    });

    let err = db.reference("secret").get().await.unwrap_err();
    assert!(err.to_string().contains("Permission denied"));
}
