use super::FirebaseStorage;
use httpmock::prelude::*;
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use serde_json::json;

fn test_storage(server: &MockServer) -> FirebaseStorage {
    let client = ClientBuilder::new(Client::new()).build();
    FirebaseStorage::new_with_client(client, server.url(""))
}

#[tokio::test]
async fn download_fetches_media() {
    let server = MockServer::start();
    let storage = test_storage(&server);

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/b/test-bucket/o/data.json")
            .query_param("alt", "media");
        then.status(200).body(r#"{"a":1}"#);
    });

    let bucket = storage.bucket(Some("test-bucket"));
    let file = bucket.file("data.json");
    assert_eq!(file.name(), "data.json");
    assert_eq!(file.bucket(), "test-bucket");

    let bytes = file.download().await.unwrap();
    assert_eq!(&bytes[..], br#"{"a":1}"#);
    mock.assert();
}

#[tokio::test]
async fn download_json_decodes_contents() {
    let server = MockServer::start();
    let storage = test_storage(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/b/test-bucket/o/seed.json")
            .query_param("alt", "media");
        then.status(200).body(r#"{"users":{"a":{"name":"Alice"}}}"#);
    });

    let value = storage
        .bucket(Some("test-bucket"))
        .file("seed.json")
        .download_json()
        .await
        .unwrap();
    assert_eq!(value, json!({ "users": { "a": { "name": "Alice" } } }));
}

#[tokio::test]
async fn download_json_rejects_invalid_json() {
    let server = MockServer::start();
    let storage = test_storage(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/b/test-bucket/o/broken.json")
            .query_param("alt", "media");
        then.status(200).body("not json");
    });

    let err = storage
        .bucket(Some("test-bucket"))
        .file("broken.json")
        .download_json()
        .await
        .unwrap_err();
    assert!(matches!(err, super::StorageError::SerializationError(_)));
}

#[tokio::test]
async fn save_uses_media_upload_endpoint() {
    let server = MockServer::start();
    let storage = test_storage(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/upload/storage/v1/b/test-bucket/o")
            .query_param("uploadType", "media")
            .query_param("name", "hello.txt")
            .body("Hello, World!");
        then.status(200).json_body(json!({ "name": "hello.txt" }));
    });

    storage
        .bucket(Some("test-bucket"))
        .file("hello.txt")
        .save("Hello, World!".as_bytes().to_vec(), "text/plain")
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn missing_object_surfaces_api_error() {
    let server = MockServer::start();
    let storage = test_storage(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/b/test-bucket/o/ghost.json")
            .query_param("alt", "media");
        then.status(404).json_body(json!({
            "error": { "code": 404, "message": "No such object: test-bucket/ghost.json" }
        }));
    });

    let err = storage
        .bucket(Some("test-bucket"))
        .file("ghost.json")
        .download()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("No such object"));
}

#[tokio::test]
async fn delete_removes_object() {
    let server = MockServer::start();
    let storage = test_storage(&server);

    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/b/test-bucket/o/old.json");
        then.status(204);
    });

    storage
        .bucket(Some("test-bucket"))
        .file("old.json")
        .delete()
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn get_metadata_decodes_object_info() {
    let server = MockServer::start();
    let storage = test_storage(&server);

    server.mock(|when, then| {
        when.method(GET).path("/b/test-bucket/o/data.json");
        then.status(200).json_body(json!({
            "name": "data.json",
            "bucket": "test-bucket",
            "contentType": "application/json",
            "size": "42"
        }));
    });

    let metadata = storage
        .bucket(Some("test-bucket"))
        .file("data.json")
        .get_metadata()
        .await
        .unwrap();
    assert_eq!(metadata.name.as_deref(), Some("data.json"));
    assert_eq!(metadata.size.as_deref(), Some("42"));
}

#[test]
fn default_bucket_derives_from_project_id() {
    let server = MockServer::start();
    let storage = test_storage(&server);
    assert_eq!(storage.bucket(None).name(), "test-project.appspot.com");
}
