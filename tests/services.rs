//! Integration test: upstream clients against a local mock service.

mod common;

use std::time::Duration;

use notebook_relay::api::{ComponentUpdate, DatasetsClient, ProjectsClient, TaskUpdate};
use notebook_relay::Error;
use serde_json::json;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn create_dataset_posts_multipart_file() {
    let upstream = common::mock_upstream::start(
        200,
        r#"{"name": "iris", "filename": "iris.csv", "columns": []}"#,
    );
    let client = DatasetsClient::new(&upstream.url, TIMEOUT).unwrap();

    let reply = client
        .create_dataset(b"sepal,petal\n1,2\n".to_vec(), "iris.csv")
        .await
        .unwrap();
    assert_eq!(reply["name"], "iris");

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/datasets");
    assert!(request.headers["content-type"].starts_with("multipart/form-data"));

    let body = request.body_text();
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="iris.csv""#));
    assert!(body.contains("text/csv"));
    assert!(body.contains("sepal,petal\n1,2\n"));
}

#[tokio::test]
async fn create_dataset_defaults_filename() {
    let upstream = common::mock_upstream::start(200, "{}");
    let client = DatasetsClient::new(&upstream.url, TIMEOUT).unwrap();

    client.create_dataset(b"a\n".to_vec(), "").await.unwrap();

    let body = upstream.requests()[0].body_text();
    assert!(body.contains(r#"filename="file""#));
}

#[tokio::test]
async fn upstream_error_status_is_reported() {
    let upstream = common::mock_upstream::start(400, r#"{"message": "invalid file"}"#);
    let client = DatasetsClient::new(&upstream.url, TIMEOUT).unwrap();

    let err = client
        .create_dataset(b"x".to_vec(), "x.csv")
        .await
        .unwrap_err();

    match err {
        Error::UpstreamStatus {
            service,
            status,
            body,
        } => {
            assert_eq!(service, "datasets");
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("invalid file"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn unreachable_service_is_upstream_error() {
    // Nothing listens on port 9 of localhost in a test environment.
    let client = DatasetsClient::new("http://127.0.0.1:9", TIMEOUT).unwrap();
    let err = client
        .create_dataset(b"x".to_vec(), "x.csv")
        .await
        .unwrap_err();
    assert!(err.is_upstream());
}

#[tokio::test]
async fn update_task_patches_json() {
    let upstream = common::mock_upstream::start(200, r#"{"uuid": "t-1"}"#);
    let client = ProjectsClient::new(&upstream.url, TIMEOUT).unwrap();

    let update = TaskUpdate {
        parameters: Some(Vec::new()),
        experiment_notebook: Some(json!({"cells": []})),
        deployment_notebook: None,
    };
    let reply = client.update_task("t-1", &update).await.unwrap();
    assert_eq!(reply["uuid"], "t-1");

    let request = &upstream.requests()[0];
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.path, "/tasks/t-1");
    assert_eq!(
        request.json(),
        json!({"parameters": [], "experimentNotebook": {"cells": []}})
    );
}

#[tokio::test]
async fn update_component_patches_json() {
    let upstream = common::mock_upstream::start(200, r#"{"uuid": "c-1"}"#);
    let client = ProjectsClient::new(&format!("{}/api/", upstream.url), TIMEOUT).unwrap();

    let update = ComponentUpdate {
        experiment_notebook: None,
        deployment_notebook: Some(json!({"nbformat": 4})),
    };
    client.update_component("c-1", &update).await.unwrap();

    let request = &upstream.requests()[0];
    assert_eq!(request.path, "/api/components/c-1");
    assert_eq!(request.json(), json!({"deploymentNotebook": {"nbformat": 4}}));
}

#[tokio::test]
async fn non_json_reply_is_service_error() {
    let upstream = common::mock_upstream::start(200, "not json");
    let client = ProjectsClient::new(&upstream.url, TIMEOUT).unwrap();

    let err = client
        .update_task("t-1", &TaskUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Service(_)));
}
