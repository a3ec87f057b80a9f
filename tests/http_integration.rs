//! Integration tests for the ARM client using wiremock
//!
//! These tests drive the client, pager, poller and resource handler against
//! mocked endpoints, covering paging, long-running operations and the
//! error cases the handler has to translate.

use armctl::arm::{
    fetch_all, ArmClient, ArmError, ArmListSource, ClientSecretCredential, StaticTokenCredential,
    TokenCredential,
};
use armctl::resource::{ResourceHandler, ServiceRegistry};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{
    bearer_token, body_string_contains, header_exists, method, path, query_param,
    query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUBSCRIPTION: &str = "12345678-1234-9876-4563-123456789012";
const REDIS_API: &str = "2023-08-01";

fn redis_path(name: &str) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/example-resource-group/providers/Microsoft.Cache/redis/{}",
        SUBSCRIPTION, name
    )
}

fn client_for(server: &MockServer) -> ArmClient {
    ArmClient::new(&server.uri(), Arc::new(StaticTokenCredential::new("test-token")))
        .expect("client should build")
        .with_poll_interval(Duration::from_millis(10))
}

/// Test module for the raw client
mod client_tests {
    use super::*;

    /// Requests carry the api-version, bearer token and a client request ID
    #[tokio::test]
    async fn test_get_sends_api_version_and_request_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(redis_path("cache1")))
            .and(query_param("api-version", REDIS_API))
            .and(bearer_token("test-token"))
            .and(header_exists("x-ms-client-request-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "cache1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .get(&redis_path("cache1"), REDIS_API, &CancellationToken::new())
            .await
            .expect("request should succeed");

        assert_eq!(response.json().unwrap()["name"], "cache1");
    }

    /// A 404 surfaces as a status error with the ARM error code
    #[tokio::test]
    async fn test_404_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(redis_path("missing")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "ResourceNotFound", "message": "The Resource was not found."}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get(&redis_path("missing"), REDIS_API, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.code(), Some("ResourceNotFound"));
    }

    /// A server error without a body still reports its status
    #[tokio::test]
    async fn test_500_without_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get(&redis_path("cache1"), REDIS_API, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(!err.is_not_found());
    }

    /// A cancelled token stops before anything is sent
    #[tokio::test]
    async fn test_cancelled_token_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client_for(&server)
            .get(&redis_path("cache1"), REDIS_API, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ArmError::Cancelled));
    }
}

/// Test module for paged listing
mod pager_tests {
    use super::*;

    /// Pages of 2, 2 and 1 items are concatenated in order
    #[tokio::test]
    async fn test_list_follows_next_link() {
        let server = MockServer::start().await;
        let collection = format!(
            "/subscriptions/{}/resourceGroups/example-resource-group/providers/Microsoft.Cache/redis",
            SUBSCRIPTION
        );
        let next = |token: &str| {
            format!(
                "{}{}?api-version={}&$skipToken={}",
                server.uri(),
                collection,
                REDIS_API,
                token
            )
        };

        Mock::given(method("GET"))
            .and(path(collection.as_str()))
            .and(query_param_is_missing("$skipToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"name": "a"}, {"name": "b"}],
                "nextLink": next("2")
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(collection.as_str()))
            .and(query_param("$skipToken", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"name": "c"}, {"name": "d"}],
                "nextLink": next("4")
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(collection.as_str()))
            .and(query_param("$skipToken", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"name": "e"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let source = ArmListSource::new(&client, collection.as_str(), REDIS_API);
        let items = fetch_all(&source, &CancellationToken::new()).await.unwrap();

        let names: Vec<&str> = items.iter().filter_map(|i| i["name"].as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    /// An empty nextLink ends the listing
    #[tokio::test]
    async fn test_empty_next_link_stops() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [],
                "nextLink": ""
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let collection = "/subscriptions/s/providers/Microsoft.Cache/redis";
        let source = ArmListSource::new(&client, collection, REDIS_API);
        let items = fetch_all(&source, &CancellationToken::new()).await.unwrap();
        assert!(items.is_empty());
    }
}

/// Test module for long-running operations
mod poller_tests {
    use super::*;
    use reqwest::Method;

    /// Azure-AsyncOperation polling reaches success and fetches the resource
    #[tokio::test]
    async fn test_async_operation_success_fetches_resource() {
        let server = MockServer::start().await;
        let operation = format!("{}/operations/op1", server.uri());

        Mock::given(method("PUT"))
            .and(path(redis_path("cache1")))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("Azure-AsyncOperation", operation.as_str())
                    .set_body_json(json!({"properties": {"provisioningState": "Creating"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/op1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "InProgress"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/op1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Succeeded"})))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(redis_path("cache1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "cache1",
                "properties": {"provisioningState": "Succeeded"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = json!({"location": "westeurope"});
        let result = client_for(&server)
            .send_and_wait(
                Method::PUT,
                &redis_path("cache1"),
                REDIS_API,
                Some(&body),
                &CancellationToken::new(),
            )
            .await
            .expect("operation should succeed")
            .expect("resource body");

        assert_eq!(result["name"], "cache1");
        assert_eq!(result["properties"]["provisioningState"], "Succeeded");
    }

    /// A Failed operation status surfaces as OperationFailed
    #[tokio::test]
    async fn test_async_operation_failure() {
        let server = MockServer::start().await;
        let operation = format!("{}/operations/op2", server.uri());

        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("Azure-AsyncOperation", operation.as_str()),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/op2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Failed",
                "error": {"code": "QuotaExceeded", "message": "Out of capacity"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_and_wait(
                Method::PUT,
                &redis_path("cache2"),
                REDIS_API,
                Some(&json!({})),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        match err {
            ArmError::OperationFailed { status, message } => {
                assert_eq!(status, "Failed");
                assert_eq!(message, "QuotaExceeded: Out of capacity");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    /// A 202 with Location is polled until it stops answering 202
    #[tokio::test]
    async fn test_location_polling_completes_delete() {
        let server = MockServer::start().await;
        let location = format!("{}/operationResults/del1", server.uri());

        Mock::given(method("DELETE"))
            .and(path(redis_path("cache1")))
            .respond_with(ResponseTemplate::new(202).insert_header("Location", location.as_str()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operationResults/del1"))
            .respond_with(ResponseTemplate::new(202))
            .up_to_n_times(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operationResults/del1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .send_and_wait(
                Method::DELETE,
                &redis_path("cache1"),
                REDIS_API,
                None,
                &CancellationToken::new(),
            )
            .await
            .expect("delete should complete");
        assert!(result.is_none());
    }

    /// Cancelling while waiting between polls stops the poller
    #[tokio::test]
    async fn test_cancel_during_polling() {
        let server = MockServer::start().await;
        let operation = format!("{}/operations/slow", server.uri());

        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("Azure-AsyncOperation", operation.as_str()),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/slow"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "InProgress"})))
            .mount(&server)
            .await;

        let client = client_for(&server).with_poll_interval(Duration::from_secs(60));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = client
            .send_and_wait(Method::PUT, &redis_path("cache1"), REDIS_API, Some(&json!({})), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ArmError::Cancelled));
    }

    /// A PUT answered with a non-terminal provisioningState polls the resource
    #[tokio::test]
    async fn test_provisioning_state_polling_reaches_success() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(redis_path("cache3")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"properties": {"provisioningState": "Creating"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(redis_path("cache3")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"properties": {"provisioningState": "Updating"}})),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(redis_path("cache3")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "cache3",
                "properties": {"provisioningState": "Succeeded"}
            })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .send_and_wait(
                Method::PUT,
                &redis_path("cache3"),
                REDIS_API,
                Some(&json!({"location": "westeurope"})),
                &CancellationToken::new(),
            )
            .await
            .expect("provisioning should succeed")
            .expect("resource body");

        assert_eq!(result["name"], "cache3");
        assert_eq!(result["properties"]["provisioningState"], "Succeeded");
    }

    /// A terminal non-success provisioningState while polling is an error
    #[tokio::test]
    async fn test_provisioning_state_polling_failure() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(redis_path("cache4")))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"properties": {"provisioningState": "Creating"}})),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(redis_path("cache4")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": {"provisioningState": "Failed"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_and_wait(
                Method::PUT,
                &redis_path("cache4"),
                REDIS_API,
                Some(&json!({})),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        match err {
            ArmError::OperationFailed { status, message } => {
                assert_eq!(status, "Failed");
                assert_eq!(message, "no error details returned");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    /// Retry-After from the server replaces the client poll interval
    #[tokio::test]
    async fn test_retry_after_overrides_poll_interval() {
        let server = MockServer::start().await;
        let operation = format!("{}/operations/quick", server.uri());

        Mock::given(method("PUT"))
            .and(path(redis_path("cache5")))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("Azure-AsyncOperation", operation.as_str())
                    .insert_header("Retry-After", "0"),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/quick"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Succeeded"})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(redis_path("cache5")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "cache5"})))
            .mount(&server)
            .await;

        // Without the header the first poll would wait a full minute
        let client = client_for(&server).with_poll_interval(Duration::from_secs(60));
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            client.send_and_wait(
                Method::PUT,
                &redis_path("cache5"),
                REDIS_API,
                Some(&json!({})),
                &CancellationToken::new(),
            ),
        )
        .await
        .expect("Retry-After: 0 should skip the poll interval")
        .expect("operation should succeed")
        .expect("resource body");

        assert_eq!(result["name"], "cache5");
    }
}

/// Test module for the generic resource handler
mod handler_tests {
    use super::*;

    fn registry() -> ServiceRegistry {
        ServiceRegistry::embedded().expect("embedded definitions load")
    }

    /// Reading a resource that does not exist yields None
    #[tokio::test]
    async fn test_read_missing_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(redis_path("gone")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "ResourceNotFound", "message": "not found"}
            })))
            .mount(&server)
            .await;

        let registry = registry();
        let client = client_for(&server);
        let handler = ResourceHandler::new(registry.get("redis-caches").unwrap(), &client);

        let result = handler
            .read(&redis_path("gone"), &CancellationToken::new())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    /// Creating over an existing resource is refused without writing
    #[tokio::test]
    async fn test_create_existing_fails() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(redis_path("cache1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "cache1"})))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let registry = registry();
        let client = client_for(&server);
        let handler = ResourceHandler::new(registry.get("redis-caches").unwrap(), &client);

        let err = handler
            .create(&redis_path("cache1"), &json!({}), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ArmError::AlreadyExists { ref id } if id == &redis_path("cache1")));
        assert!(err.to_string().contains("must be imported"));
    }

    /// Create checks for absence, writes, then waits for provisioning
    #[tokio::test]
    async fn test_create_new_resource() {
        let server = MockServer::start().await;
        let operation = format!("{}/operations/create1", server.uri());

        Mock::given(method("GET"))
            .and(path(redis_path("cache3")))
            .respond_with(ResponseTemplate::new(404))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path(redis_path("cache3")))
            .and(body_string_contains("westeurope"))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("Azure-AsyncOperation", operation.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/create1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Succeeded"})))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(redis_path("cache3")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "cache3"})))
            .mount(&server)
            .await;

        let registry = registry();
        let client = client_for(&server);
        let handler = ResourceHandler::new(registry.get("redis-caches").unwrap(), &client);

        let created = handler
            .create(
                &redis_path("cache3"),
                &json!({"location": "westeurope"}),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(created.unwrap()["name"], "cache3");
    }

    /// Update uses the definition's method and returns the final resource
    #[tokio::test]
    async fn test_update_uses_patch() {
        let server = MockServer::start().await;
        let operation = format!("{}/operations/update1", server.uri());

        Mock::given(method("PATCH"))
            .and(path(redis_path("cache1")))
            .and(body_string_contains("enableNonSslPort"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Azure-AsyncOperation", operation.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/update1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Succeeded"})))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(redis_path("cache1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "cache1",
                "properties": {"enableNonSslPort": false}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let registry = registry();
        let client = client_for(&server);
        let handler = ResourceHandler::new(registry.get("redis-caches").unwrap(), &client);

        let updated = handler
            .update(
                &redis_path("cache1"),
                &json!({"properties": {"enableNonSslPort": false}}),
                &CancellationToken::new(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["properties"]["enableNonSslPort"], false);
    }

    /// Deleting something already gone counts as success
    #[tokio::test]
    async fn test_delete_missing_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let registry = registry();
        let client = client_for(&server);
        let handler = ResourceHandler::new(registry.get("redis-caches").unwrap(), &client);

        handler
            .delete(&redis_path("cache1"), &CancellationToken::new())
            .await
            .expect("delete of a missing resource is fine");
    }

    /// An ID of the wrong type never reaches the server
    #[tokio::test]
    async fn test_wrong_id_type_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let registry = registry();
        let client = client_for(&server);
        let handler = ResourceHandler::new(registry.get("redis-caches").unwrap(), &client);

        let err = handler
            .read(
                "/subscriptions/s/resourceGroups/rg/providers/Microsoft.SignalRService/signalR/hub",
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ArmError::TypeMismatch { .. }));
    }

    /// Listing builds the collection path from parent values
    #[tokio::test]
    async fn test_list_under_resource_group() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!(
                "/subscriptions/{}/resourceGroups/example-resource-group/providers/Microsoft.Cache/redis",
                SUBSCRIPTION
            )))
            .and(query_param("api-version", REDIS_API))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"name": "cache1"}, {"name": "cache2"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let registry = registry();
        let client = client_for(&server);
        let handler = ResourceHandler::new(registry.get("redis-caches").unwrap(), &client);

        let parents = HashMap::from([
            ("subscriptionId", SUBSCRIPTION),
            ("resourceGroupName", "example-resource-group"),
        ]);
        let items = handler.list(&parents, &CancellationToken::new()).await.unwrap();
        assert_eq!(items.len(), 2);
    }
}

/// Test module for credentials
mod auth_tests {
    use super::*;

    /// The client-secret flow posts the grant and caches the token
    #[tokio::test]
    async fn test_client_secret_token_is_cached() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=app-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "issued-token",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let credential = ClientSecretCredential::new(
            reqwest::Client::new(),
            "tenant-1",
            "app-1",
            "hunter2",
            "https://management.azure.com",
        )
        .with_authority(server.uri());

        assert_eq!(credential.token().await.unwrap(), "issued-token");
        assert_eq!(credential.token().await.unwrap(), "issued-token");
    }

    /// A rejected grant is an auth error
    #[tokio::test]
    async fn test_client_secret_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_client"})),
            )
            .mount(&server)
            .await;

        let credential = ClientSecretCredential::new(
            reqwest::Client::new(),
            "tenant-1",
            "app-1",
            "wrong",
            "https://management.azure.com",
        )
        .with_authority(server.uri());

        let err = credential.token().await.unwrap_err();
        assert!(matches!(err, ArmError::Auth(_)));
    }
}
