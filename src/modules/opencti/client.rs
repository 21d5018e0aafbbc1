use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::config::OpenCtiConfig;
use crate::features::incidents::services::BundleImporter;

/// Pushes a serialized STIX bundle for ingestion.
const STIX_BUNDLE_PUSH: &str = r#"
mutation StixBundlePush($connectorId: String, $bundle: String!) {
  stixBundlePush(connectorId: $connectorId, bundle: $bundle)
}
"#;

#[derive(Debug, thiserror::Error)]
pub enum OpenCtiError {
    #[error("Failed to build OpenCTI client: {0}")]
    Client(String),

    #[error("OpenCTI request failed: {0}")]
    Request(String),

    #[error("OpenCTI did not answer within {0} seconds")]
    Timeout(u64),

    #[error("OpenCTI returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse OpenCTI response: {0}")]
    Parse(String),

    #[error("{0}")]
    GraphQl(String),
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Client for the OpenCTI GraphQL API
pub struct OpenCtiClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    connector_id: Option<String>,
    timeout_secs: u64,
}

impl OpenCtiClient {
    pub fn new(config: &OpenCtiConfig) -> Result<Self, OpenCtiError> {
        let client = reqwest::Client::builder()
            .user_agent("StixIncidentIntake/0.1")
            .timeout(config.timeout)
            .build()
            .map_err(|e| OpenCtiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.graphql_endpoint(),
            token: config.token.clone(),
            connector_id: config.connector_id.clone(),
            timeout_secs: config.timeout.as_secs(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Push one bundle and return the GraphQL `data` object
    pub async fn push_bundle(&self, bundle_json: String) -> Result<Value, OpenCtiError> {
        let request = GraphQlRequest {
            query: STIX_BUNDLE_PUSH,
            variables: json!({
                "connectorId": self.connector_id,
                "bundle": bundle_json,
            }),
        };

        tracing::debug!("Pushing STIX bundle to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenCTI request failed: {:?}", e);
                if e.is_timeout() {
                    OpenCtiError::Timeout(self.timeout_secs)
                } else {
                    OpenCtiError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OpenCtiError::Request(e.to_string()))?;

        interpret_response(status, &body)
    }
}

#[async_trait]
impl BundleImporter for OpenCtiClient {
    async fn import_bundle(&self, bundle_json: String) -> anyhow::Result<Value> {
        Ok(self.push_bundle(bundle_json).await?)
    }
}

/// Map an HTTP answer from the GraphQL endpoint to a result or an error
fn interpret_response(status: StatusCode, body: &str) -> Result<Value, OpenCtiError> {
    if !status.is_success() {
        tracing::warn!("OpenCTI returned status: {}", status);
        return Err(OpenCtiError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let parsed: GraphQlResponse =
        serde_json::from_str(body).map_err(|e| OpenCtiError::Parse(e.to_string()))?;

    if !parsed.errors.is_empty() {
        let message = parsed
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(OpenCtiError::GraphQl(message));
    }

    parsed
        .data
        .ok_or_else(|| OpenCtiError::Parse("response carries neither data nor errors".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: String) -> OpenCtiConfig {
        OpenCtiConfig {
            url,
            token: "test-token".to_string(),
            connector_id: Some("connector-1".to_string()),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_interpret_success_returns_data() {
        let value = interpret_response(StatusCode::OK, r#"{"data":{"stixBundlePush":true}}"#)
            .unwrap();
        assert_eq!(value, json!({"stixBundlePush": true}));
    }

    #[test]
    fn test_interpret_graphql_errors_joins_messages() {
        let err = interpret_response(
            StatusCode::OK,
            r#"{"data":null,"errors":[{"message":"You are not authenticated"},{"message":"again"}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "You are not authenticated; again");
    }

    #[test]
    fn test_interpret_http_failure_and_garbage() {
        let err = interpret_response(StatusCode::UNAUTHORIZED, "nope").unwrap_err();
        assert!(matches!(err, OpenCtiError::Status { status: 401, .. }));

        let err = interpret_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, OpenCtiError::Parse(_)));
    }

    #[tokio::test]
    async fn test_push_bundle_sends_bearer_and_bundle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "variables": { "connectorId": "connector-1", "bundle": "{\"type\":\"bundle\"}" }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"stixBundlePush": true}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenCtiClient::new(&config(server.uri())).unwrap();
        let result = client
            .import_bundle("{\"type\":\"bundle\"}".to_string())
            .await
            .unwrap();

        assert_eq!(result, json!({"stixBundlePush": true}));
        assert_eq!(client.endpoint(), format!("{}/graphql", server.uri()));
    }

    #[tokio::test]
    async fn test_push_bundle_surfaces_graphql_error_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "message": "Bundle validation failed" }]
            })))
            .mount(&server)
            .await;

        let client = OpenCtiClient::new(&config(server.uri())).unwrap();
        let err = client.import_bundle("{}".to_string()).await.unwrap_err();

        assert_eq!(err.to_string(), "Bundle validation failed");
    }
}
