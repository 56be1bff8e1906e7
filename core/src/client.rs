//! Automation session client
//!
//! Talks to the automation server over HTTP: one call to open a session,
//! one call per submitted command. Response bodies are surfaced verbatim;
//! the only field the client ever reads is the issued `session_id`.

use crate::config::ServerConfig;
use crate::error::{ClientError, Result};
use parking_lot::RwLock;
use reqwest::{header::CONTENT_TYPE, Client as HttpClient, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Outcome of a single client operation
///
/// Both operations return this shape. `ok` mirrors the HTTP success bit;
/// `status` is absent when the request never reached the server.
#[derive(Debug, Clone, Default)]
pub struct OperationResult {
    /// Whether the server answered with a successful status
    pub ok: bool,

    /// HTTP status code, if a response was received
    pub status: Option<u16>,

    /// Raw response body, if a response was received
    pub body: Option<String>,

    /// Human-readable description of the failure, if any
    pub error: Option<String>,
}

impl OperationResult {
    fn success(status: StatusCode, body: String) -> Self {
        OperationResult {
            ok: true,
            status: Some(status.as_u16()),
            body: Some(body),
            error: None,
        }
    }

    fn http_failure(status: StatusCode, body: String) -> Self {
        OperationResult {
            ok: false,
            status: Some(status.as_u16()),
            body: Some(body),
            error: None,
        }
    }

    fn transport_failure(message: String) -> Self {
        OperationResult {
            ok: false,
            status: None,
            body: None,
            error: Some(message),
        }
    }

    /// Short description of a failed result, for status lines
    pub fn failure_reason(&self) -> String {
        if let Some(error) = &self.error {
            return error.clone();
        }
        match self.status {
            Some(code) => format!("HTTP {}", code),
            None => "unknown error".to_string(),
        }
    }
}

/// Outbound body for `/execute_command`
#[derive(Debug, Serialize)]
struct CommandRequest<'a> {
    command: &'a str,
    session_id: &'a str,
}

/// Client for a remote automation session server
///
/// Holds the configured base URL and the current session id. The session
/// id is set by a successful [`start_session`](SessionClient::start_session)
/// and required by [`execute_command`](SessionClient::execute_command);
/// overlapping calls are not serialized, the last started session wins.
pub struct SessionClient {
    base_url: String,
    http_client: HttpClient,
    session_id: RwLock<Option<String>>,
}

impl SessionClient {
    /// Create a new client from server configuration
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        Ok(SessionClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            session_id: RwLock::new(None),
        })
    }

    /// Start a new session on the server
    ///
    /// On success the issued session id replaces whatever was stored
    /// before. A failed call leaves the stored session untouched.
    pub async fn start_session(&self) -> Result<OperationResult> {
        let url = format!("{}/start_session", self.base_url);
        debug!(url = %url, "starting automation session");

        let response = match self.http_client.post(&url).send().await {
            Ok(response) => response,
            Err(err) => return Ok(OperationResult::transport_failure(err.to_string())),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return Ok(OperationResult::transport_failure(err.to_string())),
        };
        debug!(status = %status, "start_session response");

        if !status.is_success() {
            return Ok(OperationResult::http_failure(status, body));
        }

        // The server answers with a JSON object carrying `session_id`.
        // A missing field is tolerated and stored as an empty id; a body
        // that is not JSON at all fails the operation without touching
        // the stored session.
        let parsed: serde_json::Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(err) => {
                return Ok(OperationResult {
                    ok: false,
                    status: Some(status.as_u16()),
                    body: Some(body),
                    error: Some(format!("malformed session response: {}", err)),
                })
            }
        };

        let session_id = parsed
            .get("session_id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        debug!(session_id = %session_id, "session established");
        *self.session_id.write() = Some(session_id);

        Ok(OperationResult::success(status, body))
    }

    /// Submit a command to the current session
    ///
    /// Rejects empty commands and calls made before a session exists
    /// without performing any network I/O. The response body is returned
    /// verbatim, whatever the server chose to send.
    pub async fn execute_command(&self, command: &str) -> Result<OperationResult> {
        if command.is_empty() {
            return Err(ClientError::EmptyCommand);
        }

        // Read once at call time; a concurrent start_session may replace
        // the stored id mid-flight without affecting this request.
        let session_id = self
            .session_id
            .read()
            .clone()
            .ok_or(ClientError::NoActiveSession)?;

        let url = format!("{}/execute_command", self.base_url);
        let request = CommandRequest {
            command,
            session_id: &session_id,
        };
        debug!(url = %url, session_id = %session_id, "submitting command");

        let response = match self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return Ok(OperationResult::transport_failure(err.to_string())),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return Ok(OperationResult::transport_failure(err.to_string())),
        };
        debug!(status = %status, "execute_command response");

        if status.is_success() {
            Ok(OperationResult::success(status, body))
        } else {
            Ok(OperationResult::http_failure(status, body))
        }
    }

    /// Current session id, if a session has been started
    pub fn session_id(&self) -> Option<String> {
        self.session_id.read().clone()
    }

    /// Inject a session id obtained elsewhere (one-shot invocations)
    pub fn set_session_id(&self, session_id: impl Into<String>) {
        *self.session_id.write() = Some(session_id.into());
    }

    /// The configured server base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(url: &str) -> SessionClient {
        let config = ServerConfig {
            base_url: url.to_string(),
            timeout_seconds: 5,
        };
        SessionClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn execute_without_session_is_rejected_locally() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/execute_command")
            .expect(0)
            .create_async()
            .await;
        let client = client_for(&server.url());

        let err = client.execute_command("ls").await.unwrap_err();
        assert!(matches!(err, ClientError::NoActiveSession));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_command_is_rejected_locally() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/execute_command")
            .expect(0)
            .create_async()
            .await;

        // Rejected with and without a session in place
        let client = client_for(&server.url());
        let err = client.execute_command("").await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyCommand));

        client.set_session_id("abc123");
        let err = client.execute_command("").await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyCommand));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn start_session_stores_issued_id() {
        let mut server = Server::new_async().await;
        let start = server
            .mock("POST", "/start_session")
            .with_status(200)
            .with_body(r#"{"session_id": "abc123"}"#)
            .create_async()
            .await;
        let execute = server
            .mock("POST", "/execute_command")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "command": "ls",
                "session_id": "abc123"
            })))
            .with_status(200)
            .with_body(r#"{"result":"ok"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client.start_session().await.unwrap();
        assert!(result.ok);
        assert_eq!(result.status, Some(200));
        assert_eq!(client.session_id().as_deref(), Some("abc123"));

        let result = client.execute_command("ls").await.unwrap();
        assert!(result.ok);
        assert_eq!(result.body.as_deref(), Some(r#"{"result":"ok"}"#));

        start.assert_async().await;
        execute.assert_async().await;
    }

    #[tokio::test]
    async fn failed_session_start_leaves_session_absent() {
        let mut server = Server::new_async().await;
        let start = server
            .mock("POST", "/start_session")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client.start_session().await.unwrap();
        assert!(!result.ok);
        assert_eq!(result.status, Some(500));
        assert_eq!(client.session_id(), None);

        // The gate still holds after the failed start
        let err = client.execute_command("ls").await.unwrap_err();
        assert!(matches!(err, ClientError::NoActiveSession));
        start.assert_async().await;
    }

    #[tokio::test]
    async fn transport_failure_is_a_result_not_a_panic() {
        // Nothing listens on the discard port
        let client = client_for("http://127.0.0.1:9");

        let result = client.start_session().await.unwrap();
        assert!(!result.ok);
        assert_eq!(result.status, None);
        assert!(!result.error.as_deref().unwrap_or_default().is_empty());
        assert_eq!(client.session_id(), None);

        client.set_session_id("abc123");
        let result = client.execute_command("ls").await.unwrap();
        assert!(!result.ok);
        assert_eq!(result.status, None);
        assert!(!result.error.as_deref().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn missing_session_field_degrades_to_empty_id() {
        let mut server = Server::new_async().await;
        let start = server
            .mock("POST", "/start_session")
            .with_status(200)
            .with_body(r#"{"status": "ready"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client.start_session().await.unwrap();
        assert!(result.ok);
        assert_eq!(client.session_id().as_deref(), Some(""));
        start.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_session_response_fails_without_storing() {
        let mut server = Server::new_async().await;
        let start = server
            .mock("POST", "/start_session")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client.start_session().await.unwrap();
        assert!(!result.ok);
        assert_eq!(result.status, Some(200));
        assert!(result
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("malformed session response"));
        assert_eq!(client.session_id(), None);
        start.assert_async().await;
    }

    #[tokio::test]
    async fn restart_overwrites_previous_session() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("POST", "/start_session")
            .with_status(200)
            .with_body(r#"{"session_id": "first"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        client.start_session().await.unwrap();
        assert_eq!(client.session_id().as_deref(), Some("first"));
        first.assert_async().await;

        let second = server
            .mock("POST", "/start_session")
            .with_status(200)
            .with_body(r#"{"session_id": "second"}"#)
            .create_async()
            .await;
        client.start_session().await.unwrap();
        assert_eq!(client.session_id().as_deref(), Some("second"));
        second.assert_async().await;
    }

    #[test]
    fn failure_reason_prefers_transport_message() {
        let result = OperationResult::transport_failure("connection refused".to_string());
        assert_eq!(result.failure_reason(), "connection refused");

        let result = OperationResult::http_failure(StatusCode::BAD_GATEWAY, String::new());
        assert_eq!(result.failure_reason(), "HTTP 502");
    }
}
