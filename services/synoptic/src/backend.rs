//! Typed client for the apparatus backend

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::color::Status;
use crate::io::HttpClient;
use crate::registry::ComponentSpec;

/// One entry of the append-only status change log.
///
/// The log index (position in the fetched sequence) is chronological order.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEvent {
    pub ts: String,
    pub id: String,
    pub state: bool,
    pub user: String,
}

/// Live snapshot values arrive as "active"/"inactive" strings or booleans
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StatusPayload {
    Flag(bool),
    Named(String),
}

impl StatusPayload {
    /// Decode to a status; anything that is not `true` or `"active"` is inactive
    pub fn to_status(&self) -> Status {
        match self {
            StatusPayload::Flag(true) => Status::Active,
            StatusPayload::Flag(false) => Status::Inactive,
            StatusPayload::Named(s) if s == "active" => Status::Active,
            StatusPayload::Named(_) => Status::Inactive,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentUserResponse {
    is_authenticated: bool,
}

#[derive(Debug, Deserialize)]
struct HistoryStateResponse {
    state: HashMap<String, bool>,
}

/// Client for the apparatus backend endpoints
pub struct BackendClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::debug!("Created backend client for {}", base_url);
        Self { base_url, http }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> crate::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).await?;
        if !response.is_success() {
            return Err(crate::SynopticError::Backend(format!(
                "GET {} returned status {}",
                path, response.status
            )));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Fetch the ordered component configuration
    pub async fn fetch_registry(&self) -> crate::Result<Vec<ComponentSpec>> {
        self.get_json("/elements-config").await
    }

    /// Fetch the current live snapshot
    pub async fn fetch_state(&self) -> crate::Result<HashMap<String, StatusPayload>> {
        self.get_json("/elements-state").await
    }

    /// Submit a status change. Only the existence of an acknowledgement is
    /// checked; the payload itself is discarded.
    pub async fn submit_toggle(&self, id: &str, status: Status) -> crate::Result<()> {
        let url = format!("{}/update", self.base_url);
        let body = serde_json::json!({ "id": id, "status": status.to_string() });
        let response = self.http.post_json(&url, &body).await?;
        if !response.is_success() {
            return Err(crate::SynopticError::Backend(format!(
                "POST /update returned status {}",
                response.status
            )));
        }
        Ok(())
    }

    /// Whether the session is authenticated with the backend
    pub async fn fetch_is_authenticated(&self) -> crate::Result<bool> {
        let response: CurrentUserResponse = self.get_json("/get_current_user").await?;
        Ok(response.is_authenticated)
    }

    /// Fetch the full event log, oldest first
    pub async fn fetch_events(&self) -> crate::Result<Vec<HistoryEvent>> {
        self.get_json("/history/events").await
    }

    /// Fetch the backend's snapshot projection at an event index.
    ///
    /// The backend owns the log-to-snapshot reconstruction; the client never
    /// recomputes it from raw events.
    pub async fn fetch_state_at(&self, index: usize) -> crate::Result<HashMap<String, bool>> {
        let response: HistoryStateResponse =
            self.get_json(&format!("/history/state/{}", index)).await?;
        Ok(response.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{HttpResponse, MockHttpClient};

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    fn client(mock: MockHttpClient) -> BackendClient {
        BackendClient::new("http://localhost:5000/", Arc::new(mock))
    }

    #[tokio::test]
    async fn fetch_registry_parses_components() {
        let mut mock = MockHttpClient::new();
        mock.expect_get()
            .withf(|url| url == "http://localhost:5000/elements-config")
            .returning(|_| {
                Box::pin(async {
                    Ok(ok(
                        r##"[{"id": "valveA", "colors": {"active": "#00ff00", "inactive": "gray"}, "confirmToggle": true}]"##,
                    ))
                })
            });

        let specs = client(mock).fetch_registry().await.unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].id, "valveA");
        assert!(specs[0].confirm_toggle);
    }

    #[tokio::test]
    async fn fetch_state_accepts_strings_and_booleans() {
        let mut mock = MockHttpClient::new();
        mock.expect_get()
            .withf(|url| url.ends_with("/elements-state"))
            .returning(|_| {
                Box::pin(async {
                    Ok(ok(
                        r#"{"valveA": "active", "valveB": "inactive", "pump1": true, "pump2": false}"#,
                    ))
                })
            });

        let state = client(mock).fetch_state().await.unwrap();
        assert_eq!(state["valveA"].to_status(), Status::Active);
        assert_eq!(state["valveB"].to_status(), Status::Inactive);
        assert_eq!(state["pump1"].to_status(), Status::Active);
        assert_eq!(state["pump2"].to_status(), Status::Inactive);
    }

    #[tokio::test]
    async fn unknown_status_string_decodes_inactive() {
        let payload = StatusPayload::Named("broken".to_string());
        assert_eq!(payload.to_status(), Status::Inactive);
    }

    #[tokio::test]
    async fn submit_toggle_posts_id_and_status() {
        let mut mock = MockHttpClient::new();
        mock.expect_post_json()
            .withf(|url, body| {
                url == "http://localhost:5000/update"
                    && *body == serde_json::json!({"id": "valveA", "status": "active"})
            })
            .returning(|_, _| Box::pin(async { Ok(ok(r#"{"message": "State updated"}"#)) }));

        client(mock)
            .submit_toggle("valveA", Status::Active)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn submit_toggle_non_success_is_backend_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_post_json().returning(|_, _| {
            Box::pin(async {
                Ok(HttpResponse {
                    status: 401,
                    body: r#"{"error": "Unauthorized"}"#.to_string(),
                })
            })
        });

        let err = client(mock)
            .submit_toggle("valveA", Status::Inactive)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn fetch_is_authenticated_reads_flag() {
        let mut mock = MockHttpClient::new();
        mock.expect_get()
            .withf(|url| url.ends_with("/get_current_user"))
            .returning(|_| {
                Box::pin(async { Ok(ok(r#"{"is_authenticated": true, "username": "op"}"#)) })
            });

        assert!(client(mock).fetch_is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn fetch_events_parses_log() {
        let mut mock = MockHttpClient::new();
        mock.expect_get()
            .withf(|url| url.ends_with("/history/events"))
            .returning(|_| {
                Box::pin(async {
                    Ok(ok(
                        r#"[{"ts": "2024-01-05 10:00:00", "id": "valveA", "state": true, "user": "op"}]"#,
                    ))
                })
            });

        let events = client(mock).fetch_events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "valveA");
        assert!(events[0].state);
        assert_eq!(events[0].user, "op");
    }

    #[tokio::test]
    async fn fetch_state_at_addresses_the_index() {
        let mut mock = MockHttpClient::new();
        mock.expect_get()
            .withf(|url| url == "http://localhost:5000/history/state/2")
            .returning(|_| {
                Box::pin(async {
                    Ok(ok(r#"{"index": 2, "state": {"valveA": true, "valveB": false}}"#))
                })
            });

        let state = client(mock).fetch_state_at(2).await.unwrap();
        assert!(state["valveA"]);
        assert!(!state["valveB"]);
    }

    #[tokio::test]
    async fn get_non_success_is_backend_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_get().returning(|_| {
            Box::pin(async {
                Ok(HttpResponse {
                    status: 500,
                    body: "Internal Server Error".to_string(),
                })
            })
        });

        let err = client(mock).fetch_registry().await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn http_errors_propagate() {
        let mut mock = MockHttpClient::new();
        mock.expect_get().returning(|_| {
            Box::pin(async {
                Err(crate::SynopticError::Http("connection refused".to_string()))
            })
        });

        let err = client(mock).fetch_state().await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
