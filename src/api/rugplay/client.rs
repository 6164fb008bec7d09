use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, USER_AGENT};
use reqwest::{Client as HttpClient, StatusCode};
use tracing::{debug, warn};

use super::models::{TransferOutcome, TransferRequest, RECIPIENT_NOT_FOUND_MARKER};

/// Anything that can carry a transfer to Rugplay.
///
/// The dispatcher only talks to this trait, so tests can swap in a fake that
/// records calls instead of hitting the network.
#[async_trait]
pub trait TransferRelay: Send + Sync {
    async fn send_transfer(
        &self,
        credential: &str,
        recipient_username: &str,
        amount: u32,
        asset_symbol: &str,
    ) -> TransferOutcome;
}

/// Rugplay API client for relaying coin transfers
pub struct RugplayClient {
    http_client: HttpClient,
    base_url: String,
}

impl RugplayClient {
    const DEFAULT_BASE_URL: &'static str = "https://rugplay.com";
    const TRANSFER_PATH: &'static str = "/api/transfer";

    /// Create a new Rugplay client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_base_url(Self::DEFAULT_BASE_URL.to_string(), timeout)
    }

    /// Create a new client with custom base URL (for testing)
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Headers for an authenticated transfer; the credential is sent as-is
    fn create_headers(credential: &str) -> Result<HeaderMap, String> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Never echo the value itself in the error
        let cookie = HeaderValue::from_str(credential)
            .map_err(|_| "stored cookie is not a valid header value".to_string())?;
        headers.insert(COOKIE, cookie);

        Ok(headers)
    }

    /// Map a Rugplay response onto an outcome.
    ///
    /// Rugplay does not always signal a missing recipient with 404, so the body
    /// marker is checked too. A 200 wins over the marker.
    pub fn classify(status: StatusCode, body: String, request: &TransferRequest) -> TransferOutcome {
        if status == StatusCode::OK {
            TransferOutcome::Success {
                amount: request.amount,
                symbol: request.asset_symbol.clone(),
                recipient: request.recipient_username.clone(),
            }
        } else if status == StatusCode::NOT_FOUND || body.contains(RECIPIENT_NOT_FOUND_MARKER) {
            TransferOutcome::RecipientNotFound {
                recipient: request.recipient_username.clone(),
            }
        } else {
            TransferOutcome::RemoteError {
                status_code: status.as_u16(),
                body,
            }
        }
    }

    /// POST /api/transfer
    ///
    /// # Returns
    /// * The classified outcome; network failures become `TransportError`
    pub async fn transfer(&self, request: &TransferRequest) -> TransferOutcome {
        let url = format!("{}{}", self.base_url, Self::TRANSFER_PATH);
        let headers = match Self::create_headers(&request.credential) {
            Ok(h) => h,
            Err(reason) => return TransferOutcome::TransportError { reason },
        };

        debug!(
            "Relaying {} {} to {}",
            request.amount, request.asset_symbol, request.recipient_username
        );

        let response = match self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request.body())
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "request to Rugplay timed out".to_string()
                } else if e.is_connect() {
                    "could not connect to Rugplay".to_string()
                } else {
                    format!("request failed: {}", e.without_url())
                };
                warn!("Transfer request failed: {}", reason);
                return TransferOutcome::TransportError { reason };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!("Rugplay answered {}", status);

        Self::classify(status, body, request)
    }
}

#[async_trait]
impl TransferRelay for RugplayClient {
    async fn send_transfer(
        &self,
        credential: &str,
        recipient_username: &str,
        amount: u32,
        asset_symbol: &str,
    ) -> TransferOutcome {
        let request = TransferRequest::new(credential, recipient_username, amount, asset_symbol);
        self.transfer(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> TransferRequest {
        TransferRequest::new("sid=abc", "alice", 42, "usd")
    }

    #[test]
    fn test_classify_404_ignores_body() {
        for body in ["", "ok", "Recipient not found", "{\"error\":\"nope\"}"] {
            let outcome = RugplayClient::classify(StatusCode::NOT_FOUND, body.to_string(), &request());
            assert_eq!(
                outcome,
                TransferOutcome::RecipientNotFound { recipient: "alice".to_string() }
            );
        }
    }

    #[test]
    fn test_classify_200_wins_over_marker() {
        let outcome = RugplayClient::classify(
            StatusCode::OK,
            "Recipient not found? no, found".to_string(),
            &request(),
        );
        assert_eq!(
            outcome,
            TransferOutcome::Success {
                amount: 42,
                symbol: "USD".to_string(),
                recipient: "alice".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_marker_with_other_status() {
        let outcome = RugplayClient::classify(
            StatusCode::BAD_REQUEST,
            "{\"error\":\"Recipient not found\"}".to_string(),
            &request(),
        );
        assert!(matches!(outcome, TransferOutcome::RecipientNotFound { .. }));
    }

    #[test]
    fn test_classify_other_status_keeps_body() {
        let outcome = RugplayClient::classify(
            StatusCode::BAD_REQUEST,
            "{\"error\":\"Insufficient coins\"}".to_string(),
            &request(),
        );
        assert_eq!(
            outcome,
            TransferOutcome::RemoteError {
                status_code: 400,
                body: "{\"error\":\"Insufficient coins\"}".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_send_transfer_posts_cookie_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/transfer"))
            .and(header("cookie", "sid=abc"))
            .and(header("user-agent", "Mozilla/5.0"))
            .and(body_json(serde_json::json!({
                "recipientUsername": "alice",
                "type": "COIN",
                "amount": 42,
                "coinSymbol": "USD",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"success\":true}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = RugplayClient::with_base_url(server.uri(), Duration::from_secs(5)).unwrap();
        let outcome = client.send_transfer("sid=abc", "alice", 42, "usd").await;

        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_send_transfer_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/transfer"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let client = RugplayClient::with_base_url(server.uri(), Duration::from_secs(5)).unwrap();
        let outcome = client.send_transfer("sid=stale", "alice", 10, "usd").await;

        assert_eq!(
            outcome,
            TransferOutcome::RemoteError {
                status_code: 401,
                body: "Unauthorized".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_send_transfer_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let client =
            RugplayClient::with_base_url(server.uri(), Duration::from_millis(200)).unwrap();
        let outcome = client.send_transfer("sid=abc", "alice", 10, "usd").await;

        assert!(matches!(outcome, TransferOutcome::TransportError { .. }));
    }

    #[tokio::test]
    async fn test_invalid_cookie_never_leaves_process() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = RugplayClient::with_base_url(server.uri(), Duration::from_secs(5)).unwrap();
        let outcome = client.send_transfer("sid=abc\nInjected: 1", "alice", 10, "usd").await;

        match outcome {
            TransferOutcome::TransportError { reason } => assert!(!reason.contains("sid=abc")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
