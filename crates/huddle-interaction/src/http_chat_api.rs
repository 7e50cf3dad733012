//! HttpChatApi - REST client for the huddle backend.
//!
//! Status mapping:
//! - 401 / 422 (token missing, expired or unparseable) -> `Unauthenticated`
//! - other 4xx -> `ServerRejection` carrying the server's `msg`
//! - 5xx, connect errors, timeouts -> `NetworkFailure`
//! - undecodable or invalid 2xx bodies -> `ServerRejection`

use crate::wire::{
    ErrorBody, ExchangeBody, ExchangeReplyBody, HistoryBody, LoginBody, LoginReplyBody,
    MessageBody, ProfileBody, RegisterBody,
};
use async_trait::async_trait;
use huddle_core::api::{
    ChatApi, ExchangeReply, ExchangeRequest, LoginGrant, LoginRequest, RegistrationRequest,
    ServerHistory, UserProfile,
};
use huddle_core::config::{normalize_base_url, ClientConfig};
use huddle_core::error::{HuddleError, Result};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// [`ChatApi`] over HTTP with bearer authentication.
#[derive(Clone)]
pub struct HttpChatApi {
    client: Client,
    base_url: String,
}

impl HttpChatApi {
    /// Creates a client for `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| HuddleError::internal(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn history_url(&self, user_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint("/chatbot/history"))
            .map_err(|err| HuddleError::config(format!("invalid base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| HuddleError::config("base url cannot carry a path"))?
            .push(user_id);
        Ok(url)
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn execute(&self, request: RequestBuilder, operation: &str) -> Result<String> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!("[HttpChatApi] {} transport error: {}", operation, err);
            map_transport_error(err)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            HuddleError::network(format!("failed to read {operation} response: {err}"))
        })?;

        if !status.is_success() {
            tracing::debug!("[HttpChatApi] {} returned {}", operation, status);
            return Err(map_http_error(status, &body));
        }

        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: &str, operation: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|err| HuddleError::malformed(format!("{operation} body is not valid: {err}")))
}

fn map_transport_error(err: reqwest::Error) -> HuddleError {
    if err.is_timeout() {
        HuddleError::network(format!("request timed out: {err}"))
    } else if err.is_connect() {
        HuddleError::network(format!("could not reach server: {err}"))
    } else {
        HuddleError::network(format!("request failed: {err}"))
    }
}

fn map_http_error(status: StatusCode, body: &str) -> HuddleError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
            HuddleError::unauthenticated(message)
        }
        s if s.is_server_error() => {
            HuddleError::network(format!("server error ({}): {}", s.as_u16(), message))
        }
        s => HuddleError::rejected(Some(s.as_u16()), message),
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant> {
        let builder = self
            .client
            .post(self.endpoint("/auth/login"))
            .json(&LoginBody::from(request));
        let body = self.execute(builder, "login").await?;
        decode::<LoginReplyBody>(&body, "login")?.validate()
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<String> {
        let builder = self
            .client
            .post(self.endpoint("/auth/register"))
            .json(&RegisterBody::from(request));
        let body = self.execute(builder, "register").await?;
        let reply = decode::<MessageBody>(&body, "register")?;
        Ok(reply
            .msg
            .unwrap_or_else(|| "User registered successfully".to_string()))
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile> {
        let builder = self
            .client
            .get(self.endpoint("/auth/profile"))
            .bearer_auth(token);
        let body = self.execute(builder, "profile").await?;
        decode::<ProfileBody>(&body, "profile")?.validate()
    }

    async fn fetch_history(&self, user_id: &str, token: &str) -> Result<ServerHistory> {
        let builder = self
            .client
            .get(self.history_url(user_id)?)
            .bearer_auth(token);
        let body = self.execute(builder, "history").await?;
        let history = decode::<HistoryBody>(&body, "history")?.validate()?;
        tracing::debug!(
            "[HttpChatApi] Fetched {} history entries",
            history.entries.len()
        );
        Ok(history)
    }

    async fn send_exchange(&self, token: &str, request: &ExchangeRequest) -> Result<ExchangeReply> {
        let builder = self
            .client
            .post(self.endpoint("/chatbot/"))
            .bearer_auth(token)
            .json(&ExchangeBody::from(request));
        let body = self.execute(builder, "chat").await?;
        decode::<ExchangeReplyBody>(&body, "chat")?.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use huddle_core::auth::Role;
    use huddle_core::conversation::{ConversationSessionId, Sender};
    use serde_json::{json, Value};

    async fn serve(router: Router) -> HttpChatApi {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        HttpChatApi::new(&format!("http://{addr}/api"), Duration::from_secs(5)).unwrap()
    }

    fn bearer(headers: &HeaderMap) -> Option<String> {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string)
    }

    #[tokio::test]
    async fn test_login_success() {
        let api = serve(Router::new().route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!({"email": "a@b.com", "password": "x"}));
                Json(json!({"token": "T1", "role": "Manager"}))
            }),
        ))
        .await;

        let grant = api
            .login(&LoginRequest::new("a@b.com", "x").unwrap())
            .await
            .unwrap();
        assert_eq!(grant.token, "T1");
        assert_eq!(grant.role, Role::Manager);
    }

    #[tokio::test]
    async fn test_login_invalid_credentials_is_unauthenticated() {
        let api = serve(Router::new().route(
            "/api/auth/login",
            post(|| async {
                (
                    AxumStatus::UNAUTHORIZED,
                    Json(json!({"msg": "Invalid credentials"})),
                )
            }),
        ))
        .await;

        let err = api
            .login(&LoginRequest::new("a@b.com", "wrong").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err, HuddleError::unauthenticated("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_register_conflict_is_server_rejection() {
        let api = serve(Router::new().route(
            "/api/auth/register",
            post(|| async {
                (
                    AxumStatus::BAD_REQUEST,
                    Json(json!({"msg": "User already exists"})),
                )
            }),
        ))
        .await;

        let request =
            RegistrationRequest::new("a@b.com", "pw", "pw", "Ada", "L", Role::Employee).unwrap();
        let err = api.register(&request).await.unwrap_err();
        assert_eq!(err, HuddleError::rejected(Some(400), "User already exists"));
    }

    #[tokio::test]
    async fn test_profile_and_history_send_bearer_token() {
        let api = serve(
            Router::new()
                .route(
                    "/api/auth/profile",
                    get(|headers: HeaderMap| async move {
                        assert_eq!(bearer(&headers).as_deref(), Some("T1"));
                        Json(json!({"id": 7, "email": "a@b.com", "role": "Manager"}))
                    }),
                )
                .route(
                    "/api/chatbot/history/:user_id",
                    get(|Path(user_id): Path<String>, headers: HeaderMap| async move {
                        assert_eq!(user_id, "7");
                        assert_eq!(bearer(&headers).as_deref(), Some("T1"));
                        Json(json!({
                            "history": [
                                {"sender": "user", "message": "hi"},
                                {"sender": "bot", "message": "hello"}
                            ],
                            "session_id": "S1"
                        }))
                    }),
                ),
        )
        .await;

        let profile = api.fetch_profile("T1").await.unwrap();
        assert_eq!(profile.id, "7");

        let history = api.fetch_history(&profile.id, "T1").await.unwrap();
        assert_eq!(history.entries.len(), 2);
        assert_eq!(history.entries[1].sender, Sender::Bot);
        assert_eq!(history.session_id.unwrap().as_str(), "S1");
    }

    #[tokio::test]
    async fn test_rejected_token_is_unauthenticated() {
        let api = serve(
            Router::new()
                .route(
                    "/api/chatbot/history/:user_id",
                    get(|| async {
                        (
                            AxumStatus::UNAUTHORIZED,
                            Json(json!({"msg": "Token has expired"})),
                        )
                    }),
                )
                .route(
                    "/api/chatbot/",
                    post(|| async {
                        (
                            AxumStatus::UNPROCESSABLE_ENTITY,
                            Json(json!({"msg": "Not enough segments"})),
                        )
                    }),
                ),
        )
        .await;

        assert!(
            api.fetch_history("7", "stale")
                .await
                .unwrap_err()
                .is_unauthenticated()
        );

        let request = ExchangeRequest {
            role: Role::Manager,
            query: "hello".into(),
            session_id: None,
        };
        assert!(
            api.send_exchange("garbage", &request)
                .await
                .unwrap_err()
                .is_unauthenticated()
        );
    }

    #[tokio::test]
    async fn test_send_exchange_carries_session_id() {
        let api = serve(Router::new().route(
            "/api/chatbot/",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(bearer(&headers).as_deref(), Some("T1"));
                assert_eq!(
                    body,
                    json!({"role": "Manager", "query": "hello", "session_id": "S1"})
                );
                Json(json!({"response": "Hi there", "session_id": "S2"}))
            }),
        ))
        .await;

        let reply = api
            .send_exchange(
                "T1",
                &ExchangeRequest {
                    role: Role::Manager,
                    query: "hello".into(),
                    session_id: ConversationSessionId::parse("S1"),
                },
            )
            .await
            .unwrap();
        assert_eq!(reply.response, "Hi there");
        assert_eq!(reply.session_id.unwrap().as_str(), "S2");
    }

    #[tokio::test]
    async fn test_server_error_is_network_failure() {
        let api = serve(Router::new().route(
            "/api/chatbot/",
            post(|| async { (AxumStatus::BAD_GATEWAY, "upstream down") }),
        ))
        .await;

        let request = ExchangeRequest {
            role: Role::Employee,
            query: "hello".into(),
            session_id: None,
        };
        let err = api.send_exchange("T1", &request).await.unwrap_err();
        assert!(err.is_network());
        assert!(err.to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_server_rejection() {
        let api = serve(Router::new().route(
            "/api/chatbot/",
            post(|| async { Json(json!({"answer": "wrong field"})) }),
        ))
        .await;

        let request = ExchangeRequest {
            role: Role::Employee,
            query: "hello".into(),
            session_id: None,
        };
        let err = api.send_exchange("T1", &request).await.unwrap_err();
        assert!(matches!(err, HuddleError::ServerRejection { status: None, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpChatApi::new(&format!("http://{addr}/api"), Duration::from_secs(2)).unwrap();
        let err = api.fetch_profile("T1").await.unwrap_err();
        assert!(err.is_network());
    }

    #[test]
    fn test_history_url_escapes_user_id() {
        let api = HttpChatApi::new("http://localhost:5000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000/api");
        assert_eq!(
            api.history_url("a/b").unwrap().as_str(),
            "http://localhost:5000/api/chatbot/history/a%2Fb"
        );
    }
}
