//! HTTP client for the Visvas backend.
//!
//! The network itself sits behind [`Transport`]: the wasm frontend plugs in
//! `gloo-net`, the CLI plugs in `reqwest`, tests and the offline demo plug in
//! `MockBackend` (`mock` feature). Everything else (headers, bearer tokens,
//! response classification, session invalidation on 401) lives here once.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{
    bookings::{BookingFilters, BookingPage, BookingQuery},
    models::{
        AuthResponse, BookingStatus, DashboardStats, LoginRequest, ManagedUser, MessageEnvelope,
        NewBooking, RegisterRequest, StatsEnvelope, StatusUpdate, UserEnvelope, UserPayload,
        UsersEnvelope,
    },
    session::{KeyValueStorage, SessionStore},
};

/// Message shown for network failures and server errors.
pub const GENERIC_RETRY_MESSAGE: &str = "Network error. Please try again.";

/// HTTP verbs used by the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// Whether a request carries the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No credentials (login, register, public booking).
    Public,
    /// `Authorization: Bearer <token>` from the session store.
    Bearer,
}

/// Fully prepared request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    /// Header name/value pairs in send order.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<String>,
}

impl ApiRequest {
    /// First header value with the given (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status code and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Undecoded body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Response with an arbitrary body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response with a JSON body.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportFailure(pub String);

/// Sends one request, exactly once. Implementations must not retry.
#[async_trait(?Send)]
pub trait Transport {
    /// Perform the exchange.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportFailure>;
}

/// Failure of an API call, classified for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A protected call was attempted without a stored token; nothing was
    /// sent.
    #[error("no active session")]
    MissingSession,
    /// The backend answered 401 to an authorized call. The session has
    /// already been cleared.
    #[error("session expired")]
    AuthExpired,
    /// Any other 4xx.
    #[error("request rejected ({status}): {message}")]
    RequestRejected {
        /// HTTP status.
        status: u16,
        /// Backend-supplied message.
        message: String,
        /// Field-level validation messages, in backend order.
        details: Vec<String>,
    },
    /// 5xx or no response at all.
    #[error("transport error: {0}")]
    Transport(String),
    /// 2xx whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
    /// A successful login/registration could not be persisted.
    #[error("could not store session: {0}")]
    Storage(String),
}

impl ApiError {
    /// Whether the caller must route to the login page.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::MissingSession | ApiError::AuthExpired)
    }

    /// Text to show inline or in a toast.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::MissingSession | ApiError::AuthExpired => {
                "Your session has expired. Please log in again.".to_string()
            },
            ApiError::RequestRejected {
                message,
                details,
                ..
            } => details.first().cloned().unwrap_or_else(|| message.clone()),
            ApiError::Transport(_) | ApiError::Decode(_) => GENERIC_RETRY_MESSAGE.to_string(),
            ApiError::Storage(_) => "Could not save your session in this browser.".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    msg: Option<String>,
}

/// Classify a raw response.
///
/// A 401 only means an expired session for [`Access::Bearer`] calls; on
/// public calls (a wrong password at login) it is an ordinary rejection.
pub fn classify(response: RawResponse, access: Access) -> Result<RawResponse, ApiError> {
    let status = response.status;
    if response.is_success() {
        return Ok(response);
    }
    if status == 401 && access == Access::Bearer {
        return Err(ApiError::AuthExpired);
    }
    if (400..500).contains(&status) {
        let body: ErrorBody = serde_json::from_slice(&response.body).unwrap_or_default();
        let message = body
            .error
            .or(body.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        let details = body
            .details
            .into_iter()
            .filter_map(|detail| detail.msg)
            .filter(|msg| !msg.trim().is_empty())
            .collect();
        return Err(ApiError::RequestRejected {
            status,
            message,
            details,
        });
    }
    Err(ApiError::Transport(format!("HTTP error: {status}")))
}

fn encode_body<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|err| ApiError::Decode(format!("encode: {err}")))
}

fn decode<R: DeserializeOwned>(response: &RawResponse) -> Result<R, ApiError> {
    serde_json::from_slice(&response.body).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Typed client for every endpoint the site consumes.
pub struct ApiClient<T, S> {
    base: String,
    transport: T,
    session: SessionStore<S>,
}

impl<T, S> ApiClient<T, S>
where
    T: Transport,
    S: KeyValueStorage,
{
    /// `base` is the backend origin, e.g. `http://localhost:5000`.
    pub fn new(base: impl Into<String>, transport: T, session: SessionStore<S>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            base,
            transport,
            session,
        }
    }

    /// Session store used for bearer tokens.
    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and classify the response. A 401 on an authorized
    /// call clears the session before returning [`ApiError::AuthExpired`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        access: Access,
    ) -> Result<RawResponse, ApiError> {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if access == Access::Bearer {
            let Some(token) = self.session.token() else {
                tracing::warn!("refusing {} {path}: no session token", method.as_str());
                return Err(ApiError::MissingSession);
            };
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let request = ApiRequest {
            method,
            url: format!("{}{}", self.base, path),
            headers,
            body,
        };
        tracing::debug!("{} {}", request.method.as_str(), request.url);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|failure| ApiError::Transport(failure.0))?;

        match classify(response, access) {
            Err(ApiError::AuthExpired) => {
                tracing::warn!("{} {path} answered 401, clearing session", method.as_str());
                self.session.clear();
                Err(ApiError::AuthExpired)
            },
            Err(err) => {
                tracing::debug!("{} {path} failed: {err}", method.as_str());
                Err(err)
            },
            ok => ok,
        }
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.request(Method::Get, path, None, Access::Bearer).await?;
        decode(&response)
    }

    /// `POST /api/auth/login`. Stores the returned session on success and
    /// leaves the session untouched on failure.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let body = encode_body(credentials)?;
        let response = self
            .request(Method::Post, "/api/auth/login", Some(body), Access::Public)
            .await?;
        let auth: AuthResponse = decode(&response)?;
        self.persist(&auth)?;
        Ok(auth)
    }

    /// `POST /api/auth/register`. Same session handling as [`Self::login`].
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let body = encode_body(request)?;
        let response = self
            .request(Method::Post, "/api/auth/register", Some(body), Access::Public)
            .await?;
        let auth: AuthResponse = decode(&response)?;
        self.persist(&auth)?;
        Ok(auth)
    }

    fn persist(&self, auth: &AuthResponse) -> Result<(), ApiError> {
        self.session
            .set(&auth.token, &auth.user)
            .map_err(|err| ApiError::Storage(err.to_string()))
    }

    /// Drop the local session. The backend keeps no logout endpoint.
    pub fn logout(&self) {
        self.session.clear();
    }

    /// `POST /api/booking/create`; returns the backend's confirmation text.
    pub async fn create_booking(&self, booking: &NewBooking) -> Result<String, ApiError> {
        let body = encode_body(booking)?;
        let response = self
            .request(Method::Post, "/api/booking/create", Some(body), Access::Public)
            .await?;
        let envelope: MessageEnvelope = serde_json::from_slice(&response.body).unwrap_or_default();
        Ok(envelope
            .message
            .unwrap_or_else(|| "Your meeting request has been received.".to_string()))
    }

    /// `GET /api/admin/bookings` for one page of the filtered set.
    pub async fn fetch_bookings(&self, query: &BookingQuery) -> Result<BookingPage, ApiError> {
        let path = format!("/api/admin/bookings?{}", query.to_query_string());
        let page: BookingPage = self.get_json(&path).await?;
        Ok(page.normalized())
    }

    /// `PATCH /api/admin/bookings/{id}/status`. The response body (updated
    /// booking or a bare ack) is not needed by callers.
    pub async fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<(), ApiError> {
        let path = format!("/api/admin/bookings/{}/status", urlencoding::encode(booking_id));
        let body = encode_body(&StatusUpdate {
            status,
        })?;
        self.request(Method::Patch, &path, Some(body), Access::Bearer)
            .await?;
        Ok(())
    }

    /// `GET /api/admin/bookings/export` for the whole filtered set (not just
    /// the visible page). Returns the spreadsheet bytes.
    pub async fn export_bookings(&self, filters: &BookingFilters) -> Result<Vec<u8>, ApiError> {
        let query = filters.to_query_string();
        let path = if query.is_empty() {
            "/api/admin/bookings/export".to_string()
        } else {
            format!("/api/admin/bookings/export?{query}")
        };
        let response = self.request(Method::Get, &path, None, Access::Bearer).await?;
        Ok(response.body)
    }

    /// `GET /api/admin/dashboard/stats`.
    pub async fn fetch_stats(&self) -> Result<DashboardStats, ApiError> {
        let envelope: StatsEnvelope = self.get_json("/api/admin/dashboard/stats").await?;
        Ok(envelope.stats)
    }

    /// `GET /api/admin/users`.
    pub async fn fetch_users(&self) -> Result<Vec<ManagedUser>, ApiError> {
        let envelope: UsersEnvelope = self.get_json("/api/admin/users").await?;
        Ok(envelope.users)
    }

    /// `POST /api/admin/users`.
    pub async fn create_user(&self, payload: &UserPayload) -> Result<ManagedUser, ApiError> {
        let body = encode_body(payload)?;
        let response = self
            .request(Method::Post, "/api/admin/users", Some(body), Access::Bearer)
            .await?;
        let envelope: UserEnvelope = decode(&response)?;
        Ok(envelope.user)
    }

    /// `PUT /api/admin/users/{id}`.
    pub async fn update_user(
        &self,
        user_id: &str,
        payload: &UserPayload,
    ) -> Result<ManagedUser, ApiError> {
        let path = format!("/api/admin/users/{}", urlencoding::encode(user_id));
        let body = encode_body(payload)?;
        let response = self
            .request(Method::Put, &path, Some(body), Access::Bearer)
            .await?;
        let envelope: UserEnvelope = decode(&response)?;
        Ok(envelope.user)
    }

    /// `DELETE /api/admin/users/{id}`.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/admin/users/{}", urlencoding::encode(user_id));
        self.request(Method::Delete, &path, None, Access::Bearer)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        mock::{MockBackend, MockFailure},
        models::{Role, SessionUser},
        session::MemoryStorage,
    };

    fn client(backend: &MockBackend) -> ApiClient<MockBackend, MemoryStorage> {
        ApiClient::new(
            "http://backend.test/",
            backend.clone(),
            SessionStore::new(MemoryStorage::new()),
        )
    }

    #[test]
    fn classify_maps_status_families() {
        assert!(classify(RawResponse::new(204, Vec::new()), Access::Bearer).is_ok());
        assert_eq!(
            classify(RawResponse::new(401, Vec::new()), Access::Bearer),
            Err(ApiError::AuthExpired)
        );
        assert!(matches!(
            classify(RawResponse::new(401, Vec::new()), Access::Public),
            Err(ApiError::RequestRejected { status: 401, .. })
        ));
        assert!(matches!(
            classify(RawResponse::new(503, Vec::new()), Access::Public),
            Err(ApiError::Transport(_))
        ));
    }

    #[test]
    fn rejection_carries_message_and_details() {
        let body = json!({
            "error": "Validation failed",
            "details": [{ "msg": "Email is invalid" }, { "msg": "" }]
        });
        let err = classify(RawResponse::json(400, &body), Access::Public).expect_err("rejected");
        assert_eq!(
            err,
            ApiError::RequestRejected {
                status: 400,
                message: "Validation failed".to_string(),
                details: vec!["Email is invalid".to_string()],
            }
        );
        assert_eq!(err.user_message(), "Email is invalid");
    }

    #[test]
    fn rejection_without_body_gets_generic_message() {
        let err = classify(RawResponse::new(404, "<html>"), Access::Bearer).expect_err("rejected");
        assert_eq!(err.user_message(), "Request failed with status 404");
    }

    #[tokio::test]
    async fn protected_call_without_token_is_not_sent() {
        let backend = MockBackend::seeded();
        let client = client(&backend);

        let err = client.fetch_stats().await.expect_err("no session");
        assert_eq!(err, ApiError::MissingSession);
        assert!(err.requires_login());
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn bearer_and_content_type_headers_are_attached() {
        let backend = MockBackend::seeded();
        let client = client(&backend);
        client
            .login(&LoginRequest {
                email: "admin@visvas.com".to_string(),
                password: "Admin@123".to_string(),
            })
            .await
            .expect("login");

        client
            .update_booking_status("bk-1", BookingStatus::Confirmed)
            .await
            .expect("patch status");

        let requests = backend.requests();
        let login = &requests[0];
        assert_eq!(login.header("content-type"), Some("application/json"));
        assert_eq!(login.header("authorization"), None);

        let patch = &requests[1];
        assert_eq!(patch.method, Method::Patch);
        assert_eq!(patch.url, "http://backend.test/api/admin/bookings/bk-1/status");
        let token = client.session().token().expect("token");
        assert_eq!(patch.header("Authorization"), Some(format!("Bearer {token}").as_str()));
        assert_eq!(patch.body.as_deref(), Some(r#"{"status":"confirmed"}"#));
    }

    #[tokio::test]
    async fn unauthorized_response_clears_session() {
        let backend = MockBackend::seeded();
        let client = client(&backend);
        client
            .session()
            .set("stale-token", &SessionUser {
                id: "u1".to_string(),
                email: "admin@visvas.com".to_string(),
                role: Role::Admin,
            })
            .expect("seed session");

        let err = client.fetch_users().await.expect_err("expired");
        assert_eq!(err, ApiError::AuthExpired);
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn server_error_is_transport_and_keeps_session() {
        let backend = MockBackend::seeded();
        let client = client(&backend);
        client
            .login(&LoginRequest {
                email: "admin@visvas.com".to_string(),
                password: "Admin@123".to_string(),
            })
            .await
            .expect("login");

        backend.fail_next(MockFailure::Status(500));
        let err = client.fetch_stats().await.expect_err("server error");
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.user_message(), GENERIC_RETRY_MESSAGE);
        assert!(client.session().is_authenticated());

        backend.fail_next(MockFailure::Network);
        assert!(matches!(client.fetch_stats().await, Err(ApiError::Transport(_))));
    }

    #[tokio::test]
    async fn public_booking_returns_backend_message() {
        let backend = MockBackend::seeded();
        let client = client(&backend);
        let message = client
            .create_booking(&NewBooking {
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                mobile_number: "9000000000".to_string(),
                construction_timeline: crate::models::ConstructionTimeline::NotSure,
                own_plot_of_land: crate::models::PlotOwnership::No,
            })
            .await
            .expect("create booking");
        assert!(message.contains("received"));
        assert!(!client.session().is_authenticated());
    }
}
