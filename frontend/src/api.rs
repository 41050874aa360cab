//! Browser wiring for the shared API client: `gloo-net` as the transport and
//! `localStorage` as the session storage. With the `mock` feature the
//! network is replaced by the shared in-memory backend.

#[cfg(not(feature = "mock"))]
use async_trait::async_trait;
#[cfg(not(feature = "mock"))]
use gloo_net::http::Request;
#[cfg(not(feature = "mock"))]
use visvas_shared::api::{ApiRequest, Method, RawResponse, Transport, TransportFailure};
#[cfg(feature = "mock")]
use visvas_shared::mock::MockBackend;
use visvas_shared::{
    session::{KeyValueStorage, StorageError},
    ApiClient, SessionStore,
};

use crate::config::API_BASE;

/// `localStorage`-backed session storage. Every call re-resolves the
/// storage so a blocked or missing store degrades to "no session".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|err| StorageError::Write {
                key: key.to_string(),
                reason: format!("{err:?}"),
            })
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// `fetch`-based transport.
#[cfg(not(feature = "mock"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[cfg(not(feature = "mock"))]
#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportFailure> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Patch => Request::patch(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| TransportFailure(format!("Failed to build request: {:?}", e)))?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| TransportFailure(format!("Network error: {:?}", e)))?;

        let status = response.status();
        let body = response
            .binary()
            .await
            .map_err(|e| TransportFailure(format!("Failed to read response: {:?}", e)))?;
        Ok(RawResponse::new(status, body))
    }
}

#[cfg(feature = "mock")]
thread_local! {
    static MOCK_BACKEND: MockBackend = MockBackend::seeded_on(crate::utils::today());
}

/// Transport the app is built with.
#[cfg(not(feature = "mock"))]
pub type AppTransport = GlooTransport;
#[cfg(feature = "mock")]
pub type AppTransport = MockBackend;

/// Client type every page talks to.
pub type Client = ApiClient<AppTransport, BrowserStorage>;

#[cfg(not(feature = "mock"))]
fn transport() -> AppTransport {
    GlooTransport
}

#[cfg(feature = "mock")]
fn transport() -> AppTransport {
    MOCK_BACKEND.with(MockBackend::clone)
}

/// Fresh client sharing the browser session.
pub fn client() -> Client {
    ApiClient::new(API_BASE, transport(), session())
}

/// Session store over `localStorage`.
pub fn session() -> SessionStore<BrowserStorage> {
    SessionStore::new(BrowserStorage)
}
