//! Flag sources: where the registry comes from.

use crate::error::SourceError;
use crate::flag::FlagRegistry;
use async_trait::async_trait;
use rand::Rng;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use superposition_log::debug;

/// Who is asking: the client key and the user flags are evaluated for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub sdk_key: String,
    pub user: UserContext,
}

impl ClientContext {
    pub fn new(sdk_key: impl Into<String>, user: UserContext) -> Self {
        Self {
            sdk_key: sdk_key.into(),
            user,
        }
    }
}

/// A client for the flag service.
///
/// Controllers receive one at construction and call it once per session.
#[async_trait]
pub trait FlagSource: Send + Sync {
    /// Fetch every flag the service knows for `client.user`.
    async fn all_flags(&self, client: &ClientContext) -> Result<FlagRegistry, SourceError>;
}

#[async_trait]
impl<S: FlagSource + ?Sized> FlagSource for Arc<S> {
    async fn all_flags(&self, client: &ClientContext) -> Result<FlagRegistry, SourceError> {
        (**self).all_flags(client).await
    }
}

/// Serves a fixed registry.
#[derive(Debug, Clone, Default)]
pub struct StaticFlagSource {
    registry: FlagRegistry,
}

impl StaticFlagSource {
    pub fn new(registry: FlagRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl FlagSource for StaticFlagSource {
    async fn all_flags(&self, _client: &ClientContext) -> Result<FlagRegistry, SourceError> {
        Ok(self.registry.clone())
    }
}

/// Serves flags from a JSON document shaped like the flag service's
/// `allFeatures` response: an object keyed by flag name.
#[derive(Debug, Clone)]
pub struct JsonFlagSource {
    payload: String,
}

impl JsonFlagSource {
    pub fn from_json(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Read the document now; it is parsed on each fetch.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        debug!("Reading flags from {}", path.display());
        Ok(Self::from_json(std::fs::read_to_string(path)?))
    }
}

#[async_trait]
impl FlagSource for JsonFlagSource {
    async fn all_flags(&self, _client: &ClientContext) -> Result<FlagRegistry, SourceError> {
        serde_json::from_str(&self.payload).map_err(|e| SourceError::Malformed(e.to_string()))
    }
}

/// Scriptable source for tests. Clones share the call counter and the
/// last client seen.
#[derive(Debug, Clone)]
pub struct MockFlagSource {
    response: Arc<Mutex<Result<FlagRegistry, SourceError>>>,
    calls: Arc<AtomicUsize>,
    last_client: Arc<Mutex<Option<ClientContext>>>,
}

impl MockFlagSource {
    pub fn returning(registry: FlagRegistry) -> Self {
        Self::with_response(Ok(registry))
    }

    pub fn failing(error: SourceError) -> Self {
        Self::with_response(Err(error))
    }

    fn with_response(response: Result<FlagRegistry, SourceError>) -> Self {
        Self {
            response: Arc::new(Mutex::new(response)),
            calls: Arc::new(AtomicUsize::new(0)),
            last_client: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace what later fetches return.
    pub fn set_response(&self, response: Result<FlagRegistry, SourceError>) {
        *self.response.lock().unwrap_or_else(|e| e.into_inner()) = response;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Client passed to the most recent fetch.
    pub fn last_client(&self) -> Option<ClientContext> {
        self.last_client
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl FlagSource for MockFlagSource {
    async fn all_flags(&self, client: &ClientContext) -> Result<FlagRegistry, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_client.lock().unwrap_or_else(|e| e.into_inner()) = Some(client.clone());
        self.response
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Identity the flag service evaluates flags for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
    pub email: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
        }
    }

    /// A throwaway user: `prefix` followed by nine base-36 characters.
    pub fn anonymous<R: Rng>(prefix: &str, email: &str, rng: &mut R) -> Self {
        let suffix: String = (0..9)
            .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
            .collect();
        Self::new(format!("{prefix}{suffix}"), email)
    }
}
