//! Fakes and helpers shared by the router tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::Value;

use crate::AppState;
use depot_core::avatar::{AvatarService, UploadPolicy};
use depot_core::container::ContainerRegistry;
use depot_core::identity::{GatewayError, IdentityGateway};
use depot_core::storage::{ObjectStore, StorageError};
use depot_shared::{AuthSession, Identity, Session};

pub const VALID_TOKEN: &str = "valid-token";
pub const KNOWN_EMAIL: &str = "ada@example.com";
pub const KNOWN_PASSWORD: &str = "correct-horse";

const BOUNDARY: &str = "depot-test-boundary";

/// Identity provider with one known account and one valid token.
#[derive(Default)]
pub struct FakeGateway {
    resolve_calls: AtomicUsize,
    unreachable: bool,
}

impl FakeGateway {
    pub const USER_ID: &'static str = "0b6c3a4e-9a52-4c3c-a3f0-5d2b8f4e7c11";

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    fn known_user() -> Identity {
        Identity::new(Self::USER_ID, Some(KNOWN_EMAIL.to_string()))
    }

    fn check_reachable(&self) -> Result<(), GatewayError> {
        if self.unreachable {
            Err(GatewayError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityGateway for FakeGateway {
    async fn resolve_user(&self, token: &str) -> Result<Identity, GatewayError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        if token == VALID_TOKEN {
            Ok(Self::known_user())
        } else {
            Err(GatewayError::rejected(403, "invalid JWT"))
        }
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<AuthSession, GatewayError> {
        self.check_reachable()?;
        if email == KNOWN_EMAIL {
            return Err(GatewayError::rejected(422, "User already registered"));
        }
        Ok(AuthSession {
            user: Identity::new(uuid::Uuid::new_v4().to_string(), Some(email.to_string())),
            session: None,
        })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, GatewayError> {
        self.check_reachable()?;
        if email == KNOWN_EMAIL && password == KNOWN_PASSWORD {
            Ok(AuthSession {
                user: Self::known_user(),
                session: Some(Session {
                    access_token: VALID_TOKEN.to_string(),
                    token_type: "bearer".to_string(),
                    expires_in: 3600,
                    expires_at: None,
                    refresh_token: "refresh-token".to_string(),
                }),
            })
        } else {
            Err(GatewayError::rejected(400, "Invalid login credentials"))
        }
    }
}

/// Object store that records keys and can be told to fail.
#[derive(Default)]
pub struct FakeStore {
    uploads: Mutex<Vec<(String, Bytes, String)>>,
    fail: bool,
}

impl FakeStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<(String, Bytes, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
        _overwrite: bool,
    ) -> Result<(), StorageError> {
        self.uploads
            .lock()
            .unwrap()
            .push((key.to_string(), bytes, content_type.to_string()));
        if self.fail {
            Err(StorageError::operation(
                "PUT https://internal-s3.local/avatars: connection reset",
            ))
        } else {
            Ok(())
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://demo.supabase.co/storage/v1/object/public/avatars/{key}")
    }
}

pub fn test_state(
    gateway: FakeGateway,
    policy: UploadPolicy,
) -> (AppState, Arc<FakeGateway>, Arc<FakeStore>) {
    test_state_with_store(gateway, FakeStore::default(), policy)
}

pub fn test_state_with_store(
    gateway: FakeGateway,
    store: FakeStore,
    policy: UploadPolicy,
) -> (AppState, Arc<FakeGateway>, Arc<FakeStore>) {
    let gateway = Arc::new(gateway);
    let store = Arc::new(store);
    let state = AppState {
        containers: Arc::new(ContainerRegistry::seeded()),
        identity: gateway.clone(),
        avatars: Arc::new(AvatarService::new(store.clone(), policy)),
    };
    (state, gateway, store)
}

pub async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Builds a `multipart/form-data` POST with a single file part.
pub fn multipart_request(
    uri: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
    token: Option<&str>,
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}
