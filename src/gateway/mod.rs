//! Remote collection gateway.
//!
//! The hosted document database is reached through [`CollectionGateway`]:
//! a push subscription delivering full snapshots of the topics collection,
//! plus id-addressed writes. Writes never touch local state; their effect
//! becomes visible when the gateway pushes the next snapshot.

mod codec;
mod firestore;
mod memory;

pub(crate) use firestore::FirestoreGateway;
pub(crate) use memory::MemoryGateway;
#[cfg(test)]
pub(crate) use memory::WriteCall;

use crate::config::{Backend, EnvConfig};
use crate::models::{DocumentId, Topic, TopicDocument};
use crate::session::Session;
use futures::future::LocalBoxFuture;
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
    Config,
    NotFound,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{message}")]
pub(crate) struct GatewayError {
    pub kind: ErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(e: reqwest::Error) -> Self {
        Self::new(ErrorKind::Network, e.to_string())
    }

    pub fn parse(e: impl std::fmt::Display) -> Self {
        Self::new(ErrorKind::Parse, e.to_string())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        match status.as_u16() {
            401 | 403 => Self::new(ErrorKind::Unauthorized, format!("{ctx}: permission denied")),
            404 => Self::new(ErrorKind::NotFound, format!("{ctx}: document not found")),
            _ => Self::new(ErrorKind::Http, format!("{ctx} ({status}): {body}")),
        }
    }
}

pub(crate) type GatewayResult<T> = Result<T, GatewayError>;

/// One delivery from a live subscription: a complete snapshot in remote
/// order, or a subscription error.
pub(crate) type SnapshotEvent = GatewayResult<Vec<Topic>>;

/// Receiver of subscription pushes.
pub(crate) type SnapshotSink = Arc<dyn Fn(SnapshotEvent) + Send + Sync>;

/// Live subscription handle. Dropping it (or calling [`Subscription::cancel`])
/// stops delivery before returning.
pub(crate) struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(f) = self.cancel.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.cancel.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Access to the fixed topics collection.
pub(crate) trait CollectionGateway: Send + Sync {
    /// Starts pushing snapshots to `sink` until the returned handle is dropped.
    fn subscribe(&self, sink: SnapshotSink) -> Subscription;

    /// Creates a document; the store assigns and returns its id.
    fn add(&self, doc: TopicDocument) -> LocalBoxFuture<'_, GatewayResult<DocumentId>>;

    /// Replaces the whole document stored under `id`.
    fn update(&self, id: &DocumentId, doc: TopicDocument) -> LocalBoxFuture<'_, GatewayResult<()>>;

    fn delete(&self, id: &DocumentId) -> LocalBoxFuture<'_, GatewayResult<()>>;
}

pub(crate) type SharedGateway = Arc<dyn CollectionGateway>;

/// Builds the configured gateway for an established session.
pub(crate) fn connect(config: &EnvConfig, session: Session) -> SharedGateway {
    match config.backend {
        Backend::Firestore => Arc::new(FirestoreGateway::new(config, session)),
        Backend::Memory => Arc::new(MemoryGateway::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_subscription_cancels_once_on_drop() {
        let calls = Rc::new(Cell::new(0));
        let c2 = calls.clone();
        let sub = Subscription::new(move || c2.set(c2.get() + 1));
        drop(sub);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_explicit_cancel_does_not_run_twice() {
        let calls = Rc::new(Cell::new(0));
        let c2 = calls.clone();
        let sub = Subscription::new(move || c2.set(c2.get() + 1));
        sub.cancel();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_http_error_mapping() {
        let e = GatewayError::http(reqwest::StatusCode::FORBIDDEN, String::new(), "List topics");
        assert_eq!(e.kind, ErrorKind::Unauthorized);

        let e = GatewayError::http(reqwest::StatusCode::NOT_FOUND, String::new(), "Update topic");
        assert_eq!(e.kind, ErrorKind::NotFound);

        let e = GatewayError::http(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "boom".to_string(),
            "Add topic",
        );
        assert_eq!(e.kind, ErrorKind::Http);
        assert!(e.to_string().contains("boom"));
    }
}
