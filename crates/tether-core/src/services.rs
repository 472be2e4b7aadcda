use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tether_crypto::{PrivateKeyJwk, PublicKeyJwk};
use tokio::sync::broadcast;

use crate::{Document, DocumentChange, DocumentKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDbError {
    pub kind: String,
    pub message: String,
}

impl DocumentDbError {
    #[must_use]
    pub fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DocumentDbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for DocumentDbError {}

pub type DocumentDbResult<T> = Result<T, DocumentDbError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionError {
    pub kind: String,
    pub message: String,
}

impl SessionError {
    #[must_use]
    pub fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for SessionError {}

pub type SessionResult<T> = Result<T, SessionError>;

/// The host application's document database. Sync reads and writes documents
/// through this seam and hears about edits on the change feed; writes made
/// with `from_sync = true` must come back on the feed flagged the same way.
#[async_trait]
pub trait DocumentDb: Send + Sync {
    async fn get(&self, kind: DocumentKind, id: &str) -> DocumentDbResult<Option<Document>>;
    async fn list(&self, kind: DocumentKind) -> DocumentDbResult<Vec<Document>>;
    /// Insert or update in place. The same id must never produce two rows.
    async fn upsert(&self, document: &Document, from_sync: bool) -> DocumentDbResult<()>;
    async fn remove(&self, document: &Document, from_sync: bool) -> DocumentDbResult<()>;
    /// Ancestor chain starting with the document itself, up to and including
    /// the owning workspace.
    async fn ancestors(&self, document: &Document) -> DocumentDbResult<Vec<Document>>;
    /// Hold observer notifications until `flush_changes`.
    async fn buffer_changes(&self);
    async fn flush_changes(&self) -> DocumentDbResult<()>;
    fn subscribe(&self) -> broadcast::Receiver<DocumentChange>;
}

/// Account state owned by the login layer.
#[async_trait]
pub trait AccountSession: Send + Sync {
    fn is_logged_in(&self) -> bool;
    fn account_id(&self) -> SessionResult<String>;
    fn token(&self) -> SessionResult<String>;
    fn public_key(&self) -> SessionResult<PublicKeyJwk>;
    /// Async because implementations may decrypt the stored key on demand.
    async fn private_key(&self) -> SessionResult<PrivateKeyJwk>;
}
