use tether_core::{DocumentDbError, SessionError};
use tether_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("authority_error: {status} {body}")]
    Api { status: u16, body: String },
    #[error("transport_error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store_error: {0}")]
    Store(#[from] tether_store::DbError),
    #[error("crypto_error: {0}")]
    Crypto(#[from] CryptoError),
    #[error("session_error: {0}")]
    Session(#[from] SessionError),
    #[error("document_db_error: {0}")]
    Document(#[from] DocumentDbError),
    #[error("serde_error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("resource_group_gone: {resource_group_id}")]
    GroupGone { resource_group_id: String },
    #[error("missing_resource: {id}")]
    MissingResource { id: String },
    #[error("no_workspace_for_document: {id}")]
    NoWorkspace { id: String },
}

pub type SyncResult<T> = Result<T, SyncError>;
