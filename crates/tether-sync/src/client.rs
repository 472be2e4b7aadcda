use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tether_core::AccountSession;
use tracing::debug;

use crate::error::SyncError;
use crate::wire::{
    CreateGroupRequest, FixDupesRequest, FixDupesResponse, PullRequest, PullResponse, PushResponse,
    ResourceGroup, ResourceRecord,
};

/// Thin HTTP client for the sync authority. Every call carries the account's
/// bearer token; responses outside 2xx surface as [`SyncError::Api`].
///
/// The authority also exposes team-membership endpoints (`share-a`,
/// `share-b`, `unshare`) that re-wrap group keys for other accounts; those
/// belong to the sharing flow and have no client here.
pub struct AuthorityClient {
    http: reqwest::Client,
    addr: String,
    session: Arc<dyn AccountSession>,
}

impl AuthorityClient {
    pub fn new(addr: &str, session: Arc<dyn AccountSession>) -> Self {
        Self {
            http: reqwest::Client::new(),
            addr: addr.to_string(),
            session,
        }
    }

    pub async fn push_resources(
        &self,
        batch: &[ResourceRecord],
    ) -> Result<PushResponse, SyncError> {
        self.post_json("/sync/push", batch).await
    }

    pub async fn pull_resources(&self, request: &PullRequest) -> Result<PullResponse, SyncError> {
        self.post_json("/sync/pull", request).await
    }

    pub async fn fix_duplicate_groups(
        &self,
        ids: &[String],
    ) -> Result<FixDupesResponse, SyncError> {
        let request = FixDupesRequest { ids: ids.to_vec() };
        self.post_json("/sync/fix-dupes", &request).await
    }

    /// A 404 from the authority means the group was deleted server-side and
    /// maps to [`SyncError::GroupGone`] so callers can purge local state.
    pub async fn get_resource_group(&self, id: &str) -> Result<ResourceGroup, SyncError> {
        let url = format!(
            "{}/api/resource_groups/{}",
            self.addr.trim_end_matches('/'),
            id
        );
        let response = self
            .http
            .get(url)
            .bearer_auth(self.session.token()?)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SyncError::GroupGone {
                resource_group_id: id.to_string(),
            });
        }
        decode(response).await
    }

    pub async fn create_resource_group(
        &self,
        request: &CreateGroupRequest,
    ) -> Result<ResourceGroup, SyncError> {
        self.post_json("/api/resource_groups", request).await
    }

    /// Destroys every remote resource owned by this account.
    pub async fn reset_account(&self) -> Result<(), SyncError> {
        let url = format!("{}/auth/reset", self.addr.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .bearer_auth(self.session.token()?)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, SyncError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.addr.trim_end_matches('/'), path);
        debug!(%url, "posting to sync authority");
        let response = self
            .http
            .post(url)
            .bearer_auth(self.session.token()?)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SyncError::Api {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SyncError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}
