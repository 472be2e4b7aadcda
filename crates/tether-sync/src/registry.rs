use std::collections::HashMap;
use std::sync::Arc;

use tether_core::{config_key, AccountSession, Document, SyncMode};
use tether_crypto::{unwrap_symmetric_key, wrap_symmetric_key, CipherEnvelope, SymmetricKey};
use tether_store::local::{ConfigRepo, ResourceRepo, SyncConfig};
use tether_store::StoreHandle;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::client::AuthorityClient;
use crate::error::SyncError;
use crate::wire::{CreateGroupRequest, ResourceGroup};

/// Owns per-group state: remote group records, their unwrapped AES keys,
/// and the local sync configs. Group fetches and key unwraps are
/// single-flight per group id, so concurrent callers share one round trip
/// and one decrypt. Both caches live until logout.
pub struct GroupRegistry {
    client: Arc<AuthorityClient>,
    session: Arc<dyn AccountSession>,
    store: Arc<StoreHandle>,
    groups: Mutex<HashMap<String, ResourceGroup>>,
    keys: Mutex<HashMap<String, SymmetricKey>>,
    gates: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl GroupRegistry {
    pub fn new(
        client: Arc<AuthorityClient>,
        session: Arc<dyn AccountSession>,
        store: Arc<StoreHandle>,
    ) -> Self {
        Self {
            client,
            session,
            store,
            groups: Mutex::new(HashMap::new()),
            keys: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Fetches a group record, going to the authority at most once per
    /// group. A 404 or a disabled group purges its local state and surfaces
    /// as [`SyncError::GroupGone`].
    pub async fn fetch_group(
        &self,
        resource_group_id: &str,
        invalidate: bool,
    ) -> Result<ResourceGroup, SyncError> {
        if invalidate {
            self.groups.lock().await.remove(resource_group_id);
        }
        if let Some(group) = self.groups.lock().await.get(resource_group_id) {
            return Ok(group.clone());
        }
        let gate = self.gate(resource_group_id).await;
        let _guard = gate.lock().await;
        self.fetch_group_locked(resource_group_id).await
    }

    /// Caller must hold the group's gate.
    async fn fetch_group_locked(
        &self,
        resource_group_id: &str,
    ) -> Result<ResourceGroup, SyncError> {
        if let Some(group) = self.groups.lock().await.get(resource_group_id) {
            return Ok(group.clone());
        }
        let group = match self.client.get_resource_group(resource_group_id).await {
            Ok(group) => group,
            Err(SyncError::GroupGone { resource_group_id }) => {
                info!(%resource_group_id, "resource group deleted remotely, purging local copies");
                self.purge_group(&resource_group_id).await?;
                return Err(SyncError::GroupGone { resource_group_id });
            }
            Err(err) => return Err(err),
        };
        if group.is_disabled {
            info!(%resource_group_id, "resource group disabled remotely, purging local copies");
            self.purge_group(resource_group_id).await?;
            return Err(SyncError::GroupGone {
                resource_group_id: resource_group_id.to_string(),
            });
        }
        self.get_or_create_config(resource_group_id).await?;
        self.groups
            .lock()
            .await
            .insert(resource_group_id.to_string(), group.clone());
        Ok(group)
    }

    /// Cache hit, or one fetch plus one unwrap no matter how many callers
    /// race for the same group.
    pub async fn resolve_symmetric_key(
        &self,
        resource_group_id: &str,
    ) -> Result<SymmetricKey, SyncError> {
        if let Some(key) = self.keys.lock().await.get(resource_group_id) {
            return Ok(key.clone());
        }
        let gate = self.gate(resource_group_id).await;
        let _guard = gate.lock().await;
        if let Some(key) = self.keys.lock().await.get(resource_group_id) {
            return Ok(key.clone());
        }
        let group = self.fetch_group_locked(resource_group_id).await?;
        let private_key = self.session.private_key().await?;
        let key = unwrap_symmetric_key(&private_key, &group.enc_symmetric_key)?;
        self.keys
            .lock()
            .await
            .insert(resource_group_id.to_string(), key.clone());
        Ok(key)
    }

    /// Generates a fresh group key, wraps it for this account, registers
    /// the group with the authority, and sets up an unset-mode config.
    pub async fn create_group(
        &self,
        parent_id: &str,
        name: &str,
    ) -> Result<ResourceGroup, SyncError> {
        let key = SymmetricKey::generate();
        let public_key = self.session.public_key()?;
        let enc_symmetric_key = wrap_symmetric_key(&public_key, &key)?;
        let name = if name.is_empty() { "No Name" } else { name };
        let group = self
            .client
            .create_resource_group(&CreateGroupRequest {
                parent_resource_id: parent_id.to_string(),
                name: name.to_string(),
                enc_symmetric_key,
            })
            .await?;
        self.get_or_create_config(&group.id).await?;
        // Seed the caches with the key generated above.
        self.keys.lock().await.insert(group.id.clone(), key);
        self.groups
            .lock()
            .await
            .insert(group.id.clone(), group.clone());
        debug!(resource_group_id = %group.id, "created resource group");
        Ok(group)
    }

    pub async fn get_or_create_config(
        &self,
        resource_group_id: &str,
    ) -> Result<SyncConfig, SyncError> {
        let configs = ConfigRepo::new(self.store.pool());
        if let Some(config) = configs.get(resource_group_id).await? {
            return Ok(config);
        }
        let config = default_config(resource_group_id);
        configs.insert(&config).await?;
        self.store.mark_changed();
        Ok(config)
    }

    /// Absent configs read as unset with no toggles.
    pub async fn config_or_default(
        &self,
        resource_group_id: &str,
    ) -> Result<SyncConfig, SyncError> {
        let configs = ConfigRepo::new(self.store.pool());
        Ok(configs
            .get(resource_group_id)
            .await?
            .unwrap_or_else(|| default_config(resource_group_id)))
    }

    pub async fn create_or_update_config(
        &self,
        resource_group_id: &str,
        sync_mode: SyncMode,
    ) -> Result<SyncConfig, SyncError> {
        let configs = ConfigRepo::new(self.store.pool());
        let config = match configs.get(resource_group_id).await? {
            Some(mut config) => {
                config.sync_mode = sync_mode;
                configs.update(&config).await?;
                config
            }
            None => {
                let mut config = default_config(resource_group_id);
                config.sync_mode = sync_mode;
                configs.insert(&config).await?;
                config
            }
        };
        self.store.mark_changed();
        Ok(config)
    }

    /// Drops a group's resources, config, and cached state in one shot.
    pub async fn purge_group(&self, resource_group_id: &str) -> Result<(), SyncError> {
        ResourceRepo::new(self.store.pool())
            .remove_group(resource_group_id)
            .await?;
        ConfigRepo::new(self.store.pool())
            .remove(resource_group_id)
            .await?;
        self.groups.lock().await.remove(resource_group_id);
        self.keys.lock().await.remove(resource_group_id);
        self.store.mark_changed();
        Ok(())
    }

    /// Forgets every cached group and key. Used at logout.
    pub async fn clear_caches(&self) {
        self.groups.lock().await.clear();
        self.keys.lock().await.clear();
        self.gates.lock().await.clear();
    }

    pub async fn encrypt_document(
        &self,
        resource_group_id: &str,
        document: &Document,
    ) -> Result<String, SyncError> {
        let key = self.resolve_symmetric_key(resource_group_id).await?;
        let plaintext = serde_json::to_string(document)?;
        let envelope = tether_crypto::encrypt(&key, &plaintext, "")?;
        Ok(envelope.to_json()?)
    }

    pub async fn decrypt_document(
        &self,
        resource_group_id: &str,
        enc_content: &str,
    ) -> Result<Document, SyncError> {
        let key = self.resolve_symmetric_key(resource_group_id).await?;
        let envelope = CipherEnvelope::from_json(enc_content)?;
        let plaintext = tether_crypto::decrypt(&key, &envelope)?;
        Ok(serde_json::from_str(&plaintext)?)
    }

    async fn gate(&self, resource_group_id: &str) -> Arc<Mutex<()>> {
        let mut gates = self.gates.lock().await;
        Arc::clone(gates.entry(resource_group_id.to_string()).or_default())
    }
}

fn default_config(resource_group_id: &str) -> SyncConfig {
    SyncConfig {
        key: config_key(resource_group_id),
        resource_group_id: resource_group_id.to_string(),
        sync_mode: SyncMode::Unset,
        disable_client_certificates: false,
        disable_cookie_jars: false,
    }
}
