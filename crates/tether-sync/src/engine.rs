use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tether_core::timing::{PULL_PERIOD, START_DELAY, WRITE_PERIOD};
use tether_core::{
    resource_key, AccountSession, ChangeOp, Document, DocumentChange, DocumentDb, DocumentKind,
    NO_VERSION,
};
use tether_store::local::{ConfigRepo, Resource, ResourceRepo, SyncConfig};
use tether_store::StoreHandle;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::client::AuthorityClient;
use crate::error::{SyncError, SyncResult};
use crate::queue::{ChangeQueue, PendingChange};
use crate::registry::GroupRegistry;
use crate::wire::{PullRequest, ResourceRecord, ResourceStub, VersionAck};

/// Knobs for the background loops. Defaults match the production cadence;
/// tests shrink them to keep runs fast.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub base_url: String,
    pub start_delay: Duration,
    pub write_period: Duration,
    pub pull_period: Duration,
}

impl EngineOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            start_delay: START_DELAY,
            write_period: WRITE_PERIOD,
            pull_period: PULL_PERIOD,
        }
    }
}

/// Drives the whole sync lifecycle: captures document changes, stages them
/// as encrypted resources, and exchanges them with the authority on a
/// jittered schedule. One instance per account session.
pub struct SyncEngine {
    options: EngineOptions,
    db: Arc<dyn DocumentDb>,
    session: Arc<dyn AccountSession>,
    store: Arc<StoreHandle>,
    client: Arc<AuthorityClient>,
    registry: GroupRegistry,
    queue: ChangeQueue,
    is_syncing: AtomicBool,
    next_sync_time: Mutex<Option<Instant>>,
    stop_tx: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncEngine {
    pub fn new(
        options: EngineOptions,
        db: Arc<dyn DocumentDb>,
        session: Arc<dyn AccountSession>,
        store: Arc<StoreHandle>,
    ) -> Arc<Self> {
        let client = Arc::new(AuthorityClient::new(
            &options.base_url,
            Arc::clone(&session),
        ));
        let registry = GroupRegistry::new(
            Arc::clone(&client),
            Arc::clone(&session),
            Arc::clone(&store),
        );
        let (stop_tx, _) = watch::channel(false);
        Arc::new(Self {
            options,
            db,
            session,
            store,
            client,
            registry,
            queue: ChangeQueue::new(),
            is_syncing: AtomicBool::new(false),
            next_sync_time: Mutex::new(None),
            stop_tx,
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Spawns the capture, writer, and scheduler loops. Calling it while
    /// already running does nothing.
    pub async fn start(self: &Arc<Self>) {
        let mut tasks = self.tasks.lock().await;
        if !tasks.is_empty() {
            debug!("sync engine already running");
            return;
        }
        self.stop_tx.send_replace(false);
        // Subscribe before returning so edits made right after start are
        // never missed.
        let changes = self.db.subscribe();
        tasks.push(tokio::spawn(Arc::clone(self).run_capture(changes)));
        tasks.push(tokio::spawn(Arc::clone(self).run_writer()));
        tasks.push(tokio::spawn(Arc::clone(self).run_scheduler()));
        info!("sync engine started");
    }

    /// Cancels the background loops and waits for them to wind down. An
    /// aborted pass may leave the in-flight flag set, so it is cleared here.
    pub async fn stop(&self) {
        self.stop_tx.send_replace(true);
        let mut tasks = self.tasks.lock().await;
        for task in tasks.drain(..) {
            task.abort();
            let _ = task.await;
        }
        self.is_syncing.store(false, Ordering::SeqCst);
        info!("sync engine stopped");
    }

    pub async fn is_running(&self) -> bool {
        !self.tasks.lock().await.is_empty()
    }

    /// First sync after login: one full pull before the loops start, so
    /// data is in place the moment timers take over. Resources for local
    /// documents are not created yet; the first scheduled pass does that.
    pub async fn initial_sync(self: &Arc<Self>) -> SyncResult<()> {
        self.pull(None, false).await?;
        self.start().await;
        Ok(())
    }

    /// Stops the loops, forgets cached group keys, and wipes local sync
    /// rows. Call when the account logs out.
    pub async fn logout(&self) -> SyncResult<()> {
        self.stop().await;
        self.registry.clear_caches().await;
        self.reset_local_data().await
    }

    async fn run_capture(
        self: Arc<Self>,
        mut changes: broadcast::Receiver<DocumentChange>,
    ) {
        let mut stop_rx = self.stop_tx.subscribe();
        loop {
            tokio::select! {
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        return;
                    }
                }
                next = changes.recv() => match next {
                    Ok(change) => {
                        self.queue.offer(change, self.session.is_logged_in()).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "change feed lagged, some edits may sync late");
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                },
            }
        }
    }

    async fn run_writer(self: Arc<Self>) {
        let mut stop_rx = self.stop_tx.subscribe();
        let mut ticker = tokio::time::interval(self.options.write_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        return;
                    }
                }
                _ = ticker.tick() => {
                    self.write_pending_changes().await;
                }
            }
        }
    }

    async fn run_scheduler(self: Arc<Self>) {
        let mut stop_rx = self.stop_tx.subscribe();
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    return;
                }
            }
            () = tokio::time::sleep(self.options.start_delay) => {}
        }
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    return;
                }
            }
            () = self.sync_pass() => {}
        }
        // Tick well under the pull period so a freshly earned window is
        // picked up promptly.
        let mut ticker = tokio::time::interval(self.options.pull_period / 5);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        return;
                    }
                }
                _ = ticker.tick() => {
                    tokio::select! {
                        changed = stop_rx.changed() => {
                            if changed.is_err() || *stop_rx.borrow() {
                                return;
                            }
                        }
                        () = self.tick() => {}
                    }
                }
            }
        }
    }

    async fn tick(&self) {
        if self.is_syncing.load(Ordering::SeqCst) {
            return;
        }
        if let Some(next) = *self.next_sync_time.lock().await {
            if Instant::now() < next {
                return;
            }
        }
        self.sync_pass().await;
    }

    /// One push plus pull round, guarded so overlapping calls collapse into
    /// a single pass. A failed pass earns a full extra pull period of
    /// backoff; a slow one earns jitter proportional to how long it took,
    /// which spreads clients out instead of thundering in lockstep.
    pub async fn sync_pass(&self) {
        if self
            .is_syncing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("sync already in progress, skipping");
            return;
        }
        let started = Instant::now();
        let outcome = async {
            self.push(None).await?;
            self.pull(None, true).await?;
            Ok::<(), SyncError>(())
        }
        .await;
        let mut extra = started.elapsed().mul_f64(rand::random::<f64>() * 2.0);
        if let Err(err) = outcome {
            warn!(error = %err, "sync pass failed, backing off");
            extra += self.options.pull_period;
        }
        *self.next_sync_time.lock().await =
            Some(Instant::now() + self.options.pull_period + extra);
        self.is_syncing.store(false, Ordering::SeqCst);
    }

    /// Drains the capture queue into dirty resource rows. Returns how many
    /// changes were staged.
    pub async fn write_pending_changes(&self) -> usize {
        let pending = self.queue.drain().await;
        if pending.is_empty() {
            return 0;
        }
        let mut staged = 0;
        for change in pending {
            match self.stage_change(&change).await {
                Ok(()) => staged += 1,
                Err(err) => {
                    error!(
                        document_id = %change.document.id,
                        error = %err,
                        "failed to stage pending change"
                    );
                }
            }
        }
        if staged > 0 {
            self.store.mark_changed();
        }
        staged
    }

    async fn stage_change(&self, change: &PendingChange) -> SyncResult<()> {
        let resource = self.get_or_create_resource(&change.document).await?;
        let enc_content = self
            .registry
            .encrypt_document(&resource.resource_group_id, &change.document)
            .await?;
        let updated = Resource {
            name: display_name(&change.document),
            last_edited: change.observed_at,
            last_edited_by: self.session.account_id()?,
            removed: matches!(change.op, ChangeOp::Remove),
            dirty: true,
            enc_content,
            ..resource
        };
        ResourceRepo::new(self.store.pool()).update(&updated).await?;
        Ok(())
    }

    async fn get_or_create_resource(&self, document: &Document) -> SyncResult<Resource> {
        let resources = ResourceRepo::new(self.store.pool());
        match resources.get_by_doc_id(&document.id, None).await? {
            Some(resource) => Ok(resource),
            None => self.create_resource_for_document(document).await,
        }
    }

    /// A document syncs under its workspace's group. The first document of
    /// a workspace to sync creates the group, the workspace resource, and
    /// only then its own resource.
    async fn create_resource_for_document(&self, document: &Document) -> SyncResult<Resource> {
        let workspace = self
            .db
            .ancestors(document)
            .await?
            .into_iter()
            .find(|doc| doc.kind.is_workspace())
            .ok_or_else(|| SyncError::NoWorkspace {
                id: document.id.clone(),
            })?;
        let resources = ResourceRepo::new(self.store.pool());
        let workspace_resource = match resources.get_by_doc_id(&workspace.id, None).await? {
            Some(resource) => resource,
            None => {
                let group = self
                    .registry
                    .create_group(&workspace.id, &workspace.name)
                    .await?;
                self.create_resource(&workspace, &group.id).await?
            }
        };
        if workspace.id == document.id {
            return Ok(workspace_resource);
        }
        self.create_resource(document, &workspace_resource.resource_group_id)
            .await
    }

    async fn create_resource(
        &self,
        document: &Document,
        resource_group_id: &str,
    ) -> SyncResult<Resource> {
        let account_id = self.session.account_id()?;
        let resource = Resource {
            key: resource_key(resource_group_id, &document.id),
            id: document.id.clone(),
            resource_group_id: resource_group_id.to_string(),
            version: NO_VERSION.to_string(),
            name: display_name(document),
            type_id: document.kind.as_str().to_string(),
            created_by: account_id.clone(),
            last_edited: document.modified,
            last_edited_by: account_id,
            removed: false,
            dirty: true,
            enc_content: self
                .registry
                .encrypt_document(resource_group_id, document)
                .await?,
        };
        ResourceRepo::new(self.store.pool()).insert(&resource).await?;
        self.store.mark_changed();
        Ok(resource)
    }

    /// Uploads every dirty resource in scope and applies the authority's
    /// acks. A scoped push skips the sync-mode filter, so explicit "sync
    /// this group now" actions work on paused groups.
    pub async fn push(&self, resource_group_id: Option<&str>) -> SyncResult<()> {
        if !self.session.is_logged_in() {
            debug!("not logged in, skipping push");
            return Ok(());
        }
        let resources = ResourceRepo::new(self.store.pool());
        let dirty = match resource_group_id {
            Some(group) => resources.find_dirty_for_group(group).await?,
            None => resources.find_active_dirty().await?,
        };
        let mut batch = Vec::new();
        for resource in &dirty {
            let config = self
                .registry
                .config_or_default(&resource.resource_group_id)
                .await?;
            if type_disabled(&config, &resource.type_id) {
                continue;
            }
            batch.push(ResourceRecord::from(resource));
        }
        if batch.is_empty() {
            debug!("no changes to push");
            return Ok(());
        }
        debug!(count = batch.len(), "pushing dirty resources");
        let response = self.client.push_resources(&batch).await?;

        let mut synced = 0;
        for ack in response
            .updated
            .iter()
            .chain(response.created.iter())
            .chain(response.removed.iter())
        {
            match self.apply_push_ack(ack).await {
                Ok(()) => synced += 1,
                Err(err) => {
                    warn!(id = %ack.id, error = %err, "failed to record push ack");
                }
            }
        }

        if !response.conflicts.is_empty() {
            self.db.buffer_changes().await;
            for record in &response.conflicts {
                if let Err(err) = self.resolve_conflict(record).await {
                    warn!(
                        id = %record.id,
                        resource_group_id = %record.resource_group_id,
                        error = %err,
                        "failed to resolve push conflict"
                    );
                }
            }
            self.db.flush_changes().await?;
        }

        if synced > 0 || !response.conflicts.is_empty() {
            self.store.mark_changed();
        }
        Ok(())
    }

    async fn apply_push_ack(&self, ack: &VersionAck) -> SyncResult<()> {
        let resources = ResourceRepo::new(self.store.pool());
        let mut resource = resources
            .get_by_doc_id(&ack.id, None)
            .await?
            .ok_or_else(|| SyncError::MissingResource { id: ack.id.clone() })?;
        resource.version = ack.version.clone();
        resource.dirty = false;
        resources.update(&resource).await?;
        Ok(())
    }

    /// Last write wins, on the edit timestamps. A tie keeps the local copy
    /// and leaves it dirty, so the local edit goes out on the next push
    /// instead of silently losing. Either way the row takes the server's
    /// version so the next exchange converges.
    async fn resolve_conflict(&self, record: &ResourceRecord) -> SyncResult<()> {
        let resources = ResourceRepo::new(self.store.pool());
        let local = resources
            .get_by_doc_id(&record.id, Some(&record.resource_group_id))
            .await?
            .ok_or_else(|| SyncError::MissingResource {
                id: record.id.clone(),
            })?;
        let server_is_newer = record.last_edited > local.last_edited;
        let mut merged = if server_is_newer {
            record.to_resource(false)
        } else {
            local
        };
        merged.version = record.version.clone();
        merged.dirty = !server_is_newer;
        resources.update(&merged).await?;
        if server_is_newer {
            let document = self
                .registry
                .decrypt_document(&merged.resource_group_id, &merged.enc_content)
                .await?;
            if merged.removed {
                self.db.remove(&document, true).await?;
            } else {
                self.db.upsert(&document, true).await?;
            }
        }
        Ok(())
    }

    /// Downloads remote changes. A scoped pull syncs exactly one group and
    /// blacklists every other known group; a full pull blacklists the
    /// groups whose mode keeps them out of the background loop. Returns how
    /// many remote records were applied locally.
    pub async fn pull(
        &self,
        resource_group_id: Option<&str>,
        create_missing: bool,
    ) -> SyncResult<usize> {
        if !self.session.is_logged_in() {
            debug!("not logged in, skipping pull");
            return Ok(0);
        }
        self.repair_duplicate_groups().await?;
        if create_missing {
            self.create_missing_resources().await?;
        }

        let resources = ResourceRepo::new(self.store.pool());
        let known = match resource_group_id {
            Some(group) => resources.active_for_group(group).await?,
            None => resources.all_active().await?,
        };

        let configs = ConfigRepo::new(self.store.pool());
        let blacklist: Vec<String> = match resource_group_id {
            Some(group) => configs
                .all()
                .await?
                .into_iter()
                .map(|config| config.resource_group_id)
                .filter(|id| id != group)
                .collect(),
            None => configs
                .find_inactive()
                .await?
                .into_iter()
                .map(|config| config.resource_group_id)
                .collect(),
        };

        let request = PullRequest {
            resources: known.iter().map(ResourceStub::from).collect(),
            blacklist,
        };
        debug!(resources = request.resources.len(), "pulling remote changes");
        let response = self.client.pull_resources(&request).await?;

        let created = self.apply_created(&response.created_resources).await?;
        let updated = self.apply_updated(&response.updated_resources).await?;
        self.apply_removals(&response.ids_to_remove).await?;
        self.mark_for_push(&response.ids_to_push).await?;

        if created + updated > 0
            || !response.ids_to_remove.is_empty()
            || !response.ids_to_push.is_empty()
        {
            self.store.mark_changed();
        }
        Ok(created + updated)
    }

    async fn apply_created(&self, records: &[ResourceRecord]) -> SyncResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        self.db.buffer_changes().await;
        let mut applied = 0;
        for record in records {
            match self.apply_created_record(record).await {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(
                        id = %record.id,
                        resource_group_id = %record.resource_group_id,
                        error = %err,
                        "failed to apply created resource"
                    );
                }
            }
        }
        self.db.flush_changes().await?;
        if applied > 0 {
            debug!(count = applied, "pull created resources");
        }
        Ok(applied)
    }

    /// Returns whether the record was applied. Types the group's config has
    /// disabled never enter the device, mirroring the push-side filter.
    async fn apply_created_record(&self, record: &ResourceRecord) -> SyncResult<bool> {
        let config = self
            .registry
            .config_or_default(&record.resource_group_id)
            .await?;
        if type_disabled(&config, &record.type_id) {
            debug!(
                id = %record.id,
                resource_group_id = %record.resource_group_id,
                type_id = %record.type_id,
                "skipping created resource of disabled type"
            );
            return Ok(false);
        }
        let document = self
            .registry
            .decrypt_document(&record.resource_group_id, &record.enc_content)
            .await?;
        ResourceRepo::new(self.store.pool())
            .insert(&record.to_resource(false))
            .await?;
        // Upsert rather than insert: the document may exist locally already,
        // for example after a logout and login on the same machine.
        self.db.upsert(&document, true).await?;
        Ok(true)
    }

    async fn apply_updated(&self, records: &[ResourceRecord]) -> SyncResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        self.db.buffer_changes().await;
        let mut applied = 0;
        for record in records {
            match self.apply_updated_record(record).await {
                Ok(()) => applied += 1,
                Err(err) => {
                    warn!(
                        id = %record.id,
                        resource_group_id = %record.resource_group_id,
                        error = %err,
                        "failed to apply updated resource"
                    );
                }
            }
        }
        self.db.flush_changes().await?;
        if applied > 0 {
            debug!(count = applied, "pull updated resources");
        }
        Ok(applied)
    }

    async fn apply_updated_record(&self, record: &ResourceRecord) -> SyncResult<()> {
        let document = self
            .registry
            .decrypt_document(&record.resource_group_id, &record.enc_content)
            .await?;
        self.db.upsert(&document, true).await?;
        let rows = ResourceRepo::new(self.store.pool())
            .update(&record.to_resource(false))
            .await?;
        if rows == 0 {
            return Err(SyncError::MissingResource {
                id: record.id.clone(),
            });
        }
        Ok(())
    }

    /// The authority told us these documents were deleted elsewhere. A
    /// resource we cannot find is a hard error; one we cannot decrypt is
    /// skipped without being marked removed, so a later pull can retry.
    async fn apply_removals(&self, ids: &[String]) -> SyncResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let resources = ResourceRepo::new(self.store.pool());
        self.db.buffer_changes().await;
        let outcome = async {
            for id in ids {
                let Some(mut resource) = resources.get_by_doc_id(id, None).await? else {
                    return Err(SyncError::MissingResource { id: id.clone() });
                };
                let document = match self
                    .registry
                    .decrypt_document(&resource.resource_group_id, &resource.enc_content)
                    .await
                {
                    Ok(document) => document,
                    Err(err) => {
                        warn!(%id, error = %err, "failed to decrypt resource slated for removal");
                        continue;
                    }
                };
                resource.dirty = false;
                resource.removed = true;
                resources.update(&resource).await?;
                self.db.remove(&document, true).await?;
            }
            Ok(())
        }
        .await;
        self.db.flush_changes().await?;
        outcome
    }

    /// The authority has never seen these resources, so they go out dirty
    /// on the next push.
    async fn mark_for_push(&self, ids: &[String]) -> SyncResult<()> {
        let resources = ResourceRepo::new(self.store.pool());
        for id in ids {
            let Some(mut resource) = resources.get_by_doc_id(id, None).await? else {
                return Err(SyncError::MissingResource { id: id.clone() });
            };
            if resource.dirty {
                debug!(%id, "resource is already dirty");
                continue;
            }
            resource.dirty = true;
            resources.update(&resource).await?;
        }
        Ok(())
    }

    /// Walks every syncable document kind and stages resources for
    /// documents that have none yet, so brand-new workspaces start syncing
    /// without waiting for an edit.
    async fn create_missing_resources(&self) -> SyncResult<()> {
        let resources = ResourceRepo::new(self.store.pool());
        let known: HashSet<String> = resources
            .all()
            .await?
            .into_iter()
            .map(|resource| resource.id)
            .collect();
        for kind in DocumentKind::ALL {
            for document in self.db.list(kind).await? {
                if known.contains(&document.id) {
                    continue;
                }
                if document.is_private {
                    debug!(id = %document.id, "not creating resource for private document");
                    continue;
                }
                if let Err(err) = self.create_resource_for_document(&document).await {
                    error!(
                        id = %document.id,
                        error = %err,
                        "failed to create resource for document"
                    );
                }
            }
        }
        Ok(())
    }

    /// A workspace can end up with resources in more than one group after
    /// an interrupted first sync. The authority decides which groups
    /// survive and the rest are purged locally. Returns how many
    /// workspaces were repaired.
    pub async fn repair_duplicate_groups(&self) -> SyncResult<usize> {
        if !self.session.is_logged_in() {
            return Ok(0);
        }
        let resources = ResourceRepo::new(self.store.pool());
        let workspaces = self.db.list(DocumentKind::Workspace).await?;
        let mut repaired = 0;
        for workspace in &workspaces {
            let copies = resources.find_by_doc_id(&workspace.id).await?;
            if copies.len() <= 1 {
                continue;
            }
            let ids: Vec<String> = copies
                .iter()
                .map(|resource| resource.resource_group_id.clone())
                .collect();
            let response = self.client.fix_duplicate_groups(&ids).await?;
            for id in &response.delete_resource_group_ids {
                self.registry.purge_group(id).await?;
            }
            repaired += 1;
        }
        if repaired > 0 {
            debug!(
                repaired,
                total = workspaces.len(),
                "repaired duplicate workspace groups"
            );
        }
        Ok(repaired)
    }

    /// Clears every synced row. The documents themselves are left alone.
    pub async fn reset_local_data(&self) -> SyncResult<()> {
        ConfigRepo::new(self.store.pool()).delete_all().await?;
        ResourceRepo::new(self.store.pool()).delete_all().await?;
        self.store.mark_changed();
        Ok(())
    }

    /// Asks the authority to forget everything this account ever pushed.
    pub async fn reset_remote_data(&self) -> SyncResult<()> {
        self.client.reset_account().await
    }
}

fn display_name(document: &Document) -> String {
    if document.name.is_empty() {
        "n/a".to_string()
    } else {
        document.name.clone()
    }
}

fn type_disabled(config: &SyncConfig, type_id: &str) -> bool {
    (config.disable_client_certificates && type_id == DocumentKind::ClientCertificate.as_str())
        || (config.disable_cookie_jars && type_id == DocumentKind::CookieJar.as_str())
}

#[cfg(test)]
mod tests {
    use tether_core::config_key;
    use tether_core::SyncMode;

    use super::*;

    #[test]
    fn unnamed_documents_get_a_placeholder() {
        let mut doc = Document {
            id: "wrk_1".to_string(),
            kind: DocumentKind::Workspace,
            parent_id: None,
            name: String::new(),
            modified: 0,
            is_private: false,
            extra: serde_json::Map::new(),
        };
        assert_eq!(display_name(&doc), "n/a");
        doc.name = "Staging".to_string();
        assert_eq!(display_name(&doc), "Staging");
    }

    #[test]
    fn config_toggles_exclude_matching_types() {
        let config = SyncConfig {
            key: config_key("rg_1"),
            resource_group_id: "rg_1".to_string(),
            sync_mode: SyncMode::Active,
            disable_client_certificates: true,
            disable_cookie_jars: false,
        };
        assert!(type_disabled(&config, "ClientCertificate"));
        assert!(!type_disabled(&config, "CookieJar"));
        assert!(!type_disabled(&config, "Request"));
    }
}
