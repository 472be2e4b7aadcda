#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use tether_core::{
    resource_key, AccountSession, ChangeOp, Document, DocumentChange, DocumentDb,
    DocumentDbResult, DocumentKind, SessionResult, NO_VERSION,
};
use tether_crypto::{
    generate_account_key_pair, wrap_symmetric_key, PrivateKeyJwk, PublicKeyJwk, SymmetricKey,
};
use tether_store::local::Resource;
use tether_store::{connect_with_max, migrate, StoreHandle};
use tether_sync::{EngineOptions, SyncEngine};

static ACCOUNT_KEYS: OnceLock<(PublicKeyJwk, PrivateKeyJwk)> = OnceLock::new();

/// Key generation is slow, so every test shares one account pair.
fn account_keys() -> &'static (PublicKeyJwk, PrivateKeyJwk) {
    ACCOUNT_KEYS.get_or_init(|| generate_account_key_pair().expect("account key pair"))
}

/// In-memory stand-in for the host application's document database.
pub struct MemoryDb {
    docs: Mutex<HashMap<String, Document>>,
    feed: broadcast::Sender<DocumentChange>,
    buffering: AtomicBool,
    held: Mutex<Vec<DocumentChange>>,
}

impl MemoryDb {
    pub fn new() -> Arc<Self> {
        let (feed, _) = broadcast::channel(64);
        Arc::new(Self {
            docs: Mutex::new(HashMap::new()),
            feed,
            buffering: AtomicBool::new(false),
            held: Mutex::new(Vec::new()),
        })
    }

    /// Insert without emitting a change event, as if the document existed
    /// before the engine came up.
    pub fn seed(&self, document: Document) {
        self.docs
            .lock()
            .expect("docs lock")
            .insert(document.id.clone(), document);
    }

    pub fn document(&self, id: &str) -> Option<Document> {
        self.docs.lock().expect("docs lock").get(id).cloned()
    }

    fn emit(&self, op: ChangeOp, document: &Document, from_sync: bool) {
        let change = DocumentChange {
            op,
            document: document.clone(),
            from_sync,
        };
        if self.buffering.load(Ordering::SeqCst) {
            self.held.lock().expect("held lock").push(change);
        } else {
            let _ = self.feed.send(change);
        }
    }
}

#[async_trait]
impl DocumentDb for MemoryDb {
    async fn get(&self, kind: DocumentKind, id: &str) -> DocumentDbResult<Option<Document>> {
        Ok(self
            .docs
            .lock()
            .expect("docs lock")
            .get(id)
            .filter(|doc| doc.kind == kind)
            .cloned())
    }

    async fn list(&self, kind: DocumentKind) -> DocumentDbResult<Vec<Document>> {
        let mut docs: Vec<Document> = self
            .docs
            .lock()
            .expect("docs lock")
            .values()
            .filter(|doc| doc.kind == kind)
            .cloned()
            .collect();
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(docs)
    }

    async fn upsert(&self, document: &Document, from_sync: bool) -> DocumentDbResult<()> {
        self.docs
            .lock()
            .expect("docs lock")
            .insert(document.id.clone(), document.clone());
        self.emit(ChangeOp::Upsert, document, from_sync);
        Ok(())
    }

    async fn remove(&self, document: &Document, from_sync: bool) -> DocumentDbResult<()> {
        self.docs.lock().expect("docs lock").remove(&document.id);
        self.emit(ChangeOp::Remove, document, from_sync);
        Ok(())
    }

    async fn ancestors(&self, document: &Document) -> DocumentDbResult<Vec<Document>> {
        let docs = self.docs.lock().expect("docs lock");
        let mut chain = vec![document.clone()];
        let mut cursor = document.parent_id.clone();
        while let Some(parent_id) = cursor {
            let Some(parent) = docs.get(&parent_id) else {
                break;
            };
            chain.push(parent.clone());
            cursor = parent.parent_id.clone();
        }
        Ok(chain)
    }

    async fn buffer_changes(&self) {
        self.buffering.store(true, Ordering::SeqCst);
    }

    async fn flush_changes(&self) -> DocumentDbResult<()> {
        self.buffering.store(false, Ordering::SeqCst);
        for change in self.held.lock().expect("held lock").drain(..) {
            let _ = self.feed.send(change);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<DocumentChange> {
        self.feed.subscribe()
    }
}

pub struct TestSession {
    account_id: String,
    token: String,
    logged_in: AtomicBool,
}

impl TestSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            account_id: "acct_test".to_string(),
            token: "tok_test".to_string(),
            logged_in: AtomicBool::new(true),
        })
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.logged_in.store(logged_in, Ordering::SeqCst);
    }

    pub fn public_jwk() -> PublicKeyJwk {
        account_keys().0.clone()
    }
}

#[async_trait]
impl AccountSession for TestSession {
    fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    fn account_id(&self) -> SessionResult<String> {
        Ok(self.account_id.clone())
    }

    fn token(&self) -> SessionResult<String> {
        Ok(self.token.clone())
    }

    fn public_key(&self) -> SessionResult<PublicKeyJwk> {
        Ok(account_keys().0.clone())
    }

    async fn private_key(&self) -> SessionResult<PrivateKeyJwk> {
        Ok(account_keys().1.clone())
    }
}

pub async fn open_store() -> Arc<StoreHandle> {
    let db_path = std::env::temp_dir().join(format!(
        "tether-sync-test-{}.sqlite",
        Uuid::now_v7().simple()
    ));
    let db_url = format!("sqlite://{}", db_path.display());
    let pool = connect_with_max(&db_url, 1).await.expect("sqlite");
    migrate(&pool).await.expect("migrate");
    Arc::new(StoreHandle::new(pool))
}

pub struct Harness {
    pub db: Arc<MemoryDb>,
    pub session: Arc<TestSession>,
    pub store: Arc<StoreHandle>,
    pub engine: Arc<SyncEngine>,
}

pub async fn harness(options: EngineOptions) -> Harness {
    let db = MemoryDb::new();
    let session = TestSession::new();
    let store = open_store().await;
    let engine = SyncEngine::new(
        options,
        Arc::clone(&db) as Arc<dyn DocumentDb>,
        Arc::clone(&session) as Arc<dyn AccountSession>,
        Arc::clone(&store),
    );
    Harness {
        db,
        session,
        store,
        engine,
    }
}

pub fn doc(kind: DocumentKind, id: &str, parent_id: Option<&str>, name: &str) -> Document {
    Document {
        id: id.to_string(),
        kind,
        parent_id: parent_id.map(str::to_string),
        name: name.to_string(),
        modified: 1_700_000_000_000,
        is_private: false,
        extra: serde_json::Map::new(),
    }
}

pub fn encrypt_content(key: &SymmetricKey, document: &Document) -> String {
    let plaintext = serde_json::to_string(document).expect("serialize document");
    tether_crypto::encrypt(key, &plaintext, "")
        .expect("encrypt document")
        .to_json()
        .expect("envelope json")
}

/// Wire JSON for a resource group whose key is wrapped for the test account.
pub fn group_json(id: &str, key: &SymmetricKey) -> serde_json::Value {
    let enc_symmetric_key =
        wrap_symmetric_key(&TestSession::public_jwk(), key).expect("wrap group key");
    serde_json::json!({
        "id": id,
        "name": "Test Group",
        "encSymmetricKey": enc_symmetric_key,
        "isDisabled": false,
    })
}

/// A local resource row staged from `document`, dirty and never pushed.
pub fn resource_row(document: &Document, group: &str, key: &SymmetricKey) -> Resource {
    Resource {
        key: resource_key(group, &document.id),
        id: document.id.clone(),
        resource_group_id: group.to_string(),
        version: NO_VERSION.to_string(),
        name: document.name.clone(),
        type_id: document.kind.as_str().to_string(),
        created_by: "acct_test".to_string(),
        last_edited: document.modified,
        last_edited_by: "acct_test".to_string(),
        removed: false,
        dirty: true,
        enc_content: encrypt_content(key, document),
    }
}

/// Wire JSON for a record as the authority would send it.
pub fn record_json(
    document: &Document,
    group: &str,
    key: &SymmetricKey,
    version: &str,
    last_edited: i64,
) -> serde_json::Value {
    serde_json::json!({
        "id": document.id,
        "resourceGroupId": group,
        "version": version,
        "name": document.name,
        "type": document.kind.as_str(),
        "createdBy": "acct_remote",
        "lastEdited": last_edited,
        "lastEditedBy": "acct_remote",
        "removed": false,
        "encContent": encrypt_content(key, document),
    })
}
