use sqlx_core::row::Row;
use sqlx_sqlite::SqliteRow;
use tether_core::SyncMode;

/// Encrypted mirror of one document: what is stored locally and pushed to
/// the authority. `key` is the deterministic storage key, `id` the owned
/// document's id, `enc_content` the envelope JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub key: String,
    pub id: String,
    pub resource_group_id: String,
    pub version: String,
    pub name: String,
    pub type_id: String,
    pub created_by: String,
    pub last_edited: i64,
    pub last_edited_by: String,
    pub removed: bool,
    pub dirty: bool,
    pub enc_content: String,
}

/// Per-group sync policy. Lives next to the resources it governs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub key: String,
    pub resource_group_id: String,
    pub sync_mode: SyncMode,
    pub disable_client_certificates: bool,
    pub disable_cookie_jars: bool,
}

impl sqlx_core::from_row::FromRow<'_, SqliteRow> for Resource {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx_core::Error> {
        Ok(Self {
            key: row.try_get("key")?,
            id: row.try_get("doc_id")?,
            resource_group_id: row.try_get("resource_group_id")?,
            version: row.try_get("version")?,
            name: row.try_get("name")?,
            type_id: row.try_get("type_id")?,
            created_by: row.try_get("created_by")?,
            last_edited: row.try_get("last_edited")?,
            last_edited_by: row.try_get("last_edited_by")?,
            removed: row.try_get("removed")?,
            dirty: row.try_get("dirty")?,
            enc_content: row.try_get("enc_content")?,
        })
    }
}

impl sqlx_core::from_row::FromRow<'_, SqliteRow> for SyncConfig {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx_core::Error> {
        let sync_mode: i32 = row.try_get("sync_mode")?;
        Ok(Self {
            key: row.try_get("key")?,
            resource_group_id: row.try_get("resource_group_id")?,
            sync_mode: SyncMode::try_from(sync_mode)
                .map_err(|err| sqlx_core::Error::Decode(Box::new(err)))?,
            disable_client_certificates: row.try_get("disable_client_certificates")?,
            disable_cookie_jars: row.try_get("disable_cookie_jars")?,
        })
    }
}
