use tether_core::{config_key, SyncMode};

use crate::local::SyncConfig;
use crate::SqlitePool;

pub struct ConfigRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ConfigRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(
        &self,
        resource_group_id: &str,
    ) -> Result<Option<SyncConfig>, sqlx_core::Error> {
        query_as!(
            SyncConfig,
            r#"
            SELECT
                key, resource_group_id, sync_mode, disable_client_certificates,
                disable_cookie_jars
            FROM sync_configs
            WHERE resource_group_id = ?1
            "#,
            resource_group_id
        )
        .fetch_optional(self.pool)
        .await
    }

    pub async fn insert(&self, config: &SyncConfig) -> Result<(), sqlx_core::Error> {
        let key = config_key(&config.resource_group_id);
        query!(
            r#"
            INSERT INTO sync_configs (
                key, resource_group_id, sync_mode, disable_client_certificates,
                disable_cookie_jars
            )
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            key.as_str(),
            config.resource_group_id.as_str(),
            config.sync_mode.as_i32(),
            config.disable_client_certificates,
            config.disable_cookie_jars
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn update(&self, config: &SyncConfig) -> Result<u64, sqlx_core::Error> {
        query!(
            r#"
            UPDATE sync_configs
            SET resource_group_id = ?2,
                sync_mode = ?3,
                disable_client_certificates = ?4,
                disable_cookie_jars = ?5
            WHERE key = ?1
            "#,
            config.key.as_str(),
            config.resource_group_id.as_str(),
            config.sync_mode.as_i32(),
            config.disable_client_certificates,
            config.disable_cookie_jars
        )
        .execute(self.pool)
        .await
        .map(|result| result.rows_affected())
    }

    pub async fn upsert(&self, config: &SyncConfig) -> Result<(), sqlx_core::Error> {
        let key = config_key(&config.resource_group_id);
        query!(
            r#"
            INSERT INTO sync_configs (
                key, resource_group_id, sync_mode, disable_client_certificates,
                disable_cookie_jars
            )
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(key) DO UPDATE SET
                sync_mode = excluded.sync_mode,
                disable_client_certificates = excluded.disable_client_certificates,
                disable_cookie_jars = excluded.disable_cookie_jars
            "#,
            key.as_str(),
            config.resource_group_id.as_str(),
            config.sync_mode.as_i32(),
            config.disable_client_certificates,
            config.disable_cookie_jars
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn all(&self) -> Result<Vec<SyncConfig>, sqlx_core::Error> {
        query_as!(
            SyncConfig,
            r#"
            SELECT
                key, resource_group_id, sync_mode, disable_client_certificates,
                disable_cookie_jars
            FROM sync_configs
            ORDER BY resource_group_id
            "#
        )
        .fetch_all(self.pool)
        .await
    }

    /// Configs whose groups sit on the pull blacklist during a full sync.
    pub async fn find_inactive(&self) -> Result<Vec<SyncConfig>, sqlx_core::Error> {
        query_as!(
            SyncConfig,
            r#"
            SELECT
                key, resource_group_id, sync_mode, disable_client_certificates,
                disable_cookie_jars
            FROM sync_configs
            WHERE sync_mode != ?1
            ORDER BY resource_group_id
            "#,
            SyncMode::Active.as_i32()
        )
        .fetch_all(self.pool)
        .await
    }

    pub async fn remove(&self, resource_group_id: &str) -> Result<u64, sqlx_core::Error> {
        query!(
            r#"DELETE FROM sync_configs WHERE resource_group_id = ?1"#,
            resource_group_id
        )
        .execute(self.pool)
        .await
        .map(|result| result.rows_affected())
    }

    pub async fn delete_all(&self) -> Result<u64, sqlx_core::Error> {
        query!(r#"DELETE FROM sync_configs"#)
            .execute(self.pool)
            .await
            .map(|result| result.rows_affected())
    }
}
