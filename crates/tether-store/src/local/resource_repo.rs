use tether_core::{resource_key, SyncMode};

use crate::local::Resource;
use crate::SqlitePool;

pub struct ResourceRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ResourceRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert under the deterministic key. A second insert for the same
    /// (group, doc) pair overwrites the row instead of duplicating it.
    pub async fn insert(&self, resource: &Resource) -> Result<(), sqlx_core::Error> {
        let key = resource_key(&resource.resource_group_id, &resource.id);
        query!(
            r#"
            INSERT INTO resources (
                key, doc_id, resource_group_id, version, name, type_id, created_by,
                last_edited, last_edited_by, removed, dirty, enc_content
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(key) DO UPDATE SET
                version = excluded.version,
                name = excluded.name,
                type_id = excluded.type_id,
                created_by = excluded.created_by,
                last_edited = excluded.last_edited,
                last_edited_by = excluded.last_edited_by,
                removed = excluded.removed,
                dirty = excluded.dirty,
                enc_content = excluded.enc_content
            "#,
            key.as_str(),
            resource.id.as_str(),
            resource.resource_group_id.as_str(),
            resource.version.as_str(),
            resource.name.as_str(),
            resource.type_id.as_str(),
            resource.created_by.as_str(),
            resource.last_edited,
            resource.last_edited_by.as_str(),
            resource.removed,
            resource.dirty,
            resource.enc_content.as_str()
        )
        .execute(self.pool)
        .await
        .map(|_| ())
    }

    pub async fn update(&self, resource: &Resource) -> Result<u64, sqlx_core::Error> {
        query!(
            r#"
            UPDATE resources
            SET doc_id = ?2,
                resource_group_id = ?3,
                version = ?4,
                name = ?5,
                type_id = ?6,
                created_by = ?7,
                last_edited = ?8,
                last_edited_by = ?9,
                removed = ?10,
                dirty = ?11,
                enc_content = ?12
            WHERE key = ?1
            "#,
            resource.key.as_str(),
            resource.id.as_str(),
            resource.resource_group_id.as_str(),
            resource.version.as_str(),
            resource.name.as_str(),
            resource.type_id.as_str(),
            resource.created_by.as_str(),
            resource.last_edited,
            resource.last_edited_by.as_str(),
            resource.removed,
            resource.dirty,
            resource.enc_content.as_str()
        )
        .execute(self.pool)
        .await
        .map(|result| result.rows_affected())
    }

    pub async fn get(&self, key: &str) -> Result<Option<Resource>, sqlx_core::Error> {
        query_as!(
            Resource,
            r#"
            SELECT
                key, doc_id, resource_group_id, version, name, type_id, created_by,
                last_edited, last_edited_by, removed, dirty, enc_content
            FROM resources
            WHERE key = ?1
            "#,
            key
        )
        .fetch_optional(self.pool)
        .await
    }

    pub async fn get_by_doc_id(
        &self,
        doc_id: &str,
        resource_group_id: Option<&str>,
    ) -> Result<Option<Resource>, sqlx_core::Error> {
        if let Some(resource_group_id) = resource_group_id {
            query_as!(
                Resource,
                r#"
                SELECT
                    key, doc_id, resource_group_id, version, name, type_id, created_by,
                    last_edited, last_edited_by, removed, dirty, enc_content
                FROM resources
                WHERE doc_id = ?1 AND resource_group_id = ?2
                "#,
                doc_id,
                resource_group_id
            )
            .fetch_optional(self.pool)
            .await
        } else {
            query_as!(
                Resource,
                r#"
                SELECT
                    key, doc_id, resource_group_id, version, name, type_id, created_by,
                    last_edited, last_edited_by, removed, dirty, enc_content
                FROM resources
                WHERE doc_id = ?1
                "#,
                doc_id
            )
            .fetch_optional(self.pool)
            .await
        }
    }

    /// Every resource claiming this doc id, across groups. More than one row
    /// means a duplicate-group problem.
    pub async fn find_by_doc_id(&self, doc_id: &str) -> Result<Vec<Resource>, sqlx_core::Error> {
        query_as!(
            Resource,
            r#"
            SELECT
                key, doc_id, resource_group_id, version, name, type_id, created_by,
                last_edited, last_edited_by, removed, dirty, enc_content
            FROM resources
            WHERE doc_id = ?1
            ORDER BY resource_group_id
            "#,
            doc_id
        )
        .fetch_all(self.pool)
        .await
    }

    pub async fn all(&self) -> Result<Vec<Resource>, sqlx_core::Error> {
        query_as!(
            Resource,
            r#"
            SELECT
                key, doc_id, resource_group_id, version, name, type_id, created_by,
                last_edited, last_edited_by, removed, dirty, enc_content
            FROM resources
            "#
        )
        .fetch_all(self.pool)
        .await
    }

    /// Resources in groups whose config is set to active sync.
    pub async fn all_active(&self) -> Result<Vec<Resource>, sqlx_core::Error> {
        query_as!(
            Resource,
            r#"
            SELECT
                r.key, r.doc_id, r.resource_group_id, r.version, r.name, r.type_id,
                r.created_by, r.last_edited, r.last_edited_by, r.removed, r.dirty,
                r.enc_content
            FROM resources r
            JOIN sync_configs c ON c.resource_group_id = r.resource_group_id
            WHERE c.sync_mode = ?1
            "#,
            SyncMode::Active.as_i32()
        )
        .fetch_all(self.pool)
        .await
    }

    /// Resources for one named group. The sync mode filter does not apply
    /// here: naming a group explicitly means sync it.
    pub async fn active_for_group(
        &self,
        resource_group_id: &str,
    ) -> Result<Vec<Resource>, sqlx_core::Error> {
        query_as!(
            Resource,
            r#"
            SELECT
                key, doc_id, resource_group_id, version, name, type_id, created_by,
                last_edited, last_edited_by, removed, dirty, enc_content
            FROM resources
            WHERE resource_group_id = ?1
            "#,
            resource_group_id
        )
        .fetch_all(self.pool)
        .await
    }

    pub async fn find_active_dirty(&self) -> Result<Vec<Resource>, sqlx_core::Error> {
        query_as!(
            Resource,
            r#"
            SELECT
                r.key, r.doc_id, r.resource_group_id, r.version, r.name, r.type_id,
                r.created_by, r.last_edited, r.last_edited_by, r.removed, r.dirty,
                r.enc_content
            FROM resources r
            JOIN sync_configs c ON c.resource_group_id = r.resource_group_id
            WHERE c.sync_mode = ?1 AND r.dirty = 1
            "#,
            SyncMode::Active.as_i32()
        )
        .fetch_all(self.pool)
        .await
    }

    pub async fn find_dirty_for_group(
        &self,
        resource_group_id: &str,
    ) -> Result<Vec<Resource>, sqlx_core::Error> {
        query_as!(
            Resource,
            r#"
            SELECT
                key, doc_id, resource_group_id, version, name, type_id, created_by,
                last_edited, last_edited_by, removed, dirty, enc_content
            FROM resources
            WHERE resource_group_id = ?1 AND dirty = 1
            "#,
            resource_group_id
        )
        .fetch_all(self.pool)
        .await
    }

    pub async fn remove(&self, key: &str) -> Result<u64, sqlx_core::Error> {
        query!(r#"DELETE FROM resources WHERE key = ?1"#, key)
            .execute(self.pool)
            .await
            .map(|result| result.rows_affected())
    }

    pub async fn remove_group(&self, resource_group_id: &str) -> Result<u64, sqlx_core::Error> {
        query!(
            r#"DELETE FROM resources WHERE resource_group_id = ?1"#,
            resource_group_id
        )
        .execute(self.pool)
        .await
        .map(|result| result.rows_affected())
    }

    pub async fn delete_all(&self) -> Result<u64, sqlx_core::Error> {
        query!(r#"DELETE FROM resources"#)
            .execute(self.pool)
            .await
            .map(|result| result.rows_affected())
    }
}
