//! Request and response bodies exchanged with the sync authority. Field
//! names follow the authority's JSON contract, so everything here carries
//! camelCase renames.

use serde::{Deserialize, Serialize};
use tether_core::resource_key;
use tether_store::local::Resource;

/// One resource as it travels over the wire, both in push batches and in
/// the full records the authority sends back. The local storage key and
/// dirty flag never leave the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub id: String,
    pub resource_group_id: String,
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub last_edited: i64,
    #[serde(default)]
    pub last_edited_by: String,
    #[serde(default)]
    pub removed: bool,
    #[serde(default)]
    pub enc_content: String,
}

impl ResourceRecord {
    /// Materialize a server record as a local store row. The storage key is
    /// recomputed here, so a record always lands on the deterministic slot
    /// for its (group, document) pair.
    pub fn to_resource(&self, dirty: bool) -> Resource {
        Resource {
            key: resource_key(&self.resource_group_id, &self.id),
            id: self.id.clone(),
            resource_group_id: self.resource_group_id.clone(),
            version: self.version.clone(),
            name: self.name.clone(),
            type_id: self.type_id.clone(),
            created_by: self.created_by.clone(),
            last_edited: self.last_edited,
            last_edited_by: self.last_edited_by.clone(),
            removed: self.removed,
            dirty,
            enc_content: self.enc_content.clone(),
        }
    }
}

impl From<&Resource> for ResourceRecord {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id.clone(),
            resource_group_id: resource.resource_group_id.clone(),
            version: resource.version.clone(),
            name: resource.name.clone(),
            type_id: resource.type_id.clone(),
            created_by: resource.created_by.clone(),
            last_edited: resource.last_edited,
            last_edited_by: resource.last_edited_by.clone(),
            removed: resource.removed,
            enc_content: resource.enc_content.clone(),
        }
    }
}

/// Server acknowledgement carrying the version it assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionAck {
    pub id: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushResponse {
    #[serde(default)]
    pub updated: Vec<VersionAck>,
    #[serde(default)]
    pub created: Vec<VersionAck>,
    #[serde(default)]
    pub removed: Vec<VersionAck>,
    #[serde(default)]
    pub conflicts: Vec<ResourceRecord>,
}

/// The slim shape sent for every active resource when pulling, enough for
/// the authority to diff against its own state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStub {
    pub id: String,
    pub resource_group_id: String,
    pub version: String,
    pub removed: bool,
}

impl From<&Resource> for ResourceStub {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id.clone(),
            resource_group_id: resource.resource_group_id.clone(),
            version: resource.version.clone(),
            removed: resource.removed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub resources: Vec<ResourceStub>,
    pub blacklist: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    #[serde(default)]
    pub updated_resources: Vec<ResourceRecord>,
    #[serde(default)]
    pub created_resources: Vec<ResourceRecord>,
    #[serde(default)]
    pub ids_to_push: Vec<String>,
    #[serde(default)]
    pub ids_to_remove: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixDupesRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixDupesResponse {
    #[serde(default)]
    pub delete_resource_group_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub parent_resource_id: String,
    pub name: String,
    pub enc_symmetric_key: String,
}

/// A resource group as the authority stores it. The symmetric key arrives
/// wrapped for this account and stays wrapped until the registry needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub enc_symmetric_key: String,
    #[serde(default)]
    pub is_disabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> ResourceRecord {
        ResourceRecord {
            id: "req_1".to_string(),
            resource_group_id: "rg_1".to_string(),
            version: "v1".to_string(),
            name: "List users".to_string(),
            type_id: "Request".to_string(),
            created_by: "acct_1".to_string(),
            last_edited: 1_700_000_000_000,
            last_edited_by: "acct_1".to_string(),
            removed: false,
            enc_content: "{}".to_string(),
        }
    }

    #[test]
    fn record_serializes_with_wire_names() {
        let value = serde_json::to_value(record()).expect("to_value");
        assert_eq!(value["id"], json!("req_1"));
        assert_eq!(value["resourceGroupId"], json!("rg_1"));
        assert_eq!(value["type"], json!("Request"));
        assert_eq!(value["lastEditedBy"], json!("acct_1"));
        assert_eq!(value["encContent"], json!("{}"));
        assert!(value.get("dirty").is_none());
        assert!(value.get("key").is_none());
    }

    #[test]
    fn record_roundtrips_through_store_row() {
        let original = record();
        let row = original.to_resource(true);
        assert!(row.dirty);
        assert_eq!(row.key, resource_key("rg_1", "req_1"));
        assert_eq!(ResourceRecord::from(&row), original);
    }

    #[test]
    fn responses_tolerate_sparse_json() {
        let push: PushResponse = serde_json::from_str("{}").expect("push");
        assert!(push.updated.is_empty() && push.conflicts.is_empty());

        let pull: PullResponse = serde_json::from_str("{}").expect("pull");
        assert!(pull.created_resources.is_empty() && pull.ids_to_remove.is_empty());

        let dupes: FixDupesResponse = serde_json::from_str("{}").expect("dupes");
        assert!(dupes.delete_resource_group_ids.is_empty());
    }

    #[test]
    fn stub_and_group_follow_wire_names() {
        let stub = ResourceStub {
            id: "wrk_1".to_string(),
            resource_group_id: "rg_1".to_string(),
            version: "__NO_VERSION__".to_string(),
            removed: false,
        };
        let value = serde_json::to_value(stub).expect("stub");
        assert_eq!(value["resourceGroupId"], json!("rg_1"));

        let group: ResourceGroup = serde_json::from_value(json!({
            "id": "rg_1",
            "encSymmetricKey": "aabb"
        }))
        .expect("group");
        assert_eq!(group.id, "rg_1");
        assert!(group.name.is_empty());
        assert!(!group.is_disabled);
    }
}
