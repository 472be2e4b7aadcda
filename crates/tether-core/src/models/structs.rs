use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::{ChangeOp, DocumentKind};

/// A document as the host application stores it. Only the fields sync cares
/// about are typed; everything else rides along in `extra` and survives the
/// encrypt/decrypt round trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    #[serde(rename = "parentId", default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub modified: i64,
    #[serde(rename = "isPrivate", default)]
    pub is_private: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One item from the host database's change feed.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    pub op: ChangeOp,
    pub document: Document,
    pub from_sync: bool,
}
