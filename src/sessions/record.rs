use std::ops::Add;
use std::sync::Arc;

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionStats {
    pub documents: u64,
    pub text_nodes: u64,
    pub images: u64,
    pub websites: u64,
    pub total_words: u64,
}

impl SessionStats {
    pub fn content_items(self) -> u64 {
        self.documents + self.text_nodes + self.images + self.websites
    }
}

impl Add for SessionStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            documents: self.documents.saturating_add(other.documents),
            text_nodes: self.text_nodes.saturating_add(other.text_nodes),
            images: self.images.saturating_add(other.images),
            websites: self.websites.saturating_add(other.websites),
            total_words: self.total_words.saturating_add(other.total_words),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub node_count: u32,
    #[serde(default)]
    pub stats: SessionStats,
    #[serde(default)]
    pub last_modified: i64,
}

/// Immutable list of sessions as delivered by a source.
///
/// Identity is the shared allocation: clones compare as the same snapshot,
/// while every fresh load is a new one even if the records are equal.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    records: Arc<[SessionRecord]>,
}

impl SessionSnapshot {
    pub fn new(records: Vec<SessionRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}
