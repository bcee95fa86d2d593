//! Value types for a shared to-do list.
//!
//! # Design
//! `ToDoList` and `ListItem` are plain immutable values. Every edit builds a
//! new list (see `edit.rs`), so the host owns observation and reactivity and
//! the core never holds a list between calls.
//!
//! The serde attributes here are the wire layout of an item. Fields at their
//! default value are omitted on encode and restored on decode, which keeps
//! links short without losing anything.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ListError, ListResult};

/// One row of a shared list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub checked: bool,
    /// Participant who last changed `checked`; empty if never checked.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub checked_by: String,
    /// Logical time of the last change to `checked`; 0 if never checked.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub checked_at: u64,
    /// Tombstone. Deleted items stay in the list so merges cannot resurrect
    /// them by accident.
    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub deleted_at: u64,
}

impl ListItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            checked: false,
            checked_by: String::new(),
            checked_at: 0,
            deleted: false,
            deleted_at: 0,
        }
    }
}

/// A shared list as carried in one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToDoList {
    pub name: String,
    /// Participant who created the list. Never changes once set.
    pub created_by: String,
    /// Display order.
    pub items: Vec<ListItem>,
}

impl ToDoList {
    /// A fresh, untitled list with no items.
    pub fn new(created_by: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            created_by: created_by.into(),
            items: Vec::new(),
        }
    }

    pub fn item(&self, id: &str) -> Option<&ListItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Reject empty or repeated item ids.
    pub fn validate_ids(&self) -> ListResult<()> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if item.id.is_empty() {
                return Err(ListError::MalformedPayload("item with empty id".into()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(ListError::DuplicateItemId(item.id.clone()));
            }
        }
        Ok(())
    }
}

/// The URL form of a list, as attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link(String);

impl Link {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Link {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
