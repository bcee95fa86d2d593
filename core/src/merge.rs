//! Reconciliation of two copies of the same shared list.
//!
//! # Design
//! Message delivery is not FIFO, so arrival order says nothing about which
//! edit is newer. Each mutable item field instead carries a logical
//! timestamp and the merge keeps the larger one:
//!
//! - check state is ordered by `(checkedAt, checkedBy, checked)`
//! - tombstones are ordered by `(deletedAt, deleted)`
//!
//! Both are total orders, so per-item resolution is the same no matter which
//! side is called local. Items present on one side only are always kept.
//!
//! The list title has no timestamp. Remote is the newer wire state, so its
//! title wins whenever it is not blank.
//!
//! `merge` is pure and remembers nothing; `reconcile` is `merge` followed by
//! `sort_items`.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::ListResult;
use crate::types::{ListItem, ToDoList};

/// Namespace for the merge operations. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListMerger;

impl ListMerger {
    /// Resolve `local` against `remote` item by item, without sorting.
    ///
    /// Result order is local's items in local order, then remote-only items
    /// in remote order. Fails only if an input repeats an item id.
    ///
    /// Item state is symmetric, but order and item names are not: swapping
    /// the arguments gives the same list only when both sides hold the same
    /// ids in the same order with the same names. Items each side added on
    /// its own end up in different positions on each device.
    pub fn merge(local: &ToDoList, remote: &ToDoList) -> ListResult<ToDoList> {
        local.validate_ids()?;
        remote.validate_ids()?;

        let theirs: HashMap<&str, &ListItem> = remote
            .items
            .iter()
            .map(|item| (item.id.as_str(), item))
            .collect();

        let mut items = Vec::with_capacity(local.items.len().max(remote.items.len()));
        let mut conflicts = 0usize;
        for ours in &local.items {
            match theirs.get(ours.id.as_str()) {
                Some(other) => {
                    let merged = merge_item(ours, other);
                    if merged != *ours {
                        conflicts += 1;
                    }
                    items.push(merged);
                }
                None => items.push(ours.clone()),
            }
        }

        let local_ids: HashSet<&str> = local.items.iter().map(|item| item.id.as_str()).collect();
        let before = items.len();
        items.extend(
            remote
                .items
                .iter()
                .filter(|item| !local_ids.contains(item.id.as_str()))
                .cloned(),
        );

        let name = if remote.name.trim().is_empty() {
            local.name.clone()
        } else {
            remote.name.clone()
        };
        let created_by = if local.created_by.is_empty() {
            remote.created_by.clone()
        } else {
            local.created_by.clone()
        };

        debug!(
            local = local.items.len(),
            remote = remote.items.len(),
            added = items.len() - before,
            resolved = conflicts,
            "merged lists"
        );
        Ok(ToDoList {
            name,
            created_by,
            items,
        })
    }

    /// Merge, then apply the display sort.
    pub fn reconcile(local: &ToDoList, remote: &ToDoList) -> ListResult<ToDoList> {
        Self::merge(local, remote).map(sort_items)
    }
}

/// Unchecked items first in their existing order, then checked items by
/// `checkedAt` ascending. Ties keep their existing order.
pub fn sort_items(mut list: ToDoList) -> ToDoList {
    let (mut checked, mut unchecked): (Vec<ListItem>, Vec<ListItem>) =
        std::mem::take(&mut list.items)
            .into_iter()
            .partition(|item| item.checked);
    checked.sort_by_key(|item| item.checked_at);
    unchecked.append(&mut checked);
    list.items = unchecked;
    list
}

fn check_stamp(item: &ListItem) -> (u64, &str, bool) {
    (item.checked_at, item.checked_by.as_str(), item.checked)
}

fn delete_stamp(item: &ListItem) -> (u64, bool) {
    (item.deleted_at, item.deleted)
}

/// Identity and name come from `ours`; each stamped field takes the newer
/// side.
fn merge_item(ours: &ListItem, theirs: &ListItem) -> ListItem {
    let mut merged = ours.clone();

    if check_stamp(theirs) > check_stamp(ours) {
        trace!(
            id = %ours.id,
            ours = ours.checked_at,
            theirs = theirs.checked_at,
            "remote check state wins"
        );
        merged.checked = theirs.checked;
        merged.checked_by = theirs.checked_by.clone();
        merged.checked_at = theirs.checked_at;
    }

    if delete_stamp(theirs) > delete_stamp(ours) {
        trace!(
            id = %ours.id,
            ours = ours.deleted_at,
            theirs = theirs.deleted_at,
            "remote tombstone wins"
        );
        merged.deleted = theirs.deleted;
        merged.deleted_at = theirs.deleted_at;
    }

    merged
}
