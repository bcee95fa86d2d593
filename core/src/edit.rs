//! Local edits as pure functions from one list value to the next.
//!
//! Timestamps come from the host (`now_ms`, epoch milliseconds). A change is
//! stamped with `max(now_ms, previous stamp + 1)` so it always orders after
//! the state the participant was looking at, even if their clock is behind
//! the other participant's.

use tracing::debug;
use uuid::Uuid;

use crate::error::{ListError, ListResult};
use crate::types::{ListItem, ToDoList};

impl ToDoList {
    /// Append an unchecked item with a fresh id. Returns the new list and
    /// the id assigned.
    pub fn add_item(&self, name: impl Into<String>) -> (ToDoList, String) {
        let id = Uuid::new_v4().to_string();
        let mut next = self.clone();
        next.items.push(ListItem::new(id.clone(), name));
        (next, id)
    }

    /// Check or uncheck an item on behalf of participant `by`.
    ///
    /// Setting the state an item already has is a no-op and does not move
    /// its timestamp.
    pub fn set_checked(
        &self,
        id: &str,
        checked: bool,
        by: &str,
        now_ms: u64,
    ) -> ListResult<ToDoList> {
        self.update_item(id, |item| {
            if item.checked == checked {
                return;
            }
            item.checked = checked;
            item.checked_by = by.to_string();
            item.checked_at = next_stamp(item.checked_at, now_ms);
        })
    }

    /// Mark an item deleted. The item stays in the list as a tombstone.
    pub fn delete_item(&self, id: &str, now_ms: u64) -> ListResult<ToDoList> {
        self.set_deleted(id, true, now_ms)
    }

    /// Undo a deletion.
    pub fn restore_item(&self, id: &str, now_ms: u64) -> ListResult<ToDoList> {
        self.set_deleted(id, false, now_ms)
    }

    pub fn rename(&self, name: impl Into<String>) -> ToDoList {
        ToDoList {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Fill in what a list needs before it goes into an outgoing message: a
    /// title (`fallback_name` when blank) and a creator (`author` when unset).
    pub fn prepare_for_send(&self, fallback_name: &str, author: &str) -> ToDoList {
        let mut next = self.clone();
        if next.name.trim().is_empty() {
            next.name = fallback_name.to_string();
        }
        if next.created_by.is_empty() {
            next.created_by = author.to_string();
        }
        next
    }

    /// Items that are not tombstoned, in list order.
    pub fn visible_items(&self) -> impl Iterator<Item = &ListItem> {
        self.items.iter().filter(|item| !item.deleted)
    }

    fn set_deleted(&self, id: &str, deleted: bool, now_ms: u64) -> ListResult<ToDoList> {
        self.update_item(id, |item| {
            if item.deleted == deleted {
                return;
            }
            item.deleted = deleted;
            item.deleted_at = next_stamp(item.deleted_at, now_ms);
        })
    }

    fn update_item(&self, id: &str, edit: impl FnOnce(&mut ListItem)) -> ListResult<ToDoList> {
        let mut next = self.clone();
        let item = next
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| ListError::UnknownItem(id.to_string()))?;
        edit(item);
        debug!(id, "edited item");
        Ok(next)
    }
}

fn next_stamp(previous: u64, now_ms: u64) -> u64 {
    now_ms.max(previous.saturating_add(1))
}
