//! Shared to-do list protocol for a Messages extension.
//!
//! # Overview
//! A list travels between participants as a link attached to a chat
//! message. This crate turns lists into links and back (`ListCodec`) and
//! reconciles the copy a participant holds with the copy that just arrived
//! (`ListMerger`). The host does all I/O: it pulls links out of messages,
//! hands them in, and attaches the links it gets back.
//!
//! # Design
//! - Everything is a pure, synchronous function over immutable values.
//!   Nothing here blocks, allocates global state, or needs a lock.
//! - Conflicts are resolved with per-item logical timestamps, never by
//!   arrival order.
//! - Deletions are tombstones so a merge can never bring an item back, or
//!   lose one, by accident.
//! - The payload carries a format version; unknown fields are ignored.

pub mod codec;
pub mod config;
pub mod edit;
pub mod error;
pub mod merge;
pub mod types;

pub use codec::{ListCodec, FORMAT_VERSION};
pub use config::CodecConfig;
pub use error::{Limit, ListError, ListResult};
pub use merge::{sort_items, ListMerger};
pub use types::{Link, ListItem, ToDoList};
