//! C-ABI wrapper around `thyme-core`.
//!
//! # Overview
//! Exposes the shared-list codec, merge, and edit operations through
//! `extern "C"` functions so the Messages extension can call them from
//! Swift. The host keeps doing all I/O: it extracts links from messages,
//! passes them in, and attaches the links it gets back.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A single `FfiListResult` envelope with `FfiDataTag` + `void* data`
//!   conveys lists, links, and errors uniformly.
//! - Input lists are borrowed: the FFI layer copies them and never frees
//!   them. Every returned pointer is owned by the caller and must be released
//!   with the matching `thyme_*_free` / `thyme_free_*` function.
//! - Timestamps (`now_ms`) and participant ids are always supplied by the
//!   host.

pub mod types;

use std::os::raw::c_char;
use std::panic::catch_unwind;

use thyme_core::{sort_items, CodecConfig, Link, ListCodec, ListMerger, ListResult, ToDoList};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use types::*;

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a `tracing` subscriber that writes to stderr.
///
/// `filter` uses `RUST_LOG` syntax (e.g. `"thyme_core=debug"`); null means
/// `"info"`. Returns false if the filter is invalid or a subscriber is
/// already installed.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_init_logging(filter: *const c_char) -> bool {
    catch_unwind(|| {
        let directives = if filter.is_null() {
            "info".to_string()
        } else {
            unsafe { read_str(filter) }
        };
        let Ok(env_filter) = EnvFilter::try_new(directives) else {
            return false;
        };
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Codec lifecycle
// ---------------------------------------------------------------------------

/// Create a `ListCodec` from a JSON configuration object.
///
/// Null `config_json` uses the default bounds. Returns null if the
/// configuration is invalid or an internal panic occurs.
/// The caller must free the returned pointer with `thyme_codec_free`.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_codec_new(config_json: *const c_char) -> *mut FfiListCodec {
    catch_unwind(|| {
        let config = if config_json.is_null() {
            CodecConfig::default()
        } else {
            match CodecConfig::from_json(&unsafe { read_str(config_json) }) {
                Ok(config) => config,
                Err(e) => {
                    warn!(error = %e, "rejected codec configuration");
                    return std::ptr::null_mut();
                }
            }
        };
        Box::into_raw(Box::new(FfiListCodec {
            inner: ListCodec::new(config),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a codec created by `thyme_codec_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_codec_free(codec: *mut FfiListCodec) {
    if !codec.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(codec) });
        });
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Encode a list into a link.
///
/// Returns a result with `data_tag = Link` on success.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_encode(
    codec: *const FfiListCodec,
    list: *const FfiToDoList,
) -> *mut FfiListResult {
    catch_unwind(|| {
        if codec.is_null() {
            return FfiListResult::null_arg("codec");
        }
        if list.is_null() {
            return FfiListResult::null_arg("list");
        }
        let codec = unsafe { &*codec };
        let list = unsafe { (*list).to_core() };
        match codec.inner.encode(&list) {
            Ok(link) => FfiListResult::ok_link(link),
            Err(e) => FfiListResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiListResult::panic("panic in thyme_encode"))
}

/// Decode a link taken from a received message.
///
/// Returns a result with `data_tag = List` on success.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_decode(
    codec: *const FfiListCodec,
    link: *const c_char,
) -> *mut FfiListResult {
    catch_unwind(|| {
        if codec.is_null() {
            return FfiListResult::null_arg("codec");
        }
        if link.is_null() {
            return FfiListResult::null_arg("link");
        }
        let codec = unsafe { &*codec };
        let link = Link::new(unsafe { read_str(link) });
        list_result(codec.inner.decode(&link))
    })
    .unwrap_or_else(|_| FfiListResult::panic("panic in thyme_decode"))
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge `remote` into `local` and apply the display sort.
///
/// Returns a result with `data_tag = List` on success.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_reconcile(
    local: *const FfiToDoList,
    remote: *const FfiToDoList,
) -> *mut FfiListResult {
    catch_unwind(|| {
        if local.is_null() {
            return FfiListResult::null_arg("local");
        }
        if remote.is_null() {
            return FfiListResult::null_arg("remote");
        }
        let (local, remote) = unsafe { ((*local).to_core(), (*remote).to_core()) };
        list_result(ListMerger::reconcile(&local, &remote))
    })
    .unwrap_or_else(|_| FfiListResult::panic("panic in thyme_reconcile"))
}

/// Merge `remote` into `local` without sorting.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_merge(
    local: *const FfiToDoList,
    remote: *const FfiToDoList,
) -> *mut FfiListResult {
    catch_unwind(|| {
        if local.is_null() {
            return FfiListResult::null_arg("local");
        }
        if remote.is_null() {
            return FfiListResult::null_arg("remote");
        }
        let (local, remote) = unsafe { ((*local).to_core(), (*remote).to_core()) };
        list_result(ListMerger::merge(&local, &remote))
    })
    .unwrap_or_else(|_| FfiListResult::panic("panic in thyme_merge"))
}

/// Return a copy of `list` with unchecked items first and checked items
/// last in check order.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_sort_items(list: *const FfiToDoList) -> *mut FfiListResult {
    with_list(list, "thyme_sort_items", |list| Ok(Ok(sort_items(list))))
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// Create an empty, untitled list. `created_by` may be null if the creator
/// is not known yet; `thyme_list_prepare_for_send` fills it in.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_list_new(created_by: *const c_char) -> *mut FfiListResult {
    catch_unwind(|| {
        let created_by = unsafe { read_str(created_by) };
        FfiListResult::ok_list(ToDoList::new(created_by))
    })
    .unwrap_or_else(|_| FfiListResult::panic("panic in thyme_list_new"))
}

/// Append an unchecked item. The new item is the last one in the returned
/// list; read its `id` from there.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_list_add_item(
    list: *const FfiToDoList,
    name: *const c_char,
) -> *mut FfiListResult {
    with_list(list, "thyme_list_add_item", |list| {
        let name = required(name, "name")?;
        Ok(Ok(list.add_item(name).0))
    })
}

/// Check (`checked = true`) or uncheck an item on behalf of participant
/// `by` at host time `now_ms`.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_list_set_checked(
    list: *const FfiToDoList,
    id: *const c_char,
    checked: bool,
    by: *const c_char,
    now_ms: u64,
) -> *mut FfiListResult {
    with_list(list, "thyme_list_set_checked", |list| {
        let id = required(id, "id")?;
        let by = required(by, "by")?;
        Ok(list.set_checked(&id, checked, &by, now_ms))
    })
}

/// Tombstone an item. It stays in the list with `deleted = true`.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_list_delete_item(
    list: *const FfiToDoList,
    id: *const c_char,
    now_ms: u64,
) -> *mut FfiListResult {
    with_list(list, "thyme_list_delete_item", |list| {
        let id = required(id, "id")?;
        Ok(list.delete_item(&id, now_ms))
    })
}

/// Undo a deletion.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_list_restore_item(
    list: *const FfiToDoList,
    id: *const c_char,
    now_ms: u64,
) -> *mut FfiListResult {
    with_list(list, "thyme_list_restore_item", |list| {
        let id = required(id, "id")?;
        Ok(list.restore_item(&id, now_ms))
    })
}

/// Set the list title.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_list_rename(
    list: *const FfiToDoList,
    name: *const c_char,
) -> *mut FfiListResult {
    with_list(list, "thyme_list_rename", |list| {
        let name = required(name, "name")?;
        Ok(Ok(list.rename(name)))
    })
}

/// Fill a blank title with `fallback_name` and an unset creator with
/// `author` before the list is sent.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_list_prepare_for_send(
    list: *const FfiToDoList,
    fallback_name: *const c_char,
    author: *const c_char,
) -> *mut FfiListResult {
    with_list(list, "thyme_list_prepare_for_send", |list| {
        let fallback_name = required(fallback_name, "fallback_name")?;
        let author = required(author, "author")?;
        Ok(Ok(list.prepare_for_send(&fallback_name, &author)))
    })
}

/// An `op` either rejects a null argument with a ready result or yields the
/// core outcome.
type EditOutcome = Result<ListResult<ToDoList>, *mut FfiListResult>;

/// Copy `list` into a core value, apply `op`, and wrap the outcome. Both the
/// copy and `op` run inside `catch_unwind`.
fn with_list(
    list: *const FfiToDoList,
    name: &str,
    op: impl FnOnce(ToDoList) -> EditOutcome + std::panic::UnwindSafe,
) -> *mut FfiListResult {
    catch_unwind(|| {
        if list.is_null() {
            return FfiListResult::null_arg("list");
        }
        let list = unsafe { (*list).to_core() };
        match op(list) {
            Ok(result) => list_result(result),
            Err(null_arg) => null_arg,
        }
    })
    .unwrap_or_else(|_| FfiListResult::panic(&format!("panic in {name}")))
}

/// Read a string argument that must not be null.
fn required(ptr: *const c_char, arg: &str) -> Result<String, *mut FfiListResult> {
    if ptr.is_null() {
        return Err(FfiListResult::null_arg(arg));
    }
    Ok(unsafe { read_str(ptr) })
}

fn list_result(result: ListResult<ToDoList>) -> *mut FfiListResult {
    match result {
        Ok(list) => FfiListResult::ok_list(list),
        Err(e) => FfiListResult::from_error(e),
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiListResult` returned by any list function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_free_result(result: *mut FfiListResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        FfiListResult::free(unsafe { Box::from_raw(result) });
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn thyme_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c_string(s));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
