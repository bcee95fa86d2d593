//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointer + length instead of `Vec`,
//! and enums with explicit discriminants. Conversion functions live here to
//! keep `lib.rs` focused on the `extern "C"` surface.
//!
//! Lists flow both ways. The host may build an `FfiToDoList` itself or pass
//! back one it received in a result; the FFI layer only reads input lists and
//! never frees them.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;

use thyme_core::{Link, ListError, ListItem, ToDoList};

/// Opaque handle to a `ListCodec`. C callers receive a pointer to this and
/// pass it back into `thyme_encode` / `thyme_decode`.
pub struct FfiListCodec {
    pub(crate) inner: thyme_core::ListCodec,
}

// ---------------------------------------------------------------------------
// String helpers
// ---------------------------------------------------------------------------

/// Copy a borrowed C string into an owned `String`. Null reads as empty.
///
/// # Safety
/// `ptr` must be null or a valid NUL-terminated string.
pub(crate) unsafe fn read_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

/// Hand an owned string to C. Interior NUL bytes cannot be represented in a
/// C string and are dropped.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let bytes: Vec<u8> = s.into_bytes().into_iter().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Free a string produced by `into_c_string`. Null is ignored.
pub(crate) fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

// ---------------------------------------------------------------------------
// List types
// ---------------------------------------------------------------------------

/// A single list item exposed to C.
#[repr(C)]
pub struct FfiListItem {
    pub id: *mut c_char,
    pub name: *mut c_char,
    pub checked: bool,
    pub checked_by: *mut c_char,
    pub checked_at: u64,
    pub deleted: bool,
    pub deleted_at: u64,
}

impl FfiListItem {
    fn from_core(item: ListItem) -> Self {
        FfiListItem {
            id: into_c_string(item.id),
            name: into_c_string(item.name),
            checked: item.checked,
            checked_by: into_c_string(item.checked_by),
            checked_at: item.checked_at,
            deleted: item.deleted,
            deleted_at: item.deleted_at,
        }
    }

    /// # Safety
    /// String fields must be null or valid NUL-terminated strings.
    unsafe fn to_core(&self) -> ListItem {
        unsafe {
            ListItem {
                id: read_str(self.id),
                name: read_str(self.name),
                checked: self.checked,
                checked_by: read_str(self.checked_by),
                checked_at: self.checked_at,
                deleted: self.deleted,
                deleted_at: self.deleted_at,
            }
        }
    }

    /// Free the C-string fields (but not the struct itself).
    fn free_fields(&self) {
        free_c_string(self.id);
        free_c_string(self.name);
        free_c_string(self.checked_by);
    }
}

/// A whole list exposed to C. `items` points to `len` contiguous items.
#[repr(C)]
pub struct FfiToDoList {
    pub name: *mut c_char,
    pub created_by: *mut c_char,
    pub items: *mut FfiListItem,
    pub len: u32,
}

impl FfiToDoList {
    fn from_core(list: ToDoList) -> Self {
        let len = list.items.len() as u32;
        let items: Box<[FfiListItem]> =
            list.items.into_iter().map(FfiListItem::from_core).collect();
        let items_ptr = if items.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(items) as *mut FfiListItem
        };
        FfiToDoList {
            name: into_c_string(list.name),
            created_by: into_c_string(list.created_by),
            items: items_ptr,
            len,
        }
    }

    /// Copy a host-owned list into a core value.
    ///
    /// # Safety
    /// `items` must be null or point to `len` valid items, and every string
    /// must be null or NUL-terminated.
    pub(crate) unsafe fn to_core(&self) -> ToDoList {
        let items = if self.items.is_null() || self.len == 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(self.items, self.len as usize) }
                .iter()
                .map(|item| unsafe { item.to_core() })
                .collect()
        };
        unsafe {
            ToDoList {
                name: read_str(self.name),
                created_by: read_str(self.created_by),
                items,
            }
        }
    }

    /// Free everything owned by a list built with `from_core`, including the
    /// box itself.
    fn free(list: Box<FfiToDoList>) {
        free_c_string(list.name);
        free_c_string(list.created_by);
        if !list.items.is_null() && list.len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize);
            let items = unsafe { Box::from_raw(slice) };
            for item in items.iter() {
                item.free_fields();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiListResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    MalformedPayload = 1,
    PayloadTooLarge = 2,
    DuplicateItemId = 3,
    UnknownItem = 4,
    InvalidConfig = 5,
    Panic = 6,
    NullArg = 7,
}

/// Tag that tells `thyme_free_result` what `FfiListResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    /// `data` is an `FfiToDoList*`.
    List = 1,
    /// `data` is a NUL-terminated link string.
    Link = 2,
}

/// Result envelope for every list operation.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload described by `data_tag`.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiListResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiListResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiListResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiListResult {
            error_code,
            error_message: into_c_string(msg),
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build a success result carrying a list.
    pub(crate) fn ok_list(list: ToDoList) -> *mut Self {
        let ffi_list = Box::new(FfiToDoList::from_core(list));
        Self::ok(FfiDataTag::List, Box::into_raw(ffi_list) as *mut c_void)
    }

    /// Build a success result carrying a link string.
    pub(crate) fn ok_link(link: Link) -> *mut Self {
        Self::ok(FfiDataTag::Link, into_c_string(link.into_string()) as *mut c_void)
    }

    /// Build an error result from a `ListError`.
    pub(crate) fn from_error(err: ListError) -> *mut Self {
        let code = match &err {
            ListError::MalformedPayload(_) => FfiErrorCode::MalformedPayload,
            ListError::PayloadTooLarge { .. } => FfiErrorCode::PayloadTooLarge,
            ListError::DuplicateItemId(_) => FfiErrorCode::DuplicateItemId,
            ListError::UnknownItem(_) => FfiErrorCode::UnknownItem,
            ListError::InvalidConfig(_) => FfiErrorCode::InvalidConfig,
        };
        Self::err(code, err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, msg.to_string())
    }

    /// Release a result and whatever its `data` points to.
    pub(crate) fn free(result: Box<FfiListResult>) {
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::List => {
                FfiToDoList::free(unsafe { Box::from_raw(result.data as *mut FfiToDoList) });
            }
            FfiDataTag::Link => free_c_string(result.data as *mut c_char),
            FfiDataTag::None => {}
        }
    }
}
