//! C-ABI wrapper around `todo-sync`.
//!
//! # Overview
//! Exposes the todo synchronizer through `extern "C"` functions so a
//! rendering layer written in any language with a C FFI can drive it. The
//! host executes the HTTP requests and renders the list snapshots.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `todo_sync_begin_*` / `todo_sync_finish_*` mirror the core API 1:1.
//!   Passing a null response to a finish function reports a transport
//!   failure.
//! - Banner timing uses the wall clock at the moment of each call.
//! - The C caller owns all returned pointers and must call the matching
//!   `todo_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use todo_sync::{ApiError, Exchange, HttpResponse, SyncConfig, TodoSync};

use types::{
    c_string, FfiDeleteBatch, FfiDeleteRequest, FfiErrorCode, FfiErrorKind, FfiFilter, FfiHeader,
    FfiHttpRequest, FfiHttpResponse, FfiTodo, FfiTodoList, FfiTodoSync,
};

/// Borrow a C string as `&str`, treating invalid UTF-8 as empty.
///
/// # Safety
/// `s` must be non-null and point to a NUL-terminated string.
unsafe fn str_arg<'a>(s: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(s) }.to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Create a synchronizer for `owner_id`'s collection at `base_url`, with the
/// default banner timeout.
///
/// Returns null if `base_url` is null or empty, or `owner_id` is not positive.
/// The caller must free the returned pointer with `todo_sync_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_new(base_url: *const c_char, owner_id: i64) -> *mut FfiTodoSync {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { str_arg(base_url) };
        new_handle(&SyncConfig::new(url, owner_id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a synchronizer from a JSON config
/// (`{"baseUrl": ..., "ownerId": ..., "errorTimeoutMs": ...}`).
///
/// Returns null if `config_json` is null or invalid.
#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_new_from_json(config_json: *const c_char) -> *mut FfiTodoSync {
    catch_unwind(|| {
        if config_json.is_null() {
            return std::ptr::null_mut();
        }
        match SyncConfig::from_json(unsafe { str_arg(config_json) }) {
            Ok(config) => new_handle(&config),
            Err(err) => {
                tracing::warn!(%err, "rejected sync config");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

fn new_handle(config: &SyncConfig) -> *mut FfiTodoSync {
    match TodoSync::from_config(config) {
        Ok(inner) => Box::into_raw(Box::new(FfiTodoSync { inner })),
        Err(err) => {
            tracing::warn!(%err, "rejected sync config");
            std::ptr::null_mut()
        }
    }
}

/// Free a handle created by `todo_sync_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_free(sync: *mut FfiTodoSync) {
    if !sync.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(sync) });
        });
    }
}

/// Run `f` against a mutable handle, mapping null and panics to null.
fn with_sync<T>(sync: *mut FfiTodoSync, f: impl FnOnce(&mut TodoSync) -> *mut T) -> *mut T {
    if sync.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(AssertUnwindSafe(|| {
        let handle = unsafe { &mut *sync };
        f(&mut handle.inner)
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Run `f` against a mutable handle for calls that report an error code.
fn with_sync_code(
    sync: *mut FfiTodoSync,
    f: impl FnOnce(&mut TodoSync) -> FfiErrorCode,
) -> FfiErrorCode {
    if sync.is_null() {
        return FfiErrorCode::NullArg;
    }
    catch_unwind(AssertUnwindSafe(|| {
        let handle = unsafe { &mut *sync };
        f(&mut handle.inner)
    }))
    .unwrap_or(FfiErrorCode::Panic)
}

/// Convert the caller's response into an `Exchange`. Null means no response.
fn exchange(response: *const FfiHttpResponse) -> Exchange {
    if response.is_null() {
        return Err(ApiError::Transport("no response".to_string()));
    }
    let resp = unsafe { &*response };
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { str_arg(resp.body) }.to_string()
    };
    Ok(HttpResponse::new(resp.status, body))
}

fn code<T>(result: &Result<T, ApiError>) -> FfiErrorCode {
    match result {
        Ok(_) => FfiErrorCode::Ok,
        Err(err) => err.into(),
    }
}

// ---------------------------------------------------------------------------
// Remote operations
// ---------------------------------------------------------------------------

/// Start loading the owner's list. Free the result with `todo_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_begin_load(sync: *mut FfiTodoSync) -> *mut FfiHttpRequest {
    with_sync(sync, |s| FfiHttpRequest::from_core(s.begin_load(Instant::now())))
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_finish_load(
    sync: *mut FfiTodoSync,
    response: *const FfiHttpResponse,
) -> FfiErrorCode {
    with_sync_code(sync, |s| code(&s.finish_load(exchange(response), Instant::now())))
}

/// Start creating a todo titled `title`.
///
/// Returns null when the title is blank (the banner shows `EmptyTitle`),
/// when another create is pending, or on a null argument. If `status` is
/// non-null it receives the reason.
#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_begin_create(
    sync: *mut FfiTodoSync,
    title: *const c_char,
    status: *mut FfiErrorCode,
) -> *mut FfiHttpRequest {
    let report = |value: FfiErrorCode| {
        if !status.is_null() {
            unsafe { *status = value };
        }
    };
    if title.is_null() {
        report(FfiErrorCode::NullArg);
        return std::ptr::null_mut();
    }
    let title = unsafe { str_arg(title) };
    let mut outcome = FfiErrorCode::Panic;
    if sync.is_null() {
        outcome = FfiErrorCode::NullArg;
    }
    let request = with_sync(sync, |s| match s.begin_create(title, Instant::now()) {
        Ok(req) => {
            outcome = FfiErrorCode::Ok;
            FfiHttpRequest::from_core(req)
        }
        Err(err) => {
            outcome = (&err).into();
            std::ptr::null_mut()
        }
    });
    report(outcome);
    request
}

/// Apply the create outcome. Anything but `Ok` means the input should keep
/// its text.
#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_finish_create(
    sync: *mut FfiTodoSync,
    response: *const FfiHttpResponse,
) -> FfiErrorCode {
    with_sync_code(sync, |s| code(&s.finish_create(exchange(response), Instant::now())))
}

/// Start deleting `id`. Returns null for the placeholder, unknown ids and
/// ids already being deleted.
#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_begin_remove(sync: *mut FfiTodoSync, id: i64) -> *mut FfiHttpRequest {
    with_sync(sync, |s| match s.begin_remove(id) {
        Some(req) => FfiHttpRequest::from_core(req),
        None => std::ptr::null_mut(),
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_finish_remove(
    sync: *mut FfiTodoSync,
    id: i64,
    response: *const FfiHttpResponse,
) -> FfiErrorCode {
    with_sync_code(sync, |s| code(&s.finish_remove(id, exchange(response), Instant::now())))
}

/// One delete per completed item; finish each with `todo_sync_finish_remove`.
/// Free the batch with `todo_free_batch`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_clear_completed(sync: *mut FfiTodoSync) -> *mut FfiDeleteBatch {
    with_sync(sync, |s| FfiDeleteBatch::from_core(s.clear_completed()))
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Rows to render under the current filter, placeholder last. Free with
/// `todo_free_list`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_visible(sync: *mut FfiTodoSync) -> *mut FfiTodoList {
    with_sync(sync, |s| FfiTodoList::visible(s))
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_set_filter(sync: *mut FfiTodoSync, filter: FfiFilter) -> FfiErrorCode {
    with_sync_code(sync, |s| {
        s.set_filter(filter.into());
        FfiErrorCode::Ok
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_active_count(sync: *const FfiTodoSync) -> u32 {
    if sync.is_null() {
        return 0;
    }
    unsafe { &*sync }.inner.active_count() as u32
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_completed_count(sync: *const FfiTodoSync) -> u32 {
    if sync.is_null() {
        return 0;
    }
    unsafe { &*sync }.inner.completed_count() as u32
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_error(sync: *const FfiTodoSync) -> FfiErrorKind {
    if sync.is_null() {
        return FfiErrorKind::None;
    }
    unsafe { &*sync }.inner.error().into()
}

/// Banner text, or null when nothing is shown. Free with `todo_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_error_message(sync: *const FfiTodoSync) -> *mut c_char {
    if sync.is_null() {
        return std::ptr::null_mut();
    }
    match unsafe { &*sync }.inner.error() {
        Some(kind) => c_string(kind.message()),
        None => std::ptr::null_mut(),
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_dismiss_error(sync: *mut FfiTodoSync) -> FfiErrorCode {
    with_sync_code(sync, |s| {
        s.dismiss_error();
        FfiErrorCode::Ok
    })
}

/// Clear the banner if its timeout has elapsed. Returns true if it cleared.
#[unsafe(no_mangle)]
pub extern "C" fn todo_sync_tick(sync: *mut FfiTodoSync) -> bool {
    let mut cleared = false;
    with_sync_code(sync, |s| {
        cleared = s.tick(Instant::now());
        FfiErrorCode::Ok
    });
    cleared
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free the fields and the struct of a request built by `from_core`.
///
/// # Safety
/// `req` must be non-null and come from `FfiHttpRequest::from_core`.
unsafe fn drop_request(req: *mut FfiHttpRequest) {
    let req = unsafe { Box::from_raw(req) };
    if !req.path.is_null() {
        drop(unsafe { CString::from_raw(req.path) });
    }
    if !req.body.is_null() {
        drop(unsafe { CString::from_raw(req.body) });
    }
    if !req.headers.is_null() && req.headers_len > 0 {
        let headers: Box<[FfiHeader]> = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                req.headers,
                req.headers_len as usize,
            ))
        };
        for h in headers.iter() {
            if !h.key.is_null() {
                drop(unsafe { CString::from_raw(h.key) });
            }
            if !h.value.is_null() {
                drop(unsafe { CString::from_raw(h.value) });
            }
        }
    }
}

/// Free an `FfiHttpRequest` returned by any `todo_sync_begin_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { drop_request(req) });
}

/// Free a batch from `todo_sync_clear_completed`, including every request
/// in it. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_batch(batch: *mut FfiDeleteBatch) {
    if batch.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let batch = unsafe { Box::from_raw(batch) };
        if !batch.items.is_null() && batch.len > 0 {
            let items: Box<[FfiDeleteRequest]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(batch.items, batch.len as usize))
            };
            for item in items.iter() {
                if !item.request.is_null() {
                    unsafe { drop_request(item.request) };
                }
            }
        }
    });
}

/// Free a list from `todo_sync_visible`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_list(list: *mut FfiTodoList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let list = unsafe { Box::from_raw(list) };
        if !list.items.is_null() && list.len > 0 {
            let items: Box<[FfiTodo]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize))
            };
            for item in items.iter() {
                if !item.title.is_null() {
                    drop(unsafe { CString::from_raw(item.title) });
                }
            }
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
