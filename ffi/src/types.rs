//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use todo_sync::{ApiError, ErrorKind, Filter, HttpMethod, HttpRequest, SyncError, Todo, TodoSync};

/// Opaque handle to a `TodoSync`. C callers receive a pointer to this and
/// pass it back into every FFI function.
pub struct FfiTodoSync {
    pub(crate) inner: TodoSync,
}

/// Build a C string, dropping interior NULs rather than failing.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let mut s: String = s.into();
    s.retain(|c| c != '\0');
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Delete = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `todo_sync_begin_*` functions. The C caller executes the request
/// and passes the response back through the matching `todo_sync_finish_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let path = c_string(req.path);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

/// One delete produced by `todo_sync_clear_completed`.
#[repr(C)]
pub struct FfiDeleteRequest {
    pub id: i64,
    pub request: *mut FfiHttpRequest,
}

/// The independent deletes produced by `todo_sync_clear_completed`.
#[repr(C)]
pub struct FfiDeleteBatch {
    pub items: *mut FfiDeleteRequest,
    pub len: u32,
}

impl FfiDeleteBatch {
    pub(crate) fn from_core(requests: Vec<(i64, HttpRequest)>) -> *mut Self {
        let len = requests.len() as u32;
        let items = if requests.is_empty() {
            std::ptr::null_mut()
        } else {
            let items: Box<[FfiDeleteRequest]> = requests
                .into_iter()
                .map(|(id, req)| FfiDeleteRequest {
                    id,
                    request: FfiHttpRequest::from_core(req),
                })
                .collect();
            Box::into_raw(items) as *mut FfiDeleteRequest
        };
        Box::into_raw(Box::new(FfiDeleteBatch { items, len }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request, then
/// passes a pointer to a `todo_sync_finish_*` function. A null pointer means
/// the request got no response at all. The FFI layer reads but does not free
/// these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Status and view types
// ---------------------------------------------------------------------------

/// Outcome of an FFI call.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Deserialization = 3,
    Serialization = 4,
    Transport = 5,
    EmptyTitle = 6,
    CreatePending = 7,
    Panic = 8,
    NullArg = 9,
}

impl From<&ApiError> for FfiErrorCode {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::NotFound => FfiErrorCode::NotFound,
            ApiError::HttpError { .. } => FfiErrorCode::Http,
            ApiError::DeserializationError(_) => FfiErrorCode::Deserialization,
            ApiError::SerializationError(_) => FfiErrorCode::Serialization,
            ApiError::Transport(_) => FfiErrorCode::Transport,
        }
    }
}

impl From<&SyncError> for FfiErrorCode {
    fn from(err: &SyncError) -> Self {
        match err {
            SyncError::EmptyTitle => FfiErrorCode::EmptyTitle,
            SyncError::CreatePending => FfiErrorCode::CreatePending,
            SyncError::Api(api) => api.into(),
        }
    }
}

/// Error banner contents; `None` when nothing is shown.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorKind {
    None = 0,
    LoadFailed = 1,
    AddFailed = 2,
    DeleteFailed = 3,
    EmptyTitle = 4,
}

impl From<Option<ErrorKind>> for FfiErrorKind {
    fn from(kind: Option<ErrorKind>) -> Self {
        match kind {
            None => FfiErrorKind::None,
            Some(ErrorKind::LoadFailed) => FfiErrorKind::LoadFailed,
            Some(ErrorKind::AddFailed) => FfiErrorKind::AddFailed,
            Some(ErrorKind::DeleteFailed) => FfiErrorKind::DeleteFailed,
            Some(ErrorKind::EmptyTitle) => FfiErrorKind::EmptyTitle,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiFilter {
    All = 0,
    Active = 1,
    Completed = 2,
}

impl From<FfiFilter> for Filter {
    fn from(f: FfiFilter) -> Self {
        match f {
            FfiFilter::All => Filter::All,
            FfiFilter::Active => Filter::Active,
            FfiFilter::Completed => Filter::Completed,
        }
    }
}

impl From<Filter> for FfiFilter {
    fn from(f: Filter) -> Self {
        match f {
            Filter::All => FfiFilter::All,
            Filter::Active => FfiFilter::Active,
            Filter::Completed => FfiFilter::Completed,
        }
    }
}

/// A single row of the rendered list.
///
/// `busy` is set for items whose delete is outstanding and for the
/// placeholder, which always has `id == 0`.
#[repr(C)]
pub struct FfiTodo {
    pub id: i64,
    pub title: *mut c_char,
    pub completed: bool,
    pub user_id: i64,
    pub busy: bool,
}

impl FfiTodo {
    fn new(todo: &Todo, busy: bool) -> Self {
        FfiTodo {
            id: todo.id,
            title: c_string(todo.title.as_str()),
            completed: todo.completed,
            user_id: todo.user_id,
            busy,
        }
    }
}

/// Rows to render, in order.
#[repr(C)]
pub struct FfiTodoList {
    pub items: *mut FfiTodo,
    pub len: u32,
}

impl FfiTodoList {
    /// Snapshot the filtered list with the placeholder, if any, appended.
    pub(crate) fn visible(sync: &TodoSync) -> *mut Self {
        let mut rows: Vec<FfiTodo> = sync
            .visible()
            .map(|todo| FfiTodo::new(todo, sync.is_busy(todo.id)))
            .collect();
        if let Some(placeholder) = sync.placeholder() {
            rows.push(FfiTodo::new(placeholder, true));
        }

        let len = rows.len() as u32;
        let items = if rows.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(rows.into_boxed_slice()) as *mut FfiTodo
        };
        Box::into_raw(Box::new(FfiTodoList { items, len }))
    }
}
