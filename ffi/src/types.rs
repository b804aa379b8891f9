//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use jobs_core::{
    FetchError, HttpMethod, IngestPolicy, JobListAdapter, JobScreen, ListWidget, PendingFetch,
    RowView, TaskState,
};

/// Callback invoked whenever the job list changed wholesale.
///
/// Receives the `user_data` passed to `jobs_screen_new` and the new row
/// count. Runs on the thread that called into the library.
pub type FfiChangedCallback = Option<extern "C" fn(user_data: *mut c_void, row_count: u32)>;

/// `ListWidget` that forwards change notifications to the host's list view.
pub(crate) struct FfiListWidget {
    pub(crate) on_changed: FfiChangedCallback,
    pub(crate) user_data: *mut c_void,
}

impl ListWidget for FfiListWidget {
    fn data_set_changed(&mut self, adapter: &JobListAdapter<'_>) {
        if let Some(callback) = self.on_changed {
            callback(self.user_data, adapter.row_count() as u32);
        }
    }
}

/// Opaque handle to a `JobScreen`. C callers receive a pointer to this and
/// pass it back into every `jobs_screen_*` function.
pub struct FfiJobScreen {
    pub(crate) inner: JobScreen<FfiListWidget>,
    /// The fetch started during initialization, until the host takes it.
    pub(crate) initial: Option<PendingFetch>,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Clone, Copy)]
pub enum FfiIngestPolicy {
    Partial = 0,
    Atomic = 1,
}

impl From<FfiIngestPolicy> for IngestPolicy {
    fn from(p: FfiIngestPolicy) -> Self {
        match p {
            FfiIngestPolicy::Partial => IngestPolicy::Partial,
            FfiIngestPolicy::Atomic => IngestPolicy::Atomic,
        }
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A fetch the host must execute, described as C-compatible plain data.
///
/// The host runs the request on a worker thread and reports the outcome
/// with `jobs_screen_complete` under the same `task_id`.
#[repr(C)]
pub struct FfiFetchRequest {
    pub task_id: u64,
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiFetchRequest {
    /// Convert a core `PendingFetch` into a heap-allocated `FfiFetchRequest`.
    ///
    /// Returns null if a string contains an interior NUL.
    pub(crate) fn from_core(pending: PendingFetch) -> *mut Self {
        let req = pending.request;
        let Ok(url) = CString::new(req.path) else {
            return std::ptr::null_mut();
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let mut ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            ffi_headers.shrink_to_fit();
            let ptr = ffi_headers.as_mut_ptr();
            std::mem::forget(ffi_headers);
            ptr
        };

        Box::into_raw(Box::new(FfiFetchRequest {
            task_id: pending.task_id.0,
            method: req.method.into(),
            url: url.into_raw(),
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller builds this on the stack after executing a request and
/// passes a pointer to `jobs_screen_complete`. The library reads but does
/// not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Task state
// ---------------------------------------------------------------------------

/// State of a fetch task, or why a call could not report one.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiTaskState {
    Pending = 0,
    Succeeded = 1,
    Failed = 2,
    Cancelled = 3,
    /// The outcome was dropped or the task id is unknown.
    Ignored = 4,
    NullArg = 5,
    Panic = 6,
}

impl From<&TaskState> for FfiTaskState {
    fn from(state: &TaskState) -> Self {
        match state {
            TaskState::Pending => FfiTaskState::Pending,
            TaskState::Succeeded { .. } => FfiTaskState::Succeeded,
            TaskState::Failed(_) => FfiTaskState::Failed,
            TaskState::Cancelled => FfiTaskState::Cancelled,
        }
    }
}

/// Error categories for a failed fetch.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Transport = 1,
    Http = 2,
    MalformedBody = 3,
    InvalidRecord = 4,
}

impl From<&FetchError> for FfiErrorCode {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Transport(_) => FfiErrorCode::Transport,
            FetchError::HttpStatus { .. } => FfiErrorCode::Http,
            FetchError::MalformedBody { .. } => FfiErrorCode::MalformedBody,
            FetchError::InvalidRecord { .. } => FfiErrorCode::InvalidRecord,
        }
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One bound row exposed to C: the two text slots of the row template.
#[repr(C)]
pub struct FfiRow {
    pub title: *mut c_char,
    pub detail: *mut c_char,
}

impl FfiRow {
    pub(crate) fn from_core(row: RowView) -> *mut Self {
        Box::into_raw(Box::new(FfiRow {
            title: to_c_string(row.title),
            detail: to_c_string(row.detail),
        }))
    }
}

/// Convert to an owned C string, dropping interior NULs rather than failing.
pub(crate) fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c) => c.into_raw(),
        Err(e) => {
            let mut bytes = e.into_vec();
            bytes.retain(|b| *b != 0);
            CString::new(bytes).unwrap_or_default().into_raw()
        }
    }
}
