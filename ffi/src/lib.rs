//! C-ABI wrapper around `jobs-core`.
//!
//! # Overview
//! Exposes the job list screen through `extern "C"` functions so a mobile
//! host (Kotlin via JNI, Swift via a C module) can drive it: create the
//! screen, execute the fetch it asks for on the platform's networking
//! stack, report the outcome, and pull bound rows for its list view.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The host's list view is a C callback; the screen calls it with the new
//!   row count whenever the data set changes.
//! - All screen calls must come from the thread that owns the screen; only
//!   the HTTP round-trip itself belongs on a worker.
//! - The C caller owns all returned pointers and must call the matching
//!   `jobs_free_*` function to release them.
//! - Teardown is two steps. `jobs_screen_destroy` cancels every fetch but
//!   keeps the handle valid, so outcomes that arrive late are reported
//!   `Ignored`; `jobs_screen_free` releases the handle once the host has no
//!   fetch left in flight.

pub mod types;

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use jobs_core::{FetchError, HttpResponse, ScreenConfig, TaskId, TaskState};

use types::*;

// ---------------------------------------------------------------------------
// Screen lifecycle
// ---------------------------------------------------------------------------

/// Create a job screen bound to `base_url` and start its first fetch.
///
/// `on_changed` may be null. `user_data` is handed back to it untouched.
/// Returns null if `base_url` is null or not UTF-8, or on internal panic.
/// Take the initial request with `jobs_screen_take_request`, tear the
/// screen down with `jobs_screen_destroy`, and release it with
/// `jobs_screen_free`.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_screen_new(
    base_url: *const c_char,
    ingest: FfiIngestPolicy,
    on_changed: FfiChangedCallback,
    user_data: *mut c_void,
) -> *mut FfiJobScreen {
    catch_unwind(AssertUnwindSafe(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let Ok(url) = unsafe { CStr::from_ptr(base_url) }.to_str() else {
            return std::ptr::null_mut();
        };
        let config = ScreenConfig::new(url, ingest.into());
        let widget = FfiListWidget {
            on_changed,
            user_data,
        };
        let (screen, pending) = jobs_core::JobScreen::new(config, widget);
        Box::into_raw(Box::new(FfiJobScreen {
            inner: screen,
            initial: Some(pending),
        }))
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Destroy a screen: cancel its fetches and stop applying outcomes.
///
/// The handle stays valid. Outcomes reported afterwards return `Ignored`
/// and `jobs_screen_fetch` returns null. Idempotent; safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_screen_destroy(screen: *mut FfiJobScreen) {
    if screen.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let screen = unsafe { &mut *screen };
        screen.initial = None;
        screen.inner.destroy();
    }));
}

/// Free a screen created by `jobs_screen_new`, destroying it first if the
/// host has not. The handle must not be used afterwards. Safe to call with
/// null.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_screen_free(screen: *mut FfiJobScreen) {
    if screen.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let mut screen = unsafe { Box::from_raw(screen) };
        screen.inner.destroy();
    }));
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Take the request for the fetch started by `jobs_screen_new`.
///
/// Returns it once; later calls (and a null `screen`) return null.
/// The caller must free the result with `jobs_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_screen_take_request(screen: *mut FfiJobScreen) -> *mut FfiFetchRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let screen = unsafe { &mut *screen };
        match screen.initial.take() {
            Some(pending) => FfiFetchRequest::from_core(pending),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Start another fetch; its records are appended after the current ones.
///
/// Returns null if `screen` is null. The caller must free the result with
/// `jobs_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_screen_fetch(screen: *mut FfiJobScreen) -> *mut FfiFetchRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let screen = unsafe { &mut *screen };
        match screen.inner.fetch() {
            Some(pending) => FfiFetchRequest::from_core(pending),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Convert an `FfiHttpResponse` to a core `HttpResponse`.
///
/// A null body is read as empty; invalid UTF-8 is replaced.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }
            .to_string_lossy()
            .into_owned()
    };
    HttpResponse::new(resp.status, body)
}

/// Report the outcome of the fetch `task_id`.
///
/// Pass `response` when the round-trip completed (any status), or null
/// `response` plus a `transport_error` message when it did not. Returns
/// the task's resulting state, `Ignored` if the outcome was dropped, or
/// `NullArg` if `screen` is null or both `response` and `transport_error`
/// are null.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_screen_complete(
    screen: *mut FfiJobScreen,
    task_id: u64,
    response: *const FfiHttpResponse,
    transport_error: *const c_char,
) -> FfiTaskState {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return FfiTaskState::NullArg;
        }
        let outcome = if !response.is_null() {
            Ok(ffi_response_to_core(unsafe { &*response }))
        } else if !transport_error.is_null() {
            let msg = unsafe { CStr::from_ptr(transport_error) }.to_string_lossy();
            Err(FetchError::transport(msg.into_owned()))
        } else {
            return FfiTaskState::NullArg;
        };
        let screen = unsafe { &mut *screen };
        match screen.inner.complete_fetch(TaskId(task_id), outcome) {
            Some(state) => state.into(),
            None => FfiTaskState::Ignored,
        }
    }))
    .unwrap_or(FfiTaskState::Panic)
}

/// Whether the host should abandon the fetch `task_id`: the screen was
/// destroyed or the task cancelled. Hosts may poll this before and during
/// the round-trip. True for a null `screen`.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_screen_task_cancelled(screen: *const FfiJobScreen, task_id: u64) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return true;
        }
        let screen = unsafe { &*screen };
        screen.inner.is_cancelled(TaskId(task_id))
    }))
    .unwrap_or(true)
}

/// Current state of the fetch `task_id`; `Ignored` if the id is unknown.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_screen_task_state(
    screen: *const FfiJobScreen,
    task_id: u64,
) -> FfiTaskState {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return FfiTaskState::NullArg;
        }
        let screen = unsafe { &*screen };
        match screen.inner.task(TaskId(task_id)) {
            Some(task) => task.state().into(),
            None => FfiTaskState::Ignored,
        }
    }))
    .unwrap_or(FfiTaskState::Panic)
}

/// Error category of a failed fetch; `Ok` if the task did not fail.
///
/// When `message` is non-null and the task failed, `*message` receives a
/// C string the caller must free with `jobs_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_screen_task_error(
    screen: *const FfiJobScreen,
    task_id: u64,
    message: *mut *mut c_char,
) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return FfiErrorCode::Ok;
        }
        let screen = unsafe { &*screen };
        let Some(TaskState::Failed(err)) = screen.inner.task(TaskId(task_id)).map(|t| t.state())
        else {
            return FfiErrorCode::Ok;
        };
        if !message.is_null() {
            unsafe { *message = to_c_string(err.to_string()) };
        }
        FfiErrorCode::from(err)
    }))
    .unwrap_or(FfiErrorCode::Ok)
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Number of rows the list view should show. 0 for a null `screen`.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_screen_row_count(screen: *const FfiJobScreen) -> u32 {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return 0;
        }
        let screen = unsafe { &*screen };
        screen.inner.adapter().row_count() as u32
    }))
    .unwrap_or(0)
}

/// Bind the row at `index` and return its two text slots.
///
/// Returns null if `screen` is null or `index` is out of range. The caller
/// must free the result with `jobs_free_row`.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_screen_bind_row(screen: *const FfiJobScreen, index: u32) -> *mut FfiRow {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let screen = unsafe { &*screen };
        let adapter = screen.inner.adapter();
        let index = index as usize;
        if index >= adapter.row_count() {
            return std::ptr::null_mut();
        }
        let mut row = adapter.create_row();
        adapter.bind_row(&mut row, index);
        FfiRow::from_core(row)
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiFetchRequest`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_free_request(req: *mut FfiFetchRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Vec::from_raw_parts(req.headers, req.headers_len as usize, req.headers_len as usize)
            };
            for h in headers {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    }));
}

/// Free an `FfiRow` returned by `jobs_screen_bind_row`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_free_row(row: *mut FfiRow) {
    if row.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let row = unsafe { Box::from_raw(row) };
        if !row.title.is_null() {
            drop(unsafe { CString::from_raw(row.title) });
        }
        if !row.detail.is_null() {
            drop(unsafe { CString::from_raw(row.detail) });
        }
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn jobs_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { CString::from_raw(s) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
