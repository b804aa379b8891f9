//! Core of the job list screen.
//!
//! # Overview
//! Builds the one `HttpRequest` the screen needs and ingests the
//! `HttpResponse` the host hands back (host-does-IO pattern). The screen
//! controller owns the job list; the adapter projects it into two-line rows
//! for whatever list widget the host provides.
//!
//! # Design
//! - `JobScreen` is the only owner of the list; `JobListAdapter` is a
//!   borrowed, read-only view, so no shared mutable state exists.
//! - Every fetch is an explicit `FetchTask` with a cancellation token tied
//!   to the screen lifetime; late outcomes are dropped, not applied.
//! - Ingestion is either partial (append per element) or atomic
//!   (all-or-nothing), picked by `IngestPolicy`.
//! - Types use owned `String` / `Vec` fields so `jobs-ffi` can map them to C
//!   without lifetimes.

pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod screen;
pub mod task;
pub mod types;
pub mod widget;

pub use adapter::{JobListAdapter, RowView};
pub use client::JobsClient;
pub use config::{IngestPolicy, ScreenConfig, DEFAULT_BASE_URL};
pub use error::{ConfigError, FetchError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use screen::{JobScreen, ScreenState, FINISHED_TASK_HISTORY};
pub use task::{FetchTask, PendingFetch, TaskId, TaskState};
pub use types::{Job, JobList};
pub use widget::{ListWidget, RecyclingList};

pub use tokio_util::sync::CancellationToken;
