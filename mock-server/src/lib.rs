use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub use axum::http::StatusCode;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub job_title: String,
    pub min_salary: String,
    pub max_salary: String,
}

impl Job {
    pub fn new(id: &str, title: &str, min_salary: &str, max_salary: &str) -> Self {
        Self {
            job_id: id.to_string(),
            job_title: title.to_string(),
            min_salary: min_salary.to_string(),
            max_salary: max_salary.to_string(),
        }
    }
}

/// What `GET /jobs` answers with.
#[derive(Clone, Debug)]
pub enum Fixture {
    /// 200 with the jobs as a JSON array.
    Jobs(Vec<Job>),
    /// Any status with a verbatim body, for failure cases.
    Raw { status: StatusCode, body: String },
}

impl Fixture {
    pub fn raw(status: StatusCode, body: &str) -> Self {
        Fixture::Raw {
            status,
            body: body.to_string(),
        }
    }
}

pub fn sample_jobs() -> Vec<Job> {
    vec![
        Job::new("J1", "Backend Engineer", "50000", "90000"),
        Job::new("J2", "Mobile Developer", "45000", "85000"),
        Job::new("J3", "Product Designer", "40000", "70000"),
        Job::new("J4", "Site Reliability Engineer", "60000", "110000"),
    ]
}

pub fn app(fixture: Fixture) -> Router {
    Router::new()
        .route("/jobs", get(list_jobs))
        .with_state(Arc::new(fixture))
}

pub async fn run(listener: TcpListener, fixture: Fixture) -> Result<(), std::io::Error> {
    axum::serve(listener, app(fixture)).await
}

async fn list_jobs(State(fixture): State<Arc<Fixture>>) -> Response {
    match fixture.as_ref() {
        Fixture::Jobs(jobs) => {
            tracing::debug!(count = jobs.len(), "serving jobs");
            Json(jobs.clone()).into_response()
        }
        Fixture::Raw { status, body } => {
            tracing::debug!(%status, "serving raw fixture");
            (
                *status,
                [(header::CONTENT_TYPE, "application/json")],
                body.clone(),
            )
                .into_response()
        }
    }
}
