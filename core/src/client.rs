//! Stateless request builder and response ingester for the jobs API.
//!
//! # Design
//! `JobsClient` holds only a `base_url`. `build_list_jobs` produces the one
//! request the screen ever sends; the host executes it. The response is
//! consumed either by `ingest_list_jobs`, which streams the array and
//! appends each element as it decodes, or by `parse_list_jobs`, which
//! decodes everything before returning. Both share the same streaming
//! decoder so the two contracts cannot drift apart.

use std::fmt;

use serde::de::{DeserializeSeed, SeqAccess, Visitor};

use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Job, JobList};

#[derive(Debug, Clone)]
pub struct JobsClient {
    base_url: String,
}

impl JobsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base_url}/jobs` with no headers, query, or body.
    pub fn build_list_jobs(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/jobs", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Decode the response and append each job to `jobs` as soon as it is
    /// read. Returns the number appended.
    ///
    /// On error, records decoded before the failing element stay in `jobs`.
    pub fn ingest_list_jobs(
        &self,
        response: &HttpResponse,
        jobs: &mut JobList,
    ) -> Result<usize, FetchError> {
        check_status(response)?;

        let start = jobs.len();
        let mut opened = false;
        let mut de = serde_json::Deserializer::from_str(&response.body);
        let result = AppendJobs {
            sink: &mut *jobs,
            opened: &mut opened,
        }
        .deserialize(&mut de)
        .and_then(|()| de.end());
        let appended = jobs.len() - start;

        result.map(|()| appended).map_err(|e| {
            if opened {
                FetchError::from_json(e, appended)
            } else {
                FetchError::malformed_top_level(e)
            }
        })
    }

    /// Decode the whole response; nothing is returned unless every element
    /// is a valid job.
    pub fn parse_list_jobs(&self, response: &HttpResponse) -> Result<Vec<Job>, FetchError> {
        let mut scratch = JobList::new();
        self.ingest_list_jobs(response, &mut scratch)?;
        Ok(scratch.into_vec())
    }
}

/// Reject non-2xx statuses before looking at the body.
fn check_status(response: &HttpResponse) -> Result<(), FetchError> {
    if response.is_success() {
        return Ok(());
    }
    Err(FetchError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Seq visitor that pushes each decoded element straight into the list.
///
/// `opened` flips once the top-level array is entered, so a body of the
/// wrong shape can be told apart from a bad element.
struct AppendJobs<'a> {
    sink: &'a mut JobList,
    opened: &'a mut bool,
}

impl<'de> DeserializeSeed<'de> for AppendJobs<'_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for AppendJobs<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON array of job objects")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        *self.opened = true;
        while let Some(job) = seq.next_element::<Job>()? {
            self.sink.push(job);
        }
        Ok(())
    }
}
