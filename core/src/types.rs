//! Domain types for the jobs API.
//!
//! # Design
//! `Job` mirrors the wire schema of `GET /jobs` but uses Rust field names;
//! serde renames bridge the two. All four fields are opaque strings,
//! salaries included, because the service sends them as strings and the
//! screen only ever displays them.
//!
//! `JobList` is owned by the screen controller. Its public surface is
//! read-only; only the fetch ingestion path inside this crate appends.

use serde::{Deserialize, Serialize};

/// A single job listing returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    #[serde(rename = "job_id")]
    pub id: String,
    #[serde(rename = "job_title")]
    pub title: String,
    pub min_salary: String,
    pub max_salary: String,
}

impl Job {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        min_salary: impl Into<String>,
        max_salary: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            min_salary: min_salary.into(),
            max_salary: max_salary.into(),
        }
    }
}

/// Ordered sequence of jobs backing the list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobList {
    items: Vec<Job>,
}

impl JobList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Job> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Job] {
        &self.items
    }

    pub(crate) fn push(&mut self, job: Job) {
        self.items.push(job);
    }

    pub(crate) fn extend(&mut self, jobs: impl IntoIterator<Item = Job>) {
        self.items.extend(jobs);
    }

    pub(crate) fn into_vec(self) -> Vec<Job> {
        self.items
    }
}

impl<'a> IntoIterator for &'a JobList {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_deserializes_from_wire_names() {
        let job: Job = serde_json::from_str(
            r#"{"job_id":"J1","job_title":"Engineer","min_salary":"50000","max_salary":"90000"}"#,
        )
        .unwrap();
        assert_eq!(job, Job::new("J1", "Engineer", "50000", "90000"));
    }

    #[test]
    fn job_serializes_to_wire_names() {
        let json = serde_json::to_value(Job::new("J1", "Engineer", "1", "2")).unwrap();
        assert_eq!(json["job_id"], "J1");
        assert_eq!(json["job_title"], "Engineer");
        assert_eq!(json["min_salary"], "1");
        assert_eq!(json["max_salary"], "2");
    }

    #[test]
    fn job_ignores_unknown_keys() {
        let job: Job = serde_json::from_str(
            r#"{"job_id":"J2","job_title":"Chef","min_salary":"1","max_salary":"2","remote":true}"#,
        )
        .unwrap();
        assert_eq!(job.title, "Chef");
    }

    #[test]
    fn job_rejects_missing_key() {
        let result: Result<Job, _> =
            serde_json::from_str(r#"{"job_id":"J3","job_title":"Chef","min_salary":"1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn job_rejects_numeric_salary() {
        let result: Result<Job, _> = serde_json::from_str(
            r#"{"job_id":"J4","job_title":"Chef","min_salary":1,"max_salary":"2"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn job_list_keeps_insertion_order_and_duplicates() {
        let mut list = JobList::new();
        assert!(list.is_empty());
        list.push(Job::new("A", "a", "1", "2"));
        list.extend(vec![Job::new("B", "b", "1", "2"), Job::new("A", "a", "1", "2")]);
        let ids: Vec<&str> = list.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "A"]);
        assert_eq!(list.len(), 3);
        assert!(list.get(3).is_none());
    }
}
