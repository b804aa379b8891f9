//! Verify request building and both ingest contracts against the JSON test
//! vectors in `test-vectors/`.
//!
//! Each case carries a simulated response and the expected list contents
//! (and error kind, if any) under the partial and atomic policies.

use jobs_core::{FetchError, HttpMethod, HttpResponse, Job, JobList, JobsClient};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> JobsClient {
    JobsClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn load() -> serde_json::Value {
    let raw = include_str!("../../test-vectors/list_jobs.json");
    serde_json::from_str(raw).unwrap()
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

/// Check an error against the `error` / `error_index` fields of a vector.
fn assert_error(name: &str, expected: &serde_json::Value, err: &FetchError) {
    let kind = expected["error"].as_str().unwrap();
    let index = expected.get("error_index").and_then(|v| v.as_u64());
    match (kind, err) {
        ("HttpStatus", FetchError::HttpStatus { .. }) => {}
        ("InvalidRecord", FetchError::InvalidRecord { index: i, .. })
        | ("MalformedBody", FetchError::MalformedBody { index: i, .. }) => {
            assert_eq!(Some(*i as u64), index, "{name}: error index");
        }
        (kind, err) => panic!("{name}: expected {kind}, got {err:?}"),
    }
}

#[test]
fn request_matches_vector() {
    let vectors = load();
    let expected = &vectors["expected_request"];
    let req = client().build_list_jobs();

    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()));
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()));
    assert!(req.headers.is_empty());
    assert!(req.body.is_none());
}

#[test]
fn partial_ingest_vectors() {
    let vectors = load();
    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_partial"];
        let expected_jobs: Vec<Job> = serde_json::from_value(expected["jobs"].clone()).unwrap();

        let mut jobs = JobList::new();
        let result = c.ingest_list_jobs(&simulated_response(case), &mut jobs);

        assert_eq!(jobs.as_slice(), expected_jobs.as_slice(), "{name}: list contents");
        match result {
            Ok(n) => {
                assert!(expected.get("error").is_none(), "{name}: expected an error");
                assert_eq!(n, expected_jobs.len(), "{name}: appended count");
            }
            Err(err) => assert_error(name, expected, &err),
        }
    }
}

#[test]
fn atomic_parse_vectors() {
    let vectors = load();
    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_atomic"];
        let expected_jobs: Vec<Job> = serde_json::from_value(expected["jobs"].clone()).unwrap();

        match c.parse_list_jobs(&simulated_response(case)) {
            Ok(jobs) => {
                assert!(expected.get("error").is_none(), "{name}: expected an error");
                assert_eq!(jobs, expected_jobs, "{name}: parsed result");
            }
            Err(err) => {
                assert!(expected_jobs.is_empty(), "{name}: atomic failure keeps nothing");
                assert_error(name, expected, &err);
            }
        }
    }
}
