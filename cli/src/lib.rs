//! Terminal host for the job list screen.
//!
//! Owns a `JobScreen` on the calling thread, runs each fetch it asks for
//! on a worker thread with ureq, and feeds the outcome back through a
//! channel, so the screen itself is only ever touched from one thread.
//!
//! Configuration starts from `ScreenConfig::from_env` (`JOBS_BASE_URL`,
//! `JOBS_INGEST`); command-line flags override it.

use std::io::Write;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use jobs_core::{
    ConfigError, FetchError, HttpMethod, HttpRequest, HttpResponse, IngestPolicy, JobScreen,
    PendingFetch, RecyclingList, ScreenConfig, TaskId, TaskState,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Parser)]
#[command(name = "jobs", about = "Fetch the job list and render it as rows")]
pub struct Args {
    /// Base URL of the jobs service; `/jobs` is appended.
    /// Overrides `JOBS_BASE_URL`.
    #[arg(long)]
    pub base_url: Option<String>,

    /// How a response is merged into the list: `partial` or `atomic`.
    /// Overrides `JOBS_INGEST`.
    #[arg(long)]
    pub ingest: Option<IngestPolicy>,

    /// Rows visible at once.
    #[arg(long, default_value_t = 10)]
    pub rows: usize,

    /// Number of fetches to run one after another.
    #[arg(long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub fetches: usize,
}

impl Args {
    /// The environment config with any flags applied on top.
    pub fn screen_config(&self) -> Result<ScreenConfig, ConfigError> {
        Ok(self.apply(ScreenConfig::from_env()?))
    }

    pub fn apply(&self, mut config: ScreenConfig) -> ScreenConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(ingest) = self.ingest {
            config.ingest = ingest;
        }
        config
    }
}

type Outcome = (TaskId, Result<HttpResponse, FetchError>);

/// Execute an `HttpRequest` with ureq.
///
/// Any status the server sends back is returned as data; only failures to
/// complete the round-trip become `FetchError::Transport`.
pub fn execute(req: &HttpRequest) -> Result<HttpResponse, FetchError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match req.method {
        HttpMethod::Get => agent.get(&req.path).call(),
    }
    .map_err(|e| FetchError::transport(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| FetchError::transport(e.to_string()))?;
    Ok(HttpResponse::new(status, body))
}

/// Run `pending` on its own worker thread.
///
/// The worker owns the only sender, so the receiver disconnects if it exits
/// without an outcome. A fetch cancelled before it starts sends nothing.
fn spawn_fetch<E>(pending: PendingFetch, execute: E) -> std::io::Result<mpsc::Receiver<Outcome>>
where
    E: FnOnce(&HttpRequest) -> Result<HttpResponse, FetchError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name(pending.task_id.to_string())
        .spawn(move || {
            if pending.token.is_cancelled() {
                debug!(task_id = %pending.task_id, "fetch cancelled before start");
                return;
            }
            debug!(task_id = %pending.task_id, "worker executing fetch");
            let outcome = execute(&pending.request);
            let _ = tx.send((pending.task_id, outcome));
        })?;
    Ok(rx)
}

/// Run the screen until `args.fetches` fetches have completed, writing the
/// rendered rows to `out` after each one. Returns the screen still `Ready`.
pub fn run(args: &Args, out: &mut dyn Write) -> anyhow::Result<JobScreen<RecyclingList>> {
    run_with(args.screen_config()?, args, out, execute)
}

/// `run` with an explicit config and HTTP executor.
pub fn run_with<E>(
    config: ScreenConfig,
    args: &Args,
    out: &mut dyn Write,
    execute: E,
) -> anyhow::Result<JobScreen<RecyclingList>>
where
    E: Fn(&HttpRequest) -> Result<HttpResponse, FetchError> + Clone + Send + 'static,
{
    let (mut screen, pending) = JobScreen::new(config, RecyclingList::new(args.rows));
    let mut next = Some(pending);
    let mut remaining = args.fetches;

    while let Some(pending) = next.take() {
        remaining = remaining.saturating_sub(1);
        let task_id = pending.task_id;
        let rx = spawn_fetch(pending, execute.clone())
            .with_context(|| format!("failed to start worker for {task_id}"))?;
        let (task_id, outcome) = rx
            .recv()
            .with_context(|| format!("worker for {task_id} exited without an outcome"))?;

        // Failures are logged by the screen itself.
        if let Some(TaskState::Succeeded { appended }) = screen.complete_fetch(task_id, outcome) {
            writeln!(out, "{task_id}: {appended} jobs")?;
        }
        for line in screen.widget().render() {
            writeln!(out, "{line}")?;
        }

        if remaining > 0 {
            next = screen.fetch();
        }
    }

    info!(rows = screen.adapter().row_count(), "all fetches finished");
    Ok(screen)
}

#[cfg(test)]
mod tests {
    use super::*;

    use jobs_core::CancellationToken;

    const TWO_JOBS: &str = r#"[
        {"job_id":"J1","job_title":"Engineer","min_salary":"50000","max_salary":"90000"},
        {"job_id":"J2","job_title":"Designer","min_salary":"40000","max_salary":"70000"}
    ]"#;

    fn canned(_: &HttpRequest) -> Result<HttpResponse, FetchError> {
        Ok(HttpResponse::new(200, TWO_JOBS))
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["jobs"]).unwrap();
        assert_eq!(args.rows, 10);
        assert_eq!(args.fetches, 1);
        assert_eq!(args.base_url, None);
        assert_eq!(args.ingest, None);
        assert_eq!(args.apply(ScreenConfig::default()), ScreenConfig::default());
    }

    #[test]
    fn flags_override_environment_config() {
        let env = ScreenConfig::new("http://from-env", IngestPolicy::Partial);

        let args = Args::try_parse_from(["jobs"]).unwrap();
        assert_eq!(args.apply(env.clone()), env);

        let args = Args::try_parse_from(["jobs", "--ingest", "atomic"]).unwrap();
        let config = args.apply(env.clone());
        assert_eq!(config.base_url, "http://from-env");
        assert_eq!(config.ingest, IngestPolicy::Atomic);

        let args = Args::try_parse_from(["jobs", "--base-url", "http://from-flag"]).unwrap();
        let config = args.apply(env);
        assert_eq!(config.base_url, "http://from-flag");
        assert_eq!(config.ingest, IngestPolicy::Partial);
    }

    #[test]
    fn rejects_zero_fetches() {
        assert!(Args::try_parse_from(["jobs", "--fetches", "0"]).is_err());
    }

    #[test]
    fn runs_requested_fetch_count() {
        let args = Args::try_parse_from(["jobs", "--fetches", "2", "--rows", "1"]).unwrap();
        let mut out = Vec::new();
        let screen = run_with(ScreenConfig::default(), &args, &mut out, canned).unwrap();
        assert_eq!(screen.tasks().len(), 2);
        assert_eq!(screen.jobs().len(), 4);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("fetch-1: 2 jobs"), "{text}");
        assert!(text.contains("fetch-2: 2 jobs"), "{text}");
    }

    #[test]
    fn worker_panic_is_an_error() {
        let args = Args::try_parse_from(["jobs"]).unwrap();
        let mut out = Vec::new();
        let explode = |_: &HttpRequest| -> Result<HttpResponse, FetchError> {
            panic!("executor blew up")
        };
        let err = run_with(ScreenConfig::default(), &args, &mut out, explode).unwrap_err();
        assert!(err.to_string().contains("exited without an outcome"), "{err}");
        assert!(out.is_empty());
    }

    #[test]
    fn cancelled_fetch_sends_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let pending = PendingFetch {
            task_id: TaskId(1),
            request: HttpRequest {
                method: HttpMethod::Get,
                path: "http://127.0.0.1:1/jobs".to_string(),
                headers: Vec::new(),
                body: None,
            },
            token,
        };
        let rx = spawn_fetch(pending, canned).unwrap();
        assert!(rx.recv().is_err());
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "jobs",
            "--base-url",
            "http://example.test",
            "--ingest",
            "partial",
            "--rows",
            "3",
            "--fetches",
            "2",
        ])
        .unwrap();
        assert_eq!(args.base_url.as_deref(), Some("http://example.test"));
        assert_eq!(args.ingest, Some(IngestPolicy::Partial));
        assert_eq!(args.rows, 3);
        assert_eq!(args.fetches, 2);
    }

    #[test]
    fn rejects_unknown_ingest_policy() {
        assert!(Args::try_parse_from(["jobs", "--ingest", "eager"]).is_err());
    }
}
