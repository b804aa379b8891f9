use mock_server::{sample_jobs, Fixture, Job};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_server=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let jobs = match std::env::var("JOBS_FIXTURE") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let jobs: Vec<Job> = serde_json::from_str(&raw)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            tracing::info!(%path, count = jobs.len(), "loaded fixture");
            jobs
        }
        Err(_) => sample_jobs(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    mock_server::run(listener, Fixture::Jobs(jobs)).await
}
