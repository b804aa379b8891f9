use clap::Parser;
use jobs_cli::Args;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut screen = jobs_cli::run(&args, &mut out)?;
    screen.destroy();
    Ok(())
}
