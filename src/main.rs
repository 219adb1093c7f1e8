use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskd::{register_defaults, AppState, Config, ExecutorRegistry, TaskManager};

/// HTTP-exposed task runner.
#[derive(Debug, Parser)]
#[command(name = "taskd", version, about)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("taskd=info,tower_http=info")),
        )
        .init();

    let config = Config::load(&args.config)
        .with_context(|| format!("loading configuration from {:?}", args.config))?;

    let publisher =
        taskd::publisher_from_config(&config.events).context("building event publisher")?;

    let registry = Arc::new(ExecutorRegistry::new());
    register_defaults(&registry).await;

    let mut manager = TaskManager::new(
        registry.clone(),
        publisher.clone(),
        config.tasks.max_concurrent,
    );
    if let Some(timeout) = config.tasks.timeout() {
        manager = manager.with_timeout(timeout);
    }

    let state = AppState::new(Arc::new(manager), registry);

    taskd::serve(&config.address(), state, publisher)
        .await
        .context("running http server")?;

    Ok(())
}
