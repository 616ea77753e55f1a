use pactum_extract::ExtractionOptions;
use pactum_pipeline::{BatchRunner, DocumentPipeline, PipelineConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = PipelineConfig::from_env()?;
    info!(
        bucket = %config.bucket,
        region = %config.region,
        storage_mode = %config.storage_mode,
        provider = %config.provider,
        delay_ms = config.batch_delay.as_millis() as u64,
        "starting pactum worker"
    );

    let store = config.build_store();
    let router = config.build_router().await;
    let runner =
        BatchRunner::new(DocumentPipeline::new(store, router)).with_delay(config.batch_delay);

    let outcome = runner.run(&ExtractionOptions::default()).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
