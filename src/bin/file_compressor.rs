use cleanroom_apps::compressor;
use cleanroom_apps::config::CompressorConfig;
use mimalloc::MiMalloc;
use tracing::{error, info};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = CompressorConfig::load()?;
    cleanroom_apps::telemetry::init(&cfg.loglevel);

    info!(
        input_location = %cfg.input_location.display(),
        output_location = %cfg.output_location.display(),
        poll_interval_secs = cfg.poll_interval_secs,
        poll_max_retries = cfg.poll_max_retries
    );

    if let Err(e) = compressor::run(&cfg).await {
        error!(error = %e, "compression failed");
        return Err(e.into());
    }
    Ok(())
}
