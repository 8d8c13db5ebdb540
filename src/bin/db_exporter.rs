use cleanroom_apps::config::ExporterConfig;
use cleanroom_apps::exporter;
use mimalloc::MiMalloc;
use tracing::{error, info};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = ExporterConfig::load()?;
    cleanroom_apps::telemetry::init(&cfg.loglevel);

    info!(
        output_location = %cfg.output_location.display(),
        secret_id = %cfg.db_config_cgs_secret_id,
        governance = %cfg.governance_endpoint,
        secrets = %cfg.secrets_endpoint,
        db_port = cfg.db_port,
        "now starting the application"
    );

    if let Err(e) = exporter::run(&cfg).await {
        error!(error = %e, "export failed");
        return Err(e.into());
    }
    Ok(())
}
