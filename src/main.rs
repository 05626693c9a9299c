//! AAD Risk entrypoint. Loads config and model artifacts (fatal on failure), then
//! either scores one JSON record given as the first argument or serves the
//! calculator page.

use aad_risk::{config::AppConfig, logging::StructuredLogger, server, Calculator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    let config_path = std::env::var("AAD_RISK_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let loaded = AppConfig::load(&config_path);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    StructuredLogger::init(config.log.json, &config.log.level);

    if let Err(e) = &loaded {
        warn!(config = %config_path.display(), error = %e, "config file unreadable; using defaults");
    }
    info!(config = %config_path.display(), "AAD risk calculator starting");

    let calculator = match Calculator::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "error loading the model or scaler");
            eprintln!("Error loading the model or scaler: {}", e);
            return Err(e.into());
        }
    };

    if let Some(record_path) = std::env::args_os().nth(1) {
        let mut out = std::io::stdout().lock();
        calculator.assess_file(Path::new(&record_path), &mut out)?;
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(server::serve(Arc::new(calculator), &config.server.bind))?;
    info!("AAD risk calculator stopped");
    Ok(())
}
