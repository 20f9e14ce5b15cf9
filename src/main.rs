use std::sync::Arc;

use certwatch::{
    checker::CertificateChecker,
    config::Config,
    revocation::store::FileStore,
    revocation::transport::HttpTransport,
    telemetry,
};
use color_eyre::eyre::eyre;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let config = Config::load()?;
    tracing::info!("Loaded configuration: {:?}", config);

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: certwatch <certificate-file>"))?;
    let bytes = std::fs::read(&path)?;
    tracing::info!("read {} bytes from {path}", bytes.len());

    let transport = HttpTransport::new()?;
    let store_dir = config.checker.store_dir.clone().unwrap_or_else(|| "config".to_string());
    let checker = CertificateChecker::new(
        config.checker,
        Arc::new(transport),
        Arc::new(FileStore::new(store_dir)),
    );

    let report = checker.analyze(&bytes).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
