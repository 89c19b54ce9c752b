use bytebodh_client::utils::logger::setup_logger;
use bytebodh_client::{ByteBodhClient, Config};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logger();

    let config = Config::new();
    info!("Configuration: {}", config);

    let client = ByteBodhClient::new(config.clone()).await?;

    if client.session().await?.is_none() {
        if let Err(e) = client.login(&config.credentials).await {
            error!("Login failed: {}", e);
            return Err(e.into());
        }
    }

    let summary = client.dashboard_summary().await;
    info!("Dashboard summary: {}", summary);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
