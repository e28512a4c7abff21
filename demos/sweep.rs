use anyhow::{Context, Result};
use modbroom::{Client, SweepConfig, Sweeper};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let site_url = std::env::var("WP_SITE_URL").context("WP_SITE_URL is not set")?;
    let username = std::env::var("WP_ADMIN_USER").context("WP_ADMIN_USER is not set")?;
    let password = std::env::var("WP_ADMIN_PASS").context("WP_ADMIN_PASS is not set")?;

    let client = Client::new(site_url, username, password);
    let report = Sweeper::new(client, SweepConfig::default()).run().await?;

    println!("deleted {} pending comments", report.succeeded);
    if report.failed > 0 {
        println!(
            "{} deletions failed; re-running is safe, already-deleted comments count as success",
            report.failed
        );
    }

    Ok(())
}
