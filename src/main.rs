use anyhow::Result;
use lasertech_support::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
