//! Crypto Heatmap - hourly top-100 market snapshot
//!
//! Single run per invocation; scheduling is left to cron or CI.

use anyhow::Result;

use crypto_heatmap::adapters::cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists (COINGECKO_API_BASE_URL, HEATMAP_OUTPUT_DIR)
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app).await
}
