mod telemetry;

use anyhow::Context;
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file when present.
    // Variables set by the host take precedence.
    let dotenv = dotenvy::dotenv();

    telemetry::init().context("installing tracing subscriber")?;

    if let Err(e) = &dotenv {
        if !e.not_found() {
            error!(error = %e, "failed to read .env");
        }
    }

    if let Err(e) = api::start().await {
        error!(error = %e, "context gateway failed");
        return Err(e).context("running context gateway");
    }

    Ok(())
}
