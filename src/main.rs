use std::error::Error;

mod telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from a .env file when present.
    // A missing file is fine; deployments set the environment directly.
    dotenvy::dotenv().ok();

    telemetry::init();

    api::start().await?;

    Ok(())
}
