use ap_tracker::{
    cli::{self, Cli},
    config::{database::get_database_url, settings::load_settings_or_default},
    errors::Result,
};
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible); stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Parse arguments and load settings
    let cli = Cli::parse();
    let settings = load_settings_or_default(cli.config.as_deref())
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    let database_url = get_database_url(&settings);
    info!("Settings loaded");

    // 4. Run the requested report
    let output = cli::execute(&cli, &settings, &database_url)
        .await
        .inspect_err(|e| error!("Command failed: {}", e))?;

    println!("{output}");
    Ok(())
}
