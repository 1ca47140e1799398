use anyhow::Context;
use clap::{Parser, Subcommand};
use profiles_lib::{ProfileDb, DB};
use profiles_server::config::{DEFAULT_DATA_DIRECTORY, DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT};
use profiles_server::{start_webserver, AppState, ServerConfig};
use std::path::PathBuf;
use tracing::{event, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "openprofiles")]
#[command(about = "Profile manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start the profile web server")]
    Start {
        #[arg(long, value_name = "API_SERVER_PORT", env = "PROFILES_PORT", default_value_t = DEFAULT_HTTP_PORT)]
        api_server_port: u16,

        #[arg(long, value_name = "API_SERVER_HOSTNAME", env = "PROFILES_HOST", default_value = DEFAULT_HTTP_HOST)]
        api_server_hostname: String,

        #[arg(short, long, value_name = "DATA_DIRECTORY", env = "PROFILES_DATA_DIR", default_value = DEFAULT_DATA_DIRECTORY)]
        data_directory: PathBuf,

        #[arg(long, env = "PROFILES_SECURE_COOKIES")]
        secure_cookies: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            api_server_port,
            api_server_hostname,
            data_directory,
            secure_cookies,
        } => {
            // Set up tracing
            let collector = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .finish();
            tracing::subscriber::set_global_default(collector)
                .context("There was a problem setting up tracing")?;

            let config = ServerConfig {
                http_host: api_server_hostname,
                http_port: api_server_port,
                data_directory,
                secure_cookies,
            };
            let http_addr = config.http_addr()?;

            std::fs::create_dir_all(&config.data_directory).with_context(|| {
                format!("Failed to create {}", config.data_directory.display())
            })?;
            let db_file = config.db_file().to_string_lossy().into_owned();

            // Create tokio async runtime
            let rt = tokio::runtime::Runtime::new()?;

            // Create or retrieve datastore
            let ds = rt.block_on(async move { ProfileDb::new(db_file).await })?;
            let state = AppState::new(ds, config.secure_cookies)?;

            event!(Level::INFO, "Profiles started successfully! (Press Ctrl+C to exit)");

            rt.block_on(start_webserver(http_addr, state))?;
        }
    }

    Ok(())
}
