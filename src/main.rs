//! Command-line entry point for the MongoDB provider.
//!
//! ```text
//! mongodb-provider resolve  --config app.toml [--json]
//! mongodb-provider services --config app.toml
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use mongodb_provider::config::{resolve, TomlConfigManager, SECTION_KEY};
use mongodb_provider::manager::connection_string;
use mongodb_provider::observability::init_logging;
use mongodb_provider::provider::MONGODB_SERVICE;
use mongodb_provider::{App, Manager, MongoServiceProvider, ServiceProvider};

#[derive(Parser)]
#[command(name = "mongodb-provider")]
#[command(
    about = "Resolve MongoDB provider configuration and inspect published services",
    long_about = None
)]
struct Cli {
    /// Log level for this crate (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved [mongodb] configuration
    Resolve {
        #[arg(short, long)]
        config: PathBuf,

        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Run Register and Boot, then list published services
    Services {
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "MongoDB provider failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Resolve { config, json } => {
            let manager = TomlConfigManager::from_path(&config)?;
            let resolved = resolve(&manager)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                let mut document = toml::Table::new();
                document.insert(SECTION_KEY.to_string(), toml::Value::try_from(&resolved)?);
                println!("{}", toml::to_string_pretty(&document)?);
            }
        }
        Commands::Services { config } => {
            let app = App::from_config_path(&config)?;
            let mut provider = MongoServiceProvider::new();
            provider.register(Some(&app))?;
            provider.boot(Some(&app))?;

            for name in provider.providers() {
                println!("{}", name);
            }
            if let Some(manager) = app
                .services()
                .and_then(|services| services.make::<Manager>(MONGODB_SERVICE).ok())
            {
                let resolved = manager.config();
                println!();
                println!("uri:               {}", connection_string(resolved));
                println!("database:          {}", manager.database().name());
                println!("connect_timeout:   {:?}", resolved.get_connect_timeout());
                println!("socket_timeout:    {:?}", resolved.get_socket_timeout());
                println!("max_pool_size:     {}", resolved.max_pool_size);
            }
        }
    }
    Ok(())
}
