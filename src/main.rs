use anyhow::Result;
use clap::{Parser, Subcommand};

use credit_dash::cli::{self, OutputFormat, PredictArgs};
use credit_dash::{config, logging};

#[derive(Debug, Parser)]
#[command(name = "credit-dash")]
#[command(about = "Credit scoring dashboard backed by a remote Prediction API")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the web dashboard
    Serve {
        /// Listen address (overrides server.addr)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open the dashboard in a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Score one applicant described by flags
    Predict {
        #[command(flatten)]
        args: PredictArgs,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Explore the client test dataset
    Clients {
        #[command(subcommand)]
        action: ClientsAction,
        /// Output format: table (default), json
        #[arg(long, default_value = "table", global = true)]
        format: String,
    },
    /// Check configuration, data files and API settings
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ClientsAction {
    /// List client identifiers
    List,
    /// Show a client's fields
    Show { id: String },
    /// Score a client from the dataset
    Predict { id: String },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config file to ~/.credit-dash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value, e.g. `api.url https://example.org`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();
    logging::init(&cfg.logging.level);

    match app.command {
        Commands::Serve { addr, no_browser } => cli::run_serve(cfg, addr, no_browser),
        Commands::Predict { args, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_predict(&cfg, &args, fmt)
        }
        Commands::Clients { action, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            match action {
                ClientsAction::List => cli::run_clients_list(&cfg, fmt),
                ClientsAction::Show { id } => cli::run_clients_show(&cfg, &id, fmt),
                ClientsAction::Predict { id } => cli::run_clients_predict(&cfg, &id, fmt),
            }
        }
        Commands::Health => cli::run_health(&cfg),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
