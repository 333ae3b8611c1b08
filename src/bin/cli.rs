//! PlantWatch CLI
//!
//! Command-line client for the plant-watering backend:
//! - Log in, register and log out
//! - List, add and delete plants
//! - Trigger manual watering
//! - Chart measurement history as sparklines

use anyhow::{bail, Context};
use chrono::{Local, Offset};
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use plantwatch::config::{generate_default_config, Config};
use plantwatch::controller::WATER_DURATION_MS;
use plantwatch::terminal::{SparklineCharts, TerminalPlatform, TerminalView, TokioTimer};
use plantwatch::{FileSessionStore, HttpTransport, PlantId, SessionController};

type Controller = SessionController<TerminalPlatform>;

#[derive(Parser)]
#[command(name = "plantwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Monitor and water your plants from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and cache the session
    Login {
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the cached session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List plants with their latest reading
    Plants {
        /// Also draw moisture and temperature sparklines
        #[arg(long)]
        charts: bool,
    },

    /// Add a plant
    Add {
        name: String,
        /// Explicit plant id
        #[arg(long)]
        id: Option<PlantId>,
    },

    /// Delete a plant and its measurement history
    Delete {
        id: PlantId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Water a plant for five seconds
    Water { id: PlantId },

    /// Chart a plant's measurement history
    Chart { id: PlantId },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config);

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let (assume_yes, show_charts) = match &cli.command {
        Commands::Delete { yes, .. } => (*yes, false),
        Commands::Plants { charts } => (false, *charts),
        Commands::Chart { .. } => (false, true),
        _ => (false, false),
    };

    let transport = HttpTransport::new(&config.api)
        .with_context(|| format!("invalid API URL {}", config.api.base_url))?;
    let controller: Controller = SessionController::new(
        transport,
        FileSessionStore::new(&config.session.path),
        TerminalView::new(assume_yes, show_charts),
        SparklineCharts::new(show_charts),
        TokioTimer,
    )
    .with_utc_offset(Local::now().offset().fix());

    let session = controller.restore();
    tracing::debug!(path = ?config.session.path, logged_in = session.is_authenticated(), "session restored");

    match cli.command {
        Commands::Login { email, password } => {
            let password = password_or_prompt(password)?;
            if !controller.login(&email, &password).await {
                std::process::exit(1);
            }
            println!(
                "Logged in as {}",
                controller.session().email.unwrap_or(email)
            );
        }

        Commands::Register { email, password } => {
            let password = password_or_prompt(password)?;
            if !controller.register(&email, &password).await {
                std::process::exit(1);
            }
        }

        Commands::Logout => {
            controller.logout();
            println!("Logged out.");
        }

        Commands::Whoami => {
            require_session(&controller);
            println!(
                "{}",
                session.email.as_deref().unwrap_or("Logged in (email unknown)")
            );
        }

        Commands::Plants { .. } => {
            require_session(&controller);
            controller.list_plants().await;
            exit_on_expiry(&controller);
        }

        Commands::Add { name, id } => {
            require_session(&controller);
            if !controller.add_plant(&name, id).await {
                exit_on_expiry(&controller);
                std::process::exit(1);
            }
        }

        Commands::Delete { id, .. } => {
            require_session(&controller);
            let name = plant_name(&controller, id).await;
            exit_on_expiry(&controller);
            if !controller.delete_plant(id, &name).await {
                exit_on_expiry(&controller);
                std::process::exit(1);
            }
        }

        Commands::Water { id } => {
            require_session(&controller);
            if controller.water_plant(id).await {
                println!("Water command queued ({} ms).", WATER_DURATION_MS);
            } else {
                exit_on_expiry(&controller);
                std::process::exit(1);
            }
        }

        Commands::Chart { id } => {
            require_session(&controller);
            controller.toggle_chart_visibility(id).await;
            exit_on_expiry(&controller);
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("plantwatch={}", config.logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }
    Ok(())
}

fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("password is required");
    }
    Ok(password)
}

/// Name shown in the delete confirmation; falls back to the id
async fn plant_name(controller: &Controller, id: PlantId) -> String {
    controller
        .find_plant(id)
        .await
        .map(|p| p.name)
        .unwrap_or_else(|| format!("#{}", id))
}

fn require_session(controller: &Controller) {
    if !controller.is_authenticated() {
        not_logged_in();
    }
}

/// A rejected token during the command logged the session out
fn exit_on_expiry(controller: &Controller) {
    if controller.view().auth_requested() && !controller.is_authenticated() {
        eprintln!("Session expired. Run `plantwatch login <email>` again.");
        std::process::exit(1);
    }
}

fn not_logged_in() -> ! {
    eprintln!("Not logged in. Run `plantwatch login <email>` first.");
    std::process::exit(1);
}
