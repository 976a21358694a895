mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::CliConfig;
use lotto_core::LottoError;
use lotto_draw::{LotteryError, LottoManager};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lotto")]
#[command(about = "6/45 lottery: ticket sales, draws and prize settlement")]
#[command(version)]
struct Cli {
    /// Data directory for the lottery database
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User registration commands
    #[command(subcommand)]
    User(commands::UserCommands),

    /// Ticket purchase and lookup commands
    #[command(subcommand)]
    Ticket(commands::TicketCommands),

    /// Draw administration commands
    #[command(subcommand)]
    Draw(commands::DrawCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::new(cli.data_dir, cli.verbose);

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_filter()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Using data directory {}", config.data_dir.display());
    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;

    let manager = LottoManager::new(&config.data_dir)
        .await
        .with_context(|| format!("opening lottery data in {}", config.data_dir.display()))?;

    // Execute command
    let result = match cli.command {
        Commands::User(cmd) => commands::handle_user_command(cmd, &manager).await,
        Commands::Ticket(cmd) => commands::handle_ticket_command(cmd, &manager).await,
        Commands::Draw(cmd) => commands::handle_draw_command(cmd, &manager).await,
    };

    if let Err(e) = result {
        match e {
            LotteryError::Core(LottoError::UserNotFound { name }) => {
                eprintln!("Error: User '{}' not found", name);
                eprintln!("Use 'lotto user register {}' first", name);
            }
            LotteryError::Core(LottoError::Validation(reason)) => {
                eprintln!("Error: Invalid numbers: {}", reason);
                eprintln!("Enter six distinct numbers between 1 and 45, e.g. 1,5,12,20,33,42");
            }
            LotteryError::NoActiveDraw => {
                eprintln!("Error: No draw has been published yet");
                eprintln!("Use 'lotto draw publish' to run one");
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
