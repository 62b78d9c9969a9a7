mod analysis;
mod auth;
mod config;
mod database;
mod error;
mod models;
mod routes;
mod state;

use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::database::Database;
use crate::state::AppState;

#[derive(Parser)]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the JSON API server.
    Serve {
        /// Override the configured port.
        #[clap(long)]
        port: Option<u16>,
        /// Override the configured database URL.
        #[clap(long)]
        database_url: Option<String>,
    },
    /// Create the schema and load sample data.
    Seed {
        #[clap(long)]
        database_url: Option<String>,
    },
    /// Print the swing-state classification table.
    Swing {
        #[clap(long)]
        database_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();

    let outcome = match opts.command {
        Command::Serve { port, database_url } => serve(port, database_url).await,
        Command::Seed { database_url } => seed(database_url).await,
        Command::Swing { database_url } => swing(database_url).await,
    };

    if let Err(e) = outcome {
        eprintln!("{} {}", "error:".bright_red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(port: Option<u16>, database_url: Option<String>) -> Config {
    let mut config = Config::load();
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(database_url) = database_url {
        config.database_url = database_url;
    }
    config
}

async fn serve(
    port: Option<u16>,
    database_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(port, database_url);

    tokio::fs::create_dir_all(&config.uploads_dir).await?;
    let db = Database::new(&config.database_url).await?;
    tracing::info!("database ready: {}", config.database_url);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);

    let state = AppState::new(db, config);
    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}

async fn seed(database_url: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(None, database_url);
    let db = Database::new(&config.database_url).await?;

    let summary = database::seed::seed_all(&db).await?;

    println!(
        "Seeded {} candidates, {} elections, {} constituencies, {} alliances, {} polls, {} posts, {} admins into {}",
        summary.candidates.to_string().bright_green(),
        summary.elections.to_string().bright_green(),
        summary.constituencies.to_string().bright_green(),
        summary.alliances.to_string().bright_green(),
        summary.polls.to_string().bright_green(),
        summary.posts.to_string().bright_green(),
        summary.admins.to_string().bright_green(),
        config.database_url.bright_cyan()
    );

    Ok(())
}

async fn swing(database_url: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(None, database_url);
    let db = Database::new(&config.database_url).await?;

    let records = db.get_winner_records().await?;
    let table = analysis::swing_table(&records);

    if table.is_empty() {
        println!("No election results on record.");
        return Ok(());
    }

    for entry in table {
        let wins = entry
            .win_counts
            .iter()
            .map(|(party, count)| format!("{}={}", party, count))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{:<14} {:<12} dominant={:<8} wins: {}",
            entry.constituency.bright_cyan(),
            entry.label.to_string().bright_yellow(),
            entry.dominant_party.as_deref().unwrap_or("-"),
            wins
        );
    }

    Ok(())
}
