//! CLI administration tool for shorturl.
//!
//! Inspects the allocation counter and URL mappings directly in the
//! database, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the allocation counter
//! cargo run --bin admin -- counter show
//!
//! # Create the counter if it does not exist
//! cargo run --bin admin -- counter init
//!
//! # Find the identifier of a URL, or the URL of an identifier
//! cargo run --bin admin -- lookup url https://example.com/a
//! cargo run --bin admin -- lookup short 42
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use shorturl::domain::entities::SHORT_URL_COUNTER;
use shorturl::domain::repositories::{CounterRepository, MappingRepository};
use shorturl::infrastructure::persistence::{PgCounterRepository, PgMappingRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shorturl.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect or create the allocation counter
    Counter {
        #[command(subcommand)]
        action: CounterAction,
    },

    /// Look up a mapping
    Lookup {
        #[command(subcommand)]
        target: LookupTarget,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum CounterAction {
    /// Show the current counter value
    Show,

    /// Create the counter with value 0 if absent
    Init,
}

#[derive(Subcommand)]
enum LookupTarget {
    /// Find the short identifier assigned to a URL (exact match)
    Url { url: String },

    /// Find the URL a short identifier points to
    Short { id: i64 },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Counter { action } => handle_counter_action(action, &pool).await?,
        Commands::Lookup { target } => handle_lookup(target, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_counter_action(action: CounterAction, pool: &PgPool) -> Result<()> {
    let repo = PgCounterRepository::new(Arc::new(pool.clone()));

    match action {
        CounterAction::Show => {
            println!("{}", "Allocation counter".bright_blue().bold());
            println!();

            match repo
                .find(SHORT_URL_COUNTER)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
            {
                Some(counter) => {
                    println!("  Name: {}", counter.name.cyan());
                    println!(
                        "  Next identifier: {}",
                        counter.seq.to_string().bright_green().bold()
                    );
                }
                None => {
                    println!(
                        "{}",
                        "  Counter does not exist yet (run `admin counter init`)".yellow()
                    );
                }
            }
            println!();
        }
        CounterAction::Init => {
            let seq = repo
                .get_or_init(SHORT_URL_COUNTER)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to initialize counter: {}", e))?;

            println!(
                "{} {} = {}",
                "Counter ready:".green().bold(),
                SHORT_URL_COUNTER.cyan(),
                seq.to_string().bright_green()
            );
        }
    }

    Ok(())
}

/// Looks a mapping up by either key.
async fn handle_lookup(target: LookupTarget, pool: &PgPool) -> Result<()> {
    let repo = PgMappingRepository::new(Arc::new(pool.clone()));

    let mapping = match &target {
        LookupTarget::Url { url } => repo.find_by_original(url).await,
        LookupTarget::Short { id } => repo.find_by_short(*id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    match mapping {
        Some(mapping) => {
            println!("  Short:    {}", mapping.short.to_string().bright_green().bold());
            println!("  Original: {}", mapping.original.cyan());
            println!(
                "  Created:  {}",
                mapping
                    .created_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string()
                    .bright_black()
            );
        }
        None => {
            println!("{}", "No mapping found".yellow());
        }
    }

    Ok(())
}

/// Displays allocation statistics.
///
/// Shows:
/// - Number of stored mappings
/// - Current counter value
/// - Gap count: identifiers consumed by the counter without a mapping
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let pool_arc = Arc::new(pool.clone());
    let mappings = PgMappingRepository::new(pool_arc.clone());
    let counters = PgCounterRepository::new(pool_arc);

    let mapping_count = mappings
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let seq = counters
        .find(SHORT_URL_COUNTER)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .map(|c| c.seq);

    println!(
        "  Mappings:      {}",
        mapping_count.to_string().bright_green().bold()
    );

    match seq {
        Some(seq) => {
            let gaps = (seq - mapping_count).max(0);
            println!("  Counter:       {}", seq.to_string().bright_green().bold());
            let gaps_text = gaps.to_string();
            println!(
                "  Gaps:          {}",
                if gaps == 0 {
                    gaps_text.bright_green().bold()
                } else {
                    gaps_text.yellow().bold()
                }
            );
        }
        None => {
            println!("  Counter:       {}", "not initialized".yellow());
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "Migrations applied".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
