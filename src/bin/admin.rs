//! CLI administration tool for shortlink.
//!
//! Inspects links and statistics directly in the database, and converts
//! between identifiers and short codes without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # View totals and the most clicked links
//! cargo run --bin admin -- stats
//!
//! # Show one link
//! cargo run --bin admin -- link 4c92
//!
//! # Convert between identifiers and codes (no database needed)
//! cargo run --bin admin -- encode 125
//! cargo run --bin admin -- decode 21
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required for database commands): PostgreSQL connection string
//! - `BASE_URL` (optional): prefix used when printing short URLs
//! - `CODE_MIN_LENGTH` (optional): padding used by `encode`

use shortlink::application::services::LinkService;
use shortlink::domain::entities::{Link, LinkStatus};
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::PgLinkRepository;
use shortlink::utils::code_generator::{DEFAULT_MIN_LENGTH, ShortCodeCodec};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
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
    /// Show totals and the most clicked links
    Stats {
        /// Number of top links to list
        #[arg(short, long, default_value_t = 10)]
        top: i64,
    },

    /// Show a single link by short code
    Link {
        /// Short code, e.g. "4c92"
        code: String,
    },

    /// Encode a numeric identifier as a short code
    Encode {
        id: u64,
    },

    /// Decode a short code into its numeric identifier
    Decode {
        code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let codec = ShortCodeCodec::new(
        std::env::var("CODE_MIN_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MIN_LENGTH),
    );

    match cli.command {
        Commands::Encode { id } => {
            println!("{}", codec.encode(id).bright_yellow().bold());
        }
        Commands::Decode { code } => {
            let id = codec
                .decode(&code)
                .with_context(|| format!("'{code}' is not a valid short code"))?;
            println!("{}", id.to_string().bright_yellow().bold());
        }
        Commands::Stats { top } => {
            let pool = connect().await?;
            handle_stats(&pool, top).await?;
        }
        Commands::Link { code } => {
            let pool = connect().await?;
            handle_link(&pool, codec, &code).await?;
        }
        Commands::Db { action } => {
            let pool = connect().await?;
            handle_db_action(action, &pool).await?;
        }
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

fn base_url() -> String {
    std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Displays system statistics.
///
/// Shows:
/// - Total and active number of links
/// - Total number of clicks
/// - The `top` most clicked links
async fn handle_stats(pool: &PgPool, top: i64) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let active_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM links WHERE expires_at IS NULL OR expires_at > NOW()",
    )
    .fetch_one(pool)
    .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM links")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:         {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Active links:  {}",
        active_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:        {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    let repo = PgLinkRepository::new(Arc::new(pool.clone()));
    let links = repo
        .top_by_clicks(top.clamp(1, 100))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load top links: {}", e))?;

    if links.is_empty() {
        return Ok(());
    }

    println!(
        "  {:<12} {:>8}  {:<8} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Status".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<12} {:>8}  {:<8} {}",
            link.code.cyan(),
            link.clicks,
            status_label(link),
            link.long_url
        );
    }
    println!();

    Ok(())
}

/// Shows a single link, expired ones included.
async fn handle_link(pool: &PgPool, codec: ShortCodeCodec, code: &str) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repo, codec, base_url());

    let link = service
        .stats(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  Short URL: {}", service.short_url(&link.code).bright_yellow());
    println!("  Long URL:  {}", link.long_url.cyan());
    println!("  ID:        {}", link.id.to_string().bright_black());
    println!("  Clicks:    {}", link.clicks.to_string().bright_green().bold());
    println!(
        "  Created:   {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    match link.expires_at {
        Some(expires_at) => println!("  Expires:   {}", expires_at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("  Expires:   {}", "never".bright_black()),
    }
    println!("  Status:    {}", status_label(&link));
    println!();

    Ok(())
}

fn status_label(link: &Link) -> ColoredString {
    match link.status() {
        LinkStatus::Active => "ACTIVE".green(),
        LinkStatus::Expired => "EXPIRED".red(),
    }
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
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
