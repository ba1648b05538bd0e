//! CLI administration tool for linkshrink.
//!
//! Provides commands for managing users and tokens, viewing statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! cargo run --bin admin -- db migrate
//!
//! # Create a user (prompts for the password)
//! cargo run --bin admin -- user create -u alice
//!
//! # List users with their link counts
//! cargo run --bin admin -- user list
//!
//! # Revoke every token of a user
//! cargo run --bin admin -- token revoke alice
//!
//! # View statistics
//! cargo run --bin admin -- stats
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required)
//! - `TOKEN_SIGNING_SECRET` (required for `user create`, which issues a token)

use linkshrink::api::dto::auth::CredentialsRequest;
use linkshrink::application::services::AuthService;
use linkshrink::config::{Config, mask_connection_string};
use linkshrink::domain::repositories::{TokenRepository, UserRepository};
use linkshrink::infrastructure::persistence::{MIGRATOR, PgTokenRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

/// CLI tool for managing linkshrink.
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
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
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
enum UserAction {
    /// Create a user and print its first token
    Create {
        /// Username (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// List users with link counts
    List,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Revoke all active tokens of a user
    Revoke {
        /// Owner of the tokens
        username: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Apply pending migrations
    Migrate,

    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url().context("Database is not configured")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_connection_string(&database_url)))?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let users = Arc::new(PgUserRepository::new(pool.clone()));

    match action {
        UserAction::Create { username } => {
            let secret = std::env::var("TOKEN_SIGNING_SECRET")
                .context("TOKEN_SIGNING_SECRET must be set to issue tokens")?;
            let tokens = Arc::new(PgTokenRepository::new(pool));
            create_user(AuthService::new(users, tokens, secret), username).await?;
        }
        UserAction::List => list_users(users, &pool).await?,
    }

    Ok(())
}

/// Creates a user with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for username (or use provided)
/// 2. Prompt for password twice
/// 3. Apply the same rules as `POST /register/`
/// 4. Store the Argon2id hash and issue a token
/// 5. Display the token once
async fn create_user(
    auth: AuthService<PgUserRepository, PgTokenRepository>,
    username: Option<String>,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    let credentials = CredentialsRequest { username, password };
    credentials
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid input: {}", e))?;

    let (user, token) = auth
        .register(&credentials.username, &credentials.password)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!("{}", "✅ User created successfully!".green().bold());
    println!("  ID:       {}", user.id.to_string().bright_black());
    println!("  Username: {}", user.username.cyan());
    println!("  Token:    {}", token.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/stats/",
        token.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all users with the number of links they own.
async fn list_users(users: Arc<PgUserRepository>, pool: &PgPool) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let all = users
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if all.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    let counts: HashMap<i64, i64> = sqlx::query_as::<_, (i64, i64)>(
        "SELECT user_id, COUNT(*) FROM shortened_urls WHERE user_id IS NOT NULL GROUP BY user_id",
    )
    .fetch_all(pool)
    .await?
    .into_iter()
    .collect();

    println!(
        "  {:<5} {:<30} {:<20} {:<6}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Created".bright_white().bold(),
        "Links".bright_white().bold()
    );
    println!("  {}", "─".repeat(64).bright_black());

    for user in &all {
        println!(
            "  {:<5} {:<30} {:<20} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            counts.get(&user.id).copied().unwrap_or(0)
        );
    }

    println!();
    println!("  Total: {}", all.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let users = PgUserRepository::new(pool.clone());
    let tokens = PgTokenRepository::new(pool);

    match action {
        TokenAction::Revoke { username, yes } => {
            revoke_tokens(&users, &tokens, &username, yes).await?
        }
    }

    Ok(())
}

/// Revokes every active token of a user, with a confirmation prompt.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes`
/// - Already revoked tokens are left untouched
async fn revoke_tokens(
    users: &PgUserRepository,
    tokens: &PgTokenRepository,
    username: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔒 Revoke Tokens".bright_blue().bold());
    println!();

    let user = users
        .find_by_username(username)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    println!("  User: {}", user.username.cyan());
    println!("  ID:   {}", user.id.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Revoke all tokens of this user?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let revoked = tokens
        .revoke_all_for_user(user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke tokens: {}", e))?;

    println!();
    if revoked == 0 {
        println!("{}", "⚠️  No active tokens".yellow());
    } else {
        println!(
            "{} {}",
            "✅ Revoked tokens:".green().bold(),
            revoked.to_string().bright_white().bold()
        );
    }
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of users
/// - Total number of links
/// - Sum of recorded clicks
/// - Number of active tokens
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shortened_urls")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM shortened_urls")
            .fetch_one(pool)
            .await?;

    let tokens_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!(
        "  Users:         {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Links:         {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:        {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!(
        "  Active tokens: {}",
        tokens_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            MIGRATOR
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
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

            let applied: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
                    .fetch_one(pool)
                    .await
                    .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Migrations: {} applied, {} embedded",
                applied.to_string().bright_white(),
                MIGRATOR.iter().count().to_string().bright_white()
            );
            println!();
        }
    }

    Ok(())
}
