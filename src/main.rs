use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bistro::config::Config;
use bistro::db::{self, AppState, Collection, queries};
use bistro::jwt::TokenService;
use bistro::payments::{PaymentIntents, StripeClient, UnconfiguredProvider};

/// Bistro - restaurant ordering API server
#[derive(Parser, Debug)]
#[command(name = "bistro")]
#[command(version, about, long_about = None)]
struct Args {
    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database file (overrides DATABASE_PATH)
    #[arg(long)]
    database: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a JSON array of documents into a collection and exit
    Seed {
        #[arg(long, value_enum)]
        collection: SeedTarget,
        /// Path to the JSON file
        file: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SeedTarget {
    Menu,
    Reviews,
}

impl From<SeedTarget> for Collection {
    fn from(target: SeedTarget) -> Self {
        match target {
            SeedTarget::Menu => Collection::Menus,
            SeedTarget::Reviews => Collection::Reviews,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command {
        Some(Command::Seed { collection, file }) => {
            let path = args.database.unwrap_or_else(Config::database_path_from_env);
            seed(&path, collection.into(), &file)
        }
        None => serve(args.port, args.database).await,
    }
}

fn seed(database_path: &str, coll: Collection, file: &Path) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let pool = db::open_pool(database_path);
    let mut conn = pool.get().context("failed to open database")?;
    let result = queries::seed_collection(&mut conn, coll, &json)
        .with_context(|| format!("failed to seed {}", coll.table()))?;

    tracing::info!(
        collection = coll.table(),
        inserted = result.inserted_count,
        "Seed complete"
    );
    Ok(())
}

async fn serve(port: Option<u16>, database: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(database) = database {
        config.database_path = database;
    }

    tracing::info!("Bistro v{}", env!("CARGO_PKG_VERSION"));

    let pool = db::open_pool(&config.database_path);

    // A store that is down at startup is not fatal; requests fail until it is back.
    match pool.get() {
        Ok(_) => tracing::info!(path = %config.database_path, "Connected to database"),
        Err(e) => tracing::error!(
            path = %config.database_path,
            error = %e,
            "Database unavailable at startup"
        ),
    }

    let payments: Arc<dyn PaymentIntents> = match &config.stripe_secret_key {
        Some(key) => Arc::new(StripeClient::new(key.clone())),
        None => {
            tracing::warn!("STRIPE_SECRET_KEY not set, payment intents will be rejected");
            Arc::new(UnconfiguredProvider)
        }
    };

    tracing::info!(
        admin_check_identity_match = config.policy.admin_check_identity_match,
        order_stats_admin_only = config.policy.order_stats_admin_only,
        "Access policy"
    );

    let state = AppState {
        db: pool,
        tokens: TokenService::new(&config.token_secret),
        payments,
        policy: config.policy,
    };

    let app = bistro::router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!("Bistro server is running on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
