use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use carebridge_backend_lib::{
    auth::{password::hash_password_secure, FlatFileRevocations},
    config::Settings,
    model::User,
    router::create_router,
    storage::{FlatFileStore, Store},
    AppState,
};

#[derive(Parser)]
#[command(name = "carebridge-backend", about = "CareBridge coordination backend")]
struct Cli {
    /// Path to a config file (defaults to carebridge.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (the default)
    Serve,
    /// Create a platform superadmin account
    CreateSuperadmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "Platform")]
        first_name: String,
        #[arg(long, default_value = "Admin")]
        last_name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    let store = FlatFileStore::open(&settings.data_dir).await?;
    let revocations =
        Arc::new(FlatFileRevocations::open(settings.data_dir.join("revoked-tokens.json")).await?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let bind_addr = settings.bind_addr;
            let state = Arc::new(AppState::new(store, revocations, settings)?);
            let app = create_router(state);

            let listener = TcpListener::bind(&bind_addr).await?;
            tracing::info!(%bind_addr, "listening");
            axum::serve(listener, app).await?;
        },
        Command::CreateSuperadmin {
            email,
            password,
            first_name,
            last_name,
        } => {
            let mut password = password;
            let password_hash = hash_password_secure(&mut password)?;
            let mut user = User::new(
                email.trim().to_lowercase(),
                first_name,
                last_name,
                String::new(),
                password_hash,
            );
            user.is_superadmin = true;
            let user = store.insert_user(user).await?;
            tracing::info!(user_id = %user.id, "superadmin created");
            println!("created superadmin {}", user.email);
        },
    }

    Ok(())
}
